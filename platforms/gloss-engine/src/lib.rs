pub mod config;

pub use config::TranslatorConfig;

use gloss_annotate::{AnnotationError, Annotator};
use gloss_grammar::GrammarError;
use gloss_lexicon::{CachedLexicon, LexicalStore};
use gloss_protocol::Sentence;
use gloss_resolver::{GlossResolver, ResolveError};
use log::{debug, error, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abandon a whole request. Sentence-level failures never
/// surface here; they become a "translation failed" entry instead.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("annotation failed: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("inconsistent sentence structure: {0}")]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Glosses for one input paragraph, one sequence per sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphTranslation {
    /// 1-based position of the paragraph in the request.
    pub p_number: usize,
    pub original: String,
    pub glosses: Vec<Vec<String>>,
}

/// The paragraphs of one request together with their translation, which is
/// written at most once.
#[derive(Debug, Default)]
pub struct TextData {
    original: Vec<String>,
    translation: OnceCell<Vec<ParagraphTranslation>>,
}

impl TextData {
    pub fn new(original: Vec<String>) -> Self {
        Self {
            original,
            translation: OnceCell::new(),
        }
    }

    pub fn original(&self) -> &[String] {
        &self.original
    }

    /// `None` until a translator has run over this text.
    pub fn translation(&self) -> Option<&[ParagraphTranslation]> {
        self.translation.get().map(Vec::as_slice)
    }
}

/// Drives annotation, reordering and gloss resolution over whole requests.
pub struct Translator<A, S> {
    annotator: A,
    store: S,
    config: TranslatorConfig,
}

impl<A: Annotator, S: LexicalStore> Translator<A, S> {
    pub fn new(annotator: A, store: S, config: TranslatorConfig) -> Self {
        Self {
            annotator,
            store,
            config,
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translates `data` unless it already carries a translation.
    pub fn run<'d>(&self, data: &'d TextData) -> Result<&'d [ParagraphTranslation], TranslateError> {
        data.translation
            .get_or_try_init(|| self.translate(&data.original))
            .map(Vec::as_slice)
    }

    pub fn translate(&self, paragraphs: &[String]) -> Result<Vec<ParagraphTranslation>, TranslateError> {
        let annotated = self.annotator.annotate(paragraphs)?;
        if annotated.len() != paragraphs.len() {
            return Err(AnnotationError::ParagraphCountMismatch {
                expected: paragraphs.len(),
                actual: annotated.len(),
            }
            .into());
        }

        let cache = CachedLexicon::with_enabled(&self.store, self.config.cache_lookups);
        let resolver = GlossResolver::new(&cache, self.config.target_language.as_str());

        let mut translations = Vec::with_capacity(paragraphs.len());
        for (i, (original, sentences)) in paragraphs.iter().zip(annotated).enumerate() {
            let glosses = sentences
                .iter()
                .map(|sentence| translate_sentence(&resolver, sentence))
                .collect::<Result<Vec<_>, _>>()?;

            info!("Paragraph {}: {} sentence(s) translated", i + 1, glosses.len());
            translations.push(ParagraphTranslation {
                p_number: i + 1,
                original: original.clone(),
                glosses,
            });
        }

        if self.config.cache_lookups {
            let (hits, misses) = cache.stats();
            debug!("Lookup cache: {} hits, {} misses", hits, misses);
        }
        Ok(translations)
    }
}

fn translate_sentence<S: LexicalStore>(
    resolver: &GlossResolver<S>,
    sentence: &Sentence,
) -> Result<Vec<String>, TranslateError> {
    let elements = match gloss_grammar::reorder(sentence) {
        Ok(elements) => elements,
        Err(err) if err.is_request_fatal() => return Err(err.into()),
        Err(err) => {
            let text: Vec<&str> = sentence.iter().map(|t| t.text.as_str()).collect();
            error!("Could not translate '{}': {}", text.join(" "), err);
            return Ok(vec![format!("translation failed: {}", err)]);
        }
    };
    Ok(resolver.resolve_sentence(&elements)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_annotate::ConllAnnotator;
    use gloss_lexicon::MemoryLexicon;
    use gloss_protocol::{DictionaryEntry, Gloss, GlossPos, Paragraph};

    const DOCUMENT: &str = "\
# newpar
# text = Hello.
1\tHello\thello\tINTJ\tUH\t0\tROOT\t_
2\t.\t.\tPUNCT\t.\t1\tpunct\t_

# text = Runs Mary.
1\tRuns\trun\tVERB\tVBZ\t0\tROOT\t_
2\tMary\tMary\tPROPN\tNNP\t1\tnsubj\tPERSON
3\t.\t.\tPUNCT\t.\t1\tpunct\t_
";

    fn store() -> MemoryLexicon {
        MemoryLexicon::new(vec![
            DictionaryEntry::new("hello").with_gloss(Gloss::new("HELLO", "en").with_pos(GlossPos::Other)),
            DictionaryEntry::new("hello").with_gloss(Gloss::new("HI", "en").with_pos(GlossPos::Other)),
        ])
        .unwrap()
    }

    fn translator() -> Translator<ConllAnnotator, MemoryLexicon> {
        Translator::new(
            ConllAnnotator::parse(DOCUMENT).unwrap(),
            store(),
            TranslatorConfig::default(),
        )
    }

    #[test]
    fn test_failed_sentence_does_not_stop_the_paragraph() {
        let out = translator().translate(&["Hello. Runs Mary.".to_string()]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].p_number, 1);
        assert_eq!(out[0].glosses[0], vec!["HELLO"]);
        assert_eq!(
            out[0].glosses[1],
            vec!["translation failed: br2: sentence has no subject before the verb"]
        );
    }

    #[test]
    fn test_translation_is_written_once() {
        let translator = translator();
        let data = TextData::new(vec!["Hello. Runs Mary.".to_string()]);
        assert!(data.translation().is_none());

        let first = translator.run(&data).unwrap().to_vec();
        let second = translator.run(&data).unwrap();
        assert_eq!(first.as_slice(), second);
        assert_eq!(data.translation().map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_unknown_paragraph_fails_the_request() {
        let err = translator().translate(&["Goodbye.".to_string()]).unwrap_err();
        assert!(matches!(err, TranslateError::Annotation(AnnotationError::UnknownParagraph(_))));
    }

    struct ShortAnnotator;

    impl Annotator for ShortAnnotator {
        fn annotate(&self, _: &[String]) -> Result<Vec<Paragraph>, AnnotationError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_annotator_must_answer_every_paragraph() {
        let translator = Translator::new(ShortAnnotator, store(), TranslatorConfig::default());
        let err = translator.translate(&["Hello.".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Annotation(AnnotationError::ParagraphCountMismatch { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_cache_setting_does_not_change_output() {
        let paragraphs = vec!["Hello. Runs Mary.".to_string()];
        let cached = translator().translate(&paragraphs).unwrap();

        let config = TranslatorConfig { cache_lookups: false, ..TranslatorConfig::default() };
        let uncached = Translator::new(ConllAnnotator::parse(DOCUMENT).unwrap(), store(), config)
            .translate(&paragraphs)
            .unwrap();
        assert_eq!(cached, uncached);
    }

    #[test]
    fn test_response_shape() {
        let out = translator().translate(&["Hello. Runs Mary.".to_string()]).unwrap();
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json["p_number"], 1);
        assert_eq!(json["original"], "Hello. Runs Mary.");
        assert_eq!(json["glosses"][0][0], "HELLO");
    }
}
