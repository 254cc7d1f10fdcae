pub mod score;

use core::fmt;
use std::collections::BTreeSet;

use gloss_lexicon::{LexicalStore, LexiconError};
use gloss_protocol::{
    ClassifierRef, DictionaryEntry, Gloss, GlossPos, NounPhrase, PosSet, PrepositionPhrase,
    Relation, StructuralElement, Token, VerbPhrase,
};
use log::{debug, warn};
use thiserror::Error;

use crate::score::{break_tie, highest_scoring};

/// Context injected for a plural subject.
pub const MULTIPLE_SUBJECTS: &str = "multiple subjects";
/// Context injected for a plural object.
pub const MULTIPLE_OBJECTS: &str = "multiple objects";

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The dictionary broke an invariant the resolver relies on.
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}

/// Descriptive stand-in emitted when a lookup misses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    WordNotFound(String),
    NoGloss(String),
    VerbNotFound(String),
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordNotFound(word) => write!(f, "word '{}' is not found in the dictionary", word),
            Self::NoGloss(word) => write!(f, "no gloss of '{}' is found in the dictionary", word),
            Self::VerbNotFound(verb) => write!(f, "Verb '{}' is not found in the dictionary", verb),
        }
    }
}

/// Maps structural elements to gloss strings for one target language.
pub struct GlossResolver<S> {
    store: S,
    language: String,
}

impl<S: LexicalStore> GlossResolver<S> {
    pub fn new(store: S, language: impl Into<String>) -> Self {
        Self {
            store,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves every element of one sentence, in order. Misses become
    /// placeholder strings; only dictionary invariant violations fail.
    pub fn resolve_sentence(&self, elements: &[StructuralElement]) -> Result<Vec<String>, ResolveError> {
        let mut glosses = Vec::with_capacity(elements.len());
        for element in elements {
            glosses.extend(self.resolve_element(element)?);
        }
        Ok(glosses)
    }

    pub fn resolve_element(&self, element: &StructuralElement) -> Result<Vec<String>, ResolveError> {
        let resolved = match element {
            StructuralElement::Literal(text) => vec![self.resolve_literal(text)],
            StructuralElement::NounPhrase(np) => self.resolve_noun_phrase(np),
            StructuralElement::VerbPhrase(vp) => vec![self.resolve_verb_phrase(vp)?],
            StructuralElement::PrepositionPhrase(pp) => vec![self.resolve_preposition_phrase(pp)],
            StructuralElement::Classifier(cl) => vec![self
                .classifier_gloss(cl)
                .map(|g| g.text)
                .unwrap_or_else(|| Placeholder::NoGloss(cl.root.lemma.clone()).to_string())],
            StructuralElement::Marker(text) => vec![text.clone()],
        };
        debug!("{} -> {:?}", element, resolved);
        Ok(resolved)
    }

    fn glosses<'e>(&'e self, entry: &'e DictionaryEntry) -> impl Iterator<Item = &'e Gloss> + 'e {
        entry.glosses_in(&self.language)
    }

    /// First target-language gloss usable as a stand-alone word.
    pub fn resolve_literal(&self, text: &str) -> String {
        let Some(entry) = self.store.lookup(text) else {
            return Placeholder::WordNotFound(text.to_string()).to_string();
        };
        let gloss = self.glosses(&entry).find(|g| g.is_lexical()).map(|g| g.text.clone());
        gloss.unwrap_or_else(|| Placeholder::NoGloss(text.to_string()).to_string())
    }

    /// The head followed by each modifier; every miss is reported on its own.
    pub fn resolve_noun_phrase(&self, np: &NounPhrase) -> Vec<String> {
        let mut resolved = Vec::with_capacity(1 + np.modifiers.len());
        resolved.push(self.resolve_preferring(&np.head, PosSet::NOMINAL, true));
        for modifier in &np.modifiers {
            resolved.push(self.resolve_preferring(modifier, PosSet::ADJECTIVE, false));
        }
        resolved
    }

    /// A gloss whose part of speech is in `preferred`, else the only gloss
    /// (when `sole_wins`), else the first stand-alone gloss.
    fn resolve_preferring(&self, token: &Token, preferred: PosSet, sole_wins: bool) -> String {
        let word = &token.lemma;
        let Some(entry) = self.store.lookup(word) else {
            return Placeholder::WordNotFound(word.clone()).to_string();
        };

        let candidates: Vec<&Gloss> = self.glosses(&entry).collect();
        let chosen = candidates
            .iter()
            .find(|g| g.pos_set().intersects(preferred))
            .or_else(|| if sole_wins && candidates.len() == 1 { candidates.first() } else { None })
            .or_else(|| candidates.iter().find(|g| g.is_lexical()));

        match chosen {
            Some(gloss) => gloss.text.clone(),
            None => Placeholder::NoGloss(word.clone()).to_string(),
        }
    }

    /// The classifier gloss of the referent, falling back to its noun gloss.
    pub fn classifier_gloss(&self, classifier: &ClassifierRef) -> Option<Gloss> {
        let entry = self.store.lookup(&classifier.root.lemma)?;
        let mut noun = None;
        for gloss in self.glosses(&entry) {
            match gloss.part_of_speech {
                Some(GlossPos::Classifier) => return Some(gloss.clone()),
                Some(GlossPos::Noun) if noun.is_none() => noun = Some(gloss.clone()),
                _ => {}
            }
        }
        noun
    }

    /// Pools the contexts of everything the verb relates to.
    fn context_pool(&self, vp: &VerbPhrase) -> Result<BTreeSet<String>, ResolveError> {
        let mut pool = BTreeSet::new();

        for (relation, token) in vp.related() {
            if token.is_plural() {
                match relation {
                    Relation::Subject => {
                        pool.insert(MULTIPLE_SUBJECTS.to_string());
                    }
                    Relation::DirectObject | Relation::IndirectObject => {
                        pool.insert(MULTIPLE_OBJECTS.to_string());
                    }
                    Relation::Direction => {}
                }
            }

            if let Some(entry) = self.store.lookup_unique(&token.lemma)? {
                pool.extend(entry.contexts.iter().cloned());
                for gloss in entry.glosses.iter().filter(|g| g.is_lexical()) {
                    pool.extend(gloss.contexts.iter().cloned());
                }
            }
        }

        Ok(pool)
    }

    pub fn resolve_verb_phrase(&self, vp: &VerbPhrase) -> Result<String, ResolveError> {
        if let Some(phrase) = &vp.direct_object_phrase {
            if let Some(entry) = self.store.lookup(phrase) {
                let gloss = entry
                    .default_gloss(&self.language)
                    .or_else(|| self.glosses(&entry).next());
                if let Some(gloss) = gloss {
                    debug!("Idiomatic phrase '{}' -> {}", phrase, gloss.text);
                    return Ok(gloss.text.clone());
                }
            }
        }

        let verb = &vp.verb.lemma;
        let Some(entry) = self.store.lookup_unique(verb)? else {
            return Ok(Placeholder::VerbNotFound(verb.clone()).to_string());
        };

        let pool = self.context_pool(vp)?;
        if pool.is_empty() {
            if let Some(default) = entry.default_gloss(&self.language) {
                debug!("No context for '{}', using default {}", verb, default.text);
                return Ok(default.text.clone());
            }
        }

        let best = highest_scoring(&entry.glosses, &pool, &self.language);
        debug!("'{}' against {:?}: {} candidate(s)", verb, pool, best.len());
        Ok(match break_tie(&best) {
            Some(gloss) => gloss.text.clone(),
            None => Placeholder::NoGloss(verb.clone()).to_string(),
        })
    }

    /// A gloss of the preposition scoring highest against both classifiers.
    pub fn resolve_preposition_phrase(&self, pp: &PrepositionPhrase) -> String {
        let subject = self.classifier_gloss(&pp.subject_classifier);
        let object = self.classifier_gloss(&pp.object_classifier);
        let (Some(subject), Some(object)) = (subject, object) else {
            return Placeholder::NoGloss(pp.to_string()).to_string();
        };

        let preposition = &pp.preposition.lemma;
        let Some(entry) = self.store.lookup(preposition) else {
            return Placeholder::NoGloss(preposition.clone()).to_string();
        };

        let subject_pool: BTreeSet<String> = subject.contexts.iter().cloned().collect();
        let object_pool: BTreeSet<String> = object.contexts.iter().cloned().collect();
        let by_subject = highest_scoring(&entry.glosses, &subject_pool, &self.language);
        let by_object = highest_scoring(&entry.glosses, &object_pool, &self.language);

        let shared = by_subject
            .iter()
            .find(|g| by_object.iter().any(|o| core::ptr::eq(**g, *o)))
            .map(|g| g.text.clone());
        match shared {
            Some(text) => text,
            None => {
                warn!(
                    "No gloss of '{}' fits both {} and {}",
                    preposition, subject.text, object.text
                );
                Placeholder::NoGloss(pp.to_string()).to_string()
            }
        }
    }
}
