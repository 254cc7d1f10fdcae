use rkyv::{Archive, Deserialize, Serialize};
use bitflags::bitflags;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Part of speech a dictionary author attached to a gloss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum GlossPos {
    Noun = 0,
    Pronoun = 1,
    Verb = 2,
    Adjective = 3,
    Adverb = 4,
    Classifier = 5,
    Preposition = 6,
    #[cfg_attr(feature = "serde", serde(other))]
    Other = 7,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PosSet: u8 {
        const NOUN = 1;
        const PRONOUN = 2;
        const VERB = 4;
        const ADJECTIVE = 8;
        const ADVERB = 16;
        const CLASSIFIER = 32;
        const PREPOSITION = 64;
        const OTHER = 128;

        /// Glosses that only make sense inside a verb/classifier construction.
        const RELATIONAL = Self::VERB.bits() | Self::CLASSIFIER.bits() | Self::PREPOSITION.bits();
        const NOMINAL = Self::NOUN.bits() | Self::PRONOUN.bits();
    }
}

impl GlossPos {
    pub const fn flag(&self) -> PosSet {
        match self {
            GlossPos::Noun => PosSet::NOUN,
            GlossPos::Pronoun => PosSet::PRONOUN,
            GlossPos::Verb => PosSet::VERB,
            GlossPos::Adjective => PosSet::ADJECTIVE,
            GlossPos::Adverb => PosSet::ADVERB,
            GlossPos::Classifier => PosSet::CLASSIFIER,
            GlossPos::Preposition => PosSet::PREPOSITION,
            GlossPos::Other => PosSet::OTHER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Gloss {
    #[cfg_attr(feature = "serde", serde(alias = "gloss"))]
    pub text: String,
    /// ISO 639-1 code of the gloss notation.
    #[cfg_attr(feature = "serde", serde(alias = "lang"))]
    pub language: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub contexts: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default, alias = "pos"))]
    pub part_of_speech: Option<GlossPos>,
}

impl Gloss {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            contexts: Vec::new(),
            priority: None,
            part_of_speech: None,
        }
    }

    pub fn with_pos(mut self, pos: GlossPos) -> Self {
        self.part_of_speech = Some(pos);
        self
    }

    pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contexts = contexts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Empty when the author left the part of speech out.
    pub fn pos_set(&self) -> PosSet {
        self.part_of_speech.map(|p| p.flag()).unwrap_or(PosSet::empty())
    }

    /// Usable as a stand-alone word (not a verb, classifier or preposition).
    pub fn is_lexical(&self) -> bool {
        !self.pos_set().intersects(PosSet::RELATIONAL)
    }

    pub fn is_default(&self) -> bool {
        self.priority.map_or(false, |p| p >= 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct DictionaryEntry {
    #[cfg_attr(feature = "serde", serde(alias = "english"))]
    pub headword: String,
    #[cfg_attr(feature = "serde", serde(default, alias = "en_pos"))]
    pub pos_hint: Option<String>,
    /// Contexts that describe the headword itself, shared by all its glosses.
    #[cfg_attr(feature = "serde", serde(default))]
    pub contexts: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "sign_glosses"))]
    pub glosses: Vec<Gloss>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("dictionary entry has an empty headword")]
    EmptyHeadword,
    #[error("gloss '{gloss}' of '{headword}' has priority {priority} outside [0, 1]")]
    PriorityOutOfRange {
        headword: String,
        gloss: String,
        priority: f32,
    },
    #[error("'{headword}' has more than one default (priority 1) gloss for language '{language}'")]
    ConflictingDefaults { headword: String, language: String },
}

impl DictionaryEntry {
    pub fn new(headword: impl Into<String>) -> Self {
        Self {
            headword: headword.into(),
            pos_hint: None,
            contexts: Vec::new(),
            glosses: Vec::new(),
        }
    }

    pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contexts = contexts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_gloss(mut self, gloss: Gloss) -> Self {
        self.glosses.push(gloss);
        self
    }

    pub fn glosses_in<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a Gloss> + 'a {
        self.glosses.iter().filter(move |g| g.language == language)
    }

    /// The unambiguous default for `language`, if the author marked one.
    pub fn default_gloss<'a>(&'a self, language: &'a str) -> Option<&'a Gloss> {
        self.glosses_in(language).find(|g| g.is_default())
    }

    /// Checks the authoring invariants: non-empty key, priorities in range and at
    /// most one priority-1 gloss per language.
    pub fn validate(&self) -> Result<(), EntryError> {
        if self.headword.trim().is_empty() {
            return Err(EntryError::EmptyHeadword);
        }

        let mut default_languages: Vec<&str> = Vec::new();
        for gloss in &self.glosses {
            if let Some(priority) = gloss.priority {
                if !(0.0..=1.0).contains(&priority) {
                    return Err(EntryError::PriorityOutOfRange {
                        headword: self.headword.clone(),
                        gloss: gloss.text.clone(),
                        priority,
                    });
                }
            }
            if gloss.priority == Some(1.0) {
                if default_languages.contains(&gloss.language.as_str()) {
                    return Err(EntryError::ConflictingDefaults {
                        headword: self.headword.clone(),
                        language: gloss.language.clone(),
                    });
                }
                default_languages.push(&gloss.language);
            }
        }
        Ok(())
    }
}

/// A whole dictionary as stored on disk (JSON) or compiled (rkyv archive).
#[derive(Debug, Clone, Default, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Lexicon {
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: u32,
    pub entries: Vec<DictionaryEntry>,
}

impl Lexicon {
    pub fn validate(&self) -> Result<(), EntryError> {
        self.entries.iter().try_for_each(DictionaryEntry::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_entry() -> DictionaryEntry {
        DictionaryEntry::new("walk")
            .with_gloss(Gloss::new("WALK", "en").with_pos(GlossPos::Verb).with_priority(1.0))
            .with_gloss(
                Gloss::new("LEGS-WALK", "en")
                    .with_pos(GlossPos::Verb)
                    .with_contexts(["animal", "multiple subjects"])
                    .with_priority(0.5),
            )
            .with_gloss(Gloss::new("DEAMBULARE", "la").with_priority(1.0))
    }

    #[test]
    fn test_one_default_per_language_is_valid() {
        let entry = walk_entry();
        assert_eq!(entry.validate(), Ok(()));
        assert_eq!(entry.default_gloss("en").map(|g| g.text.as_str()), Some("WALK"));
        assert_eq!(entry.default_gloss("la").map(|g| g.text.as_str()), Some("DEAMBULARE"));
    }

    #[test]
    fn test_two_defaults_in_one_language_are_rejected() {
        let entry = walk_entry().with_gloss(Gloss::new("STROLL", "en").with_priority(1.0));
        assert!(matches!(
            entry.validate(),
            Err(EntryError::ConflictingDefaults { ref language, .. }) if language == "en"
        ));
    }

    #[test]
    fn test_priority_range_and_empty_headword() {
        let entry = DictionaryEntry::new("run").with_gloss(Gloss::new("RUN", "en").with_priority(1.5));
        assert!(matches!(entry.validate(), Err(EntryError::PriorityOutOfRange { .. })));
        assert_eq!(DictionaryEntry::new("  ").validate(), Err(EntryError::EmptyHeadword));
    }

    #[test]
    fn test_relational_glosses_are_not_lexical() {
        assert!(!Gloss::new("roundObjCL", "en").with_pos(GlossPos::Classifier).is_lexical());
        assert!(!Gloss::new("EAT", "en").with_pos(GlossPos::Verb).is_lexical());
        assert!(Gloss::new("APPLE", "en").with_pos(GlossPos::Noun).is_lexical());
        assert!(Gloss::new("HELLO", "en").is_lexical());
        assert!(PosSet::NOMINAL.contains(GlossPos::Pronoun.flag()));
    }
}
