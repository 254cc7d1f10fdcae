pub mod memory;
pub mod compiled;
pub mod cache;

pub use cache::CachedLexicon;
pub use compiled::{compile, CompiledLexicon};
pub use memory::{parse_json, MemoryLexicon};

use gloss_protocol::{DictionaryEntry, EntryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to parse dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dictionary entry: {0}")]
    Entry(#[from] EntryError),

    #[error("compiled dictionary failed validation: {0}")]
    InvalidArchive(String),

    #[error("failed to compile dictionary: {0}")]
    Compile(String),

    #[error("'{headword}' has {count} dictionary entries where exactly one is expected")]
    DuplicateHeadword { headword: String, count: usize },
}

/// Read access to a sign gloss dictionary keyed by English headword.
///
/// Keys match exactly; callers pass lemmas or literal text as produced by the
/// annotation step.
pub trait LexicalStore {
    /// Every entry stored under `headword`, in dictionary order.
    fn entries(&self, headword: &str) -> Vec<DictionaryEntry>;

    /// The first entry stored under `headword`.
    fn lookup(&self, headword: &str) -> Option<DictionaryEntry> {
        self.entries(headword).into_iter().next()
    }

    /// The entry stored under `headword`, failing when the dictionary holds
    /// more than one.
    fn lookup_unique(&self, headword: &str) -> Result<Option<DictionaryEntry>, LexiconError> {
        let mut entries = self.entries(headword);
        match entries.len() {
            0 | 1 => Ok(entries.pop()),
            count => Err(LexiconError::DuplicateHeadword {
                headword: headword.to_string(),
                count,
            }),
        }
    }
}

impl<S: LexicalStore + ?Sized> LexicalStore for &S {
    fn entries(&self, headword: &str) -> Vec<DictionaryEntry> {
        (**self).entries(headword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::Gloss;

    #[test]
    fn test_lookup_unique_rejects_duplicates() {
        let store = MemoryLexicon::new(vec![
            DictionaryEntry::new("bat").with_gloss(Gloss::new("BAT-ANIMAL", "en")),
            DictionaryEntry::new("bat").with_gloss(Gloss::new("BAT-STICK", "en")),
            DictionaryEntry::new("ball").with_gloss(Gloss::new("BALL", "en")),
        ])
        .unwrap();

        assert_eq!(store.lookup("bat").unwrap().glosses[0].text, "BAT-ANIMAL");
        assert!(matches!(
            store.lookup_unique("bat"),
            Err(LexiconError::DuplicateHeadword { count: 2, .. })
        ));
        assert_eq!(store.lookup_unique("ball").unwrap().unwrap().headword, "ball");
        assert!(store.lookup_unique("xylophone").unwrap().is_none());
    }
}
