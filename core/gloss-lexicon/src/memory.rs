use std::collections::HashMap;

use gloss_protocol::{DictionaryEntry, Lexicon};
use log::{debug, info};
use serde::Deserialize;

use crate::{LexicalStore, LexiconError};

/// Dictionaries are exported either as a bare array of entries or wrapped
/// with a version number.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Entries(Vec<DictionaryEntry>),
    Lexicon(Lexicon),
}

/// Parses and validates a JSON dictionary.
pub fn parse_json(json: &str) -> Result<Lexicon, LexiconError> {
    let lexicon = match serde_json::from_str::<JsonDocument>(json)? {
        JsonDocument::Entries(entries) => Lexicon { version: 0, entries },
        JsonDocument::Lexicon(lexicon) => lexicon,
    };
    lexicon.validate()?;
    Ok(lexicon)
}

/// A dictionary held entirely in memory, indexed by headword.
#[derive(Debug, Clone, Default)]
pub struct MemoryLexicon {
    entries: Vec<DictionaryEntry>,
    index: HashMap<String, Vec<usize>>,
}

impl MemoryLexicon {
    pub fn new(entries: Vec<DictionaryEntry>) -> Result<Self, LexiconError> {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            entry.validate()?;
            index.entry(entry.headword.clone()).or_default().push(i);
        }
        debug!("Indexed {} entries under {} headwords", entries.len(), index.len());
        Ok(Self { entries, index })
    }

    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let lexicon = parse_json(json)?;
        info!("Loaded dictionary version {} ({} entries)", lexicon.version, lexicon.entries.len());
        Self::new(lexicon.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }
}

impl LexicalStore for MemoryLexicon {
    fn entries(&self, headword: &str) -> Vec<DictionaryEntry> {
        self.index
            .get(headword)
            .map(|ids| ids.iter().map(|&i| self.entries[i].clone()).collect())
            .unwrap_or_default()
    }
}
