use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use gloss_protocol::DictionaryEntry;
use log::debug;
use parking_lot::RwLock;

use crate::LexicalStore;

/// Memoizes headword lookups against a backing store for the lifetime of one
/// translation request. While enabled, every headword reaches the store once.
pub struct CachedLexicon<'a, S: ?Sized> {
    store: &'a S,
    cache: RwLock<HashMap<String, Vec<DictionaryEntry>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    /// When false every lookup goes straight to the store.
    enabled: bool,
}

impl<'a, S: LexicalStore + ?Sized> CachedLexicon<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_enabled(store, true)
    }

    pub fn with_enabled(store: &'a S, enabled: bool) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            enabled,
        }
    }

    /// (hits, misses) so far.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }
}

impl<S: LexicalStore + ?Sized> LexicalStore for CachedLexicon<'_, S> {
    fn entries(&self, headword: &str) -> Vec<DictionaryEntry> {
        if !self.enabled {
            return self.store.entries(headword);
        }

        if let Some(entries) = self.cache.read().get(headword) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return entries.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let entries = self.store.entries(headword);
        debug!("Fetched {} entries for '{}'", entries.len(), headword);
        self.cache.write().insert(headword.to_string(), entries.clone());
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::Gloss;
    use std::cell::Cell;

    struct CountingStore {
        calls: Cell<usize>,
    }

    impl LexicalStore for CountingStore {
        fn entries(&self, headword: &str) -> Vec<DictionaryEntry> {
            self.calls.set(self.calls.get() + 1);
            if headword == "walk" {
                vec![DictionaryEntry::new("walk").with_gloss(Gloss::new("WALK", "en"))]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_each_headword_hits_the_store_once() {
        let store = CountingStore { calls: Cell::new(0) };
        let cached = CachedLexicon::new(&store);

        for _ in 0..3 {
            assert_eq!(cached.lookup("walk").unwrap().glosses[0].text, "WALK");
            assert!(cached.lookup("xylophone").is_none());
        }

        assert_eq!(store.calls.get(), 2);
        assert_eq!(cached.stats(), (4, 2));
    }

    #[test]
    fn test_disabled_cache_passes_through() {
        let store = CountingStore { calls: Cell::new(0) };
        let cached = CachedLexicon::with_enabled(&store, false);

        cached.lookup("walk");
        cached.lookup("walk");
        assert_eq!(store.calls.get(), 2);
        assert_eq!(cached.stats(), (0, 0));
    }
}
