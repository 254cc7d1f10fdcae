use std::collections::HashMap;

use gloss_protocol::{DictionaryEntry, Lexicon};
use log::{debug, warn};
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::{AlignedVec, Archive, Deserialize};

use crate::{LexicalStore, LexiconError};

/// Serializes a validated dictionary into the binary form read by
/// [`CompiledLexicon`].
pub fn compile(lexicon: &Lexicon) -> Result<AlignedVec, LexiconError> {
    lexicon.validate()?;

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(lexicon)
        .map_err(|e| LexiconError::Compile(e.to_string()))?;
    Ok(serializer.into_serializer().into_inner())
}

/// A dictionary read straight out of a compiled rkyv archive. Entries are
/// only deserialized when looked up.
pub struct CompiledLexicon {
    bytes: AlignedVec,
    index: HashMap<String, Vec<usize>>,
}

impl CompiledLexicon {
    /// Validates the archive once and indexes its headwords.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LexiconError> {
        let mut bytes = AlignedVec::with_capacity(data.len());
        bytes.extend_from_slice(data);

        let archived = rkyv::check_archived_root::<Lexicon>(&bytes)
            .map_err(|e| LexiconError::InvalidArchive(e.to_string()))?;

        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in archived.entries.iter().enumerate() {
            index.entry(entry.headword.as_str().to_string()).or_default().push(i);
        }
        debug!(
            "Opened compiled dictionary: {} entries under {} headwords",
            archived.entries.len(),
            index.len()
        );

        Ok(Self { bytes, index })
    }

    fn root(&self) -> &<Lexicon as Archive>::Archived {
        // SAFETY: `bytes` passed `check_archived_root` in `from_bytes` and is
        // never mutated afterwards.
        unsafe { rkyv::archived_root::<Lexicon>(&self.bytes) }
    }

    pub fn version(&self) -> u32 {
        self.root().version.into()
    }

    pub fn len(&self) -> usize {
        self.root().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LexicalStore for CompiledLexicon {
    fn entries(&self, headword: &str) -> Vec<DictionaryEntry> {
        let Some(ids) = self.index.get(headword) else {
            return Vec::new();
        };
        let root = self.root();
        ids.iter()
            .filter_map(|&i| {
                let entry: Option<DictionaryEntry> = root.entries[i].deserialize(&mut rkyv::Infallible).ok();
                if entry.is_none() {
                    warn!("Could not deserialize entry {} ('{}')", i, headword);
                }
                entry
            })
            .collect()
    }
}
