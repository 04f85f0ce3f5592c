use std::collections::HashSet;

use lingopop_types::DictionaryEntry;

use crate::preprocess::term_key;
use crate::storage::KeyValueStore;

/// Saved entries, most recent first, unique by term. Terms that differ only
/// in Unicode composition count as the same term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notebook {
    entries: Vec<DictionaryEntry>,
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a stored sequence, keeping the first entry of each term
    pub fn from_entries(entries: Vec<DictionaryEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(term_key(&e.term)))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        let key = term_key(term);
        self.entries.iter().any(|e| term_key(&e.term) == key)
    }

    pub fn get(&self, index: usize) -> Option<&DictionaryEntry> {
        self.entries.get(index)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&DictionaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Prepend `entry` unless its term is already saved.
    ///
    /// Returns `true` if the notebook changed.
    pub fn insert(&mut self, entry: DictionaryEntry) -> bool {
        if self.contains_term(&entry.term) {
            return false;
        }
        self.entries.insert(0, entry);
        true
    }

    /// Terms of the `n` most recently saved entries
    pub fn recent_terms(&self, n: usize) -> Vec<String> {
        self.entries.iter().take(n).map(|e| e.term.clone()).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt data under '{key}': {source}")]
    Corrupt {
        key: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize notebook: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Persists the notebook under one fixed key
pub struct NotebookStore {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl NotebookStore {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the notebook. Absent data is an empty notebook, unreadable data is
    /// [`StoreError::Corrupt`].
    pub fn load(&self) -> Result<Notebook, StoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            tracing::info!("No saved notebook under '{}'", self.key);
            return Ok(Notebook::new());
        };

        match serde_json::from_str::<Vec<DictionaryEntry>>(&raw) {
            Ok(entries) => {
                tracing::info!("Loaded {} notebook entries", entries.len());
                Ok(Notebook::from_entries(entries))
            }
            Err(source) => Err(StoreError::Corrupt {
                key: self.key.clone(),
                raw,
                source,
            }),
        }
    }

    /// Overwrite the stored value with the full sequence
    pub fn save(&self, notebook: &Notebook) -> Result<(), StoreError> {
        let json = serde_json::to_string(notebook.entries()).map_err(StoreError::Serialize)?;
        self.store.set(&self.key, &json)?;
        tracing::debug!("Saved {} notebook entries", notebook.len());
        Ok(())
    }

    /// Load, moving unreadable data to `backup_key` and starting empty
    pub fn load_or_recover(&self, backup_key: &str) -> Result<Notebook, StoreError> {
        match self.load() {
            Err(StoreError::Corrupt { raw, source, .. }) => {
                tracing::error!(
                    "Notebook data is corrupt ({}), backing it up under '{}'",
                    source,
                    backup_key
                );
                self.store.set(backup_key, &raw)?;
                self.store.remove(&self.key)?;
                Ok(Notebook::new())
            }
            other => other,
        }
    }
}
