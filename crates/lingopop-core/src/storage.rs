use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if absent
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Overwrite the value under `key`
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key`, absent keys are not an error
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// One JSON file per key inside a directory
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        // Readers only ever see a complete file
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("Stored {} bytes at {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| io::Error::other("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert_eq!(store.get("lingopop-notebook").unwrap(), None);

        store.set("lingopop-notebook", "[]").unwrap();
        assert_eq!(store.get("lingopop-notebook").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("lingopop-notebook.json").exists());

        store.set("lingopop-notebook", "[1]").unwrap();
        assert_eq!(store.get("lingopop-notebook").unwrap().as_deref(), Some("[1]"));

        store.remove("lingopop-notebook").unwrap();
        store.remove("lingopop-notebook").unwrap();
        assert_eq!(store.get("lingopop-notebook").unwrap(), None);
    }

    #[test]
    fn file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.set("../escape/key", "x").unwrap();
        assert!(dir.path().join(".._escape_key.json").exists());
        assert_eq!(store.get("../escape/key").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "a").unwrap();
        store.set("k", "b").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("b"));
    }
}
