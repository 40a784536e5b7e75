//! JSON Store
//!
//! Whole-file persistence for the two game documents: session states and
//! the cross-session leaderboard log. Each document is a JSON mapping keyed
//! by game code and is rewritten in full on every snapshot.
//!
//! A missing file is an empty document, not an error. Malformed content and
//! write failures are logged and swallowed so a bad disk never takes down a
//! running game; the in-memory state stays authoritative and the next
//! successful snapshot repairs the file.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The two persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFile {
    /// Live session state per game code
    Sessions,
    /// Append-only finalized results per game code
    Leaderboards,
}

impl StoreFile {
    fn file_name(&self) -> &'static str {
        match self {
            StoreFile::Sessions => "game_states.json",
            StoreFile::Leaderboards => "leaderboards.json",
        }
    }
}

/// File-backed store for the game documents.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            if let Err(e) = fs::create_dir_all(&data_dir) {
                warn!("Failed to create data directory {:?}: {}", data_dir, e);
            }
        }
        Self { data_dir }
    }

    fn path(&self, file: StoreFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    /// Load a document. Missing or malformed files yield the default
    /// (empty) document; malformed content is reported but not fatal.
    pub fn load<T: DeserializeOwned + Default>(&self, file: StoreFile) -> T {
        let path = self.path(file);

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => {
                debug!("Store file {:?} absent, starting empty", path);
                return T::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Malformed store file {:?}: {} - treating as empty", path, e);
                T::default()
            }
        }
    }

    /// Overwrite a document in full. Failures are logged, never raised:
    /// the caller's in-memory mutation stands and a later snapshot can
    /// still persist it.
    pub fn save<T: Serialize>(&self, file: StoreFile, document: &T) {
        let path = self.path(file);

        match serde_json::to_string_pretty(document) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    warn!("Failed to write store file {:?}: {}", path, e);
                } else {
                    debug!("Snapshotted {:?}", path);
                }
            }
            Err(e) => {
                warn!("Failed to serialize store document {:?}: {}", path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_store(name: &str) -> JsonStore {
        let data_dir = PathBuf::from(format!(".test_store_{}", name));
        if data_dir.exists() {
            let _ = fs::remove_dir_all(&data_dir);
        }
        JsonStore::new(&data_dir)
    }

    fn cleanup_test_store(store: &JsonStore) {
        let _ = fs::remove_dir_all(&store.data_dir);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let store = create_test_store("missing");

        let doc: HashMap<String, Vec<i64>> = store.load(StoreFile::Sessions);
        assert!(doc.is_empty());

        cleanup_test_store(&store);
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = create_test_store("round_trip");

        let mut doc: HashMap<String, Vec<i64>> = HashMap::new();
        doc.insert("GROUPA".to_string(), vec![1, 2, 3]);
        store.save(StoreFile::Leaderboards, &doc);

        let loaded: HashMap<String, Vec<i64>> = store.load(StoreFile::Leaderboards);
        assert_eq!(loaded, doc);

        cleanup_test_store(&store);
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let store = create_test_store("malformed");

        fs::write(store.path(StoreFile::Sessions), "{not valid json").unwrap();
        let doc: HashMap<String, String> = store.load(StoreFile::Sessions);
        assert!(doc.is_empty());

        cleanup_test_store(&store);
    }

    #[test]
    fn test_documents_are_independent() {
        let store = create_test_store("independent");

        let mut sessions: HashMap<String, String> = HashMap::new();
        sessions.insert("A".to_string(), "session".to_string());
        store.save(StoreFile::Sessions, &sessions);

        let logs: HashMap<String, Vec<String>> = store.load(StoreFile::Leaderboards);
        assert!(logs.is_empty(), "leaderboard store must not see session data");

        cleanup_test_store(&store);
    }

    #[test]
    fn test_save_overwrites_whole_file() {
        let store = create_test_store("overwrite");

        let mut doc: HashMap<String, i64> = HashMap::new();
        doc.insert("A".to_string(), 1);
        doc.insert("B".to_string(), 2);
        store.save(StoreFile::Sessions, &doc);

        doc.remove("B");
        store.save(StoreFile::Sessions, &doc);

        let loaded: HashMap<String, i64> = store.load(StoreFile::Sessions);
        assert_eq!(loaded.len(), 1, "removed keys must not survive a snapshot");

        cleanup_test_store(&store);
    }
}
