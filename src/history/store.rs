//! Key-value persistence behind search history.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Result, SitesearchError};

/// A string key-value store.
///
/// This is the only capability search history needs from its host: browser
/// storage, a file, or an embedded database all fit behind it.
pub trait HistoryStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key is not an
    /// error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// An in-memory store, useful for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryHistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// A store keeping one `<key>.json` file per key in a directory.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// reader never observes a half-written value.
#[derive(Debug)]
pub struct FileHistoryStore {
    /// The root directory for storage.
    directory: PathBuf,
}

impl FileHistoryStore {
    /// Create a store in `directory`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| {
                SitesearchError::storage(format!(
                    "Failed to create directory {}: {e}",
                    directory.display()
                ))
            })?;
        }

        if !directory.is_dir() {
            return Err(SitesearchError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileHistoryStore { directory })
    }

    /// The directory backing this store.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Get the full path for a key.
    fn file_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a key onto a safe file stem.
///
/// ASCII letters, digits, `-` and `_` are kept; every other byte becomes
/// `%XX`. Distinct keys always get distinct stems.
fn sanitize_key(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}

impl HistoryStore for FileHistoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        let temp_path = self
            .directory
            .join(format!(".{}.json.tmp", sanitize_key(key)));

        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
