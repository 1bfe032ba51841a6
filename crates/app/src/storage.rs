//! File-backed key/value storage.
//!
//! The storage collaborator knows nothing about the data model: it stores
//! raw JSON values under stable string keys. Whatever comes back out is
//! untrusted and must pass the validation gate before use.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding the category registry.
pub const CATEGORIES_KEY: &str = "paywith-categories";
/// Key holding the payment methods with their rewards.
pub const METHODS_KEY: &str = "paywith-methods";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("storage file is not a JSON object: {0}")]
    Malformed(String),
}

/// A single JSON file holding all stored keys.
pub struct Storage {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl Storage {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let entries = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                _ => return Err(StorageError::Malformed(path.display().to_string())),
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Writes the whole store back to disk.
    pub fn save(&self) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))
            .map_err(|err| StorageError::Malformed(err.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
