use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::backend::storage::StorageError;

/// Default per-category quota, in the same range as a browser's local storage
pub const DEFAULT_MAX_STORE_BYTES: u64 = 5 * 1024 * 1024;

/// The default data directory: `~/Documents/Eu por Inteiro`
pub fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Eu por Inteiro")
}

/// JsonConnection owns the data directory and the per-category size limit.
/// Repositories go through it for every read and write.
#[derive(Debug, Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
    max_store_bytes: u64,
}

impl JsonConnection {
    /// Create a new connection, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P, max_store_bytes: u64) -> anyhow::Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }
        Ok(Self {
            base_directory: base_path,
            max_store_bytes,
        })
    }

    /// Create a connection in the default data directory
    pub fn new_default() -> anyhow::Result<Self> {
        Self::new(default_data_directory(), DEFAULT_MAX_STORE_BYTES)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn max_store_bytes(&self) -> u64 {
        self.max_store_bytes
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Read a stored value. A missing file yields the default; an unreadable
    /// or corrupted one is logged and also yields the default.
    pub fn read_json<T: DeserializeOwned + Default>(&self, category: &str, file_name: &str) -> T {
        match self.read_file(file_name) {
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Corrupted {} store at {}: {}. Starting empty.", category, file_name, e);
                T::default()
            }),
            None => T::default(),
        }
    }

    /// Read a stored YAML value with the same recovery rules as `read_json`
    pub fn read_yaml<T: DeserializeOwned + Default>(&self, category: &str, file_name: &str) -> T {
        match self.read_file(file_name) {
            Some(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
                warn!("Corrupted {} store at {}: {}. Starting empty.", category, file_name, e);
                T::default()
            }),
            None => T::default(),
        }
    }

    fn read_file(&self, file_name: &str) -> Option<String> {
        let path = self.file_path(file_name);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored file at {:?}", path);
                None
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}. Starting empty.", path, e);
                None
            }
        }
    }

    /// Replace a stored value as JSON
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        category: &'static str,
        file_name: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StorageError::Serialization {
            category,
            message: e.to_string(),
        })?;
        self.write_bytes(category, file_name, &bytes)
    }

    /// Replace a stored value as YAML
    pub fn write_yaml<T: Serialize + ?Sized>(
        &self,
        category: &'static str,
        file_name: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let content = serde_yaml::to_string(value).map_err(|e| StorageError::Serialization {
            category,
            message: e.to_string(),
        })?;
        self.write_bytes(category, file_name, content.as_bytes())
    }

    /// Atomic replace: write to a temp file, then rename over the target.
    /// Nothing is written when the content exceeds the quota.
    fn write_bytes(&self, category: &'static str, file_name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let size = bytes.len() as u64;
        if size > self.max_store_bytes {
            warn!(
                "Refusing to save {}: {} bytes exceeds the {} byte limit",
                category, size, self.max_store_bytes
            );
            return Err(StorageError::CapacityExceeded {
                category,
                size,
                limit: self.max_store_bytes,
            });
        }

        let io_err = |source| StorageError::Io { category, source };
        fs::create_dir_all(&self.base_directory).map_err(io_err)?;

        let path = self.file_path(file_name);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes).map_err(io_err)?;
        fs::rename(&temp_path, &path).map_err(io_err)?;

        debug!("Saved {} ({} bytes) to {:?}", category, size, path);
        Ok(())
    }

    /// Delete a stored file. Missing files are fine.
    pub fn remove(&self, category: &'static str, file_name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.file_path(file_name)) {
            Ok(()) => {
                info!("Removed {} store", category);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { category, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_default() {
        let dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(dir.path(), 1024).unwrap();
        let value: BTreeMap<String, u32> = connection.read_json("answers", "answers.json");
        assert!(value.is_empty());
    }

    #[test]
    fn test_corrupted_file_reads_default() {
        let dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(dir.path(), 1024).unwrap();
        fs::write(connection.file_path("answers.json"), "{not json").unwrap();
        let value: BTreeMap<String, u32> = connection.read_json("answers", "answers.json");
        assert!(value.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(dir.path(), 1024).unwrap();
        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1u32);
        connection.write_json("answers", "answers.json", &value).unwrap();

        let loaded: BTreeMap<String, u32> = connection.read_json("answers", "answers.json");
        assert_eq!(loaded, value);
        assert!(!connection.file_path("answers.tmp").exists());
    }

    #[test]
    fn test_oversized_write_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(dir.path(), 16).unwrap();
        connection.write_json("answers", "answers.json", &vec![1u8]).unwrap();

        let big = "x".repeat(64);
        let err = connection.write_json("answers", "answers.json", &big).unwrap_err();
        assert!(matches!(err, StorageError::CapacityExceeded { limit: 16, .. }));

        let loaded: Vec<u8> = connection.read_json("answers", "answers.json");
        assert_eq!(loaded, vec![1u8]);
    }

    #[test]
    fn test_remove_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(dir.path(), 16).unwrap();
        assert!(connection.remove("photos", "photos.json").is_ok());
    }
}
