/// Test utilities for storage tests.
///
/// `TestEnvironment` owns a temporary data directory that is removed when it
/// goes out of scope, even if the test panics.
use anyhow::Result;
use shared::{Emotion, PhotoEntry, UserAnswer};
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::{JsonConnection, DEFAULT_MAX_STORE_BYTES};

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: JsonConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with the default quota
    pub fn new() -> Result<Self> {
        Self::with_limit(DEFAULT_MAX_STORE_BYTES)
    }

    /// Create a test environment with a custom per-category quota
    pub fn with_limit(max_store_bytes: u64) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = JsonConnection::new(&base_path, max_store_bytes)?;
        Ok(Self {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }
}

pub fn answer(text: &str, timestamp: i64) -> UserAnswer {
    UserAnswer {
        text: text.to_string(),
        timestamp,
        completed: true,
        date_string: None,
    }
}

pub fn photo(id: &str) -> PhotoEntry {
    PhotoEntry {
        id: id.to_string(),
        image_data: "data:image/jpeg;base64,AAAA".to_string(),
        caption: format!("Foto {}", id),
        emotion: Emotion::Calm,
        tags: vec![],
        timestamp: 0,
        date_string: "01/01/2026".to_string(),
    }
}
