//! # Photo Repository
//!
//! Stores the photo journal in `photos.json`, newest first. Photos are
//! stored as compressed JPEG data URLs, so this is the category most likely
//! to hit the storage quota.

use anyhow::Result;
use async_trait::async_trait;
use shared::PhotoEntry;

use super::connection::JsonConnection;
use crate::backend::storage::traits::PhotoStorage;

const PHOTOS_FILE: &str = "photos.json";
const CATEGORY: &str = "photos";

#[derive(Clone)]
pub struct PhotoRepository {
    connection: JsonConnection,
}

impl PhotoRepository {
    /// Create a new photo repository
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl PhotoStorage for PhotoRepository {
    async fn load_photos(&self) -> Result<Vec<PhotoEntry>> {
        Ok(self.connection.read_json(CATEGORY, PHOTOS_FILE))
    }

    async fn store_photos(&self, photos: &[PhotoEntry]) -> Result<()> {
        self.connection.write_json(CATEGORY, PHOTOS_FILE, photos)?;
        Ok(())
    }

    async fn clear_photos(&self) -> Result<()> {
        self.connection.remove(CATEGORY, PHOTOS_FILE)?;
        Ok(())
    }
}
