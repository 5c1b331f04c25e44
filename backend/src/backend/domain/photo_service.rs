//! Photo journal service.
//!
//! ## Key Responsibilities
//!
//! - **Uploads**: Compressing the image off the async runtime, then prepending the entry
//! - **Single Upload**: Rejecting a second upload while one is still compressing
//! - **Consistency**: Keeping the in-memory list unchanged when the store rejects a write

use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::backend::domain::calendar::{format_display_date, Clock};
use crate::backend::domain::image_compression::ImageCompressor;
use crate::backend::domain::in_flight::InFlight;
use crate::backend::storage::PhotoStorage;
use shared::{PhotoEntry, SavePhotoRequest};

/// Tag marking the photo taken before the journey starts
pub const ORIGIN_TAG: &str = "Origem";

/// Service for the photo journal
#[derive(Clone)]
pub struct PhotoService {
    storage: Arc<dyn PhotoStorage>,
    compressor: ImageCompressor,
    clock: Arc<dyn Clock>,
    uploads: InFlight,
    photos: Arc<Mutex<Vec<PhotoEntry>>>,
}

impl PhotoService {
    /// Create a new PhotoService, loading the stored photos
    pub async fn new(
        storage: Arc<dyn PhotoStorage>,
        compressor: ImageCompressor,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let photos = storage.load_photos().await?;
        info!("Loaded {} stored photos", photos.len());
        Ok(Self {
            storage,
            compressor,
            clock,
            uploads: InFlight::new("photo upload"),
            photos: Arc::new(Mutex::new(photos)),
        })
    }

    fn lock_photos(&self) -> MutexGuard<'_, Vec<PhotoEntry>> {
        self.photos.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All photos, newest first
    pub fn list(&self) -> Vec<PhotoEntry> {
        self.lock_photos().clone()
    }

    pub fn has_origin_photo(&self) -> bool {
        self.lock_photos()
            .iter()
            .any(|p| p.tags.iter().any(|t| t == ORIGIN_TAG))
    }

    /// Compress and store a new photo. Returns the entry and the new photo count.
    pub async fn save_photo(&self, request: SavePhotoRequest) -> Result<(PhotoEntry, usize)> {
        let _upload = self.uploads.try_start()?;

        let compressor = self.compressor;
        let raw = request.image_base64;
        let image_data = tokio::task::spawn_blocking(move || compressor.compress_base64(&raw))
            .await
            .context("Image compression task failed")??;

        let timestamp = self.clock.now_millis();
        let date_string = request
            .date_string
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.clock.local_date(timestamp).map(format_display_date))
            .unwrap_or_default();

        let photo = PhotoEntry {
            id: Uuid::new_v4().to_string(),
            image_data,
            caption: request.caption.trim().to_string(),
            emotion: request.emotion,
            tags: request
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            timestamp,
            date_string,
        };

        let updated = match self.storage.save_photo(photo.clone()).await {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Photo could not be stored: {}", e);
                return Err(e);
            }
        };
        let count = updated.len();
        *self.lock_photos() = updated;

        info!("Saved photo {} ({} photos)", photo.id, count);
        Ok((photo, count))
    }

    /// Remove every photo from disk and memory
    pub async fn clear(&self) -> Result<()> {
        self.storage.clear_photos().await?;
        self.lock_photos().clear();
        info!("Cleared all photos");
        Ok(())
    }
}
