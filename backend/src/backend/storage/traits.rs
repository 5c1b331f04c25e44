//! # Storage Traits
//!
//! Abstractions over the persisted categories so the domain layer never
//! touches files directly. Each `save_*` default method follows the same
//! contract: read the current value, apply one change, replace the stored
//! value as a whole and hand the updated value back.

use anyhow::Result;
use async_trait::async_trait;
use shared::{MonthlySummaries, PhotoEntry, UserAnswer, UserData};

/// Answer map persistence, keyed by entry id
#[async_trait]
pub trait AnswerStorage: Send + Sync {
    /// Load the full answer map. A missing or unreadable store yields an empty map.
    async fn load_answers(&self) -> Result<UserData>;

    /// Replace the stored answer map
    async fn store_answers(&self, answers: &UserData) -> Result<()>;

    /// Remove every stored answer
    async fn clear_answers(&self) -> Result<()>;

    /// Insert or overwrite one answer and return the updated map
    async fn save_answer(&self, entry_id: &str, answer: UserAnswer) -> Result<UserData> {
        let mut answers = self.load_answers().await?;
        answers.insert(entry_id.to_string(), answer);
        self.store_answers(&answers).await?;
        Ok(answers)
    }
}

/// Photo journal persistence, newest first
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn load_photos(&self) -> Result<Vec<PhotoEntry>>;

    async fn store_photos(&self, photos: &[PhotoEntry]) -> Result<()>;

    async fn clear_photos(&self) -> Result<()>;

    /// Prepend a photo and return the updated list
    async fn save_photo(&self, photo: PhotoEntry) -> Result<Vec<PhotoEntry>> {
        let mut photos = self.load_photos().await?;
        photos.insert(0, photo);
        self.store_photos(&photos).await?;
        Ok(photos)
    }
}

/// Generated monthly summaries, keyed by month id
#[async_trait]
pub trait SummaryStorage: Send + Sync {
    async fn load_summaries(&self) -> Result<MonthlySummaries>;

    async fn store_summaries(&self, summaries: &MonthlySummaries) -> Result<()>;

    async fn clear_summaries(&self) -> Result<()>;

    /// Set one month's summary and return the updated map
    async fn save_summary(&self, month_id: u32, text: String) -> Result<MonthlySummaries> {
        let mut summaries = self.load_summaries().await?;
        summaries.insert(month_id, text);
        self.store_summaries(&summaries).await?;
        Ok(summaries)
    }
}

/// The locally stored display name
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    async fn get_user_name(&self) -> Result<Option<String>>;

    async fn set_user_name(&self, user_name: &str) -> Result<()>;

    async fn clear_user_name(&self) -> Result<()>;
}
