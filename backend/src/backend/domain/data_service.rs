//! Erasing all local data.
//!
//! The only destructive operation in the app. It needs an explicit
//! confirmation and resets every category plus the navigation state.

use anyhow::Result;
use log::{info, warn};

use crate::backend::domain::journal_service::JournalService;
use crate::backend::domain::models::JournalError;
use crate::backend::domain::navigation::NavigationService;
use crate::backend::domain::photo_service::PhotoService;
use crate::backend::domain::profile_service::ProfileService;
use crate::backend::domain::summary_service::SummaryService;

#[derive(Clone)]
pub struct DataService {
    journal: JournalService,
    photos: PhotoService,
    summaries: SummaryService,
    profile: ProfileService,
    navigation: NavigationService,
}

impl DataService {
    /// Create a new DataService
    pub fn new(
        journal: JournalService,
        photos: PhotoService,
        summaries: SummaryService,
        profile: ProfileService,
        navigation: NavigationService,
    ) -> Self {
        Self {
            journal,
            photos,
            summaries,
            profile,
            navigation,
        }
    }

    /// Erase answers, photos, summaries and the profile, on disk and in memory
    pub async fn erase_all(&self, confirm: bool) -> Result<()> {
        if !confirm {
            warn!("Erase requested without confirmation");
            return Err(JournalError::EraseNotConfirmed.into());
        }

        self.journal.clear().await?;
        self.photos.clear().await?;
        self.summaries.clear().await?;
        self.profile.clear().await?;
        self.navigation.reset();

        info!("All local data erased");
        Ok(())
    }
}
