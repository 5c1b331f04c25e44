//! Monthly summary service.
//!
//! ## Key Responsibilities
//!
//! - **Generation**: Building the prompt from the current snapshot and calling the generator
//! - **Single Request**: Only one generation may be outstanding at a time
//! - **Stale Results**: A result is written back only if its ticket is still current
//! - **Persistence**: Storing accepted summaries by month id
//!
//! Navigating to another month abandons the pending ticket. The generator's
//! answer is then dropped when it arrives and nothing is stored.

use anyhow::Result;
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::domain::ai_summary::{build_prompt, SummaryGenerator};
use crate::backend::domain::in_flight::InFlight;
use crate::backend::domain::journal_service::JournalService;
use crate::backend::domain::models::JournalError;
use crate::backend::domain::profile_service::ProfileService;
use crate::backend::storage::SummaryStorage;
use shared::MonthlySummaries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    ticket: u64,
    month_id: u32,
}

/// Issues tickets and remembers which one is current
#[derive(Debug, Default)]
pub struct SummaryTickets {
    next: u64,
    pending: Option<Pending>,
}

impl SummaryTickets {
    /// Start a request for a month, replacing any pending one
    pub fn issue(&mut self, month_id: u32) -> u64 {
        self.next += 1;
        self.pending = Some(Pending {
            ticket: self.next,
            month_id,
        });
        self.next
    }

    /// Close the ticket. True if it was still the current one.
    pub fn complete(&mut self, ticket: u64) -> bool {
        match self.pending {
            Some(p) if p.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Forget the pending request, if any. Returns its month.
    pub fn abandon(&mut self) -> Option<u32> {
        self.pending.take().map(|p| p.month_id)
    }

    pub fn pending_month(&self) -> Option<u32> {
        self.pending.map(|p| p.month_id)
    }
}

#[derive(Debug, Default)]
struct SummaryState {
    summaries: MonthlySummaries,
    tickets: SummaryTickets,
}

/// Service for generated monthly summaries
#[derive(Clone)]
pub struct SummaryService {
    generator: Arc<dyn SummaryGenerator>,
    storage: Arc<dyn SummaryStorage>,
    journal: JournalService,
    profile: ProfileService,
    requests: InFlight,
    state: Arc<Mutex<SummaryState>>,
}

impl SummaryService {
    /// Create a new SummaryService, loading stored summaries
    pub async fn new(
        generator: Arc<dyn SummaryGenerator>,
        storage: Arc<dyn SummaryStorage>,
        journal: JournalService,
        profile: ProfileService,
    ) -> Result<Self> {
        let summaries = storage.load_summaries().await?;
        info!("Loaded {} stored summaries", summaries.len());
        Ok(Self {
            generator,
            storage,
            journal,
            profile,
            requests: InFlight::new("summary generation"),
            state: Arc::new(Mutex::new(SummaryState {
                summaries,
                tickets: SummaryTickets::default(),
            })),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, SummaryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> MonthlySummaries {
        self.lock_state().summaries.clone()
    }

    pub fn get(&self, month_id: u32) -> Option<String> {
        self.lock_state().summaries.get(&month_id).cloned()
    }

    /// Generate and store the summary for a month
    pub async fn generate(&self, month_id: u32) -> Result<String> {
        let month = self
            .journal
            .curriculum()
            .month(month_id)
            .cloned()
            .ok_or(JournalError::UnknownMonth(month_id))?;

        let _request = self.requests.try_start()?;

        let user_name = self.profile.display_name().await?;
        let prompt = build_prompt(&month, &self.journal.snapshot(), &user_name)?;
        let ticket = self.lock_state().tickets.issue(month_id);
        info!(
            "Generating summary for {} from {} answers (ticket {})",
            month.name,
            prompt.entries.len(),
            ticket
        );

        let generated = self.generator.generate(&prompt).await;
        let current = self.lock_state().tickets.complete(ticket);

        let text = generated?;
        if !current {
            warn!("Discarding summary for month {}: request no longer current", month_id);
            return Err(JournalError::StaleSummary(month_id).into());
        }

        let updated = self.storage.save_summary(month_id, text.clone()).await?;
        self.lock_state().summaries = updated;
        info!("Stored summary for {}", month.name);
        Ok(text)
    }

    /// Drop the pending request so its result is never stored
    pub fn abandon_pending(&self) {
        if let Some(month_id) = self.lock_state().tickets.abandon() {
            info!("Abandoned pending summary for month {}", month_id);
        }
    }

    pub fn pending_month(&self) -> Option<u32> {
        self.lock_state().tickets.pending_month()
    }

    /// Remove every summary from disk and memory
    pub async fn clear(&self) -> Result<()> {
        self.storage.clear_summaries().await?;
        let mut state = self.lock_state();
        state.summaries.clear();
        state.tickets.abandon();
        info!("Cleared all summaries");
        Ok(())
    }
}
