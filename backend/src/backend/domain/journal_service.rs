//! Journal service domain logic.
//!
//! Owns the in-memory answer snapshot and keeps it in step with the answer
//! store. Statistics and progress are always derived from the current
//! snapshot; nothing derived is ever persisted.
//!
//! ## Key Responsibilities
//!
//! - **Saving Answers**: Stamping save time and completion, persisting, replacing the snapshot
//! - **Snapshot Replacement**: Import and erase replace the whole snapshot
//! - **Statistics**: Computing stats, memoized on (snapshot version, local day)
//! - **Progress**: Per-month completion over day entries
//! - **Presentation Extras**: Start date, motivational message, journey lock
//!
//! ## Snapshot Rules
//!
//! - Every replacement bumps the snapshot version and recomputes statistics on the spot
//! - A failed write leaves the snapshot untouched
//! - Writes are serialized, so two near-simultaneous saves resolve in call order

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::domain::calendar::{format_display_date, journey_unlocked, Clock};
use crate::backend::domain::curriculum_service::CurriculumService;
use crate::backend::domain::models::{DomainEntry, JournalError};
use crate::backend::domain::progress::month_progress;
use crate::backend::domain::statistics::compute_stats;
use crate::backend::storage::AnswerStorage;
use shared::{JournalStats, MonthProgress, StatsResponse, UserAnswer, UserData};

const MESSAGE_STREAK_BROKEN: &str = "Todo dia é uma nova oportunidade de recomeçar.";
const MESSAGE_KEEP_GOING: &str = "Pequenos passos constantes levam a grandes destinos.";

#[derive(Debug, Clone, Copy)]
struct CachedStats {
    version: u64,
    today: NaiveDate,
    stats: JournalStats,
}

#[derive(Debug, Default)]
struct JournalState {
    answers: Arc<UserData>,
    version: u64,
    cached: Option<CachedStats>,
}

/// Service for answers and everything derived from them
#[derive(Clone)]
pub struct JournalService {
    curriculum: CurriculumService,
    storage: Arc<dyn AnswerStorage>,
    clock: Arc<dyn Clock>,
    force_unlock: bool,
    state: Arc<Mutex<JournalState>>,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl JournalService {
    /// Create a new JournalService, loading the stored answers
    pub async fn new(
        curriculum: CurriculumService,
        storage: Arc<dyn AnswerStorage>,
        clock: Arc<dyn Clock>,
        force_unlock: bool,
    ) -> Result<Self> {
        let answers = storage.load_answers().await?;
        info!("Loaded {} stored answers", answers.len());

        let service = Self {
            curriculum,
            storage,
            clock,
            force_unlock,
            state: Arc::new(Mutex::new(JournalState::default())),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        };
        service.replace_snapshot(answers);
        Ok(service)
    }

    fn lock_state(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a new snapshot, bump the version and recompute statistics
    fn replace_snapshot(&self, answers: UserData) -> JournalStats {
        let today = self.clock.today();
        let stats = self.compute(&answers);

        let mut state = self.lock_state();
        state.answers = Arc::new(answers);
        state.version += 1;
        state.cached = Some(CachedStats {
            version: state.version,
            today,
            stats,
        });
        debug!("Answer snapshot replaced (version {})", state.version);
        stats
    }

    fn compute(&self, answers: &UserData) -> JournalStats {
        compute_stats(
            answers,
            self.curriculum.index(),
            self.curriculum.total_days(),
            self.clock.as_ref(),
        )
    }

    /// The current answer snapshot
    pub fn snapshot(&self) -> Arc<UserData> {
        Arc::clone(&self.lock_state().answers)
    }

    pub fn snapshot_version(&self) -> u64 {
        self.lock_state().version
    }

    pub fn answer(&self, entry_id: &str) -> Option<UserAnswer> {
        self.lock_state().answers.get(entry_id).cloned()
    }

    /// Statistics for the current snapshot. Reuses the last result unless the
    /// snapshot or the local day changed since.
    pub fn stats(&self) -> JournalStats {
        let today = self.clock.today();
        let (answers, version) = {
            let state = self.lock_state();
            if let Some(cached) = state.cached {
                if cached.version == state.version && cached.today == today {
                    return cached.stats;
                }
            }
            (Arc::clone(&state.answers), state.version)
        };

        let stats = self.compute(&answers);
        let mut state = self.lock_state();
        if state.version == version {
            state.cached = Some(CachedStats { version, today, stats });
        }
        stats
    }

    /// Save an answer for a curriculum or preparation entry.
    /// The save time is now and the answer is marked completed.
    pub async fn save_answer(
        &self,
        entry_id: &str,
        text: String,
        date_string: Option<String>,
    ) -> Result<(UserAnswer, JournalStats)> {
        if self.curriculum.index().contains(entry_id) && !self.curriculum.index().is_day_entry(entry_id) {
            warn!("Rejected typed answer for review entry '{}'", entry_id);
            return Err(JournalError::ReviewNotWritable(entry_id.to_string()).into());
        }
        if !self.curriculum.accepts_answer_for(entry_id) {
            warn!("Rejected answer for unknown entry '{}'", entry_id);
            return Err(JournalError::UnknownEntry(entry_id.to_string()).into());
        }

        let answer = UserAnswer {
            text,
            timestamp: self.clock.now_millis(),
            completed: true,
            date_string: date_string.filter(|d| !d.trim().is_empty()),
        };

        let _write = self.write_lock.lock().await;
        let updated = self.storage.save_answer(entry_id, answer.clone()).await?;
        let stats = self.replace_snapshot(updated);

        info!("Saved answer for '{}' ({} completed)", entry_id, stats.completed_count);
        Ok((answer, stats))
    }

    /// Replace every stored answer. Nothing is merged with the previous snapshot.
    pub async fn replace_answers(&self, answers: UserData) -> Result<JournalStats> {
        let _write = self.write_lock.lock().await;
        self.storage.store_answers(&answers).await?;
        let count = answers.len();
        let stats = self.replace_snapshot(answers);
        info!("Replaced answer snapshot with {} answers", count);
        Ok(stats)
    }

    /// Remove every answer from disk and memory
    pub async fn clear(&self) -> Result<()> {
        let _write = self.write_lock.lock().await;
        self.storage.clear_answers().await?;
        self.replace_snapshot(UserData::new());
        info!("Cleared all answers");
        Ok(())
    }

    pub fn month_progress(&self, month_id: u32) -> Result<u32> {
        let month = self
            .curriculum
            .month(month_id)
            .ok_or(JournalError::UnknownMonth(month_id))?;
        Ok(month_progress(month, &self.snapshot()))
    }

    /// Progress of every month, in month order
    pub fn all_progress(&self) -> Vec<MonthProgress> {
        let answers = self.snapshot();
        self.curriculum
            .curriculum()
            .months
            .iter()
            .map(|month| MonthProgress {
                month_id: month.id,
                name: month.name.clone(),
                progress: month_progress(month, &answers),
            })
            .collect()
    }

    /// The user-entered date of the first day of the journey, or the day it was saved
    pub fn start_date(&self) -> Option<String> {
        let first = self.answer(&DomainEntry::day_id(1, 1))?;
        first
            .date_string
            .clone()
            .or_else(|| self.clock.local_date(first.timestamp).map(format_display_date))
    }

    pub fn is_journey_unlocked(&self) -> bool {
        journey_unlocked(
            self.clock.today(),
            self.curriculum.target_year(),
            self.force_unlock,
        )
    }

    pub fn motivational_message(&self, stats: &JournalStats) -> String {
        if !self.is_journey_unlocked() {
            format!("Prepare o terreno. {} será seu ano.", self.curriculum.target_year())
        } else if stats.current_streak == 0 {
            MESSAGE_STREAK_BROKEN.to_string()
        } else {
            MESSAGE_KEEP_GOING.to_string()
        }
    }

    /// Statistics together with the presentation extras
    pub fn stats_response(&self) -> StatsResponse {
        let stats = self.stats();
        StatsResponse {
            motivational_message: self.motivational_message(&stats),
            start_date: self.start_date(),
            journey_unlocked: self.is_journey_unlocked(),
            stats,
        }
    }

    pub fn curriculum(&self) -> &CurriculumService {
        &self.curriculum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::calendar::FixedClock;
    use crate::backend::domain::content::AuthoredContent;
    use crate::backend::storage::json::test_utils::TestEnvironment;
    use crate::backend::storage::{AnswerRepository, JsonConnection, StorageError};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn service_at(connection: JsonConnection, today: NaiveDate) -> JournalService {
        let curriculum =
            CurriculumService::new(&AuthoredContent::embedded().unwrap(), 2026).unwrap();
        JournalService::new(
            curriculum,
            Arc::new(AnswerRepository::new(connection)),
            Arc::new(FixedClock::at_noon_utc(today)),
            false,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_answer_updates_stats() {
        let env = TestEnvironment::new().unwrap();
        let service = service_at(env.connection.clone(), date(2026, 1, 3)).await;
        let before = service.snapshot_version();

        let (answer, stats) = service
            .save_answer("mes_1_dia_1", "Começando".to_string(), Some("03/01/2026".to_string()))
            .await
            .unwrap();

        assert!(answer.completed);
        assert_eq!(answer.timestamp, FixedClock::at_noon_utc(date(2026, 1, 3)).now_millis());
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.total_days, 365);
        assert_eq!(service.stats(), stats);
        assert_eq!(service.snapshot_version(), before + 1);
        assert_eq!(service.month_progress(1).unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_entry_is_rejected() {
        let env = TestEnvironment::new().unwrap();
        let service = service_at(env.connection.clone(), date(2026, 1, 3)).await;

        let err = service
            .save_answer("mes_2_dia_30", "?".to_string(), None)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<JournalError>(),
            Some(&JournalError::UnknownEntry("mes_2_dia_30".to_string()))
        );
        assert!(service.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_review_entry_rejects_typed_answer() {
        let env = TestEnvironment::new().unwrap();
        let service = service_at(env.connection.clone(), date(2026, 1, 31)).await;

        let err = service
            .save_answer("mes_1_revisao", "digitado".to_string(), None)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<JournalError>(),
            Some(&JournalError::ReviewNotWritable("mes_1_revisao".to_string()))
        );
        assert!(service.answer("mes_1_revisao").is_none());

        let mut backup = UserData::new();
        backup.insert(
            "mes_1_revisao".to_string(),
            UserAnswer {
                text: "resumo antigo".to_string(),
                timestamp: 0,
                completed: true,
                date_string: None,
            },
        );
        service.replace_answers(backup).await.unwrap();
        assert_eq!(service.answer("mes_1_revisao").unwrap().text, "resumo antigo");
    }

    #[tokio::test]
    async fn test_prep_answers_are_stored_but_not_counted() {
        let env = TestEnvironment::new().unwrap();
        let service = service_at(env.connection.clone(), date(2025, 12, 20)).await;

        let (_, stats) = service
            .save_answer("prep_intention", "Crescer".to_string(), None)
            .await
            .unwrap();

        assert_eq!(stats.completed_count, 0);
        assert_eq!(service.answer("prep_intention").unwrap().text, "Crescer");
    }

    #[tokio::test]
    async fn test_answers_survive_restart() {
        let env = TestEnvironment::new().unwrap();
        {
            let service = service_at(env.connection.clone(), date(2026, 1, 3)).await;
            service.save_answer("mes_1_dia_2", "x".to_string(), None).await.unwrap();
        }
        let service = service_at(env.connection.clone(), date(2026, 1, 3)).await;
        assert_eq!(service.stats().completed_count, 1);
    }

    #[tokio::test]
    async fn test_replace_answers_does_not_merge() {
        let env = TestEnvironment::new().unwrap();
        let service = service_at(env.connection.clone(), date(2026, 1, 3)).await;
        service.save_answer("mes_1_dia_1", "antigo".to_string(), None).await.unwrap();

        let mut imported = UserData::new();
        imported.insert(
            "mes_2_dia_1".to_string(),
            UserAnswer { text: "novo".into(), timestamp: 0, completed: true, date_string: None },
        );
        let stats = service.replace_answers(imported.clone()).await.unwrap();

        assert_eq!(stats.completed_count, 1);
        assert_eq!(*service.snapshot(), imported);
        assert_eq!(service.stats(), stats);
    }

    #[tokio::test]
    async fn test_capacity_failure_leaves_snapshot_untouched() {
        let env = TestEnvironment::with_limit(120).unwrap();
        let service = service_at(env.connection.clone(), date(2026, 1, 3)).await;
        service.save_answer("mes_1_dia_1", "curta".to_string(), None).await.unwrap();
        let version = service.snapshot_version();

        let err = service
            .save_answer("mes_1_dia_2", "muito longa ".repeat(20), None)
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<StorageError>().is_some());
        assert_eq!(service.snapshot().len(), 1);
        assert_eq!(service.snapshot_version(), version);
    }

    #[tokio::test]
    async fn test_start_date_prefers_user_date() {
        let env = TestEnvironment::new().unwrap();
        let service = service_at(env.connection.clone(), date(2026, 1, 2)).await;
        assert_eq!(service.start_date(), None);

        service.save_answer("mes_1_dia_1", "a".to_string(), None).await.unwrap();
        assert_eq!(service.start_date().as_deref(), Some("02/01/2026"));

        service
            .save_answer("mes_1_dia_1", "b".to_string(), Some("01/01/2026".to_string()))
            .await
            .unwrap();
        assert_eq!(service.start_date().as_deref(), Some("01/01/2026"));
    }

    #[tokio::test]
    async fn test_motivational_messages() {
        let env = TestEnvironment::new().unwrap();
        let locked = service_at(env.connection.clone(), date(2025, 12, 31)).await;
        assert_eq!(
            locked.stats_response().motivational_message,
            "Prepare o terreno. 2026 será seu ano."
        );
        assert!(!locked.stats_response().journey_unlocked);

        let unlocked = service_at(env.connection.clone(), date(2026, 1, 10)).await;
        assert_eq!(unlocked.stats_response().motivational_message, MESSAGE_STREAK_BROKEN);

        unlocked.save_answer("mes_1_dia_10", "hoje".to_string(), None).await.unwrap();
        assert_eq!(unlocked.stats_response().motivational_message, MESSAGE_KEEP_GOING);
    }
}
