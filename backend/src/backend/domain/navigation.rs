//! Navigation state.
//!
//! Holds where the user is: the screen, the selected month, the entry
//! within that month and the preparation step. Transitions are plain
//! assignments with two rules on top: entry indexes are bounds-checked
//! against the month, and month pages redirect to the locked screen until
//! the journey starts.

use anyhow::Result;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::domain::calendar::{journey_unlocked, Clock};
use crate::backend::domain::curriculum_service::CurriculumService;
use crate::backend::domain::models::NavigationError;
use crate::backend::domain::profile_service::ProfileService;
use shared::{NavigationAction, NavigationStateResponse, Screen};

/// Number of steps in the preparation flow
pub const PREP_STEPS: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub screen: Screen,
    pub current_month_id: u32,
    /// `None` while the month intro page is shown
    pub current_entry_index: Option<usize>,
    /// 1..=PREP_STEPS
    pub prep_step: u8,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            screen: Screen::Login,
            current_month_id: 1,
            current_entry_index: None,
            prep_step: 1,
        }
    }
}

/// Result of applying an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub state: NavigationState,
    /// The selected month differs from before the action
    pub month_changed: bool,
}

fn guarded(screen: Screen, unlocked: bool) -> Screen {
    match screen {
        Screen::MonthIntro | Screen::Journal if !unlocked => Screen::Locked,
        other => other,
    }
}

/// Compute the state after `action`. Login and logout side effects on the
/// profile are the caller's business.
pub fn transition(
    state: &NavigationState,
    action: &NavigationAction,
    curriculum: &CurriculumService,
    unlocked: bool,
) -> Result<NavigationState, NavigationError> {
    let mut next = state.clone();
    let month_len = |month_id: u32| {
        curriculum
            .month(month_id)
            .map(|m| m.entries.len())
            .ok_or(NavigationError::UnknownMonth(month_id))
    };

    match action {
        NavigationAction::Login { .. } => {
            next.screen = Screen::Cover;
        }
        NavigationAction::Logout => {
            next = NavigationState::default();
        }
        NavigationAction::OpenScreen { screen } => {
            next.screen = guarded(*screen, unlocked);
            match screen {
                Screen::PrepFlow | Screen::Cover => next.prep_step = 1,
                Screen::MonthIntro => next.current_entry_index = None,
                Screen::Journal if next.current_entry_index.is_none() => {
                    next.current_entry_index = Some(0)
                }
                _ => {}
            }
        }
        NavigationAction::OpenMonth { month_id } => {
            month_len(*month_id)?;
            next.current_month_id = *month_id;
            next.current_entry_index = None;
            next.screen = guarded(Screen::MonthIntro, unlocked);
        }
        NavigationAction::OpenEntry { index } => {
            let len = month_len(state.current_month_id)?;
            if *index >= len {
                return Err(NavigationError::EntryOutOfRange {
                    month_id: state.current_month_id,
                    index: *index,
                    len,
                });
            }
            next.current_entry_index = Some(*index);
            next.screen = guarded(Screen::Journal, unlocked);
        }
        NavigationAction::OpenEntryById { entry_id } => {
            let position = curriculum
                .index()
                .get(entry_id)
                .ok_or_else(|| NavigationError::UnknownEntry(entry_id.clone()))?;
            next.current_month_id = position.month_id;
            next.current_entry_index = Some(position.position);
            next.screen = guarded(Screen::Journal, unlocked);
        }
        NavigationAction::NextEntry => {
            let len = month_len(state.current_month_id)?;
            let last = len.saturating_sub(1);
            next.current_entry_index = Some(match state.current_entry_index {
                None => 0,
                Some(i) => (i + 1).min(last),
            });
            next.screen = guarded(Screen::Journal, unlocked);
        }
        NavigationAction::PreviousEntry => {
            if let Some(i) = state.current_entry_index {
                next.current_entry_index = Some(i.saturating_sub(1));
                next.screen = guarded(Screen::Journal, unlocked);
            }
        }
        NavigationAction::NextPrepStep => {
            next.prep_step = (state.prep_step + 1).min(PREP_STEPS);
        }
        NavigationAction::PreviousPrepStep => {
            next.prep_step = state.prep_step.saturating_sub(1).max(1);
        }
    }

    Ok(next)
}

/// Service holding the current navigation state
#[derive(Clone)]
pub struct NavigationService {
    curriculum: CurriculumService,
    profile: ProfileService,
    clock: Arc<dyn Clock>,
    force_unlock: bool,
    state: Arc<Mutex<NavigationState>>,
}

impl NavigationService {
    /// Create a new NavigationService on the login screen
    pub fn new(
        curriculum: CurriculumService,
        profile: ProfileService,
        clock: Arc<dyn Clock>,
        force_unlock: bool,
    ) -> Self {
        Self {
            curriculum,
            profile,
            clock,
            force_unlock,
            state: Arc::new(Mutex::new(NavigationState::default())),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, NavigationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> NavigationState {
        self.lock_state().clone()
    }

    fn is_unlocked(&self) -> bool {
        journey_unlocked(
            self.clock.today(),
            self.curriculum.target_year(),
            self.force_unlock,
        )
    }

    /// Apply a user action. Login stores the name and logout clears it.
    pub async fn apply(&self, action: NavigationAction) -> Result<NavigationOutcome> {
        match &action {
            NavigationAction::Login { user_name } => {
                self.profile.set_user_name(user_name).await?;
            }
            NavigationAction::Logout => {
                self.profile.clear().await?;
            }
            _ => {}
        }

        let unlocked = self.is_unlocked();
        let mut state = self.lock_state();
        let next = transition(&state, &action, &self.curriculum, unlocked)?;
        let month_changed = next.current_month_id != state.current_month_id;
        *state = next.clone();

        debug!("Navigation {:?} -> {:?}", action, next);
        Ok(NavigationOutcome {
            state: next,
            month_changed,
        })
    }

    /// Back to the login screen with everything deselected
    pub fn reset(&self) {
        *self.lock_state() = NavigationState::default();
        info!("Navigation reset");
    }

    /// Id of the entry currently selected, if any
    pub fn current_entry_id(&self, state: &NavigationState) -> Option<String> {
        let index = state.current_entry_index?;
        self.curriculum
            .month(state.current_month_id)?
            .entries
            .get(index)
            .map(|entry| entry.id.clone())
    }

    pub async fn response(&self, state: &NavigationState) -> Result<NavigationStateResponse> {
        Ok(NavigationStateResponse {
            screen: state.screen,
            current_month_id: state.current_month_id,
            current_entry_index: state.current_entry_index,
            current_entry_id: self.current_entry_id(state),
            prep_step: state.prep_step,
            user_name: self.profile.user_name().await?,
        })
    }
}
