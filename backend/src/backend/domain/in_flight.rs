use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::backend::domain::models::JournalError;

/// Allows one outstanding request of a kind at a time. A second request
/// while the first is running is rejected instead of queued.
#[derive(Debug, Clone)]
pub struct InFlight {
    kind: &'static str,
    busy: Arc<AtomicBool>,
}

/// Releases the slot when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the slot, or fail with `RequestInFlight`
    pub fn try_start(&self) -> Result<InFlightGuard, JournalError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard {
                busy: Arc::clone(&self.busy),
            })
            .map_err(|_| JournalError::RequestInFlight(self.kind))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
