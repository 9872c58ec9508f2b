//! Caller-supplied cancellation and deadline for store calls.

use crate::errors::{StoreError, StoreResult};
use std::panic::RefUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

/// Pause between two attempts to take a contended lock.
const LOCK_POLL: Duration = Duration::from_millis(2);

/// Cancellation flag plus optional deadline, threaded through every
/// `ScoreStore` call so a hung backend cannot stall the caller forever.
///
/// Clones share the same flag: cancelling one cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// A context that never expires on its own.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// `0` means no deadline, matching the `query_timeout_ms` config key.
    pub fn from_millis(timeout_ms: u64) -> Self {
        if timeout_ms == 0 {
            Self::background()
        } else {
            Self::with_timeout(Duration::from_millis(timeout_ms))
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Retry a non-blocking lock attempt until it succeeds or the context is done.
    ///
    /// A holder that never releases only stalls callers without a deadline.
    pub fn acquire<G>(
        &self,
        mut attempt: impl FnMut() -> Result<G, TryLockError<G>>,
    ) -> StoreResult<G> {
        loop {
            if self.is_done() {
                return Err(StoreError::Cancelled);
            }
            match attempt() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(_)) => return Err(StoreError::Poisoned),
                Err(TryLockError::WouldBlock) => thread::sleep(LOCK_POLL),
            }
        }
    }

    /// Owned probe for hooks that must be `'static` (SQLite progress handler).
    pub(crate) fn probe(&self) -> impl Fn() -> bool + Send + RefUnwindSafe + 'static {
        let cancelled = Arc::clone(&self.cancelled);
        let deadline = self.deadline;
        move || {
            cancelled.load(Ordering::SeqCst) || deadline.is_some_and(|d| Instant::now() >= d)
        }
    }
}
