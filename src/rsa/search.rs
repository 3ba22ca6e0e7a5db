// Search Control
// Cancellation, deadlines and attempt ceilings for the rejection-sampling loops

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{CipherError, Result};

/// Shared flag a caller on another thread can raise to stop a running search
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Limits applied to prime and exponent searches.
///
/// The default control never stops a search, matching an unbounded retry loop.
#[derive(Clone, Debug, Default)]
pub struct SearchControl {
    pub cancel: CancelToken,
    pub deadline: Option<Instant>,
    pub max_attempts: Option<u64>,
}

impl SearchControl {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u64) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Called before each attempt; `attempts` is the number already made.
    pub fn check(&self, attempts: u64) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CipherError::Cancelled);
        }
        if let Some(max) = self.max_attempts {
            if attempts >= max {
                return Err(CipherError::SearchExhausted { attempts });
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(CipherError::SearchExhausted { attempts });
            }
        }
        Ok(())
    }
}
