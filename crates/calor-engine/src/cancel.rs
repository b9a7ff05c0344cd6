//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked by the stepper between steps.
///
/// Cloning yields another handle to the same flag, so one clone can be
/// moved to another thread (a signal handler, a watchdog) while the
/// stepper holds the other.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

// Compile-time assertion: handles can cross threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<CancelToken>();
};

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
