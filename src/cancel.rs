//! Cooperative cancellation
//!
//! Render loops poll a [`CancelSignal`] at fixed points and return as soon
//! as it reports `true`. The signal is never waited on.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A "stop requested" poll
pub trait CancelSignal {
    /// Returns `true` once the current run should stop
    fn is_cancelled(&self) -> bool;
}

impl<F: Fn() -> bool> CancelSignal for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Shared cancellation flag
///
/// Clones observe the same flag, so one handle can be given to the render
/// loop and another kept by whoever decides to stop it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Clear a previous request so the token can drive a new run
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl CancelSignal for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Signal that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl CancelSignal for Never {
    fn is_cancelled(&self) -> bool {
        false
    }
}
