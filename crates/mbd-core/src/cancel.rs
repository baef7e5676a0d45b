//! Cooperative cancellation for in-flight transfers.
//!
//! The consumer sets the token at any time; the transfer polls it at each
//! progress tick and aborts at the next poll. Extraction does not poll it:
//! once extraction starts it runs to completion or failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared one-shot cancellation flag. Cloning yields a handle to the same
/// flag; there is no way to un-cancel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
