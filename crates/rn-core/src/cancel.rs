//! Cooperative cancellation for long-running searches.
//!
//! Searches poll the token once per queue/stack pop.  Cancelling is sticky:
//! once tripped a token stays cancelled, and every clone observes it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// ```
/// use rn_core::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Option<Arc<AtomicBool>>,
}

impl CancelToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        Self { flag: Some(Arc::new(AtomicBool::new(false))) }
    }

    /// A token that can never be cancelled.  Does not allocate.
    pub const fn never() -> Self {
        Self { flag: None }
    }

    /// Trip the token.  No-op on [`never`](Self::never) tokens.
    pub fn cancel(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
