//! Cancellable, deadline-bearing execution context.
//!
//! Every evaluation takes a [`Context`]. The failure pipeline checks it once,
//! after acquiring the handler lock; a cancelled or expired context turns the
//! report into a cancellation notice.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why a context is no longer live.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Context>,
}

/// Execution context carried through an evaluation.
///
/// Cloning is cheap; clones observe the same cancellation state.
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    /// A root context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline: None,
                parent: None,
            }),
        }
    }

    fn child(parent: &Self, deadline: Option<Instant>) -> (Self, CancelHandle) {
        let ctx = Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
                parent: Some(parent.clone()),
            }),
        };
        let handle = CancelHandle { ctx: ctx.clone() };
        (ctx, handle)
    }

    /// Derive a child context that can be cancelled through the returned handle.
    #[must_use]
    pub fn with_cancel(parent: &Self) -> (Self, CancelHandle) {
        Self::child(parent, None)
    }

    /// Derive a child context that expires `timeout` from now.
    ///
    /// The handle cancels the child when dropped.
    #[must_use]
    pub fn with_timeout(parent: &Self, timeout: Duration) -> (Self, CancelHandle) {
        let deadline = Instant::now().checked_add(timeout);
        Self::child(parent, deadline)
    }

    /// Earliest deadline along the chain of ancestors.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        let own = self.inner.deadline;
        let inherited = self.inner.parent.as_ref().and_then(Self::deadline);
        match (own, inherited) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Reason the context is done, or `None` while it is still live.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        if self.deadline().is_some_and(|d| Instant::now() >= d) {
            return Some(ContextError::DeadlineExceeded);
        }
        None
    }

    /// Whether this context or any ancestor has been explicitly cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
            || self.inner.parent.as_ref().is_some_and(Self::is_cancelled)
    }

    fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

/// Cancels its context explicitly or on drop.
#[derive(Debug)]
pub struct CancelHandle {
    ctx: Context,
}

impl CancelHandle {
    /// Cancel the associated context and all contexts derived from it.
    pub fn cancel(&self) {
        self.ctx.cancel();
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.ctx.cancel();
    }
}
