//! Cancellation signals polled between row fetches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Why a cancellable run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Cancelled {
    #[error("Query cancelled")]
    Requested,
    #[error("Query deadline exceeded")]
    DeadlineExceeded,
}

/// A cancellation signal checked by [`query_context`](crate::query::query_context)
/// before every fetch and before a fetched row is applied.
pub trait Context {
    fn check(&self) -> Result<(), Cancelled>;
}

/// The unit context never cancels.
impl Context for () {
    #[inline]
    fn check(&self) -> Result<(), Cancelled> {
        Ok(())
    }
}

impl<C: Context + ?Sized> Context for &C {
    #[inline]
    fn check(&self) -> Result<(), Cancelled> {
        (**self).check()
    }
}

/// Both contexts must pass; the first one to fire wins.
impl<A: Context, B: Context> Context for (A, B) {
    fn check(&self) -> Result<(), Cancelled> {
        self.0.check()?;
        self.1.check()
    }
}

/// Shared flag that any clone can trip.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Context for CancellationToken {
    fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled::Requested)
        } else {
            Ok(())
        }
    }
}

/// Fires once the wall clock passes a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }
}

impl Context for Deadline {
    fn check(&self) -> Result<(), Cancelled> {
        if Instant::now() >= self.0 {
            Err(Cancelled::DeadlineExceeded)
        } else {
            Ok(())
        }
    }
}
