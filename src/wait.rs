//! Bounded polling.
//!
//! Pages re-render asynchronously after a click. Instead of sleeping a
//! fixed amount, callers poll a probe until a predicate holds or the
//! policy's timeout passes.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::error::Result;

// ============================================================================
// WaitPolicy
// ============================================================================

/// How long to wait and how often to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Give up after this long.
    pub timeout: Duration,
    /// Delay between probes.
    pub interval: Duration,
}

impl WaitPolicy {
    /// Creates a policy.
    #[inline]
    #[must_use]
    pub const fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Creates a policy from milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(timeout_ms: u64, interval_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(interval_ms),
        )
    }
}

// ============================================================================
// Settle
// ============================================================================

/// Outcome of [`poll_until`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settle<T> {
    /// The predicate held for this value.
    Settled(T),
    /// Time ran out; carries the last successfully probed value.
    TimedOut(Option<T>),
}

impl<T> Settle<T> {
    /// Returns `true` if the predicate held.
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }

    /// The settled value, or the last probed value on timeout.
    #[inline]
    #[must_use]
    pub fn into_last(self) -> Option<T> {
        match self {
            Self::Settled(value) => Some(value),
            Self::TimedOut(last) => last,
        }
    }
}

// ============================================================================
// poll_until
// ============================================================================

/// Probes until `ready` accepts a value or `policy.timeout` elapses.
///
/// The probe always runs at least once. A probe error counts as "not ready
/// yet" and does not end the wait.
pub async fn poll_until<T, P, Fut, R>(policy: WaitPolicy, mut probe: P, mut ready: R) -> Settle<T>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    R: FnMut(&T) -> bool,
{
    let deadline = Instant::now() + policy.timeout;
    let mut last = None;

    loop {
        match probe().await {
            Ok(value) if ready(&value) => return Settle::Settled(value),
            Ok(value) => last = Some(value),
            Err(e) => trace!(error = %e, "Probe failed, retrying"),
        }

        if Instant::now() >= deadline {
            return Settle::TimedOut(last);
        }

        sleep(policy.interval).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
