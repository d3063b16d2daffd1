//! Trailing-edge debounce driven by caller-supplied time.
//!
//! A `Debouncer` holds at most one pending call. Each `call` replaces the
//! pending arguments and pushes the deadline out to `now + delay`; `poll`
//! hands the arguments back exactly once when the deadline has passed.
//!
//! Time is passed in explicitly (milliseconds) rather than read from a clock,
//! so the owning event loop decides when to poll and tests stay deterministic.
//! The pending call is owned by the debouncer and dies with it; `cancel`
//! drops it early.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ControlError, ControlResult};

/// Quiet interval used by the spring control for commits and resizes.
pub const DEFAULT_DELAY_MS: f64 = 250.0;

/// Debounce window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet interval in milliseconds.
    pub delay_ms: f64,
}

impl DebounceConfig {
    /// # Errors
    ///
    /// Returns error if `delay_ms` is not finite and positive.
    pub fn new(delay_ms: f64) -> ControlResult<Self> {
        if !delay_ms.is_finite() || delay_ms <= 0.0 {
            return Err(ControlError::InvalidArg {
                what: "debounce delay must be positive",
            });
        }
        Ok(Self { delay_ms })
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Pending<A> {
    args: A,
    due: f64,
}

/// Cancellable trailing-edge debouncer.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer<A> {
    label: &'static str,
    config: DebounceConfig,
    pending: Option<Pending<A>>,
}

impl<A> Debouncer<A> {
    pub fn new(label: &'static str, config: DebounceConfig) -> Self {
        Self {
            label,
            config,
            pending: None,
        }
    }

    pub fn config(&self) -> DebounceConfig {
        self.config
    }

    /// Schedule `args`, replacing any pending call.
    pub fn call(&mut self, now: f64, args: A) {
        let due = now + self.config.delay_ms;
        if self.pending.is_some() {
            debug!(label = self.label, due, "debounce rescheduled");
        }
        self.pending = Some(Pending { args, due });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arguments of the pending call, if any.
    pub fn pending_args(&self) -> Option<&A> {
        self.pending.as_ref().map(|p| &p.args)
    }

    /// Deadline of the pending call, if any.
    pub fn due_time(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Time remaining before the pending call fires.
    pub fn time_until_fire(&self, now: f64) -> Option<f64> {
        self.due_time().map(|due| (due - now).max(0.0))
    }

    /// Take the pending arguments if their deadline has passed.
    pub fn poll(&mut self, now: f64) -> Option<A> {
        if !self.pending.as_ref().is_some_and(|p| now >= p.due) {
            return None;
        }
        debug!(label = self.label, now, "debounce fired");
        self.pending.take().map(|p| p.args)
    }

    /// Drop the pending call. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        let had = self.pending.take().is_some();
        if had {
            debug!(label = self.label, "debounce cancelled");
        }
        had
    }
}
