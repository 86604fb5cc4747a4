//! Run-scoped rate limiting and call budgeting.
//!
//! [`ProcessingBudget`] enforces a per-provider minimum inter-call delay and
//! a global ceiling on external calls. It is created at the start of a
//! document run and discarded at the end; it is never shared across runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::defaults::HARD_CALL_CEILING;
use crate::providers::ProviderKind;

/// Tracks external-call spend for one processing run.
///
/// Safe to share by reference across the concurrent provider calls of the
/// fan-out: the counter is atomic and last-call times sit behind a mutex.
#[derive(Debug)]
pub struct ProcessingBudget {
    max_calls: u32,
    calls: AtomicU32,
    min_delays: HashMap<ProviderKind, Duration>,
    last_call: Mutex<HashMap<ProviderKind, Instant>>,
}

impl ProcessingBudget {
    /// Create a budget with an explicit call ceiling.
    #[must_use]
    pub fn new(max_calls: u32, min_delays: HashMap<ProviderKind, Duration>) -> Self {
        Self { max_calls, calls: AtomicU32::new(0), min_delays, last_call: Mutex::new(HashMap::new()) }
    }

    /// Create the budget for a run.
    ///
    /// Uses the explicit caller ceiling when given, otherwise estimates
    /// `sentences × providers` capped at the hard ceiling.
    #[must_use]
    pub fn for_run(
        explicit_max: Option<u32>,
        sentence_count: usize,
        provider_count: usize,
        min_delays: HashMap<ProviderKind, Duration>,
    ) -> Self {
        let max_calls = explicit_max.unwrap_or_else(|| {
            let estimated = sentence_count.saturating_mul(provider_count);
            u32::try_from(estimated).unwrap_or(HARD_CALL_CEILING).min(HARD_CALL_CEILING)
        });
        Self::new(max_calls, min_delays)
    }

    /// Reserve one call against the budget for `provider`.
    ///
    /// Returns `false` immediately when the ceiling is reached, without
    /// blocking. Otherwise waits out the provider's minimum inter-call
    /// delay, increments the counter, records the reservation time, and
    /// returns `true`. The ceiling is never exceeded even under concurrent
    /// reservation.
    pub async fn reserve(&self, provider: ProviderKind) -> bool {
        if self.calls.load(Ordering::Acquire) >= self.max_calls {
            return false;
        }

        let min_delay = self.min_delays.get(&provider).copied().unwrap_or(Duration::ZERO);

        loop {
            let mut last_call = self.last_call.lock().await;

            if self.calls.load(Ordering::Acquire) >= self.max_calls {
                return false;
            }

            let now = Instant::now();
            if let Some(last) = last_call.get(&provider) {
                let elapsed = now.saturating_duration_since(*last);
                if elapsed < min_delay {
                    let wait = min_delay - elapsed;
                    drop(last_call);
                    tokio::time::sleep(wait).await;
                    continue;
                }
            }

            let reserved = self
                .calls
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |calls| {
                    (calls < self.max_calls).then_some(calls + 1)
                })
                .is_ok();

            if reserved {
                last_call.insert(provider, now);
            }
            return reserved;
        }
    }

    /// Return an unused reservation to the budget.
    pub fn release(&self) {
        let _ = self
            .calls
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |calls| calls.checked_sub(1));
    }

    /// Calls still available under the ceiling.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.max_calls.saturating_sub(self.calls.load(Ordering::Acquire))
    }

    /// Calls reserved so far.
    #[must_use]
    pub fn calls_made(&self) -> u32 {
        self.calls.load(Ordering::Acquire)
    }

    /// The call ceiling for this run.
    #[must_use]
    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }
}
