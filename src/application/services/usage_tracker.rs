use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::application::UsageStore;
use crate::domain::{DomainError, UsageState, UsageStats, FREE_TIER_LIMITS};

/// Keeps request and token counters for the generative model across
/// invocations.
///
/// Every operation reloads the persisted state first so that interleaved
/// invocations lose as little as possible; there is no locking, the last
/// writer wins. Daily counters are reset whenever the loaded state belongs to
/// an earlier day than today (local time).
pub struct UsageTracker {
    store: Arc<dyn UsageStore>,
}

impl UsageTracker {
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self { store }
    }

    /// Count one model request. Callers must not let a failure here abort the
    /// operation being accounted for.
    pub async fn track_request(
        &self,
        input_tokens: u64,
        output_tokens: u64,
    ) -> Result<UsageState, DomainError> {
        let mut state = self.load_current().await?;
        state.record(input_tokens, output_tokens);
        self.store.save(&state).await?;

        debug!(
            "Tracked request ({} in / {} out), {} today",
            input_tokens,
            output_tokens,
            state.daily_requests()
        );
        Ok(state)
    }

    pub async fn get_usage_stats(&self) -> Result<UsageStats, DomainError> {
        let state = self.load_current().await?;
        Ok(state.stats(FREE_TIER_LIMITS))
    }

    /// Discard every counter, totals included.
    pub async fn reset_stats(&self) -> Result<(), DomainError> {
        self.store.save(&UsageState::new(today())).await
    }

    async fn load_current(&self) -> Result<UsageState, DomainError> {
        let today = today();
        let mut state = self
            .store
            .load()
            .await?
            .unwrap_or_else(|| UsageState::new(today));

        if state.roll_over(today) {
            debug!("New day, daily usage counters reset");
        }

        Ok(state)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
