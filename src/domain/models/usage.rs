use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Published free-tier quota for the generative model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeTierLimits {
    /// Informational only; nothing is tracked per minute.
    pub requests_per_minute: u64,
    pub requests_per_day: u64,
    pub tokens_per_day: u64,
}

pub const FREE_TIER_LIMITS: FreeTierLimits = FreeTierLimits {
    requests_per_minute: 15,
    requests_per_day: 1_500,
    tokens_per_day: 1_000_000,
};

/// Share of a daily limit above which the report warns.
const APPROACHING_THRESHOLD_PCT: f64 = 80.0;

/// Request and token counters persisted between invocations.
///
/// Daily counters belong to `last_reset_date`; totals only ever grow until
/// the user resets them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageState {
    total_requests: u64,
    total_input_tokens: u64,
    total_output_tokens: u64,
    daily_requests: u64,
    daily_tokens: u64,
    last_reset_date: NaiveDate,
    first_use_date: NaiveDate,
}

impl UsageState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            total_requests: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            daily_requests: 0,
            daily_tokens: 0,
            last_reset_date: today,
            first_use_date: today,
        }
    }

    /// Zero the daily counters when `today` is not the day they belong to.
    /// Returns whether a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_reset_date == today {
            return false;
        }
        self.daily_requests = 0;
        self.daily_tokens = 0;
        self.last_reset_date = today;
        true
    }

    pub fn record(&mut self, input_tokens: u64, output_tokens: u64) {
        self.total_requests = self.total_requests.saturating_add(1);
        self.total_input_tokens = self.total_input_tokens.saturating_add(input_tokens);
        self.total_output_tokens = self.total_output_tokens.saturating_add(output_tokens);
        self.daily_requests = self.daily_requests.saturating_add(1);
        self.daily_tokens = self
            .daily_tokens
            .saturating_add(input_tokens.saturating_add(output_tokens));
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn total_input_tokens(&self) -> u64 {
        self.total_input_tokens
    }

    pub fn total_output_tokens(&self) -> u64 {
        self.total_output_tokens
    }

    pub fn daily_requests(&self) -> u64 {
        self.daily_requests
    }

    pub fn daily_tokens(&self) -> u64 {
        self.daily_tokens
    }

    pub fn last_reset_date(&self) -> NaiveDate {
        self.last_reset_date
    }

    pub fn first_use_date(&self) -> NaiveDate {
        self.first_use_date
    }

    pub fn stats(&self, limits: FreeTierLimits) -> UsageStats {
        UsageStats::compute(self, limits)
    }
}

/// A usage snapshot measured against the free-tier limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStats {
    pub total_requests: u64,
    pub total_tokens: u64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub daily_requests: u64,
    pub daily_tokens: u64,
    pub requests_per_minute_limit: u64,
    pub daily_request_limit: u64,
    pub daily_token_limit: u64,
    pub daily_request_percentage: f64,
    pub daily_token_percentage: f64,
    pub last_reset_date: NaiveDate,
    pub first_use_date: NaiveDate,
    pub approaching_limit: bool,
    pub at_limit: bool,
}

impl UsageStats {
    fn compute(state: &UsageState, limits: FreeTierLimits) -> Self {
        let daily_request_percentage = percentage(state.daily_requests, limits.requests_per_day);
        let daily_token_percentage = percentage(state.daily_tokens, limits.tokens_per_day);

        let at_limit = state.daily_requests >= limits.requests_per_day
            || state.daily_tokens >= limits.tokens_per_day;
        let approaching_limit = !at_limit
            && (daily_request_percentage > APPROACHING_THRESHOLD_PCT
                || daily_token_percentage > APPROACHING_THRESHOLD_PCT);

        Self {
            total_requests: state.total_requests,
            total_tokens: state
                .total_input_tokens
                .saturating_add(state.total_output_tokens),
            total_input_tokens: state.total_input_tokens,
            total_output_tokens: state.total_output_tokens,
            daily_requests: state.daily_requests,
            daily_tokens: state.daily_tokens,
            requests_per_minute_limit: limits.requests_per_minute,
            daily_request_limit: limits.requests_per_day,
            daily_token_limit: limits.tokens_per_day,
            daily_request_percentage,
            daily_token_percentage,
            last_reset_date: state.last_reset_date,
            first_use_date: state.first_use_date,
            approaching_limit,
            at_limit,
        }
    }

    /// A one-line warning when the daily quota is close or exhausted.
    pub fn limit_warning(&self) -> Option<String> {
        if self.at_limit {
            Some("Daily API limit reached. Usage may be throttled or blocked.".to_string())
        } else if self.approaching_limit {
            Some(format!(
                "Approaching daily API limits ({:.1}% of requests, {:.1}% of tokens used)",
                self.daily_request_percentage, self.daily_token_percentage
            ))
        } else {
            None
        }
    }
}

fn percentage(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    used as f64 / limit as f64 * 100.0
}
