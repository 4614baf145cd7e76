use anyhow::Result;

use crate::domain::UsageStats;

use super::super::Container;

pub struct UsageController<'a> {
    container: &'a Container,
}

impl<'a> UsageController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn usage(&self, reset: bool) -> Result<String> {
        let tracker = self.container.usage_tracker();

        if reset {
            tracker.reset_stats().await?;
            return Ok("✓ Usage statistics reset.".to_string());
        }

        let stats = tracker.get_usage_stats().await?;
        Ok(format_report(&stats))
    }
}

fn format_report(stats: &UsageStats) -> String {
    let mut output = format!(
        "Gemini API Usage\n================\n\
         Today ({})\n  \
         Requests: {} / {} ({:.1}%)\n  \
         Tokens:   {} / {} ({:.1}%)\n  \
         Rate limit: {} requests/minute\n\n\
         All time (since {})\n  \
         Requests:      {}\n  \
         Input tokens:  {}\n  \
         Output tokens: {}\n  \
         Total tokens:  {}",
        stats.last_reset_date,
        stats.daily_requests,
        stats.daily_request_limit,
        stats.daily_request_percentage,
        stats.daily_tokens,
        stats.daily_token_limit,
        stats.daily_token_percentage,
        stats.requests_per_minute_limit,
        stats.first_use_date,
        stats.total_requests,
        stats.total_input_tokens,
        stats.total_output_tokens,
        stats.total_tokens,
    );

    if let Some(warning) = stats.limit_warning() {
        output.push_str(&format!("\n\n⚠ {warning}"));
    }

    output
}
