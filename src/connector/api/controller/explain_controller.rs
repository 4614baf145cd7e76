use std::time::Duration;

use anyhow::Result;

use super::super::Container;
use super::progress::spinner;

pub struct ExplainController<'a> {
    container: &'a Container,
}

impl<'a> ExplainController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn explain(&self, index: usize, timeout_secs: u64) -> Result<String> {
        let pb = spinner(format!("Analyzing artwork #{index}..."));
        let result = self
            .container
            .explain_use_case()
            .execute(index, Duration::from_secs(timeout_secs))
            .await;
        pb.finish_and_clear();
        let explanation = result?;

        let artwork = &explanation.cached.artwork;
        Ok(format!(
            "#{index}: {} by {}\nQuote: \"{}\"\n\n{}",
            artwork.title(),
            artwork.artist(),
            explanation.cached.original_query,
            explanation.text
        ))
    }
}
