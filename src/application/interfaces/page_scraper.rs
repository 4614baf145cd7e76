use async_trait::async_trait;

use crate::domain::DomainError;

/// Crawls a single page and returns its HTML.
///
/// A crawl that succeeds but yields no page returns an empty string.
#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<String, DomainError>;
}
