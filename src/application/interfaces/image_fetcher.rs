use async_trait::async_trait;

use crate::domain::DomainError;

use super::InlineImage;

/// Downloads artwork images so they can be handed to a vision model.
///
/// Failures are reported as [`DomainError::ImageFetch`] so callers can tell
/// them apart from generation failures.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<InlineImage, DomainError>;
}
