use async_trait::async_trait;

use crate::domain::{ArtworkRecord, DomainError};

/// A single art data provider behind a uniform search contract.
#[async_trait]
pub trait GallerySource: Send + Sync {
    /// Search the provider for artwork matching `keywords`.
    ///
    /// Returns at most `max_results` records in provider order, every one
    /// with an absolute `image_url`. `max_results == 0` yields an empty list.
    async fn search(
        &self,
        keywords: &str,
        max_results: usize,
    ) -> Result<Vec<ArtworkRecord>, DomainError>;

    /// Name stored alongside cached results.
    fn name(&self) -> &str;
}
