use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::application::{Interpreter, ResultCache};
use crate::domain::{CachedArtwork, DomainError};

#[derive(Debug, Clone)]
pub struct Explanation {
    pub cached: CachedArtwork,
    pub text: String,
}

/// Explains how an artwork from the last search relates to the text that
/// found it.
pub struct ExplainArtworkUseCase {
    interpreter: Arc<Interpreter>,
    result_cache: Arc<dyn ResultCache>,
}

impl ExplainArtworkUseCase {
    pub fn new(interpreter: Arc<Interpreter>, result_cache: Arc<dyn ResultCache>) -> Self {
        Self {
            interpreter,
            result_cache,
        }
    }

    pub async fn execute(
        &self,
        index: usize,
        timeout: Duration,
    ) -> Result<Explanation, DomainError> {
        let cached = self.result_cache.get_by_index(index).await?;
        info!(
            "Explaining #{index}: {} by {}",
            cached.artwork.title(),
            cached.artwork.artist()
        );

        let text = self
            .interpreter
            .explain_artwork(
                cached.artwork.image_url(),
                &cached.original_query,
                cached.artwork.title(),
                cached.artwork.artist(),
                timeout,
            )
            .await?;

        Ok(Explanation { cached, text })
    }
}
