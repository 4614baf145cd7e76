use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::application::{GallerySource, Interpreter, ResultCache};
use crate::domain::{ArtworkRecord, DomainError};

/// What a search produced: the generated keywords and the artwork found
/// with them.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub keywords: String,
    pub source: String,
    pub artworks: Vec<ArtworkRecord>,
}

/// Free text → keywords → gallery search → cached result list.
pub struct SearchArtworkUseCase {
    interpreter: Arc<Interpreter>,
    result_cache: Arc<dyn ResultCache>,
}

impl SearchArtworkUseCase {
    pub fn new(interpreter: Arc<Interpreter>, result_cache: Arc<dyn ResultCache>) -> Self {
        Self {
            interpreter,
            result_cache,
        }
    }

    pub async fn execute(
        &self,
        quote: &str,
        source: Arc<dyn GallerySource>,
        max_results: usize,
        timeout: Duration,
    ) -> Result<SearchOutcome, DomainError> {
        let start_time = Instant::now();

        let keywords = self.interpreter.generate_keywords(quote, timeout).await?;
        info!("Searching {} for: {}", source.name(), keywords);

        let mut artworks = source.search(&keywords, max_results).await?;
        artworks.truncate(max_results);

        self.result_cache
            .save(quote, &keywords, &artworks, source.name())
            .await?;

        info!(
            "Found {} artworks in {:.2}s",
            artworks.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(SearchOutcome {
            keywords,
            source: source.name().to_string(),
            artworks,
        })
    }
}
