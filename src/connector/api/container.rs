use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    ExplainArtworkUseCase, GallerySource, GenerativeModel, ImageFetcher, Interpreter,
    ResultCache, SearchArtworkUseCase, UsageStore, UsageTracker,
};
use crate::connector::adapter::{
    ApifyPageScraper, GeminiClient, HttpImageFetcher, JsonFileResultCache, JsonFileUsageStore,
    MetMuseumSource, MockGallerySource, MockGenerativeModel, MockImageFetcher,
    ScrapedGallerySource, WikiArtSource,
};
use crate::domain::{DomainError, GalleryKind};

pub struct ContainerConfig {
    pub data_dir: String,
    /// Wire deterministic in-process fakes instead of the model, the image
    /// host and the gallery providers. State files are still real.
    pub mock_services: bool,
}

/// Everything the container hands out, for callers that build their own.
pub struct ContainerParts {
    /// `None` when no model credential is configured.
    pub model: Option<Arc<dyn GenerativeModel>>,
    pub image_fetcher: Arc<dyn ImageFetcher>,
    pub result_cache: Arc<dyn ResultCache>,
    pub usage_store: Arc<dyn UsageStore>,
    /// Providers that are ready to use. A kind missing here needs a
    /// credential that was not supplied.
    pub gallery_sources: Vec<(GalleryKind, Arc<dyn GallerySource>)>,
}

pub struct Container {
    interpreter: Arc<Interpreter>,
    result_cache: Arc<dyn ResultCache>,
    usage_tracker: Arc<UsageTracker>,
    gallery_sources: HashMap<GalleryKind, Arc<dyn GallerySource>>,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let data_dir = PathBuf::from(&config.data_dir);

        let result_cache: Arc<dyn ResultCache> = Arc::new(JsonFileResultCache::in_dir(&data_dir));
        let usage_store: Arc<dyn UsageStore> = Arc::new(JsonFileUsageStore::in_dir(&data_dir));

        let parts = if config.mock_services {
            debug!("Using mock model, image fetcher and gallery sources");
            let model: Arc<dyn GenerativeModel> = Arc::new(MockGenerativeModel::new());
            ContainerParts {
                model: Some(model),
                image_fetcher: Arc::new(MockImageFetcher::new()),
                result_cache,
                usage_store,
                gallery_sources: GalleryKind::ALL
                    .iter()
                    .map(|kind| {
                        let source: Arc<dyn GallerySource> =
                            Arc::new(MockGallerySource::sample(kind.as_str()));
                        (*kind, source)
                    })
                    .collect(),
            }
        } else {
            let model: Option<Arc<dyn GenerativeModel>> = match GeminiClient::from_env() {
                Some(client) => {
                    debug!("Using Gemini model {}", client.model_name());
                    let client: Arc<dyn GenerativeModel> = Arc::new(client);
                    Some(client)
                }
                None => {
                    debug!("GEMINI_API_KEY not set; model calls will be refused");
                    None
                }
            };

            let met: Arc<dyn GallerySource> = Arc::new(MetMuseumSource::default());
            let wikiart: Arc<dyn GallerySource> = Arc::new(WikiArtSource::default());
            let mut gallery_sources = vec![(GalleryKind::Met, met), (GalleryKind::WikiArt, wikiart)];

            match ApifyPageScraper::from_env() {
                Some(scraper) => {
                    let meisterdrucke: Arc<dyn GallerySource> =
                        Arc::new(ScrapedGallerySource::meisterdrucke(Arc::new(scraper))?);
                    gallery_sources.push((GalleryKind::Meisterdrucke, meisterdrucke));
                }
                None => debug!("APIFY_TOKEN not set; the meisterdrucke source is unavailable"),
            }

            ContainerParts {
                model,
                image_fetcher: Arc::new(HttpImageFetcher::new()),
                result_cache,
                usage_store,
                gallery_sources,
            }
        };

        Ok(Self::from_parts(parts))
    }

    pub fn from_parts(parts: ContainerParts) -> Self {
        let usage_tracker = Arc::new(UsageTracker::new(parts.usage_store));
        let interpreter = Arc::new(Interpreter::new(
            parts.model,
            parts.image_fetcher,
            usage_tracker.clone(),
        ));

        Self {
            interpreter,
            result_cache: parts.result_cache,
            usage_tracker,
            gallery_sources: parts.gallery_sources.into_iter().collect(),
        }
    }

    pub fn search_use_case(&self) -> SearchArtworkUseCase {
        SearchArtworkUseCase::new(self.interpreter.clone(), self.result_cache.clone())
    }

    pub fn explain_use_case(&self) -> ExplainArtworkUseCase {
        ExplainArtworkUseCase::new(self.interpreter.clone(), self.result_cache.clone())
    }

    /// Resolve a source name to a ready provider.
    ///
    /// Unknown names and providers missing their credential are both
    /// configuration errors; neither touches the network.
    pub fn gallery_source(&self, name: &str) -> Result<Arc<dyn GallerySource>, DomainError> {
        let kind: GalleryKind = name.parse()?;

        self.gallery_sources.get(&kind).cloned().ok_or_else(|| {
            let credential = kind.required_credential().unwrap_or("a credential");
            DomainError::configuration(format!(
                "{credential} environment variable not set (required for the {kind} source)"
            ))
        })
    }

    pub fn usage_tracker(&self) -> Arc<UsageTracker> {
        self.usage_tracker.clone()
    }

    pub fn result_cache(&self) -> Arc<dyn ResultCache> {
        self.result_cache.clone()
    }
}
