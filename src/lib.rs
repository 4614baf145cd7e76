pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    ExplainArtworkUseCase, Explanation, GallerySource, GenerationRequest, GenerativeModel,
    ImageFetcher, InlineImage, Interpreter, PageScraper, ResultCache, SamplingParams,
    SearchArtworkUseCase, SearchOutcome, UsageStore, UsageTracker,
};

pub use connector::{
    ApifyPageScraper, Container, ContainerConfig, ContainerParts, ExtractionRules,
    GeminiClient, HtmlArtworkExtractor, HttpImageFetcher, InMemoryResultCache,
    InMemoryUsageStore, JsonFileResultCache, JsonFileUsageStore, MetMuseumSource,
    MockGallerySource, MockGenerativeModel, MockImageFetcher, Router, ScrapedGallerySource,
    WikiArtSource,
};

pub use domain::{
    ArtworkRecord, CacheEntry, CachedArtwork, DomainError, FreeTierLimits, GalleryKind,
    UsageState, UsageStats, FREE_TIER_LIMITS,
};
