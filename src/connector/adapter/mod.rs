mod apify_page_scraper;
mod gemini_client;
mod html_artwork_extractor;
mod http_image_fetcher;
mod in_memory_result_cache;
mod in_memory_usage_store;
mod json_result_cache;
mod json_usage_store;
mod met_museum_source;
mod mock_gallery_source;
mod mock_generative_model;
mod mock_image_fetcher;
mod scraped_gallery_source;
mod wikiart_source;

pub use apify_page_scraper::*;
pub use gemini_client::*;
pub use html_artwork_extractor::*;
pub use http_image_fetcher::*;
pub use in_memory_result_cache::*;
pub use in_memory_usage_store::*;
pub use json_result_cache::*;
pub use json_usage_store::*;
pub use met_museum_source::*;
pub use mock_gallery_source::*;
pub use mock_generative_model::*;
pub use mock_image_fetcher::*;
pub use scraped_gallery_source::*;
pub use wikiart_source::*;
