mod gallery_source;
mod generative_model;
mod image_fetcher;
mod page_scraper;
mod result_cache;
mod usage_store;

pub use gallery_source::*;
pub use generative_model::*;
pub use image_fetcher::*;
pub use page_scraper::*;
pub use result_cache::*;
pub use usage_store::*;
