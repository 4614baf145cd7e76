//! # Connector Layer
//!
//! Concrete adapters behind the application interfaces:
//! - Gemini for keywords and image explanations
//! - The Met, WikiArt and an Apify-scraped Meisterdrucke page as galleries
//! - JSON files for the result cache and usage counters
//!
//! plus the CLI-facing container, router and controllers.

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
