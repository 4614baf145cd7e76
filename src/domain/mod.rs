//! # Domain Layer
//!
//! Artwork records, the cached search entry, usage counters and the error
//! taxonomy shared by every other layer. Nothing here performs I/O.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
