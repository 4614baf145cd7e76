mod artwork;
mod cache_entry;
mod gallery;
mod usage;

pub use artwork::*;
pub use cache_entry::*;
pub use gallery::*;
pub use usage::*;
