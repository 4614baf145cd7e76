mod explain_artwork;
mod search_artwork;

pub use explain_artwork::*;
pub use search_artwork::*;
