mod interpreter;
mod usage_tracker;

pub use interpreter::*;
pub use usage_tracker::*;
