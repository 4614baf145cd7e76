pub mod cache_controller;
pub mod explain_controller;
pub mod progress;
pub mod search_controller;
pub mod usage_controller;

pub use cache_controller::CacheController;
pub use explain_controller::ExplainController;
pub use search_controller::SearchController;
pub use usage_controller::UsageController;
