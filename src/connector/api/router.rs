use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{CacheController, ExplainController, SearchController, UsageController};

const TAGLINE: &str = "Find the art that says what words cannot.";

pub struct Router<'a> {
    search_controller: SearchController<'a>,
    explain_controller: ExplainController<'a>,
    usage_controller: UsageController<'a>,
    cache_controller: CacheController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            search_controller: SearchController::new(container),
            explain_controller: ExplainController::new(container),
            usage_controller: UsageController::new(container),
            cache_controller: CacheController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Search {
                quote,
                max,
                timeout,
                source,
            } => {
                self.search_controller
                    .search(quote, max, timeout, source)
                    .await
            }
            Commands::Explain { index, timeout } => {
                self.explain_controller.explain(index, timeout).await
            }
            Commands::Usage { reset } => self.usage_controller.usage(reset).await,
            Commands::Clear => self.cache_controller.clear().await,
            Commands::Version => Ok(format!(
                "Muse CLI v{}\n{TAGLINE}",
                env!("CARGO_PKG_VERSION")
            )),
        }
    }
}
