use anyhow::Result;

use crate::application::ResultCache;

use super::super::Container;

pub struct CacheController<'a> {
    container: &'a Container,
}

impl<'a> CacheController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn clear(&self) -> Result<String> {
        let removed = self.container.result_cache().clear().await?;

        Ok(if removed {
            "✓ Cleared the cached search.".to_string()
        } else {
            "No cached search to clear.".to_string()
        })
    }
}
