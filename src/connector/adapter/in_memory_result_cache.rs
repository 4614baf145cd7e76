use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ResultCache;
use crate::domain::{CacheEntry, DomainError};

/// Process-local [`ResultCache`], used with mock services and in tests.
pub struct InMemoryResultCache {
    entry: Arc<Mutex<Option<CacheEntry>>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self {
            entry: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn store(&self, entry: &CacheEntry) -> Result<(), DomainError> {
        *self.entry.lock().await = Some(entry.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.entry.lock().await.clone())
    }

    async fn clear(&self) -> Result<bool, DomainError> {
        Ok(self.entry.lock().await.take().is_some())
    }
}
