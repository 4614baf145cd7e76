use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::UsageStore;
use crate::domain::{DomainError, UsageState};

pub struct InMemoryUsageStore {
    state: Arc<Mutex<Option<UsageState>>>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_state(state: UsageState) -> Self {
        Self {
            state: Arc::new(Mutex::new(Some(state))),
        }
    }
}

impl Default for InMemoryUsageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn load(&self) -> Result<Option<UsageState>, DomainError> {
        Ok(self.state.lock().await.clone())
    }

    async fn save(&self, state: &UsageState) -> Result<(), DomainError> {
        *self.state.lock().await = Some(state.clone());
        Ok(())
    }
}
