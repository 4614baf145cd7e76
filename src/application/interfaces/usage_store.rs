use async_trait::async_trait;

use crate::domain::{DomainError, UsageState};

/// Durable home of the usage counters.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// The persisted state, or `None` if nothing readable has been saved yet.
    async fn load(&self) -> Result<Option<UsageState>, DomainError>;

    async fn save(&self, state: &UsageState) -> Result<(), DomainError>;
}
