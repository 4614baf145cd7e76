use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use crate::application::UsageStore;
use crate::domain::{DomainError, UsageState};

pub const USAGE_FILE: &str = "usage.json";

/// [`UsageStore`] kept as a pretty-printed JSON file. Unreadable contents are
/// treated as a fresh start.
pub struct JsonFileUsageStore {
    path: PathBuf,
}

impl JsonFileUsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(USAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UsageStore for JsonFileUsageStore {
    async fn load(&self) -> Result<Option<UsageState>, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::upstream(format!(
                    "Failed to read usage data: {e}"
                )))
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!("Discarding unreadable usage data {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    async fn save(&self, state: &UsageState) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::upstream(format!("Failed to save usage data: {e}")))?;
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| DomainError::upstream(format!("Failed to save usage data: {e}")))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| DomainError::upstream(format!("Failed to save usage data: {e}")))
    }
}
