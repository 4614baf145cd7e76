use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::ResultCache;
use crate::domain::{CacheEntry, DomainError};

pub const RESULT_CACHE_FILE: &str = "last_search.json";

/// [`ResultCache`] kept as a single pretty-printed JSON file.
///
/// A file that is valid JSON but lacks required fields reads as "no cache";
/// a file that is not JSON at all is reported as an error.
pub struct JsonFileResultCache {
    path: PathBuf,
}

impl JsonFileResultCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(RESULT_CACHE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultCache for JsonFileResultCache {
    async fn store(&self, entry: &CacheEntry) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::upstream(format!("Failed to save search results: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(entry)
            .map_err(|e| DomainError::upstream(format!("Failed to save search results: {e}")))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| DomainError::upstream(format!("Failed to save search results: {e}")))?;

        debug!(
            "Cached {} artworks at {}",
            entry.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<CacheEntry>, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::upstream(format!(
                    "Failed to load search results: {e}"
                )))
            }
        };

        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| DomainError::upstream(format!("Failed to load search results: {e}")))?;

        match serde_json::from_value::<CacheEntry>(value) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!("Ignoring incomplete search cache {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<bool, DomainError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::upstream(format!(
                "Failed to clear search cache: {e}"
            ))),
        }
    }
}
