use async_trait::async_trait;

use crate::domain::{ArtworkRecord, CacheEntry, CachedArtwork, DomainError};

/// Single-slot store for the most recent search.
///
/// Implementors provide raw persistence; the lookup helpers are shared.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Replace whatever is stored with `entry`.
    async fn store(&self, entry: &CacheEntry) -> Result<(), DomainError>;

    /// The stored entry, or `None` when nothing usable has been saved.
    async fn load(&self) -> Result<Option<CacheEntry>, DomainError>;

    /// Remove the stored entry. Returns whether one existed.
    async fn clear(&self) -> Result<bool, DomainError>;

    /// Stamp a new entry with the current time and store it.
    async fn save(
        &self,
        original_query: &str,
        keywords: &str,
        artworks: &[ArtworkRecord],
        source: &str,
    ) -> Result<(), DomainError> {
        let entry = CacheEntry::new(original_query, keywords, source, artworks.to_vec());
        self.store(&entry).await
    }

    /// Fetch one artwork of the last search by its 1-based display index.
    async fn get_by_index(&self, index: usize) -> Result<CachedArtwork, DomainError> {
        let entry = self.load().await?.ok_or_else(|| {
            DomainError::not_found("No previous search found. Run 'muse search' first.")
        })?;

        let artwork = entry.artwork_at(index).cloned().ok_or_else(|| {
            DomainError::not_found(format!(
                "Invalid index {index}. Last search had {} results.",
                entry.len()
            ))
        })?;

        Ok(CachedArtwork {
            artwork,
            original_query: entry.original_query().to_string(),
            keywords: entry.keywords().to_string(),
            source: entry.source().to_string(),
        })
    }
}
