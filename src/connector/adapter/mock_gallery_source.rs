use async_trait::async_trait;

use crate::application::GallerySource;
use crate::domain::{ArtworkRecord, DomainError};

/// A gallery that always answers with the same records.
pub struct MockGallerySource {
    name: String,
    artworks: Vec<ArtworkRecord>,
}

impl MockGallerySource {
    pub fn new(name: impl Into<String>, artworks: Vec<ArtworkRecord>) -> Self {
        Self {
            name: name.into(),
            artworks,
        }
    }

    /// A small fixed collection for offline runs.
    pub fn sample(name: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![
                ArtworkRecord::new(
                    "The Philosopher in Meditation",
                    "Rembrandt van Rijn",
                    "https://images.example.org/philosopher-in-meditation.jpg",
                ),
                ArtworkRecord::new(
                    "Wanderer above the Sea of Fog",
                    "Caspar David Friedrich",
                    "https://images.example.org/wanderer.jpg",
                ),
                ArtworkRecord::new(
                    "Melencolia I",
                    "Albrecht Dürer",
                    "https://images.example.org/melencolia.jpg",
                ),
            ],
        )
    }
}

#[async_trait]
impl GallerySource for MockGallerySource {
    async fn search(
        &self,
        _keywords: &str,
        max_results: usize,
    ) -> Result<Vec<ArtworkRecord>, DomainError> {
        Ok(self.artworks.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
