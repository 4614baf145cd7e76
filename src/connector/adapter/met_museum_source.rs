use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::application::GallerySource;
use crate::domain::{normalize_image_url, ArtworkRecord, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://collectionapi.metmuseum.org/public/collection/v1";
const IMAGE_ORIGIN: &str = "https://images.metmuseum.org";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const OBJECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Some objects lack an image or fail to load, so ask for more ids than needed.
const OVERFETCH_FACTOR: usize = 2;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default, rename = "objectIDs")]
    object_ids: Option<Vec<u64>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetObject {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist_display_name: Option<String>,
    #[serde(default)]
    primary_image: Option<String>,
    #[serde(default)]
    primary_image_small: Option<String>,
}

impl MetObject {
    /// `None` when the object has no usable image.
    fn into_record(self) -> Option<ArtworkRecord> {
        let image = [self.primary_image, self.primary_image_small]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())?;
        let image_url = normalize_image_url(&image, IMAGE_ORIGIN)?;

        Some(ArtworkRecord::new(
            self.title.unwrap_or_default(),
            self.artist_display_name.unwrap_or_default(),
            image_url,
        ))
    }
}

/// The Metropolitan Museum of Art collection API.
///
/// Searching is two-phase: one request for matching object ids restricted to
/// objects with images, then one request per object until `max_results`
/// records are collected. Objects that fail to load or have no image are
/// skipped.
pub struct MetMuseumSource {
    client: reqwest::Client,
    base_url: String,
}

impl MetMuseumSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    async fn search_ids(&self, keywords: &str) -> Result<Vec<u64>, DomainError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", keywords), ("hasImages", "true")])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DomainError::upstream(format!("Met Museum API request failed: {e}")))?;

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream(format!("Met Museum API error: {e}")))?;

        Ok(search.object_ids.unwrap_or_default())
    }

    async fn fetch_object(&self, object_id: u64) -> Result<MetObject, reqwest::Error> {
        self.client
            .get(format!("{}/objects/{object_id}", self.base_url))
            .timeout(OBJECT_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

impl Default for MetMuseumSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl GallerySource for MetMuseumSource {
    async fn search(
        &self,
        keywords: &str,
        max_results: usize,
    ) -> Result<Vec<ArtworkRecord>, DomainError> {
        if max_results == 0 {
            return Ok(vec![]);
        }

        let ids = self.search_ids(keywords).await?;
        info!("Met search returned {} object ids", ids.len());

        let mut results = Vec::with_capacity(max_results);
        for object_id in ids
            .into_iter()
            .take(max_results.saturating_mul(OVERFETCH_FACTOR))
        {
            if results.len() >= max_results {
                break;
            }

            match self.fetch_object(object_id).await {
                Ok(object) => match object.into_record() {
                    Some(record) => results.push(record),
                    None => debug!("Skipping Met object {object_id}: no image"),
                },
                Err(e) => debug!("Skipping Met object {object_id}: {e}"),
            }
        }

        Ok(results)
    }

    fn name(&self) -> &str {
        "met"
    }
}
