use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::application::GallerySource;
use crate::domain::{normalize_image_url, ArtworkRecord, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://www.wikiart.org/en/api/2";
const ASSET_BASE: &str = "https://uploads.wikiart.org/images";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct PaintingSearchResponse {
    #[serde(default)]
    data: Option<Vec<Painting>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Painting {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist_name: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    content_id: Option<Value>,
}

impl Painting {
    fn into_record(self) -> Option<ArtworkRecord> {
        let image = self.image.filter(|i| !i.trim().is_empty())?;
        let image_url = resolve_image(&image, self.content_id.as_ref())?;

        Some(ArtworkRecord::new(
            self.title.unwrap_or_default(),
            self.artist_name.unwrap_or_default(),
            image_url,
        ))
    }
}

/// Absolute image references pass through; bare paths live under the asset
/// host in a directory named after the painting's content id.
fn resolve_image(image: &str, content_id: Option<&Value>) -> Option<String> {
    let image = image.trim();
    if image.starts_with("http") || image.starts_with("//") {
        return normalize_image_url(image, ASSET_BASE);
    }

    let content_id = match content_id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Some(format!(
        "{ASSET_BASE}/{content_id}/{}",
        image.trim_start_matches('/')
    ))
}

/// WikiArt's painting search API: a single call returning structured records.
pub struct WikiArtSource {
    client: reqwest::Client,
    base_url: String,
}

impl WikiArtSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for WikiArtSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl GallerySource for WikiArtSource {
    async fn search(
        &self,
        keywords: &str,
        max_results: usize,
    ) -> Result<Vec<ArtworkRecord>, DomainError> {
        if max_results == 0 {
            return Ok(vec![]);
        }

        let response = self
            .client
            .get(format!("{}/PaintingSearch", self.base_url))
            .query(&[("term", keywords), ("imageFormat", "Large")])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DomainError::upstream(format!("WikiArt API request failed: {e}")))?;

        let search: PaintingSearchResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream(format!("WikiArt API error: {e}")))?;

        let results: Vec<ArtworkRecord> = search
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(Painting::into_record)
            .take(max_results)
            .collect();

        info!("WikiArt returned {} paintings", results.len());
        Ok(results)
    }

    fn name(&self) -> &str {
        "wikiart"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_images_resolve_under_content_id() {
        let painting: Painting = serde_json::from_str(
            r#"{"title": "The Scream", "artistName": "Edvard Munch",
                "image": "the-scream.jpg", "contentId": 207998}"#,
        )
        .unwrap();

        let record = painting.into_record().unwrap();
        assert_eq!(
            record.image_url(),
            "https://uploads.wikiart.org/images/207998/the-scream.jpg"
        );
        assert_eq!(record.artist(), "Edvard Munch");
    }

    #[test]
    fn absolute_images_pass_through() {
        assert_eq!(
            resolve_image("https://uploads7.wikiart.org/x.jpg!Large.jpg", None).as_deref(),
            Some("https://uploads7.wikiart.org/x.jpg!Large.jpg")
        );
        assert_eq!(
            resolve_image("//uploads.wikiart.org/y.jpg", None).as_deref(),
            Some("https://uploads.wikiart.org/y.jpg")
        );
    }

    #[test]
    fn paintings_without_image_are_dropped() {
        let painting: Painting = serde_json::from_str(r#"{"title": "Lost"}"#).unwrap();
        assert!(painting.into_record().is_none());
    }
}
