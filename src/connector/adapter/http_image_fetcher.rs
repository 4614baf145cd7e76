use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::application::{ImageFetcher, InlineImage};
use crate::domain::DomainError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("muse-cli/", env!("CARGO_PKG_VERSION"));

/// Downloads images over HTTP(S).
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<InlineImage, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::image_fetch(format!("{url}: {e}")))?;

        if !response.status().is_success() {
            return Err(DomainError::image_fetch(format!(
                "{url}: server returned {}",
                response.status()
            )));
        }

        let header_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_lowercase());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::image_fetch(format!("{url}: {e}")))?
            .to_vec();

        if bytes.is_empty() {
            return Err(DomainError::image_fetch(format!("{url}: empty response body")));
        }

        let mime_type = header_mime
            .filter(|m| m.starts_with("image/"))
            .or_else(|| detect_image_mime(&bytes).map(str::to_string))
            .ok_or_else(|| DomainError::image_fetch(format!("{url}: response is not an image")))?;

        Ok(InlineImage { bytes, mime_type })
    }
}

/// Identify common image formats from their magic bytes.
pub fn detect_image_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if data.starts_with(b"GIF8") {
        Some("image/gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
