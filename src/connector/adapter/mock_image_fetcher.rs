use async_trait::async_trait;

use crate::application::{ImageFetcher, InlineImage};
use crate::domain::DomainError;

/// PNG signature followed by an empty IHDR-sized payload; enough to look
/// like an image to anything that sniffs magic bytes.
const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Returns the same tiny image for every URL, or fails every fetch.
pub struct MockImageFetcher {
    fail: bool,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for MockImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn fetch(&self, url: &str) -> Result<InlineImage, DomainError> {
        if self.fail {
            return Err(DomainError::image_fetch(format!("{url}: server returned 404 Not Found")));
        }

        Ok(InlineImage {
            bytes: FAKE_PNG.to_vec(),
            mime_type: "image/png".to_string(),
        })
    }
}
