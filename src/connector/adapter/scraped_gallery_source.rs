use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::{GallerySource, PageScraper};
use crate::domain::{ArtworkRecord, DomainError};

use super::{ExtractionRules, HtmlArtworkExtractor};

pub const MEISTERDRUCKE_ORIGIN: &str = "https://www.meisterdrucke.ie";

/// A gallery website searched by scraping its results page.
///
/// The page is fetched through a [`PageScraper`] and mined with an
/// [`HtmlArtworkExtractor`]. Only transport and configuration problems
/// surface as errors; an unrecognised page simply yields fewer records.
pub struct ScrapedGallerySource {
    name: String,
    origin: String,
    scraper: Arc<dyn PageScraper>,
    extractor: HtmlArtworkExtractor,
}

impl ScrapedGallerySource {
    pub fn new(
        name: impl Into<String>,
        origin: impl Into<String>,
        scraper: Arc<dyn PageScraper>,
        rules: ExtractionRules,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: name.into(),
            origin: origin.into().trim_end_matches('/').to_string(),
            scraper,
            extractor: HtmlArtworkExtractor::new(rules)?,
        })
    }

    pub fn meisterdrucke(scraper: Arc<dyn PageScraper>) -> Result<Self, DomainError> {
        Self::new(
            "meisterdrucke",
            MEISTERDRUCKE_ORIGIN,
            scraper,
            ExtractionRules::default(),
        )
    }

    /// `/suche/<keywords>.html` with words joined by `+`.
    pub fn search_url(&self, keywords: &str) -> String {
        let encoded = keywords
            .split_whitespace()
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join("+");
        format!("{}/suche/{encoded}.html", self.origin)
    }
}

#[async_trait]
impl GallerySource for ScrapedGallerySource {
    async fn search(
        &self,
        keywords: &str,
        max_results: usize,
    ) -> Result<Vec<ArtworkRecord>, DomainError> {
        if max_results == 0 {
            return Ok(vec![]);
        }

        let url = self.search_url(keywords);
        let html = self.scraper.scrape(&url).await?;

        let mut records = self.extractor.extract(&html, &self.origin);
        info!("Extracted {} artworks from {url}", records.len());
        records.truncate(max_results);

        Ok(records)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPage(&'static str);

    #[async_trait]
    impl PageScraper for FixedPage {
        async fn scrape(&self, _url: &str) -> Result<String, DomainError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingScraper;

    #[async_trait]
    impl PageScraper for FailingScraper {
        async fn scrape(&self, _url: &str) -> Result<String, DomainError> {
            Err(DomainError::upstream("Scraping failed: 502"))
        }
    }

    const PAGE: &str = r#"<html><body>
        <div class="grid">
          <img src="/a.jpg" alt="Melancholia by Albrecht Dürer">
          <img src="/b.jpg" alt="The Thinker">
          <img src="/c.jpg" alt="Solitude">
        </div>
    </body></html>"#;

    #[test]
    fn search_url_joins_encoded_words_with_plus() {
        let source = ScrapedGallerySource::meisterdrucke(Arc::new(FixedPage(""))).unwrap();

        assert_eq!(
            source.search_url("heavy  figure café"),
            "https://www.meisterdrucke.ie/suche/heavy+figure+caf%C3%A9.html"
        );
    }

    #[tokio::test]
    async fn search_respects_max_results() {
        let source = ScrapedGallerySource::meisterdrucke(Arc::new(FixedPage(PAGE))).unwrap();

        for max in 0..5 {
            let records = source.search("melancholy", max).await.unwrap();
            assert!(records.len() <= max);
        }

        let records = source.search("melancholy", 2).await.unwrap();
        assert_eq!(records[0].artist(), "Albrecht Dürer");
        assert_eq!(records[1].title(), "The Thinker");
    }

    #[tokio::test]
    async fn scraper_failures_propagate() {
        let source = ScrapedGallerySource::meisterdrucke(Arc::new(FailingScraper)).unwrap();

        let err = source.search("anything", 5).await.unwrap_err();
        assert!(err.is_upstream());
    }
}
