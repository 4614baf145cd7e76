use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::PageScraper;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.apify.com";
const ACTOR_PATH: &str = "/v2/acts/apify~cheerio-scraper/run-sync-get-dataset-items";

/// Synchronous actor runs can take a while to boot; Apify caps them at 300 s.
const RUN_TIMEOUT: Duration = Duration::from_secs(300);

/// Runs inside the actor; hands the raw page back so extraction happens here.
const PAGE_FUNCTION: &str = "\
async function pageFunction(context) {
    const { $, request, log } = context;
    log.info(`Page title: ${$('title').text()}`);
    return { url: request.url, html: $.html() };
}";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunInput<'a> {
    start_urls: Vec<StartUrl<'a>>,
    page_function: &'a str,
    proxy_configuration: ProxyConfiguration,
    max_requests_per_crawl: u32,
}

#[derive(Serialize)]
struct StartUrl<'a> {
    url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyConfiguration {
    use_apify_proxy: bool,
}

#[derive(Deserialize)]
struct DatasetItem {
    #[serde(default)]
    html: Option<String>,
}

/// [`PageScraper`] backed by the Apify `cheerio-scraper` actor.
///
/// The actor crawls exactly one page through the Apify proxy and returns its
/// HTML as the single dataset item.
pub struct ApifyPageScraper {
    client: reqwest::Client,
    token: String,
    url: String,
}

impl ApifyPageScraper {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(RUN_TIMEOUT)
                .build()
                .unwrap_or_default(),
            token: token.into(),
            url: format!("{}{ACTOR_PATH}", base.trim_end_matches('/')),
        }
    }

    /// Returns `None` when `APIFY_TOKEN` is unset or blank. `APIFY_BASE_URL`
    /// overrides the API host.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("APIFY_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())?;
        let base =
            std::env::var("APIFY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Some(Self::new(token, base))
    }
}

#[async_trait]
impl PageScraper for ApifyPageScraper {
    async fn scrape(&self, url: &str) -> Result<String, DomainError> {
        let input = RunInput {
            start_urls: vec![StartUrl { url }],
            page_function: PAGE_FUNCTION,
            proxy_configuration: ProxyConfiguration {
                use_apify_proxy: true,
            },
            max_requests_per_crawl: 1,
        };

        debug!("Running cheerio-scraper on {url}");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&input)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("Scraping failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("ApifyPageScraper: actor run returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "Scraping failed: Apify returned {status}"
            )));
        }

        let items: Vec<DatasetItem> = response.json().await.map_err(|e| {
            DomainError::upstream(format!("Scraping failed: unreadable dataset: {e}"))
        })?;

        // An empty dataset is a page with nothing on it, not a failure.
        match items.into_iter().find_map(|item| item.html) {
            Some(html) => Ok(html),
            None => {
                debug!("Actor returned no page for {url}");
                Ok(String::new())
            }
        }
    }
}
