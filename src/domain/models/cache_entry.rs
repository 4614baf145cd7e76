use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::ArtworkRecord;

const UNKNOWN_SOURCE: &str = "unknown";

/// The most recent search, persisted so a later `explain` invocation can
/// refer to its results by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(deserialize_with = "deserialize_timestamp")]
    timestamp: DateTime<Utc>,
    original_query: String,
    keywords: String,
    #[serde(default = "unknown_source")]
    source: String,
    artworks: Vec<ArtworkRecord>,
}

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

/// RFC 3339, or an ISO timestamp without offset read as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let naive: NaiveDateTime = raw.parse().ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}

impl CacheEntry {
    pub fn new(
        original_query: impl Into<String>,
        keywords: impl Into<String>,
        source: impl Into<String>,
        artworks: Vec<ArtworkRecord>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            original_query: original_query.into(),
            keywords: keywords.into(),
            source: source.into(),
            artworks,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn original_query(&self) -> &str {
        &self.original_query
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn artworks(&self) -> &[ArtworkRecord] {
        &self.artworks
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    /// Look up an artwork by its 1-based display position.
    pub fn artwork_at(&self, index: usize) -> Option<&ArtworkRecord> {
        index.checked_sub(1).and_then(|i| self.artworks.get(i))
    }
}

/// One artwork pulled back out of the cache together with the search that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedArtwork {
    pub artwork: ArtworkRecord,
    pub original_query: String,
    pub keywords: String,
    pub source: String,
}
