use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// The art providers a search can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryKind {
    /// Meisterdrucke search page, scraped through Apify.
    Meisterdrucke,
    /// Metropolitan Museum of Art collection API.
    Met,
    /// WikiArt painting search API.
    WikiArt,
}

impl GalleryKind {
    pub const ALL: [GalleryKind; 3] = [Self::Meisterdrucke, Self::Met, Self::WikiArt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meisterdrucke => "meisterdrucke",
            Self::Met => "met",
            Self::WikiArt => "wikiart",
        }
    }

    /// Human-readable provider name for progress messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Meisterdrucke => "Meisterdrucke",
            Self::Met => "The Met",
            Self::WikiArt => "WikiArt",
        }
    }

    /// Environment variable the provider cannot run without, if any.
    pub fn required_credential(&self) -> Option<&'static str> {
        match self {
            Self::Meisterdrucke => Some("APIFY_TOKEN"),
            Self::Met | Self::WikiArt => None,
        }
    }

    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for GalleryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GalleryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "meisterdrucke" | "gallery-a" => Ok(Self::Meisterdrucke),
            "met" | "museum-api" => Ok(Self::Met),
            "wikiart" | "art-db-api" => Ok(Self::WikiArt),
            other => Err(DomainError::configuration(format!(
                "Invalid source: {other}. Choose from: {}",
                Self::valid_names()
            ))),
        }
    }
}
