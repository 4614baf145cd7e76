use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A single search hit: what the artwork is called, who made it and where
/// its image lives.
///
/// `title` and `artist` are never empty; blank input collapses to the
/// [`UNTITLED`] / [`UNKNOWN_ARTIST`] sentinels. `image_url` is expected to be
/// absolute by the time a gallery source hands the record out (see
/// [`normalize_image_url`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_artist")]
    artist: String,
    image_url: String,
}

fn default_title() -> String {
    UNTITLED.to_string()
}

fn default_artist() -> String {
    UNKNOWN_ARTIST.to_string()
}

impl ArtworkRecord {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            title: or_sentinel(title.into(), UNTITLED),
            artist: or_sentinel(artist.into(), UNKNOWN_ARTIST),
            image_url: image_url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn has_known_artist(&self) -> bool {
        self.artist != UNKNOWN_ARTIST
    }
}

fn or_sentinel(value: String, sentinel: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        sentinel.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolve a possibly relative image reference against a site origin.
///
/// - `//host/path` gets an `https:` scheme
/// - `/path` is joined to `origin`
/// - `http://` and `https://` URLs are returned unchanged
/// - anything else is treated as relative to the origin root
///
/// Returns `None` for empty input and for `data:` URIs, which only ever carry
/// lazy-load placeholders.
pub fn normalize_image_url(raw: &str, origin: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:") {
        return None;
    }

    let origin = origin.trim_end_matches('/');
    let url = if raw.starts_with("//") {
        format!("https:{raw}")
    } else if raw.starts_with('/') {
        format!("{origin}{raw}")
    } else if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{origin}/{raw}")
    };

    Some(url)
}

/// Best-effort artist extraction from a caption such as
/// `"The Sleeping Gypsy by Henri Rousseau, 1897"` or `"Nighthawks - Edward Hopper"`.
///
/// `" by "` (any case) wins over `" - "`. The artist part is cut at the first
/// comma or opening parenthesis. Titles with incidental hyphens will produce a
/// wrong artist; callers treat the result as a hint only.
pub fn artist_from_title(title: &str) -> Option<String> {
    let tail = if let Some(pos) = find_ignore_ascii_case(title, " by ") {
        &title[pos + 4..]
    } else if let Some(pos) = title.find(" - ") {
        &title[pos + 3..]
    } else {
        return None;
    };

    let artist = tail
        .split(',')
        .next()
        .unwrap_or_default()
        .split('(')
        .next()
        .unwrap_or_default()
        .trim();

    if artist.is_empty() {
        None
    } else {
        Some(artist.to_string())
    }
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
