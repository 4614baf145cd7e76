use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::{artist_from_title, normalize_image_url, ArtworkRecord, DomainError, UNTITLED};

/// Knobs for pulling artwork out of a gallery search-results page.
///
/// The defaults are tuned for Meisterdrucke but nothing in here is specific
/// to one site.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    /// Tried in order; matches from every selector are pooled, earlier
    /// selectors first. If none match, every `img` on the page is a candidate.
    pub candidate_selectors: Vec<String>,
    /// Image URL attributes in priority order (lazy-load attributes first).
    pub url_attributes: Vec<String>,
    /// Substrings of an image URL that mark it as a placeholder or UI asset.
    pub placeholder_markers: Vec<String>,
    /// Images declaring a width or height below this many pixels are dropped.
    pub min_dimension: u32,
    /// Words or phrases in alt text that mark an image as site furniture.
    pub alt_denylist: Vec<String>,
    /// Ancestor tags whose content is never artwork.
    pub excluded_tags: Vec<String>,
    /// Class or id words marking navigational regions.
    pub excluded_region_markers: Vec<String>,
    /// Looked up inside the nearest `div`, `li` or `article` around an image.
    pub artist_selector: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            candidate_selectors: strings(&[
                r#"a[href*="/kunstwerke/"] img"#,
                r#"a[href*="/fine-art-prints/"] img"#,
                "div.product-item img",
                "div.item img",
                r#"div[class*="product"] img"#,
                r#"div[class*="result"] img"#,
                "article img",
                "li.product img",
                ".grid img",
                ".gallery img",
            ]),
            url_attributes: strings(&["data-src", "data-lazy-src", "data-original", "src"]),
            placeholder_markers: strings(&[
                "placeholder",
                "loading",
                "blank.",
                "logo",
                "icon",
                "sprite",
            ]),
            min_dimension: 100,
            alt_denylist: strings(&[
                "logo",
                "icon",
                "menu",
                "arrow",
                "flag",
                "banner",
                "newsletter",
                "cart",
                "basket",
                "shipping",
                "delivery",
                "payment",
                "paypal",
                "visa",
                "mastercard",
                "klarna",
                "trustpilot",
                "trusted shops",
                "review",
                "reviews",
                "rating",
            ]),
            excluded_tags: strings(&["nav", "header", "footer", "aside"]),
            excluded_region_markers: strings(&[
                "nav",
                "navbar",
                "navigation",
                "menu",
                "sidebar",
                "footer",
                "header",
                "breadcrumb",
                "breadcrumbs",
            ]),
            artist_selector: r#".artist, .artist-name, [class*="artist"]"#.to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Heuristic image extraction over a parsed search-results page.
///
/// The output is lossy by nature: markup changes silently degrade it, they
/// never turn into errors.
pub struct HtmlArtworkExtractor {
    rules: ExtractionRules,
    candidates: Vec<Selector>,
    fallback: Selector,
    link: Selector,
    artist: Selector,
}

impl HtmlArtworkExtractor {
    pub fn new(rules: ExtractionRules) -> Result<Self, DomainError> {
        let candidates = rules
            .candidate_selectors
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;
        let artist = parse_selector(&rules.artist_selector)?;

        Ok(Self {
            candidates,
            fallback: parse_selector("img")?,
            link: parse_selector("a")?,
            artist,
            rules,
        })
    }

    /// Extract artwork records from `html`, resolving relative image URLs
    /// against `origin`. Records are unique by image URL and keep the order
    /// in which their images were first seen.
    pub fn extract(&self, html: &str, origin: &str) -> Vec<ArtworkRecord> {
        let document = Html::parse_document(html);

        let mut seen_nodes = HashSet::new();
        let mut candidates: Vec<ElementRef> = Vec::new();
        for selector in &self.candidates {
            for element in document.select(selector) {
                if seen_nodes.insert(element.id()) {
                    candidates.push(element);
                }
            }
        }

        if candidates.is_empty() {
            debug!("No candidate selector matched, falling back to every image");
            candidates = document.select(&self.fallback).collect();
        }
        debug!("{} candidate images", candidates.len());

        let mut seen_urls = HashSet::new();
        candidates
            .into_iter()
            .filter_map(|img| self.to_record(img, origin))
            .filter(|record| seen_urls.insert(record.image_url().to_string()))
            .collect()
    }

    fn to_record(&self, img: ElementRef, origin: &str) -> Option<ArtworkRecord> {
        let element = img.value();

        let raw_url = self
            .rules
            .url_attributes
            .iter()
            .filter_map(|attr| element.attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())?;

        let lowered = raw_url.to_lowercase();
        if self
            .rules
            .placeholder_markers
            .iter()
            .any(|marker| lowered.contains(marker.as_str()))
        {
            return None;
        }

        if self.is_too_small(img) || self.in_excluded_region(img) {
            return None;
        }

        let image_url = normalize_image_url(raw_url, origin)?;

        let alt = element.attr("alt").unwrap_or_default();
        if contains_term(alt, &self.rules.alt_denylist) {
            return None;
        }

        let title = self.title_for(img);
        let artist = self
            .artist_near(img)
            .or_else(|| artist_from_title(&title))
            .unwrap_or_default();

        Some(ArtworkRecord::new(title, artist, image_url))
    }

    fn is_too_small(&self, img: ElementRef) -> bool {
        let element = img.value();
        let style = element.attr("style").unwrap_or_default();

        let width = element
            .attr("width")
            .and_then(parse_dimension)
            .or_else(|| style_dimension(style, "width"));
        let height = element
            .attr("height")
            .and_then(parse_dimension)
            .or_else(|| style_dimension(style, "height"));

        let min = self.rules.min_dimension;
        [width, height]
            .into_iter()
            .flatten()
            .any(|px| px > 0 && px < min)
    }

    fn in_excluded_region(&self, img: ElementRef) -> bool {
        img.ancestors().filter_map(ElementRef::wrap).any(|ancestor| {
            let element = ancestor.value();
            if self
                .rules
                .excluded_tags
                .iter()
                .any(|tag| tag.eq_ignore_ascii_case(element.name()))
            {
                return true;
            }

            let labels = element
                .classes()
                .chain(element.id())
                .collect::<Vec<_>>()
                .join(" ");
            contains_term(&labels, &self.rules.excluded_region_markers)
        })
    }

    fn title_for(&self, img: ElementRef) -> String {
        let element = img.value();
        let link_title = img
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| self.link.matches(a))
            .and_then(|a| a.value().attr("title"));

        let title = [element.attr("alt"), element.attr("title"), link_title]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .unwrap_or_default();

        if title.chars().count() < 2 {
            UNTITLED.to_string()
        } else {
            title.to_string()
        }
    }

    fn artist_near(&self, img: ElementRef) -> Option<String> {
        let container = img
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|e| matches!(e.value().name(), "div" | "li" | "article"))?;

        container
            .select(&self.artist)
            .next()
            .map(|e| e.text().collect::<Vec<_>>().join(" "))
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|text| !text.is_empty())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DomainError> {
    Selector::parse(selector)
        .map_err(|e| DomainError::configuration(format!("Invalid selector {selector:?}: {e}")))
}

/// Leading integer of a length such as `"120"`, `"120px"` or `"120.5"`.
fn parse_dimension(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn style_dimension(style: &str, property: &str) -> Option<u32> {
    style.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        if name.trim().eq_ignore_ascii_case(property) {
            parse_dimension(value)
        } else {
            None
        }
    })
}

/// Whether `text` contains any of `terms` as whole words. Multi-word terms
/// match as phrases.
fn contains_term(text: &str, terms: &[String]) -> bool {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let normalized = words.join(" ");

    terms.iter().any(|term| {
        let term = term.to_lowercase();
        if term.contains(' ') {
            format!(" {normalized} ").contains(&format!(" {term} "))
        } else {
            words.iter().any(|w| *w == term)
        }
    })
}
