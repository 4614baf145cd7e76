use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::application::SearchOutcome;
use crate::domain::{ArtworkRecord, GalleryKind};

use super::super::Container;
use super::progress::spinner;

const TITLE_WIDTH: usize = 40;
const ARTIST_WIDTH: usize = 24;

pub struct SearchController<'a> {
    container: &'a Container,
}

impl<'a> SearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn search(
        &self,
        quote: String,
        max_results: usize,
        timeout_secs: u64,
        source: String,
    ) -> Result<String> {
        // Resolve the source before any model call so a bad name or a
        // missing token costs nothing.
        let gallery = self.container.gallery_source(&source)?;
        let display_name = source
            .parse::<GalleryKind>()
            .map(|kind| kind.display_name())
            .unwrap_or("gallery");

        let pb = spinner(format!("Interpreting text and searching {display_name}..."));
        let result = self
            .container
            .search_use_case()
            .execute(&quote, gallery, max_results, Duration::from_secs(timeout_secs))
            .await;
        pb.finish_and_clear();
        let outcome = result?;

        let mut output = self.format_outcome(&quote, &outcome);

        match self.container.usage_tracker().get_usage_stats().await {
            Ok(stats) => {
                if let Some(warning) = stats.limit_warning() {
                    output.push_str(&format!("\n\n⚠ {warning}"));
                }
            }
            Err(e) => warn!("Could not read usage stats: {e}"),
        }

        Ok(output)
    }

    fn format_outcome(&self, quote: &str, outcome: &SearchOutcome) -> String {
        let mut output = format!("Muse: \"{quote}\"\n\nKeywords: {}\n\n", outcome.keywords);

        if outcome.artworks.is_empty() {
            output.push_str(&format!(
                "No artworks found on {}. Try rephrasing the text or another --source.",
                outcome.source
            ));
            return output;
        }

        let n = outcome.artworks.len();
        output.push_str(&format!(
            "✓ Found {n} artwork{}\n\n",
            if n == 1 { "" } else { "s" }
        ));
        output.push_str(&format_table(&outcome.artworks));
        output.push_str(&format!(
            "\nTip: run 'muse explain <1-{n}>' to learn why an artwork matches."
        ));
        output
    }
}

fn format_table(artworks: &[ArtworkRecord]) -> String {
    let mut table = format!(
        "{:>3}  {:<tw$}  {:<aw$}  {}\n",
        "#",
        "Title",
        "Artist",
        "Image",
        tw = TITLE_WIDTH,
        aw = ARTIST_WIDTH
    );

    for (i, artwork) in artworks.iter().enumerate() {
        table.push_str(&format!(
            "{:>3}  {:<tw$}  {:<aw$}  {}\n",
            i + 1,
            truncate(artwork.title(), TITLE_WIDTH),
            truncate(artwork.artist(), ARTIST_WIDTH),
            artwork.image_url(),
            tw = TITLE_WIDTH,
            aw = ARTIST_WIDTH
        ));
    }

    table
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
