use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find artwork that matches a quote or piece of text
    Search {
        quote: String,

        /// Maximum number of artworks to show
        #[arg(short, long, default_value = "10")]
        max: usize,

        /// Seconds to wait for the model before giving up
        #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,

        /// Where to search: meisterdrucke, met or wikiart
        #[arg(short, long, default_value = "meisterdrucke")]
        source: String,
    },

    /// Explain how a result from the last search relates to its quote
    Explain {
        /// 1-based position in the last search's results
        index: usize,

        #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },

    /// Show model usage against the free-tier limits
    Usage {
        /// Zero all counters
        #[arg(long)]
        reset: bool,
    },

    /// Forget the last search
    Clear,

    Version,
}
