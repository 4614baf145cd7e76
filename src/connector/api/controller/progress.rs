use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// A spinner on stderr shown while a slow network step runs.
///
/// Hidden automatically when stderr is not a terminal, so captured output
/// stays clean.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
