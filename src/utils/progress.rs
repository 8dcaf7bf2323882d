//! Progress bar construction for the commandline frontend
//!
//! Relies on the [indicatif] crate

use indicatif::{ProgressBar, ProgressStyle};

/// Returns a [ProgressBar] with a uniform style for render reporting.
pub fn get_progressbar(len: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{prefix:>16.cyan} [{elapsed_precise}] {wide_bar} {pos:>7}/{len:7}",
    )
    .expect("progress bar template failed to parse");
    ProgressBar::new(len).with_style(style)
}
