//! Terminal progress bars for the fetch and extract stages.
//!
//! Bars draw to stderr and stay invisible when stderr is not a terminal, so
//! piping output or running under tests prints nothing extra.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg}: {percent:>3}%|{wide_bar}| {pos}/{len} [{elapsed_precise}<{eta_precise}]";

/// Progress bar over `len` units labelled with `message`
pub fn bar(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
    }
    pb.set_message(message);
    pb
}
