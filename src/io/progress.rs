//! Progress display for the pairwise overlap search

use crate::io::configuration::PROGRESS_MIN_PAIRS;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Shows a bar while slice pairs are compared
///
/// Small searches finish before a bar is worth drawing, so no bar is created
/// below [`PROGRESS_MIN_PAIRS`] pairs or when progress is disabled.
pub struct ProgressManager {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ProgressManager {
    /// Create a manager; `enabled` controls whether bars are ever drawn
    pub const fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Begin a search over `pairs` slice pairs
    pub fn start_search(&mut self, label: &str, pairs: usize) {
        self.finish();
        if !self.enabled || pairs < PROGRESS_MIN_PAIRS {
            return;
        }

        let bar = ProgressBar::new(pairs as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(label.to_string());
        self.bar = Some(bar);
    }

    /// Record one compared pair
    pub fn advance(&self, first: &str, second: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("{first} ~ {second}"));
            bar.inc(1);
        }
    }

    /// Test whether a bar is currently shown
    pub const fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Clear the current bar, if any
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
