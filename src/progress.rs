//! Progress reporting for station retrieval and loading
//!
//! Wraps an optional indicatif bar so quiet runs and tests can share the
//! same code path without drawing anything.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} stations | {msg}";

/// Progress reporter for per-station work
#[derive(Default)]
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Reporter with a bar sized to `total` stations, or hidden when `visible` is false
    pub fn new(total: usize, message: &str, visible: bool) -> Self {
        if !visible {
            return Self::hidden();
        }

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        pb.set_message(message.to_string());

        debug!("Progress bar initialized for {} stations", total);
        Self {
            progress_bar: Some(pb),
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.into());
        }
    }

    pub fn increment(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    pub fn finish(&self, message: impl Into<String>) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(message.into());
        }
    }

    pub fn is_visible(&self) -> bool {
        self.progress_bar.is_some()
    }
}
