//! Per-run statistics.
//!
//! Tracks how much input was read and what became of it, so a run can
//! report how many lines carried no usable timestamp.

use crate::core::windowing::Placement;
use serde::{Deserialize, Serialize};

/// Counters for a single rollup run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of input lines read
    pub lines_read: u64,
    /// Number of timestamps counted into a window
    pub timestamps_placed: u64,
    /// Number of lines without a recognizable timestamp
    pub lines_skipped: u64,
    /// Number of windows created
    pub windows_opened: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one line read from input.
    pub fn record_line(&mut self) {
        self.lines_read += 1;
    }

    /// Record the outcome of placing a line's timestamp.
    pub fn record(&mut self, placement: Placement) {
        match placement {
            Placement::Skipped => self.lines_skipped += 1,
            Placement::Counted { .. } => self.timestamps_placed += 1,
            Placement::Opened { .. } => {
                self.timestamps_placed += 1;
                self.windows_opened += 1;
            }
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        format!(
            "Rollup Statistics:\n\
             - Lines read: {}\n\
             - Timestamps counted: {}\n\
             - Lines skipped (no timestamp): {}\n\
             - Windows: {}",
            self.lines_read, self.timestamps_placed, self.lines_skipped, self.windows_opened
        )
    }
}
