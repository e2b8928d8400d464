//! Window accumulation.
//!
//! Timestamps are counted into fixed-size windows whose boundaries come from
//! [`window_start`] and [`window_end`]. Windows are kept in creation order and
//! never merged, split or re-sorted.

use crate::core::boundary::{end_exclusive, resolution, window_end, window_start};
use crate::core::spec::WindowSpec;
use chrono::{DateTime, TimeZone};

/// A time window and the number of events that fell into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<Tz: TimeZone> {
    /// First instant of the window (inclusive)
    pub start: DateTime<Tz>,
    /// Last instant of the window (inclusive)
    pub end: DateTime<Tz>,
    /// Number of events counted in this window
    pub count: u64,
}

impl<Tz: TimeZone> Window<Tz> {
    /// Open the canonical window for `timestamp`, counting it as the first event.
    pub fn open(timestamp: &DateTime<Tz>, spec: &WindowSpec) -> Self {
        let start = window_start(timestamp, spec);
        let end = window_end(&start, spec);
        Self {
            start,
            end,
            count: 1,
        }
    }

    /// First instant after this window.
    pub fn end_exclusive(&self) -> DateTime<Tz> {
        end_exclusive(&self.end)
    }

    /// Check if a timestamp falls within `[start, end_exclusive)`.
    pub fn contains(&self, timestamp: &DateTime<Tz>) -> bool {
        *timestamp >= self.start && *timestamp < self.end_exclusive()
    }

    /// Check if the closed ranges of two windows share any instant.
    pub fn overlaps(&self, other: &Window<Tz>) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// What [`WindowAccumulator::place`] did with a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// No timestamp was given; nothing changed.
    Skipped,
    /// An existing window at `index` was incremented.
    Counted { index: usize },
    /// A new window was appended at `index`.
    Opened { index: usize },
}

/// Owns the ordered window sequence for one run.
pub struct WindowAccumulator<Tz: TimeZone> {
    /// Window size for every window in the run
    spec: WindowSpec,
    /// Windows in creation order
    windows: Vec<Window<Tz>>,
    /// Latest inclusive end among all windows
    latest_end: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> WindowAccumulator<Tz> {
    /// Create an empty accumulator for the given window size.
    pub fn new(spec: WindowSpec) -> Self {
        Self {
            spec,
            windows: Vec::new(),
            latest_end: None,
        }
    }

    /// Count one timestamp.
    ///
    /// An absent timestamp is a no-op. Otherwise windows are searched from the
    /// most recently created backward, which finds the match immediately for
    /// roughly chronological input. If none contains the timestamp a new
    /// window is appended, even when it starts before existing windows.
    pub fn place(&mut self, timestamp: Option<&DateTime<Tz>>) -> Placement {
        let Some(timestamp) = timestamp else {
            return Placement::Skipped;
        };

        if let Some(index) = self.windows.iter().rposition(|w| w.contains(timestamp)) {
            self.windows[index].count += 1;
            return Placement::Counted { index };
        }

        let mut window = Window::open(timestamp, &self.spec);
        self.keep_disjoint(&mut window, timestamp);

        if self.latest_end.as_ref().map_or(true, |latest| window.end > *latest) {
            self.latest_end = Some(window.end.clone());
        }

        tracing::debug!(
            start = %window.start.naive_local(),
            end = %window.end.naive_local(),
            "opened window"
        );

        self.windows.push(window);
        Placement::Opened {
            index: self.windows.len() - 1,
        }
    }

    /// Trim a new window so it does not overlap any existing one.
    ///
    /// Only out-of-order input with magnitudes above one (or odd DST offsets)
    /// can produce an overlap. No existing window contains `timestamp`, so a
    /// neighbour after it bounds the end and one before it bounds the start,
    /// and `timestamp` stays inside `window`.
    fn keep_disjoint(&self, window: &mut Window<Tz>, timestamp: &DateTime<Tz>) {
        let may_overlap = self
            .latest_end
            .as_ref()
            .map_or(false, |latest| window.start <= *latest);

        if may_overlap {
            for existing in &self.windows {
                if !existing.overlaps(window) {
                    continue;
                }
                if existing.start > *timestamp {
                    window.end = existing.start.clone() - resolution();
                } else {
                    window.start = existing.end_exclusive();
                }
            }
        }

        debug_assert!(
            window.contains(timestamp),
            "{:?} outside [{:?}, {:?}]",
            timestamp,
            window.start,
            window.end
        );
        // Never store an inverted window.
        if window.start > *timestamp {
            window.start = timestamp.clone();
        }
        if window.end < *timestamp {
            window.end = timestamp.clone();
        }
    }

    /// Windows in creation order.
    pub fn windows(&self) -> &[Window<Tz>] {
        &self.windows
    }

    /// Consume the accumulator, handing the windows off for rendering.
    pub fn into_windows(self) -> Vec<Window<Tz>> {
        self.windows
    }

    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    /// Get the number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Sum of all window counts.
    pub fn total_count(&self) -> u64 {
        self.windows.iter().map(|w| w.count).sum()
    }
}
