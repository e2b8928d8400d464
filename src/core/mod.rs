//! Core functionality for log rollups.
//!
//! This module contains:
//! - Window size specifications
//! - Window boundary computation in a local calendar
//! - Window accumulation of timestamps

pub mod boundary;
pub mod spec;
pub mod windowing;

// Re-export commonly used types
pub use boundary::{end_exclusive, resolution, resolve_local, window_end, window_start, Bias};
pub use spec::{WindowSpec, WindowSpecError, WindowUnit};
pub use windowing::{Placement, Window, WindowAccumulator};
