//! Log Rollup - count timestamped log lines per time window.
//!
//! Each input line is scanned for an embedded timestamp, and timestamps are
//! counted into fixed-size, contiguous, non-overlapping windows such as
//! `15m`, `2h`, `1d` or `4w`. The result is a table of
//! `(window_start, window_end, count)` rows.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        log-rollup                         │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐      │
//! │  │    Input    │──▶│  Windowing  │──▶│   Report    │      │
//! │  │ (timestamp) │   │ (accumulate)│   │    (TSV)    │      │
//! │  └─────────────┘   └─────────────┘   └─────────────┘      │
//! │         │                 ▲                               │
//! │         ▼                 │                               │
//! │  ┌─────────────┐   ┌─────────────┐                        │
//! │  │    Stats    │   │  Boundary   │                        │
//! │  │  (counts)   │   │ (calendar)  │                        │
//! │  └─────────────┘   └─────────────┘                        │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Day and week windows follow the local calendar of the chosen time zone,
//! so a window spanning a daylight-saving change still ends at the last
//! instant of its final day. Weeks run Sunday through Saturday.
//!
//! # Example
//!
//! ```
//! use log_rollup::{input, report, RunStats, TimestampExtractor, WindowAccumulator, WindowSpec};
//! use std::io::Cursor;
//!
//! let spec: WindowSpec = "1h".parse().unwrap();
//! let extractor = TimestampExtractor::new(chrono_tz::America::New_York).unwrap();
//! let mut windows = WindowAccumulator::new(spec);
//! let mut stats = RunStats::new();
//!
//! let log = "1.2.3.4 - - [23/Nov/2011:17:29:24 -0500] \"GET / HTTP/1.1\" 200 69\n";
//! input::ingest(Cursor::new(log), &extractor, &mut windows, &mut stats).unwrap();
//!
//! let table = report::render(windows.windows(), &report::RenderOptions::default());
//! assert!(table.contains("2011-11-23 17:00\t2011-11-23 17:59\t1"));
//! ```

pub mod config;
pub mod core;
pub mod input;
pub mod report;
pub mod stats;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{Placement, Window, WindowAccumulator, WindowSpec, WindowSpecError, WindowUnit};
pub use input::{TimestampExtractor, TimestampFormat};
pub use report::{render, RenderOptions};
pub use stats::RunStats;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
