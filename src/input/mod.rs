//! Line input for the rollup.
//!
//! This module provides:
//! - Timestamp extraction from free-form log lines
//! - Streaming a reader's lines into a window accumulator

pub mod timestamp;

pub use timestamp::{TimestampExtractor, TimestampFormat};

use crate::core::windowing::WindowAccumulator;
use crate::stats::RunStats;
use chrono::TimeZone;
use std::io::{self, BufRead};

/// Read `reader` to exhaustion, placing each line's timestamp.
///
/// Lines are split on `\n` and decoded lossily, so stray binary bytes in a
/// log only cost the line they appear on.
pub fn ingest<R, Tz>(
    mut reader: R,
    extractor: &TimestampExtractor<Tz>,
    accumulator: &mut WindowAccumulator<Tz>,
    stats: &mut RunStats,
) -> io::Result<()>
where
    R: BufRead,
    Tz: TimeZone,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        stats.record_line();

        let timestamp = extractor.extract(line);
        if timestamp.is_none() {
            tracing::trace!(line = stats.lines_read, "no timestamp found, skipping");
        }
        stats.record(accumulator.place(timestamp.as_ref()));
    }

    Ok(())
}
