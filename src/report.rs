//! Tab-separated rendering of rolled-up windows.

use crate::core::windowing::Window;
use chrono::{DateTime, TimeZone};
use std::fmt;

/// Column separator in the rendered table.
pub const SEPARATOR: char = '\t';

/// Wall-clock format for window boundaries.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Options controlling how windows are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Order rows by window start instead of creation order
    pub sorted: bool,
}

/// Render windows as a table with a `Start`, `End`, `Count` header row.
pub fn render<Tz>(windows: &[Window<Tz>], options: &RenderOptions) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut rows: Vec<&Window<Tz>> = windows.iter().collect();
    if options.sorted {
        rows.sort_by(|a, b| a.start.cmp(&b.start));
    }

    let mut out = format!("Start{SEPARATOR}End{SEPARATOR}Count\n");
    for window in rows {
        out.push_str(&format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}\n",
            format_time(&window.start),
            format_time(&window.end),
            window.count
        ));
    }
    out
}

fn format_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    time.format(TIME_FORMAT).to_string()
}
