//! Window boundary computation.
//!
//! Boundaries are derived from the local wall clock of the timestamp's own
//! time zone. Minute and hour windows are floored in the UTC offset the
//! timestamp carries and then run for a fixed duration, so a repeated or
//! skipped stretch of wall clock never pushes the start past the timestamp.
//! Day and week windows step in whole calendar days and snap to the true last
//! instant of the final day, so 23 and 25 hour days come out right.

use crate::core::spec::{WindowSpec, WindowUnit};
use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Timelike,
};

/// Smallest representable step between two window boundaries.
pub fn resolution() -> Duration {
    Duration::milliseconds(1)
}

/// Upper bound on how far a DST gap probe walks, in minutes.
const GAP_PROBE_LIMIT: u32 = 48 * 60;

/// Which instant to prefer when a wall-clock time maps to zero or two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Take the earlier instant of a fold; walk forward out of a gap.
    Earliest,
    /// Take the later instant of a fold; walk backward out of a gap.
    Latest,
}

/// Map a local wall-clock time to an instant in `tz`.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, bias: Bias) -> DateTime<Tz> {
    let step = match bias {
        Bias::Earliest => Duration::minutes(1),
        Bias::Latest => Duration::minutes(-1),
    };

    let mut probe = naive;
    for _ in 0..=GAP_PROBE_LIMIT {
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(t) => return t,
            LocalResult::Ambiguous(earliest, latest) => {
                return match bias {
                    Bias::Earliest => earliest,
                    Bias::Latest => latest,
                };
            }
            LocalResult::None => match probe.checked_add_signed(step) {
                Some(next) => probe = next,
                None => break,
            },
        }
    }

    // No zone has a gap this long; read the wall clock as UTC rather than fail.
    tz.from_utc_datetime(&naive)
}

/// Canonical start of the window containing `timestamp`.
pub fn window_start<Tz: TimeZone>(timestamp: &DateTime<Tz>, spec: &WindowSpec) -> DateTime<Tz> {
    let unit = spec.unit();
    let wall = timestamp.naive_local();
    let floored = floor_local(wall, unit);

    if unit.is_calendar() {
        return resolve_local(&timestamp.timezone(), floored, Bias::Earliest);
    }

    // Same offset on both sides: the start is on the timestamp's own pass of
    // the wall clock and at most one unit earlier.
    timestamp.clone() - (wall - floored)
}

/// Last instant (inclusive) of the window beginning at `start`.
pub fn window_end<Tz: TimeZone>(start: &DateTime<Tz>, spec: &WindowSpec) -> DateTime<Tz> {
    let magnitude = u64::from(spec.magnitude());

    match spec.unit() {
        WindowUnit::Minute | WindowUnit::Hour => {
            let minutes = (magnitude * spec.unit().minutes()) as i64;
            start.clone() + Duration::minutes(minutes) - resolution()
        }
        WindowUnit::Day => calendar_end(start, magnitude - 1),
        WindowUnit::Week => calendar_end(start, magnitude * 7 - 1),
    }
}

/// First instant after the window whose inclusive end is `end`.
pub fn end_exclusive<Tz: TimeZone>(end: &DateTime<Tz>) -> DateTime<Tz> {
    end.clone() + resolution()
}

/// Clear the wall-clock fields finer than `unit`; weeks also rewind to Sunday.
fn floor_local(naive: NaiveDateTime, unit: WindowUnit) -> NaiveDateTime {
    let date = naive.date();
    let (date, hour, minute) = match unit {
        WindowUnit::Minute => (date, naive.hour(), naive.minute()),
        WindowUnit::Hour => (date, naive.hour(), 0),
        WindowUnit::Day => (date, 0, 0),
        WindowUnit::Week => {
            let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
            (date.checked_sub_days(back).unwrap_or(date), 0, 0)
        }
    };
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    NaiveDateTime::new(date, time)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();
    NaiveDateTime::new(date, last)
}

/// Resolve the end of `start`'s day, shift it by whole calendar days, then
/// resolve the end of the day it lands on.
fn calendar_end<Tz: TimeZone>(start: &DateTime<Tz>, extra_days: u64) -> DateTime<Tz> {
    let tz = start.timezone();
    let first_day_end = resolve_local(&tz, end_of_day(start.date_naive()), Bias::Latest);

    let day = first_day_end.date_naive();
    let last_day = day.checked_add_days(Days::new(extra_days)).unwrap_or(day);
    resolve_local(&tz, end_of_day(last_day), Bias::Latest)
}
