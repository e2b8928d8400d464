//! Timestamp extraction from free-form log lines.
//!
//! A line is scanned for every supported timestamp shape and the one that
//! starts earliest wins. Timestamps carrying an explicit UTC offset are
//! converted into the calendar zone; bare wall-clock values are read in it.
//! Syslog stamps carry no year and take the extractor's default year.

use crate::core::boundary::{resolve_local, Bias};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use regex::{Captures, Regex};

/// Apache/NCSA access log: `[23/Nov/2011:17:29:24 -0500]`
const ACCESS_LOG_PATTERN: &str =
    r"\[(?P<stamp>\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2} [+-]\d{4})\]";

/// RFC 2822 (mail and HTTP headers): `Wed, 23 Nov 2011 17:29:24 -0500`
const RFC2822_PATTERN: &str = r"(?x)
    \b(?P<stamp>
    (?:(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun),\x20)?
    \d{1,2}\x20(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\x20\d{4}
    \x20\d{2}:\d{2}(?::\d{2})?
    \x20(?:[+-]\d{4}|UT|GMT|[ECMP][SD]T|Z)
    )\b
";

/// BSD syslog (RFC 3164), no year: `Nov 23 17:29:24`
const SYSLOG_PATTERN: &str = r"(?x)
    \b(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)
    \x20{1,2}(?P<day>\d{1,2})
    \x20(?P<time>\d{2}:\d{2}:\d{2})\b
";

/// ISO-8601 / RFC 3339 date and time, with optional fraction and offset.
const ISO_DATETIME_PATTERN: &str = r"(?x)
    \b(?P<date>\d{4}-\d{2}-\d{2})
    [T\x20]
    (?P<time>\d{2}:\d{2}(?::\d{2}(?:[.,]\d{1,9})?)?)
    (?:\x20?(?P<offset>Z|[+-]\d{2}:?\d{2}))?
";

/// Bare ISO-8601 date.
const ISO_DATE_PATTERN: &str = r"\b(?P<date>\d{4}-\d{2}-\d{2})\b";

/// The timestamp shapes we recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    AccessLog,
    Rfc2822,
    IsoDateTime,
    Syslog,
    IsoDate,
}

/// Finds and parses the first timestamp in a line, in a fixed calendar zone.
pub struct TimestampExtractor<Tz: TimeZone> {
    tz: Tz,
    /// Year given to stamps that omit one
    default_year: i32,
    /// Patterns in priority order for matches starting at the same offset
    patterns: Vec<(TimestampFormat, Regex)>,
}

impl<Tz: TimeZone> TimestampExtractor<Tz> {
    /// Create an extractor resolving timestamps into `tz`.
    ///
    /// Year-less stamps are placed in the current year of `tz`.
    pub fn new(tz: Tz) -> Result<Self, regex::Error> {
        let patterns = [
            (TimestampFormat::AccessLog, ACCESS_LOG_PATTERN),
            (TimestampFormat::Rfc2822, RFC2822_PATTERN),
            (TimestampFormat::IsoDateTime, ISO_DATETIME_PATTERN),
            (TimestampFormat::Syslog, SYSLOG_PATTERN),
            (TimestampFormat::IsoDate, ISO_DATE_PATTERN),
        ]
        .into_iter()
        .map(|(format, pattern)| Regex::new(pattern).map(|regex| (format, regex)))
        .collect::<Result<Vec<_>, _>>()?;

        let default_year = Utc::now().with_timezone(&tz).year();
        Ok(Self {
            tz,
            default_year,
            patterns,
        })
    }

    /// Use `year` for stamps that omit one.
    pub fn with_default_year(mut self, year: i32) -> Self {
        self.default_year = year;
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    /// Extract the earliest recognizable timestamp in `line`.
    pub fn extract(&self, line: &str) -> Option<DateTime<Tz>> {
        self.extract_with_format(line).map(|(timestamp, _)| timestamp)
    }

    /// Like [`extract`](Self::extract), also reporting which shape matched.
    pub fn extract_with_format(&self, line: &str) -> Option<(DateTime<Tz>, TimestampFormat)> {
        let mut best: Option<(usize, DateTime<Tz>, TimestampFormat)> = None;

        for (format, regex) in &self.patterns {
            for caps in regex.captures_iter(line) {
                let Some(whole) = caps.get(0) else { continue };
                if best.as_ref().is_some_and(|(at, _, _)| *at <= whole.start()) {
                    break;
                }
                if let Some(timestamp) = self.parse(*format, &caps) {
                    best = Some((whole.start(), timestamp, *format));
                    break;
                }
            }
        }

        best.map(|(_, timestamp, format)| (timestamp, format))
    }

    fn parse(&self, format: TimestampFormat, caps: &Captures<'_>) -> Option<DateTime<Tz>> {
        match format {
            TimestampFormat::AccessLog => {
                let stamp = caps.name("stamp")?.as_str();
                let parsed = DateTime::parse_from_str(stamp, "%d/%b/%Y:%H:%M:%S %z").ok()?;
                Some(parsed.with_timezone(&self.tz))
            }
            TimestampFormat::Rfc2822 => {
                let parsed = DateTime::parse_from_rfc2822(caps.name("stamp")?.as_str()).ok()?;
                Some(parsed.with_timezone(&self.tz))
            }
            TimestampFormat::IsoDateTime => {
                let date = parse_date(caps.name("date")?.as_str())?;
                let time = parse_time(caps.name("time")?.as_str())?;
                let naive = NaiveDateTime::new(date, time);
                match caps.name("offset") {
                    Some(offset) => {
                        let offset = parse_offset(offset.as_str())?;
                        let fixed = offset.from_local_datetime(&naive).single()?;
                        Some(fixed.with_timezone(&self.tz))
                    }
                    None => Some(resolve_local(&self.tz, naive, Bias::Earliest)),
                }
            }
            TimestampFormat::Syslog => {
                let stamp = format!(
                    "{} {} {} {}",
                    self.default_year,
                    caps.name("month")?.as_str(),
                    caps.name("day")?.as_str(),
                    caps.name("time")?.as_str()
                );
                let naive = NaiveDateTime::parse_from_str(&stamp, "%Y %b %d %H:%M:%S").ok()?;
                Some(resolve_local(&self.tz, naive, Bias::Earliest))
            }
            TimestampFormat::IsoDate => {
                let date = parse_date(caps.name("date")?.as_str())?;
                let naive = NaiveDateTime::new(date, NaiveTime::default());
                Some(resolve_local(&self.tz, naive, Bias::Earliest))
            }
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.replace(',', ".");
    NaiveTime::parse_from_str(&s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M"))
        .ok()
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s == "Z" {
        return FixedOffset::east_opt(0);
    }

    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use chrono_tz::America::New_York;

    fn extractor() -> TimestampExtractor<chrono_tz::Tz> {
        TimestampExtractor::new(New_York).unwrap()
    }

    fn ny(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<chrono_tz::Tz> {
        New_York
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
    }

    #[test]
    fn test_access_log_line() {
        let line = r#"168.75.67.132 - - [23/Nov/2011:17:29:24 -0500] "POST /fnic-1/pxcentral/notifications/policy.updated HTTP/1.1" 200 69 "-" "ShortBus/1.1""#;
        let (ts, format) = extractor().extract_with_format(line).unwrap();

        assert_eq!(format, TimestampFormat::AccessLog);
        assert_eq!(ts, ny(2011, 11, 23, 17, 29, 24));
    }

    #[test]
    fn test_access_log_offset_is_converted() {
        let line = "10.0.0.1 - - [23/Nov/2011:22:29:24 +0000] \"GET / HTTP/1.1\" 200 1";
        let ts = extractor().extract(line).unwrap();

        assert_eq!(ts, Utc.with_ymd_and_hms(2011, 11, 23, 22, 29, 24).unwrap());
        assert_eq!(ts.naive_local().to_string(), "2011-11-23 17:29:24");
    }

    #[test]
    fn test_iso_datetime_variants() {
        let e = extractor();

        assert_eq!(
            e.extract("2011-11-23 17:05 service started").unwrap(),
            ny(2011, 11, 23, 17, 5, 0)
        );
        assert_eq!(
            e.extract("level=info ts=2011-11-23T17:05:09 msg=ok").unwrap(),
            ny(2011, 11, 23, 17, 5, 9)
        );
        assert_eq!(
            e.extract("2011-11-23T17:05:09.250Z GET /").unwrap(),
            Utc.with_ymd_and_hms(2011, 11, 23, 17, 5, 9).unwrap() + Duration::milliseconds(250)
        );
        assert_eq!(
            e.extract("2011-11-23 17:05:09,5 +01:00 worker").unwrap(),
            Utc.with_ymd_and_hms(2011, 11, 23, 16, 5, 9).unwrap() + Duration::milliseconds(500)
        );
        assert_eq!(
            e.extract("at 2011-11-23T17:05:09-0800").unwrap(),
            Utc.with_ymd_and_hms(2011, 11, 24, 1, 5, 9).unwrap()
        );
    }

    #[test]
    fn test_bare_date_is_local_midnight() {
        let (ts, format) = extractor()
            .extract_with_format("backup for 2011-11-23 completed")
            .unwrap();
        assert_eq!(format, TimestampFormat::IsoDate);
        assert_eq!(ts, ny(2011, 11, 23, 0, 0, 0));
    }

    #[test]
    fn test_earliest_match_wins() {
        let line = "2011-11-20 replay of [23/Nov/2011:17:29:24 -0500]";
        let (ts, format) = extractor().extract_with_format(line).unwrap();
        assert_eq!(format, TimestampFormat::IsoDate);
        assert_eq!(ts, ny(2011, 11, 20, 0, 0, 0));

        let line = "[23/Nov/2011:17:29:24 -0500] referer=2011-11-20";
        assert_eq!(extractor().extract(line).unwrap(), ny(2011, 11, 23, 17, 29, 24));
    }

    #[test]
    fn test_invalid_candidates_are_skipped() {
        let e = extractor();
        assert_eq!(e.extract("build 2011-13-45 then 2011-11-23").unwrap(), ny(2011, 11, 23, 0, 0, 0));
        assert!(e.extract("no timestamp here").is_none());
        assert!(e.extract("").is_none());
        assert!(e.extract("[32/Foo/2011:17:29:24 -0500]").is_none());
    }

    #[test]
    fn test_wall_clock_in_gap_moves_forward() {
        let ts = extractor().extract("2011-03-13 02:30 cron").unwrap();
        assert_eq!(ts.naive_local().to_string(), "2011-03-13 03:00:00");
    }

    #[test]
    fn test_rfc2822_line() {
        let line = "Date: Wed, 23 Nov 2011 17:29:24 -0500 from relay";
        let (ts, format) = extractor().extract_with_format(line).unwrap();
        assert_eq!(format, TimestampFormat::Rfc2822);
        assert_eq!(ts, ny(2011, 11, 23, 17, 29, 24));

        // weekday is optional and named zones are accepted
        let ts = extractor().extract("sent 23 Nov 2011 22:29:24 GMT").unwrap();
        assert_eq!(ts, ny(2011, 11, 23, 17, 29, 24));
    }

    #[test]
    fn test_syslog_line_uses_default_year() {
        let e = extractor().with_default_year(2011);
        assert_eq!(e.default_year(), 2011);

        let line = "Nov 23 17:29:24 web01 sshd[4242]: Accepted publickey for deploy";
        let (ts, format) = e.extract_with_format(line).unwrap();
        assert_eq!(format, TimestampFormat::Syslog);
        assert_eq!(ts, ny(2011, 11, 23, 17, 29, 24));

        // single-digit days are space padded
        assert_eq!(
            e.extract("Mar  6 09:00:01 web01 cron[1]: tick").unwrap(),
            ny(2011, 3, 6, 9, 0, 1)
        );
        assert!(e.extract("Feb 30 10:00:00 web01 kernel: bogus").is_none());
    }

    #[test]
    fn test_syslog_default_year_is_current() {
        let year = Utc::now().with_timezone(&New_York).year();
        assert!((year - 1..=year + 1).contains(&extractor().default_year()));
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("Z"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("-05:30"), FixedOffset::west_opt(5 * 3600 + 30 * 60));
        assert_eq!(parse_offset("+0100"), FixedOffset::east_opt(3600));
        assert_eq!(parse_offset("+01:75"), None);
    }
}
