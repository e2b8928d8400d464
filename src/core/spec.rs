//! Window size specifications such as `15m`, `2h`, `1d` or `4w`.

use std::fmt;
use std::str::FromStr;

/// Longest window we accept, in minutes (roughly 100 years).
const MAX_WINDOW_MINUTES: u64 = 100 * 366 * 24 * 60;

/// The calendar unit a window is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl WindowUnit {
    /// Map a unit letter (`m`, `h`, `d`, `w`) to a unit.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'm' => Some(WindowUnit::Minute),
            'h' => Some(WindowUnit::Hour),
            'd' => Some(WindowUnit::Day),
            'w' => Some(WindowUnit::Week),
            _ => None,
        }
    }

    /// The unit letter used in specification strings.
    pub fn code(self) -> char {
        match self {
            WindowUnit::Minute => 'm',
            WindowUnit::Hour => 'h',
            WindowUnit::Day => 'd',
            WindowUnit::Week => 'w',
        }
    }

    /// Nominal length of one unit in minutes.
    pub fn minutes(self) -> u64 {
        match self {
            WindowUnit::Minute => 1,
            WindowUnit::Hour => 60,
            WindowUnit::Day => 24 * 60,
            WindowUnit::Week => 7 * 24 * 60,
        }
    }

    /// Whether window boundaries follow the calendar (local midnight)
    /// rather than fixed durations.
    pub fn is_calendar(self) -> bool {
        matches!(self, WindowUnit::Day | WindowUnit::Week)
    }
}

/// A parsed `<magnitude><unit>` window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowSpec {
    unit: WindowUnit,
    magnitude: u32,
}

impl WindowSpec {
    /// Build a spec directly, validating the magnitude.
    pub fn new(magnitude: u32, unit: WindowUnit) -> Result<Self, WindowSpecError> {
        if magnitude == 0 {
            return Err(WindowSpecError::InvalidMagnitude(magnitude.to_string()));
        }
        if u64::from(magnitude) * unit.minutes() > MAX_WINDOW_MINUTES {
            return Err(WindowSpecError::InvalidMagnitude(magnitude.to_string()));
        }
        Ok(Self { unit, magnitude })
    }

    /// Parse a specification string like `"15m"` or `"2w"`.
    pub fn parse(input: &str) -> Result<Self, WindowSpecError> {
        let input = input.trim();

        let code = input
            .chars()
            .last()
            .ok_or_else(|| WindowSpecError::InvalidUnit(String::new()))?;
        let unit =
            WindowUnit::from_code(code).ok_or_else(|| WindowSpecError::InvalidUnit(code.to_string()))?;

        let digits = &input[..input.len() - code.len_utf8()];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WindowSpecError::InvalidMagnitude(digits.to_string()));
        }
        let magnitude: u32 = digits
            .parse()
            .map_err(|_| WindowSpecError::InvalidMagnitude(digits.to_string()))?;

        Self::new(magnitude, unit)
    }

    pub fn unit(&self) -> WindowUnit {
        self.unit
    }

    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }
}

impl FromStr for WindowSpec {
    type Err = WindowSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.code())
    }
}

/// Errors raised while parsing a window specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSpecError {
    /// The trailing unit letter is missing or not one of `m`, `h`, `d`, `w`.
    InvalidUnit(String),
    /// The numeric part is missing, zero, signed, non-numeric or too large.
    InvalidMagnitude(String),
}

impl fmt::Display for WindowSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSpecError::InvalidUnit(u) if u.is_empty() => {
                write!(f, "Invalid window unit: missing (expected one of m, h, d, w)")
            }
            WindowSpecError::InvalidUnit(u) => {
                write!(f, "Invalid window unit: {u:?} (expected one of m, h, d, w)")
            }
            WindowSpecError::InvalidMagnitude(m) => {
                write!(f, "Invalid window magnitude: {m:?} (expected a positive integer)")
            }
        }
    }
}

impl std::error::Error for WindowSpecError {}
