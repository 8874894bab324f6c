//! Time and timestamp helpers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeOfDayError;

/// UTC timestamp used for `last_changed`, `last_updated`, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Minutes in a day; [`TimeOfDay::minutes`] is always below this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: Self = Self::from_hm(0, 0);

    /// Const constructor for literal times.
    ///
    /// # Panics
    ///
    /// Panics on `hour > 23` or `minute > 59`; in a const context that is a
    /// compile error.
    #[must_use]
    pub const fn from_hm(hour: u8, minute: u8) -> Self {
        assert!(hour < 24 && minute < 60, "time of day out of range");
        Self { hour, minute }
    }

    /// Build a time of day, rejecting out-of-range components.
    ///
    /// # Errors
    ///
    /// Returns [`TimeOfDayError`] when `hour > 23` or `minute > 59`.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeOfDayError> {
        let hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h < 24)
            .ok_or(TimeOfDayError::HourOutOfRange(hour))?;
        let minute = u8::try_from(minute)
            .ok()
            .filter(|m| *m < 60)
            .ok_or(TimeOfDayError::MinuteOutOfRange(minute))?;
        Ok(Self { hour, minute })
    }

    /// Current local wall-clock time.
    #[must_use]
    pub fn now_local() -> Self {
        Self::from_timelike(&Local::now())
    }

    /// Truncate any chrono time value to minute precision.
    #[must_use]
    pub fn from_timelike<T: Timelike>(value: &T) -> Self {
        // chrono guarantees hour < 24 and minute < 60
        Self {
            hour: u8::try_from(value.hour()).unwrap_or_default(),
            minute: u8::try_from(value.minute()).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes since midnight, in `0..1440`.
    #[must_use]
    pub fn minutes(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Render as `HH:MM:SS`, the format stored in time entities.
    #[must_use]
    pub fn to_state_string(self) -> String {
        format!("{:02}:{:02}:00", self.hour, self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Accepts `H`, `HH:MM` and `HH:MM:SS`. A missing minute means `:00`;
/// seconds are validated and dropped.
impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeOfDayError::Empty);
        }

        let malformed = || TimeOfDayError::Malformed(s.to_string());
        let parse_part = |part: &str| -> Result<u32, TimeOfDayError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };

        let mut parts = s.split(':');
        let hour = parse_part(parts.next().ok_or_else(malformed)?)?;
        let minute = parts.next().map(parse_part).transpose()?.unwrap_or(0);
        if let Some(second) = parts.next().map(parse_part).transpose()?
            && second > 59
        {
            return Err(TimeOfDayError::SecondOutOfRange(second));
        }
        if parts.next().is_some() {
            return Err(malformed());
        }

        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}
