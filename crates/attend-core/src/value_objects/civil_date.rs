//! Civil dates in one fixed local timezone
//!
//! Attendance is keyed by the calendar date at the event venue, never by
//! server-local time or UTC. A check-in at 23:59 local and one at 00:01 local
//! fall on different days even if they are two minutes apart.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Calendar date formatted as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate(NaiveDate);

impl CivilDate {
    #[inline]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[inline]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The following calendar day
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Error returned for strings that are not strict `YYYY-MM-DD` dates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid civil date: {0}")]
pub struct CivilDateParseError(pub String);

impl FromStr for CivilDate {
    type Err = CivilDateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

        if !shape_ok {
            return Err(CivilDateParseError(s.to_string()));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| CivilDateParseError(s.to_string()))
    }
}

impl Serialize for CivilDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Source of the current instant
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(at.timestamp_millis()),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// Fixed-offset calendar used to derive attendance dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilCalendar {
    offset: FixedOffset,
}

impl CivilCalendar {
    /// UTC+09:00
    pub const DEFAULT_OFFSET_MINUTES: i32 = 9 * 60;

    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Returns `None` when the offset is outside ±24h
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes * 60).map(Self::new)
    }

    #[inline]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Civil date of an instant
    pub fn date_of(&self, instant: DateTime<Utc>) -> CivilDate {
        CivilDate(instant.with_timezone(&self.offset).date_naive())
    }

    /// Local `YYYY-MM-DD HH:MM:SS` rendering of an instant
    pub fn format_datetime(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

impl Default for CivilCalendar {
    fn default() -> Self {
        Self::from_offset_minutes(Self::DEFAULT_OFFSET_MINUTES).unwrap_or(Self::new(Utc.fix()))
    }
}
