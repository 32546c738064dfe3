//! Calendar windows for the accountability engine.
//!
//! Weeks run Sunday 00:00:00.000 through Saturday 23:59:59.999 in the
//! configured reference timezone. Numbering is 1-based per calendar year,
//! counted in Sunday-aligned 7-day blocks from January 1 — week 1 may be a
//! partial week, and a window that spans a year boundary maps to two week ids
//! (one per local year). This is the platform's own convention, not ISO-8601.

use crate::error::{CadenceError, Result};
use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// WeekId
// ---------------------------------------------------------------------------

/// A Sunday-to-Saturday window, keyed as `YYYY-Www` (e.g. `2026-W35`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekId {
    pub year: i32,
    pub week: u32,
}

static WEEK_RE: OnceLock<Regex> = OnceLock::new();

fn week_re() -> &'static Regex {
    WEEK_RE.get_or_init(|| Regex::new(r"^(\d{4})-W(\d{1,2})$").unwrap())
}

impl WeekId {
    /// The week containing `now`, evaluated in the reference timezone.
    pub fn of(now: DateTime<Utc>, tz: FixedOffset) -> WeekId {
        Self::of_date(local_date(now, tz))
    }

    /// The week containing a local calendar date.
    pub fn of_date(date: NaiveDate) -> WeekId {
        let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap();
        let lead = jan1.weekday().num_days_from_sunday();
        WeekId {
            year: date.year(),
            week: (date.ordinal0() + lead) / 7 + 1,
        }
    }

    /// Window start (Sunday 00:00:00.000) and end (Saturday 23:59:59.999) as
    /// UTC instants. Exact inverse of [`WeekId::of`]: for any timestamp `t`,
    /// the window of `WeekId::of(t, tz)` contains `t`.
    pub fn boundaries(self, tz: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
        let sunday = self.start_date();
        let saturday = sunday + Days::new(6);
        let start = sunday.and_hms_opt(0, 0, 0).unwrap();
        let end = saturday.and_hms_milli_opt(23, 59, 59, 999).unwrap();
        (local_to_utc(start, tz), local_to_utc(end, tz))
    }

    /// The local Sunday this window starts on. For week 1 of a year whose
    /// January 1 is not a Sunday, this falls in the previous December.
    pub fn start_date(self) -> NaiveDate {
        let jan1 = NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap();
        let lead = jan1.weekday().num_days_from_sunday() as u64;
        jan1 + Days::new((self.week as u64 - 1) * 7) - Days::new(lead)
    }

    /// The deadline timestamp for work committed in this window: the
    /// Saturday 23:59:59.999 boundary.
    pub fn default_deadline(self, tz: FixedOffset) -> DateTime<Utc> {
        self.boundaries(tz).1
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl std::str::FromStr for WeekId {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = week_re()
            .captures(s)
            .ok_or_else(|| CadenceError::InvalidWeekId(s.to_string()))?;
        let year: i32 = caps[1].parse().unwrap();
        let week: u32 = caps[2].parse().unwrap();
        if week == 0 || week > 54 {
            return Err(CadenceError::InvalidWeekId(s.to_string()));
        }
        Ok(WeekId { year, week })
    }
}

impl Serialize for WeekId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Day helpers
// ---------------------------------------------------------------------------

/// The calendar date of `now` in the reference timezone.
pub fn local_date(now: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Parse a `YYYY-MM-DD` local date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CadenceError::InvalidDate(s.to_string()))
}

pub fn next_date(date: NaiveDate) -> NaiveDate {
    date + Days::new(1)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// Day-of-week index with Sunday = 0, matching the nudge policy's thresholds.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Whole days from `date` to the Saturday that closes its week (0 on Saturday).
pub fn days_until_saturday(date: NaiveDate) -> u32 {
    6 - day_of_week(date)
}

fn local_to_utc(naive: NaiveDateTime, tz: FixedOffset) -> DateTime<Utc> {
    let utc_naive = naive - Duration::seconds(tz.local_minus_utc() as i64);
    DateTime::from_naive_utc_and_offset(utc_naive, Utc)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
