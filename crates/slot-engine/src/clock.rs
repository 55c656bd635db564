//! Time-of-day values and calendar-date parsing.
//!
//! Templates and slots carry wall-clock times as whole minutes since midnight.
//! Strings only appear at the edges: `"HH:MM"` for templates, 12-hour labels
//! such as `"9:30 AM"` for the slots shown to patients.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SlotError};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day, stored as minutes since midnight.
///
/// The valid range is `0..=1440`. The upper bound is only reachable through
/// `"24:00"` and marks the end of the day, so a template may run until midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// 00:00.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    /// 24:00, the exclusive end of a calendar day.
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY as u16);

    /// Build a time from minutes since midnight.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTime` when `minutes` exceeds 1440.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidTime(format!(
                "{} minutes past midnight",
                minutes
            )));
        }
        Ok(TimeOfDay(minutes as u16))
    }

    /// Build a time from a 24-hour clock reading.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTime` for hours above 24, minutes above 59,
    /// or any `24:MM` other than `24:00`.
    pub fn hm(hour: u32, minute: u32) -> Result<Self> {
        if hour > 24 || minute > 59 || (hour == 24 && minute != 0) {
            return Err(SlotError::InvalidTime(format!("{}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Advance by `minutes`, or `None` if the result would pass 24:00.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<TimeOfDay> {
        let total = self.minutes().checked_add(minutes)?;
        (total <= MINUTES_PER_DAY).then_some(TimeOfDay(total as u16))
    }

    /// Render as the 12-hour label shown in the booking screens.
    ///
    /// ```
    /// use slot_engine::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::hm(9, 0).unwrap().to_12h_label(), "9:00 AM");
    /// assert_eq!(TimeOfDay::hm(12, 30).unwrap().to_12h_label(), "12:30 PM");
    /// assert_eq!(TimeOfDay::MIDNIGHT.to_12h_label(), "12:00 AM");
    /// ```
    pub fn to_12h_label(self) -> String {
        let hour = self.hour() % 24;
        let suffix = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, self.minute(), suffix)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    /// Accepts `"HH:MM"`, `"HH:MM:00"` and `"H:MM AM"` / `"H:MM PM"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidTime(s.to_string());

        let upper = s.trim().to_ascii_uppercase();
        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let mut parts = clock.split(':');
        let hour = parts.next().and_then(|p| digits(p, 1..=2)).ok_or_else(invalid)?;
        let minute = parts.next().and_then(|p| digits(p, 2..=2)).ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            if seconds != "00" {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        match meridiem {
            None => TimeOfDay::hm(hour, minute).map_err(|_| invalid()),
            Some(pm) => {
                if !(1..=12).contains(&hour) || minute > 59 {
                    return Err(invalid());
                }
                let hour24 = hour % 12 + if pm { 12 } else { 0 };
                TimeOfDay::hm(hour24, minute)
            }
        }
    }
}

/// Parse an all-ASCII-digit component whose length falls in `len`.
fn digits(part: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter that writes a [`TimeOfDay`] as its 12-hour label.
///
/// Use with `#[serde(with = "slot_engine::clock::twelve_hour")]`. Reading
/// accepts every format [`TimeOfDay::from_str`] does.
pub mod twelve_hour {
    use super::TimeOfDay;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &TimeOfDay,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.to_12h_label())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<TimeOfDay, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a strict ISO calendar date (`YYYY-MM-DD`).
///
/// # Errors
/// Returns `SlotError::InvalidDate` for any other shape or an impossible date
/// such as `2025-02-30`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(SlotError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| SlotError::InvalidDate(s.to_string()))
}
