//! Weekday indices and compact weekday sets.
//!
//! Templates name their active days with integer indices, 0 = Sunday through
//! 6 = Saturday. A [`WeekdaySet`] stores those days as a seven-bit mask.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SlotError};

/// Weekday index of a calendar date, 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Convert a weekday index (0 = Sunday) into a chrono [`Weekday`].
///
/// # Errors
/// Returns `SlotError::InvalidWeekday` for anything outside `0..=6`.
pub fn weekday_from_index(index: i64) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(SlotError::InvalidWeekday(other)),
    }
}

/// A set of weekdays.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Build a set from weekday indices. Duplicates are harmless.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidWeekday` on the first index outside `0..=6`.
    pub fn from_indices<I>(indices: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let mut set = WeekdaySet::EMPTY;
        for index in indices {
            set.insert(weekday_from_index(index.into())?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_sunday();
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    pub fn contains_index(self, index: u8) -> bool {
        index < 7 && self.0 & (1 << index) != 0
    }

    /// Whether `date` falls on one of the days in this set.
    pub fn matches(self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn intersects(self, other: WeekdaySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Indices in the set, Sunday first.
    pub fn indices(self) -> impl Iterator<Item = u8> {
        (0u8..7).filter(move |i| self.contains_index(*i))
    }
}

impl fmt::Debug for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.indices()).finish()
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.indices())
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct IndicesVisitor;

        impl<'de> Visitor<'de> for IndicesVisitor {
            type Value = WeekdaySet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of weekday indices (0 = Sunday .. 6 = Saturday)")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<WeekdaySet, A::Error> {
                let mut set = WeekdaySet::EMPTY;
                // i64 elements: a quoted "1" is a type error, not a weekday.
                while let Some(index) = seq.next_element::<i64>()? {
                    set.insert(weekday_from_index(index).map_err(de::Error::custom)?);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(IndicesVisitor)
    }
}
