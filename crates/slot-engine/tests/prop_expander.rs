//! Property-based tests for template expansion using proptest.
//!
//! These check laws that must hold for *any* valid template and range, not
//! just the hand-picked cases in `expander_tests.rs`.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use slot_engine::{expand_template, weekday_index, SlotTemplate, TimeOfDay, WeekdaySet};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_days() -> impl Strategy<Value = WeekdaySet> {
    prop::collection::vec(0u8..7, 0..=7)
        .prop_map(|indices| WeekdaySet::from_indices(indices).unwrap())
}

/// Start and end anywhere in the day, including inverted windows.
fn arb_window() -> impl Strategy<Value = (TimeOfDay, TimeOfDay)> {
    (0u32..=1440, 0u32..=1440).prop_map(|(a, b)| {
        (
            TimeOfDay::from_minutes(a).unwrap(),
            TimeOfDay::from_minutes(b).unwrap(),
        )
    })
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(20), Just(30), Just(45), Just(60), 1i64..=240]
}

fn arb_template() -> impl Strategy<Value = SlotTemplate> {
    (arb_days(), arb_window(), arb_duration()).prop_map(|(days, (start, end), duration)| {
        SlotTemplate::new("d1", days, start, end, duration).unwrap()
    })
}

/// A range start in 2024-2027 and a span of up to ~6 weeks.
fn arb_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (0u64..1460, 0u64..45).prop_map(|(offset, span)| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let start = base.checked_add_days(Days::new(offset)).unwrap();
        let end = start.checked_add_days(Days::new(span)).unwrap();
        (start, end)
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------
    #[test]
    fn expansion_is_deterministic(t in arb_template(), (start, end) in arb_range()) {
        prop_assert_eq!(expand_template(&t, start, end), expand_template(&t, start, end));
    }

    // -----------------------------------------------------------------------
    // Ordering: by date, then by start time, strictly increasing
    // -----------------------------------------------------------------------
    #[test]
    fn expansion_is_strictly_ordered(t in arb_template(), (start, end) in arb_range()) {
        let slots = expand_template(&t, start, end);
        for pair in slots.windows(2) {
            prop_assert!(
                (pair[0].date, pair[0].start_time) < (pair[1].date, pair[1].start_time),
                "out of order: {:?} then {:?}", pair[0], pair[1]
            );
        }
    }

    // -----------------------------------------------------------------------
    // No overrun: every slot ends at or before the template end
    // -----------------------------------------------------------------------
    #[test]
    fn no_slot_overruns_the_window(t in arb_template(), (start, end) in arb_range()) {
        for slot in expand_template(&t, start, end) {
            prop_assert!(slot.start_time >= t.start_time());
            prop_assert!(slot.end_time <= t.end_time());
            prop_assert_eq!(
                slot.end_time.minutes() - slot.start_time.minutes(),
                t.slot_duration_minutes()
            );
        }
    }

    // -----------------------------------------------------------------------
    // Weekday filtering and range bounds
    // -----------------------------------------------------------------------
    #[test]
    fn only_template_weekdays_inside_the_range(t in arb_template(), (start, end) in arb_range()) {
        for slot in expand_template(&t, start, end) {
            prop_assert!(slot.date >= start && slot.date <= end);
            prop_assert!(t.days_of_week().contains_index(weekday_index(slot.date)));
        }
    }

    // -----------------------------------------------------------------------
    // Count law: per qualifying date, floor(window / duration) slots
    // -----------------------------------------------------------------------
    #[test]
    fn count_matches_qualifying_days_times_steps(t in arb_template(), (start, end) in arb_range()) {
        let qualifying = start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| t.days_of_week().matches(*d))
            .count();
        let expected = qualifying * t.slots_per_day() as usize;
        prop_assert_eq!(expand_template(&t, start, end).len(), expected);
    }

    // -----------------------------------------------------------------------
    // Empty-window law
    // -----------------------------------------------------------------------
    #[test]
    fn too_short_window_yields_nothing(t in arb_template(), (start, end) in arb_range()) {
        if t.window_minutes() < t.slot_duration_minutes() {
            prop_assert!(expand_template(&t, start, end).is_empty());
        }
    }

    // -----------------------------------------------------------------------
    // Reversed ranges are empty, not errors
    // -----------------------------------------------------------------------
    #[test]
    fn reversed_range_is_empty(t in arb_template(), (start, end) in arb_range()) {
        if start < end {
            prop_assert!(expand_template(&t, end, start).is_empty());
        }
    }

    // -----------------------------------------------------------------------
    // Splitting the range does not change the result
    // -----------------------------------------------------------------------
    #[test]
    fn split_range_concatenates(t in arb_template(), (start, end) in arb_range()) {
        if let Some(next) = start.succ_opt() {
            if next <= end {
                let mut split = expand_template(&t, start, start);
                split.extend(expand_template(&t, next, end));
                prop_assert_eq!(split, expand_template(&t, start, end));
            }
        }
    }
}
