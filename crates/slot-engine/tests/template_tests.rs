//! Tests for template validation, wire format and pre-save checks.

use slot_engine::{validate_all, SlotError, SlotTemplate, TimeOfDay, WeekdaySet};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn time(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn days(indices: &[u8]) -> WeekdaySet {
    WeekdaySet::from_indices(indices.iter().copied()).unwrap()
}

fn template(doctor: &str, indices: &[u8], start: &str, end: &str, duration: i64) -> SlotTemplate {
    SlotTemplate::new(doctor, days(indices), time(start), time(end), duration).unwrap()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn rejects_non_positive_duration() {
    for duration in [0, -15] {
        let result = SlotTemplate::new("d1", days(&[1]), time("09:00"), time("10:00"), duration);
        assert!(matches!(result, Err(SlotError::InvalidDuration(d)) if d == duration));
    }
}

#[test]
fn rejects_blank_doctor() {
    let result = SlotTemplate::new("  ", days(&[1]), time("09:00"), time("10:00"), 30);
    assert!(matches!(result, Err(SlotError::MissingField("doctorId"))));
}

#[test]
fn inverted_window_is_constructible_but_empty() {
    let t = template("d1", &[1], "10:00", "09:00", 30);
    assert_eq!(t.window_minutes(), 0);
    assert_eq!(t.slots_per_day(), 0);
}

#[test]
fn slots_per_day_floors() {
    assert_eq!(template("d1", &[1], "09:00", "10:00", 30).slots_per_day(), 2);
    assert_eq!(template("d1", &[1], "09:00", "09:45", 30).slots_per_day(), 1);
    assert_eq!(template("d1", &[1], "09:00", "17:00", 25).slots_per_day(), 19);
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn deserializes_ui_shape() {
    let json = r#"{
        "id": "tpl1",
        "doctorId": "d1",
        "name": "Mornings",
        "daysOfWeek": [1, 3, 5],
        "startTime": "09:00",
        "endTime": "12:00",
        "slotDuration": 30
    }"#;
    let t: SlotTemplate = serde_json::from_str(json).unwrap();
    assert_eq!(t.id(), Some("tpl1"));
    assert_eq!(t.name(), Some("Mornings"));
    assert_eq!(t.doctor_id(), "d1");
    assert_eq!(t.days_of_week(), days(&[1, 3, 5]));
    assert_eq!(t.slot_duration_minutes(), 30);
    assert!(t.is_active());
}

#[test]
fn deserializes_backend_shape() {
    let json = r#"{"id":7,"doctorId":42,"daysOfWeek":[2],"startTime":"14:00:00","endTime":"18:00:00","slotDurationMinutes":15,"active":false}"#;
    let t: SlotTemplate = serde_json::from_str(json).unwrap();
    assert_eq!(t.id(), Some("7"));
    assert_eq!(t.doctor_id(), "42");
    assert_eq!(t.start_time(), time("14:00"));
    assert!(!t.is_active());
}

#[test]
fn rejects_missing_fields() {
    let json = r#"{"doctorId":"d1","daysOfWeek":[1],"startTime":"09:00","slotDurationMinutes":30}"#;
    let err = serde_json::from_str::<SlotTemplate>(json).unwrap_err();
    assert!(err.to_string().contains("endTime"), "{err}");
}

#[test]
fn rejects_string_weekday_indices() {
    let json = r#"{"doctorId":"d1","daysOfWeek":["1"],"startTime":"09:00","endTime":"10:00","slotDurationMinutes":30}"#;
    assert!(serde_json::from_str::<SlotTemplate>(json).is_err());
}

#[test]
fn rejects_out_of_range_weekday() {
    let json = r#"{"doctorId":"d1","daysOfWeek":[7],"startTime":"09:00","endTime":"10:00","slotDurationMinutes":30}"#;
    let err = serde_json::from_str::<SlotTemplate>(json).unwrap_err();
    assert!(err.to_string().contains("weekday"), "{err}");
}

#[test]
fn rejects_malformed_time() {
    let json = r#"{"doctorId":"d1","daysOfWeek":[1],"startTime":"9am","endTime":"10:00","slotDurationMinutes":30}"#;
    assert!(serde_json::from_str::<SlotTemplate>(json).is_err());
}

#[test]
fn serializes_back_to_camel_case() {
    let t = template("d1", &[5, 1], "09:00", "10:00", 30).with_id("tpl1");
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "tpl1",
            "doctorId": "d1",
            "daysOfWeek": [1, 5],
            "startTime": "09:00",
            "endTime": "10:00",
            "slotDurationMinutes": 30,
            "active": true
        })
    );
    let back: SlotTemplate = serde_json::from_value(json).unwrap();
    assert_eq!(back, t);
}

// ---------------------------------------------------------------------------
// Pre-save checks
// ---------------------------------------------------------------------------

#[test]
fn storable_rejects_inverted_window() {
    let t = template("d1", &[1], "10:00", "10:00", 30);
    assert!(matches!(
        t.ensure_storable(&[]),
        Err(SlotError::WindowInverted { .. })
    ));
}

#[test]
fn storable_rejects_window_shorter_than_one_slot() {
    let t = template("d1", &[1], "09:00", "09:20", 30);
    assert!(matches!(
        t.ensure_storable(&[]),
        Err(SlotError::WindowTooShort { duration: 30, window: 20 })
    ));
}

#[test]
fn storable_rejects_overlap_on_shared_weekday() {
    let existing = [template("d1", &[1, 3], "09:00", "12:00", 30)];
    let candidate = template("d1", &[3, 5], "11:00", "13:00", 30);
    assert!(matches!(
        candidate.ensure_storable(&existing),
        Err(SlotError::Overlap { .. })
    ));
}

#[test]
fn storable_allows_touching_windows_other_days_and_other_doctors() {
    let existing = [
        template("d1", &[1], "09:00", "12:00", 30),
        template("d2", &[2], "09:00", "12:00", 30),
    ];
    // Touches the end of the Monday window.
    assert!(template("d1", &[1], "12:00", "13:00", 30).ensure_storable(&existing).is_ok());
    // Same hours, different weekday.
    assert!(template("d1", &[2], "09:00", "12:00", 30).ensure_storable(&existing).is_ok());
    // Same weekday and hours, different doctor.
    assert!(template("d3", &[1], "09:00", "12:00", 30).ensure_storable(&existing).is_ok());
}

#[test]
fn storable_skips_the_record_being_updated() {
    let existing = [template("d1", &[1], "09:00", "12:00", 30).with_id("tpl1")];
    let update = template("d1", &[1], "10:00", "13:00", 30).with_id("tpl1");
    assert!(update.ensure_storable(&existing).is_ok());

    let other = template("d1", &[1], "10:00", "13:00", 30).with_id("tpl2");
    assert!(other.ensure_storable(&existing).is_err());
}

#[test]
fn validate_all_reports_each_offender_by_position() {
    let templates = [
        template("d1", &[1], "09:00", "12:00", 30),
        template("d1", &[1], "11:30", "13:00", 30),
        template("d1", &[2], "09:00", "09:10", 30),
        template("d2", &[1], "09:00", "12:00", 30),
    ];
    let issues = validate_all(&templates);
    let positions: Vec<usize> = issues.iter().map(|i| i.index).collect();
    assert_eq!(positions, vec![1, 2]);
    assert!(matches!(issues[0].error, SlotError::Overlap { .. }));
    assert!(matches!(issues[1].error, SlotError::WindowTooShort { .. }));
}
