//! Template expansion -- turns a weekly [`SlotTemplate`] into concrete slots.
//!
//! Dates are calendar-naive: a range is walked one `NaiveDate` at a time, so
//! daylight-saving transitions can neither skip nor repeat a day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{self, TimeOfDay};
use crate::error::Result;
use crate::template::SlotTemplate;

/// A single bookable appointment opportunity.
///
/// Slots never cross midnight, so a slot ending at 24:00 is written with the
/// end label `"12:00 AM"` and read back as [`TimeOfDay::END_OF_DAY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SlotRecord", rename_all = "camelCase")]
pub struct Slot {
    /// Assigned by whatever persists the slot; expansion leaves it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub doctor_id: String,
    pub date: NaiveDate,
    /// Start of the slot, written as a 12-hour label (`"9:30 AM"`).
    #[serde(rename = "time", with = "clock::twelve_hour")]
    pub start_time: TimeOfDay,
    #[serde(with = "clock::twelve_hour")]
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub is_booked: bool,
}

/// Wire form of a [`Slot`] before the end-of-day fix-up.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRecord {
    #[serde(default)]
    id: Option<String>,
    doctor_id: String,
    date: NaiveDate,
    #[serde(rename = "time", with = "clock::twelve_hour")]
    start_time: TimeOfDay,
    #[serde(with = "clock::twelve_hour")]
    end_time: TimeOfDay,
    #[serde(default)]
    is_booked: bool,
}

impl From<SlotRecord> for Slot {
    fn from(record: SlotRecord) -> Self {
        // "12:00 AM" after a later start time is the end of the same day.
        let end_time = if record.end_time == TimeOfDay::MIDNIGHT
            && record.start_time > TimeOfDay::MIDNIGHT
        {
            TimeOfDay::END_OF_DAY
        } else {
            record.end_time
        };
        Slot {
            id: record.id,
            doctor_id: record.doctor_id,
            date: record.date,
            start_time: record.start_time,
            end_time,
            is_booked: record.is_booked,
        }
    }
}

impl Slot {
    /// Key used to recognise the same slot across regenerations.
    pub fn key(&self) -> (&str, NaiveDate, TimeOfDay) {
        (&self.doctor_id, self.date, self.start_time)
    }

    /// The 12-hour label of the start time.
    pub fn time_label(&self) -> String {
        self.start_time.to_12h_label()
    }
}

/// Expand one template over the inclusive date range `[range_start, range_end]`.
///
/// For each date whose weekday is in the template, emits slots starting at
/// `start_time` and stepping by the slot duration while the slot still ends
/// at or before `end_time`. A trailing partial slot is dropped.
///
/// The result is ordered by date, then start time. Empty results are not
/// errors: an empty weekday set, a reversed range, or a window shorter than
/// one slot all yield `vec![]`.
///
/// The template's `active` flag is not consulted here; see
/// [`expand_templates`].
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use slot_engine::{expand_template, SlotTemplate, TimeOfDay, WeekdaySet};
///
/// let template = SlotTemplate::new(
///     "d1",
///     WeekdaySet::from_indices([1u8]).unwrap(), // Mondays
///     TimeOfDay::hm(9, 0).unwrap(),
///     TimeOfDay::hm(10, 0).unwrap(),
///     30,
/// )
/// .unwrap();
///
/// let monday = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
/// let slots = expand_template(&template, monday, monday);
/// let labels: Vec<String> = slots.iter().map(|s| s.time_label()).collect();
/// assert_eq!(labels, ["9:00 AM", "9:30 AM"]);
/// ```
pub fn expand_template(
    template: &SlotTemplate,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<Slot> {
    let days = template.days_of_week();
    if days.is_empty() || range_start > range_end {
        return Vec::new();
    }

    let per_day = template.slots_per_day() as usize;
    if per_day == 0 {
        return Vec::new();
    }

    let duration = template.slot_duration_minutes();
    let end_minute = template.end_time().minutes();

    let mut slots = Vec::new();
    for date in range_start
        .iter_days()
        .take_while(|d| *d <= range_end)
        .filter(|d| days.matches(*d))
    {
        slots.reserve(per_day);
        let mut cursor = template.start_time();
        while let Some(slot_end) = cursor.checked_add_minutes(duration) {
            if slot_end.minutes() > end_minute {
                break;
            }
            slots.push(Slot {
                id: None,
                doctor_id: template.doctor_id().to_string(),
                date,
                start_time: cursor,
                end_time: slot_end,
                is_booked: false,
            });
            cursor = slot_end;
        }
    }

    slots
}

/// Expand every *active* template over the range and merge the results.
///
/// A doctor may have several template ranges on the same day. The union is
/// ordered by (date, start time, doctor id), and when two templates produce
/// a slot with the same doctor, date and start time only the first is kept.
pub fn expand_templates(
    templates: &[SlotTemplate],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<Slot> {
    let mut slots: Vec<Slot> = templates
        .iter()
        .filter(|t| t.is_active())
        .flat_map(|t| expand_template(t, range_start, range_end))
        .collect();

    sort_and_dedup(&mut slots);
    slots
}

/// Order slots by (date, start, doctor) and drop repeats of the same key.
pub(crate) fn sort_and_dedup(slots: &mut Vec<Slot>) {
    // Stable sort: among duplicates, the slot from the earlier template wins.
    slots.sort_by(|a, b| {
        (a.date, a.start_time, &a.doctor_id).cmp(&(b.date, b.start_time, &b.doctor_id))
    });
    slots.dedup_by(|later, earlier| later.key() == earlier.key());
}

/// Parse-and-expand entry point for callers holding raw strings.
///
/// `template_json` is a single template object; `range_start` and `range_end`
/// are ISO dates. All three are validated before expansion begins, so a
/// malformed input never produces a partial result.
///
/// # Errors
/// - `SlotError::Json` if the template is not valid JSON or fails validation.
/// - `SlotError::InvalidDate` if either bound is not a `YYYY-MM-DD` date.
pub fn expand_template_json(
    template_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<Vec<Slot>> {
    let template: SlotTemplate = serde_json::from_str(template_json)?;
    let start = clock::parse_date(range_start)?;
    let end = clock::parse_date(range_end)?;
    Ok(expand_template(&template, start, end))
}
