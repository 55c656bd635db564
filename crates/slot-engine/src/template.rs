//! Recurring weekly availability templates.
//!
//! A [`SlotTemplate`] says "doctor D sees patients on these weekdays between
//! `start_time` and `end_time`, in blocks of `slot_duration_minutes`". Values
//! are only created through validation, so the expander never has to second
//! guess its input.

use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;
use crate::error::{Result, SlotError};
use crate::weekday::WeekdaySet;

/// A validated weekly availability rule for one doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateInput", rename_all = "camelCase")]
pub struct SlotTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    doctor_id: String,
    days_of_week: WeekdaySet,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    slot_duration_minutes: u32,
    active: bool,
}

impl SlotTemplate {
    /// Validate and build a template.
    ///
    /// An inverted or too-short window is accepted here; it simply expands to
    /// no slots. Use [`SlotTemplate::ensure_storable`] before persisting.
    ///
    /// # Errors
    /// - `SlotError::MissingField` if `doctor_id` is blank.
    /// - `SlotError::InvalidDuration` if `slot_duration_minutes` is not positive.
    pub fn new(
        doctor_id: impl Into<String>,
        days_of_week: WeekdaySet,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        slot_duration_minutes: i64,
    ) -> Result<Self> {
        let doctor_id = doctor_id.into();
        if doctor_id.trim().is_empty() {
            return Err(SlotError::MissingField("doctorId"));
        }
        let slot_duration_minutes = u32::try_from(slot_duration_minutes)
            .ok()
            .filter(|d| *d > 0)
            .ok_or(SlotError::InvalidDuration(slot_duration_minutes))?;

        Ok(SlotTemplate {
            id: None,
            name: None,
            doctor_id,
            days_of_week,
            start_time,
            end_time,
            slot_duration_minutes,
            active: true,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn days_of_week(&self) -> WeekdaySet {
        self.days_of_week
    }

    pub fn start_time(&self) -> TimeOfDay {
        self.start_time
    }

    pub fn end_time(&self) -> TimeOfDay {
        self.end_time
    }

    pub fn slot_duration_minutes(&self) -> u32 {
        self.slot_duration_minutes
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Length of the daily window in minutes; 0 when the window is inverted.
    pub fn window_minutes(&self) -> u32 {
        self.end_time
            .minutes()
            .saturating_sub(self.start_time.minutes())
    }

    /// Number of slots the template yields on each qualifying date.
    pub fn slots_per_day(&self) -> u32 {
        self.window_minutes() / self.slot_duration_minutes
    }

    /// Whether the daily windows of `self` and `other` share any minute.
    ///
    /// Windows that merely touch (one ends when the other starts) do not overlap.
    pub fn window_overlaps(&self, other: &SlotTemplate) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Checks applied before a template is saved alongside `existing` ones.
    ///
    /// Rejects, in order: an inverted window, a window shorter than one slot,
    /// and an overlap with another template of the same doctor on a shared
    /// weekday. A template in `existing` carrying the same `id` is the one
    /// being updated and is skipped.
    pub fn ensure_storable(&self, existing: &[SlotTemplate]) -> Result<()> {
        if self.start_time >= self.end_time {
            return Err(SlotError::WindowInverted {
                start: self.start_time.to_string(),
                end: self.end_time.to_string(),
            });
        }
        if self.window_minutes() < self.slot_duration_minutes {
            return Err(SlotError::WindowTooShort {
                duration: self.slot_duration_minutes,
                window: self.window_minutes(),
            });
        }

        let conflict = existing.iter().find(|other| {
            let same_record = self.id.is_some() && self.id == other.id;
            !same_record
                && other.doctor_id == self.doctor_id
                && other.days_of_week.intersects(self.days_of_week)
                && self.window_overlaps(other)
        });

        match conflict {
            Some(other) => Err(SlotError::Overlap {
                doctor_id: self.doctor_id.clone(),
                start: self.start_time.to_string(),
                end: self.end_time.to_string(),
                other_start: other.start_time.to_string(),
                other_end: other.end_time.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A problem found by [`validate_all`].
#[derive(Debug)]
pub struct TemplateIssue {
    /// Position of the offending template in the input slice.
    pub index: usize,
    pub error: SlotError,
}

/// Run [`SlotTemplate::ensure_storable`] over a whole set, as if each template
/// were saved in order after the ones before it.
pub fn validate_all(templates: &[SlotTemplate]) -> Vec<TemplateIssue> {
    templates
        .iter()
        .enumerate()
        .filter_map(|(index, template)| {
            template
                .ensure_storable(&templates[..index])
                .err()
                .map(|error| TemplateIssue { index, error })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Identifiers arrive as strings from the UI and as numbers from the backend.
#[derive(Deserialize)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Number(u64),
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        match id {
            Identifier::Text(s) => s,
            Identifier::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateInput {
    #[serde(default)]
    id: Option<Identifier>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    doctor_id: Option<Identifier>,
    #[serde(default)]
    days_of_week: Option<WeekdaySet>,
    #[serde(default)]
    start_time: Option<TimeOfDay>,
    #[serde(default)]
    end_time: Option<TimeOfDay>,
    #[serde(default, alias = "slotDuration")]
    slot_duration_minutes: Option<i64>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<TemplateInput> for SlotTemplate {
    type Error = SlotError;

    fn try_from(input: TemplateInput) -> Result<Self> {
        let doctor_id: String = input
            .doctor_id
            .ok_or(SlotError::MissingField("doctorId"))?
            .into();
        let days = input
            .days_of_week
            .ok_or(SlotError::MissingField("daysOfWeek"))?;
        let start = input.start_time.ok_or(SlotError::MissingField("startTime"))?;
        let end = input.end_time.ok_or(SlotError::MissingField("endTime"))?;
        let duration = input
            .slot_duration_minutes
            .ok_or(SlotError::MissingField("slotDurationMinutes"))?;

        let mut template = SlotTemplate::new(doctor_id, days, start, end, duration)?
            .with_active(input.active);
        template.id = input.id.map(String::from);
        template.name = input.name;
        Ok(template)
    }
}
