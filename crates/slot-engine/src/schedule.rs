//! Rolling generation window.
//!
//! A scheduled job keeps the next `days_ahead` days of slots materialised for
//! every doctor. Leave days are skipped, and slots that already exist are not
//! created twice.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::TimeOfDay;
use crate::expander::{self, Slot};
use crate::template::SlotTemplate;

/// Default number of days, starting today, kept materialised.
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// Settings for [`generate_upcoming`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// How many days, counting today, to generate slots for.
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
}

fn default_days_ahead() -> u32 {
    DEFAULT_DAYS_AHEAD
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            days_ahead: DEFAULT_DAYS_AHEAD,
        }
    }
}

/// A day on which a doctor takes no appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub doctor_id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Inclusive date range covered by a generation run starting on `today`.
///
/// Returns `None` when `days_ahead` is zero or the range would run past the
/// end of the calendar.
pub fn generation_window(today: NaiveDate, config: &GeneratorConfig) -> Option<(NaiveDate, NaiveDate)> {
    let last_offset = config.days_ahead.checked_sub(1)?;
    let end = today.checked_add_days(Days::new(u64::from(last_offset)))?;
    Some((today, end))
}

/// Generate slots for the next `config.days_ahead` days, starting with `today`.
///
/// Only active templates are expanded. Every slot falling on an active leave
/// of its doctor is dropped. Output ordering and duplicate handling match
/// [`expander::expand_templates`].
pub fn generate_upcoming(
    templates: &[SlotTemplate],
    leaves: &[Leave],
    today: NaiveDate,
    config: &GeneratorConfig,
) -> Vec<Slot> {
    let Some((start, end)) = generation_window(today, config) else {
        if config.days_ahead == 0 {
            debug!("days_ahead is 0, nothing to generate");
        } else {
            warn!(
                %today,
                days_ahead = config.days_ahead,
                "generation window runs past the last representable date, nothing generated"
            );
        }
        return Vec::new();
    };
    info!(%start, %end, templates = templates.len(), "generating slots");

    let on_leave: HashSet<(&str, NaiveDate)> = leaves
        .iter()
        .filter(|l| l.active && l.date >= start && l.date <= end)
        .map(|l| (l.doctor_id.as_str(), l.date))
        .collect();
    for (doctor_id, date) in &on_leave {
        debug!(doctor_id, %date, "skipping slot generation for leave day");
    }

    let mut slots = expander::expand_templates(templates, start, end);
    slots.retain(|s| !on_leave.contains(&(s.doctor_id.as_str(), s.date)));

    info!(count = slots.len(), "finished generating slots");
    slots
}

/// Drop generated slots that already exist in `existing`.
///
/// Two slots are the same when doctor, date and start time agree; booking
/// state and ids are ignored. Order of `generated` is preserved.
pub fn exclude_persisted(generated: Vec<Slot>, existing: &[Slot]) -> Vec<Slot> {
    let known: HashSet<(&str, NaiveDate, TimeOfDay)> = existing.iter().map(Slot::key).collect();
    let before = generated.len();
    let fresh: Vec<Slot> = generated
        .into_iter()
        .filter(|s| !known.contains(&s.key()))
        .collect();
    debug!(
        skipped = before - fresh.len(),
        kept = fresh.len(),
        "excluded already persisted slots"
    );
    fresh
}
