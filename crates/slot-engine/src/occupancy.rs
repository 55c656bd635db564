//! Marking generated slots as booked from existing appointments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;
use crate::expander::Slot;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[serde(alias = "SCHEDULED")]
    Scheduled,
    #[serde(alias = "CHECKED_IN")]
    CheckedIn,
    #[serde(alias = "IN_PROGRESS")]
    InProgress,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "CANCELLED")]
    Cancelled,
}

impl AppointmentStatus {
    /// Whether an appointment in this state takes up its slot.
    ///
    /// Only a cancelled appointment releases the slot.
    pub fn occupies_slot(self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

/// The part of an appointment that matters for slot occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub status: AppointmentStatus,
}

/// Set `is_booked` on every slot holding an occupying appointment.
///
/// An appointment holds a slot when doctor and date match and its time falls
/// in `[slot.start_time, slot.end_time)`. Slots already booked stay booked.
/// Returns the number of slots that changed from free to booked.
pub fn mark_occupied(slots: &mut [Slot], appointments: &[Appointment]) -> usize {
    let mut changed = 0;
    for slot in slots.iter_mut().filter(|s| !s.is_booked) {
        let taken = appointments.iter().any(|a| {
            a.status.occupies_slot()
                && a.doctor_id == slot.doctor_id
                && a.date == slot.date
                && slot.start_time <= a.time
                && a.time < slot.end_time
        });
        if taken {
            slot.is_booked = true;
            changed += 1;
        }
    }
    changed
}

/// Number of unbooked slots for `doctor_id` on `date`.
pub fn count_free(slots: &[Slot], doctor_id: &str, date: NaiveDate) -> usize {
    slots
        .iter()
        .filter(|s| !s.is_booked && s.doctor_id == doctor_id && s.date == date)
        .count()
}
