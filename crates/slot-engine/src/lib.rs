//! # slot-engine
//!
//! Deterministic expansion of weekly availability templates into bookable
//! appointment slots.
//!
//! A doctor's availability is described once as a [`SlotTemplate`] (weekdays,
//! a daily time window, a slot length). The engine materialises the concrete
//! slots that template implies over any date range. Everything is a pure,
//! synchronous computation: no I/O, no clock reads, no shared state.
//!
//! ## Modules
//!
//! - [`clock`] — minutes-since-midnight time values, 12-hour labels, ISO dates
//! - [`weekday`] — weekday indices (0 = Sunday) and weekday sets
//! - [`template`] — validated `SlotTemplate` values and pre-save checks
//! - [`expander`] — template → ordered list of `Slot`s
//! - [`schedule`] — rolling "next N days" generation with leave days
//! - [`occupancy`] — mark slots booked from appointments, count free slots
//! - [`error`] — Error types

pub mod clock;
pub mod error;
pub mod expander;
pub mod occupancy;
pub mod schedule;
pub mod template;
pub mod weekday;

pub use clock::{parse_date, TimeOfDay};
pub use error::SlotError;
pub use expander::{expand_template, expand_template_json, expand_templates, Slot};
pub use occupancy::{count_free, mark_occupied, Appointment, AppointmentStatus};
pub use schedule::{exclude_persisted, generate_upcoming, GeneratorConfig, Leave};
pub use template::{validate_all, SlotTemplate, TemplateIssue};
pub use weekday::{weekday_index, WeekdaySet};
