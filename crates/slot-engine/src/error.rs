//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid weekday index: {0} (expected 0 = Sunday through 6 = Saturday)")]
    InvalidWeekday(i64),

    #[error("Invalid slot duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    /// The input was not valid JSON, or a record inside it failed validation.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Start time {start} must be before end time {end}")]
    WindowInverted { start: String, end: String },

    #[error("Slot duration of {duration} minutes does not fit the {window}-minute template window")]
    WindowTooShort { duration: u32, window: u32 },

    #[error("Template {start}-{end} overlaps an existing template {other_start}-{other_end} for doctor {doctor_id}")]
    Overlap {
        doctor_id: String,
        start: String,
        end: String,
        other_start: String,
        other_end: String,
    },
}

pub type Result<T> = std::result::Result<T, SlotError>;
