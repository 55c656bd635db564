//! WASM bindings for slot-engine.
//!
//! Exposes template expansion and occupancy marking to the booking frontend
//! via `wasm-bindgen`. Every complex value crosses the boundary as a JSON
//! string, in the same camelCase shapes the REST backend uses.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::Deserialize;
use slot_engine::{Appointment, GeneratorConfig, Leave, Slot, SlotTemplate};
use wasm_bindgen::prelude::*;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse<T: for<'de> Deserialize<'de>>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// Expand one template over an inclusive date range.
///
/// `template_json` is a single template object; `range_start` and
/// `range_end` are `YYYY-MM-DD` dates. Returns a JSON array of slots
/// (`time` / `endTime` as 12-hour labels). Throws on malformed input; an
/// empty array is a valid answer, not an error.
#[wasm_bindgen(js_name = expandTemplate)]
pub fn expand_template(
    template_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, JsValue> {
    let slots = slot_engine::expand_template_json(template_json, range_start, range_end)
        .map_err(to_js_error)?;
    serde_json::to_string(&slots).map_err(to_js_error)
}

/// Expand every active template in a JSON array and merge the result.
#[wasm_bindgen(js_name = expandTemplates)]
pub fn expand_templates(
    templates_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, JsValue> {
    let templates: Vec<SlotTemplate> = parse(templates_json, "templates")?;
    let start = slot_engine::parse_date(range_start).map_err(to_js_error)?;
    let end = slot_engine::parse_date(range_end).map_err(to_js_error)?;
    let slots = slot_engine::expand_templates(&templates, start, end);
    serde_json::to_string(&slots).map_err(to_js_error)
}

/// Generate the upcoming window of slots starting on `today`.
///
/// `config_json` may be an empty string to use the default window.
#[wasm_bindgen(js_name = generateUpcoming)]
pub fn generate_upcoming(
    templates_json: &str,
    leaves_json: &str,
    today: &str,
    config_json: &str,
) -> Result<String, JsValue> {
    let templates: Vec<SlotTemplate> = parse(templates_json, "templates")?;
    let leaves: Vec<Leave> = parse(leaves_json, "leaves")?;
    let today = slot_engine::parse_date(today).map_err(to_js_error)?;
    let config: GeneratorConfig = if config_json.trim().is_empty() {
        GeneratorConfig::default()
    } else {
        parse(config_json, "generator config")?
    };
    let slots = slot_engine::generate_upcoming(&templates, &leaves, today, &config);
    serde_json::to_string(&slots).map_err(to_js_error)
}

/// Mark slots booked from a list of appointments; returns the updated slots.
#[wasm_bindgen(js_name = markOccupied)]
pub fn mark_occupied(slots_json: &str, appointments_json: &str) -> Result<String, JsValue> {
    let mut slots: Vec<Slot> = parse(slots_json, "slots")?;
    let appointments: Vec<Appointment> = parse(appointments_json, "appointments")?;
    slot_engine::mark_occupied(&mut slots, &appointments);
    serde_json::to_string(&slots).map_err(to_js_error)
}
