//! `slots` CLI — expand, generate, and validate appointment slot templates.
//!
//! ## Usage
//!
//! ```sh
//! # Expand one template (or an array of templates) over a date range
//! slots expand --template template.json --from 2025-10-06 --to 2025-10-12
//!
//! # Read the template from stdin, print a table instead of JSON
//! cat template.json | slots expand --template - --from 2025-10-06 --to 2025-10-12 --format table
//!
//! # Rolling window: the next 7 days from --today, minus leave days,
//! # minus slots already persisted, with booked slots marked
//! slots generate --templates templates.json --today 2025-10-06 \
//!     --leaves leaves.json --existing slots.json --appointments appointments.json
//!
//! # Check a template set for inverted windows, short windows, and overlaps
//! slots validate --templates templates.json
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG` or pass `--verbose` for more.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use slot_engine::{GeneratorConfig, Slot, SlotTemplate};
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Expand weekly availability templates into bookable appointment slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug diagnostics to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a template (or an array of templates) over an inclusive date range
    Expand {
        /// Template JSON file, or "-" for stdin
        #[arg(short, long)]
        template: String,
        /// First date of the range (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        from: NaiveDate,
        /// Last date of the range, inclusive (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        to: NaiveDate,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Generate slots for the upcoming days, starting with --today
    Generate {
        /// JSON array of templates, or "-" for stdin
        #[arg(long)]
        templates: String,
        /// First day of the window (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        today: NaiveDate,
        /// Number of days to generate, counting today (overrides --config)
        #[arg(long)]
        days_ahead: Option<u32>,
        /// Generator settings as JSON, e.g. {"daysAhead": 14}
        #[arg(long)]
        config: Option<String>,
        /// JSON array of leave days to skip
        #[arg(long)]
        leaves: Option<String>,
        /// JSON array of slots that already exist; they are not emitted again
        #[arg(long)]
        existing: Option<String>,
        /// JSON array of appointments used to mark generated slots booked
        #[arg(long)]
        appointments: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check a template set the way it would be checked before saving
    Validate {
        /// JSON array of templates, or "-" for stdin
        #[arg(long)]
        templates: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Expand {
            template,
            from,
            to,
            format,
            output,
        } => {
            // A bare object is expanded as given; an array only expands its
            // active templates, however many it holds.
            let slots = match read_template_input(&template)? {
                TemplateInput::Single(single) => slot_engine::expand_template(&single, from, to),
                TemplateInput::Many(many) => slot_engine::expand_templates(&many, from, to),
            };
            info!(count = slots.len(), %from, %to, "expanded templates");
            write_output(output.as_deref(), &render(&slots, format)?)?;
        }
        Commands::Generate {
            templates,
            today,
            days_ahead,
            config,
            leaves,
            existing,
            appointments,
            format,
            output,
        } => {
            let templates = read_templates(&templates)?;
            let mut generator: GeneratorConfig = match config.as_deref() {
                Some(path) => read_json(path)?,
                None => GeneratorConfig::default(),
            };
            if let Some(days) = days_ahead {
                generator.days_ahead = days;
            }
            debug!(days_ahead = generator.days_ahead, "generator config");

            let leaves: Vec<slot_engine::Leave> = read_optional_list(leaves.as_deref())?;
            let existing: Vec<Slot> = read_optional_list(existing.as_deref())?;
            let appointments: Vec<slot_engine::Appointment> =
                read_optional_list(appointments.as_deref())?;

            let generated = slot_engine::generate_upcoming(&templates, &leaves, today, &generator);
            let mut slots = slot_engine::exclude_persisted(generated, &existing);
            let booked = slot_engine::mark_occupied(&mut slots, &appointments);
            info!(count = slots.len(), booked, "generated slots");

            write_output(output.as_deref(), &render(&slots, format)?)?;
        }
        Commands::Validate { templates } => {
            let templates = read_templates(&templates)?;
            let issues = slot_engine::validate_all(&templates);
            if issues.is_empty() {
                println!("{} template(s) OK", templates.len());
            } else {
                for issue in &issues {
                    let template = &templates[issue.index];
                    println!(
                        "template #{} ({}): {}",
                        issue.index,
                        template.id().unwrap_or("no id"),
                        issue.error
                    );
                }
                anyhow::bail!("{} of {} template(s) failed validation", issues.len(), templates.len());
            }
        }
    }

    Ok(())
}

/// Install a stderr `fmt` subscriber. `--verbose` forces debug; otherwise
/// `RUST_LOG` applies, defaulting to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    slot_engine::parse_date(s).map_err(|e| e.to_string())
}

/// Template file contents, keeping the shape the caller wrote.
enum TemplateInput {
    Single(SlotTemplate),
    Many(Vec<SlotTemplate>),
}

impl TemplateInput {
    fn into_vec(self) -> Vec<SlotTemplate> {
        match self {
            TemplateInput::Single(t) => vec![t],
            TemplateInput::Many(ts) => ts,
        }
    }
}

/// Read a single template object or an array of templates.
fn read_template_input(path: &str) -> Result<TemplateInput> {
    let raw = read_input(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path))?;
    let input = if value.is_array() {
        serde_json::from_value(value).map(TemplateInput::Many)
    } else {
        serde_json::from_value(value).map(TemplateInput::Single)
    };
    input.with_context(|| format!("Invalid template in {}", path))
}

fn read_templates(path: &str) -> Result<Vec<SlotTemplate>> {
    read_template_input(path).map(TemplateInput::into_vec)
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path))
}

fn read_optional_list<T: DeserializeOwned>(path: Option<&str>) -> Result<Vec<T>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
    }
}

fn render(slots: &[Slot], format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(slots)?;
            json.push('\n');
            Ok(json)
        }
        Format::Table => Ok(render_table(slots)),
    }
}

fn render_table(slots: &[Slot]) -> String {
    if slots.is_empty() {
        return "No slots available for this range.\n".to_string();
    }
    let mut out = format!(
        "{:<12}{:<10}{:<10}{:<10}{}\n",
        "DATE", "TIME", "END", "DOCTOR", "BOOKED"
    );
    for slot in slots {
        out.push_str(&format!(
            "{:<12}{:<10}{:<10}{:<10}{}\n",
            slot.date.to_string(),
            slot.time_label(),
            slot.end_time.to_12h_label(),
            slot.doctor_id,
            if slot.is_booked { "yes" } else { "no" }
        ));
    }
    out
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
