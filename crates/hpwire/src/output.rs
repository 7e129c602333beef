use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use hpwire_frame::{preview, Command, Frame, DELIMITER};
use hpwire_schema::Inspection;
use serde::Serialize;

const INSPECTION_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/hpwire/cli/v1/frame-inspected.schema.json";
const COMMAND_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/hpwire/cli/v1/command-encoded.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    /// Frames and commands exactly as they travel on the wire.
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct InspectionOutput {
    schema_id: &'static str,
    index: usize,
    type_code: Option<String>,
    kind: Option<String>,
    size: usize,
    terminated: bool,
    accepted: bool,
    reason: Option<String>,
    preview: String,
}

impl InspectionOutput {
    fn new(index: usize, frame: &Frame, inspection: &Inspection) -> Self {
        Self {
            schema_id: INSPECTION_SCHEMA_ID,
            index,
            type_code: inspection.kind.map(|kind| kind.type_code().to_string()),
            kind: inspection.kind.map(|kind| kind.to_string()),
            size: frame.len(),
            terminated: frame.is_terminated(),
            accepted: inspection.is_accepted(),
            reason: inspection
                .validation
                .failure()
                .map(|failure| failure.to_string()),
            preview: preview(frame.as_bytes()),
        }
    }
}

pub fn print_inspection(
    index: usize,
    frame: &Frame,
    inspection: &Inspection,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = InspectionOutput::new(index, frame, inspection);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let out = InspectionOutput::new(index, frame, inspection);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "KIND", "SIZE", "ACCEPTED", "REASON"])
                .add_row(vec![
                    out.index.to_string(),
                    out.kind.unwrap_or_else(|| "-".to_string()),
                    out.size.to_string(),
                    out.accepted.to_string(),
                    out.reason.unwrap_or_default(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let kind = inspection
                .kind
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| "-".to_string());
            match inspection.validation.failure() {
                None => println!("#{index} {kind} size={} accepted", frame.len()),
                Some(reason) => {
                    println!("#{index} {kind} size={} rejected: {reason}", frame.len())
                }
            }
        }
        OutputFormat::Raw => {
            let mut wire = frame.as_bytes().to_vec();
            if frame.is_terminated() {
                wire.push(DELIMITER);
            }
            print_raw(&wire);
        }
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    schema_id: &'static str,
    args: &'a [String],
    checksum: u64,
    wire: String,
}

pub fn print_command(command: &Command, format: OutputFormat) {
    let wire = command.to_bytes();
    match format {
        OutputFormat::Json => {
            let out = CommandOutput {
                schema_id: COMMAND_SCHEMA_ID,
                args: command.as_args(),
                checksum: command.checksum(),
                wire: preview(&wire),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ARGS", "CHECKSUM", "WIRE"])
                .add_row(vec![
                    command.as_args().join(" "),
                    command.checksum().to_string(),
                    preview(&wire),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("checksum={} wire={}", command.checksum(), preview(&wire));
        }
        OutputFormat::Raw => print_raw(&wire),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
