use clap::{Args, Subcommand};
use std::path::PathBuf;

use hpwire_frame::DEFAULT_MAX_FRAME_SIZE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod encode;
pub mod inspect;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame, classify and validate a scanner byte stream.
    Inspect(InspectArgs),
    /// Encode a command with its checksum.
    Encode(EncodeArgs),
    /// Send a command to a scanner bridge over TCP.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Inspect(args) => inspect::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Validation switches shared by commands that inspect frames.
#[derive(Args, Debug, Clone, Copy)]
pub struct ValidationArgs {
    /// Accept attributes the schemas do not name.
    #[arg(long)]
    pub lenient_attributes: bool,
    /// Reject message kinds that have no schema.
    #[arg(long)]
    pub require_schema: bool,
    /// Largest frame buffered while waiting for a delimiter, in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        env = "HPWIRE_MAX_FRAME_SIZE",
        default_value_t = DEFAULT_MAX_FRAME_SIZE
    )]
    pub max_frame_size: usize,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Capture file to read; `-` or omitted reads stdin.
    #[arg(conflicts_with = "connect")]
    pub input: Option<PathBuf>,
    /// Read frames from a TCP endpoint instead (host:port).
    #[arg(long, value_name = "ADDR")]
    pub connect: Option<String>,
    /// Only print frames that pass validation.
    #[arg(long)]
    pub accepted_only: bool,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Exit with status 60 when any frame is rejected or dropped as oversized.
    #[arg(long)]
    pub fail_on_reject: bool,
    #[command(flatten)]
    pub validation: ValidationArgs,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Command keyword followed by its arguments.
    #[arg(required = true, num_args = 1..)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Scanner bridge address (host:port).
    pub addr: String,
    /// Command keyword followed by its arguments.
    #[arg(required = true, num_args = 1..)]
    pub args: Vec<String>,
    /// Wait for one response frame, validate and print it.
    #[arg(long)]
    pub wait: bool,
    /// Maximum time to wait for response when --wait is set (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub wait_timeout: String,
    #[command(flatten)]
    pub validation: ValidationArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
