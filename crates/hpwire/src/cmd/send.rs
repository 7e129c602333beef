use std::net::TcpStream;
use std::time::Duration;

use hpwire_frame::{CommandWriter, FrameConfig, FrameReader, TracingSink};

use crate::cmd::inspect::{build_registry, frame_config};
use crate::cmd::{encode::build_command, SendArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS};
use crate::output::{print_inspection, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let command = build_command(&args.args)?;

    let config = FrameConfig {
        read_timeout: Some(wait_timeout),
        write_timeout: Some(wait_timeout),
        ..frame_config(&args.validation)
    };

    let stream = TcpStream::connect(&args.addr).map_err(|err| io_error("connect failed", err))?;
    let write_half = stream
        .try_clone()
        .map_err(|err| io_error("connect failed", err))?;

    let mut writer = CommandWriter::with_config_tcp(write_half, config.clone())
        .map_err(|err| frame_error("send failed", err))?;
    writer
        .write_command(&command)
        .map_err(|err| frame_error("send failed", err))?;
    tracing::debug!(addr = %args.addr, checksum = command.checksum(), "command sent");

    if !args.wait {
        return Ok(SUCCESS);
    }

    let mut reader = FrameReader::with_config_tcp(stream, config)
        .map_err(|err| frame_error("receive failed", err))?;
    let frame = reader
        .read_frame()
        .map_err(|err| frame_error("receive failed", err))?
        .ok_or_else(|| CliError::new(FAILURE, "connection closed before a response arrived"))?;

    let registry = build_registry(&args.validation);
    let inspection = registry.inspect(&frame, &TracingSink);
    print_inspection(1, &frame, &inspection, format);

    if inspection.is_accepted() {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

/// Parse `500ms`, `5s`, `2m`, or a bare number of seconds.
fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, unit_millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, 1)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, 1_000)
    } else if let Some(num) = input.strip_suffix('m') {
        (num, 60_000)
    } else {
        (input, 1_000)
    };

    match number.parse::<u64>() {
        Ok(0) => Err(CliError::usage("duration must be greater than zero")),
        Ok(value) => Ok(Duration::from_millis(value.saturating_mul(unit_millis))),
        Err(_) => Err(CliError::usage(format!("invalid duration value: {input}"))),
    }
}
