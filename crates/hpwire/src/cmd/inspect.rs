use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hpwire_frame::{FrameConfig, FrameError, FrameReader, TracingSink};
use hpwire_schema::{Inspection, SchemaRegistry, ValidatorConfig};

use crate::cmd::{InspectArgs, ValidationArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, INTERNAL, SUCCESS};
use crate::output::{print_inspection, OutputFormat};

/// How long an idle `--connect` read blocks before Ctrl-C is checked again.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Running totals for one inspected stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub frames: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub oversized: usize,
    pub printed: usize,
}

impl Summary {
    fn record(&mut self, inspection: &Inspection) {
        self.frames += 1;
        if inspection.is_accepted() {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = build_registry(&args.validation);
    let config = frame_config(&args.validation);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let summary = match (&args.connect, &args.input) {
        (Some(addr), _) => {
            let stream =
                TcpStream::connect(addr).map_err(|err| io_error("connect failed", err))?;
            tracing::info!(%addr, "reading frames from scanner bridge");
            let config = FrameConfig {
                read_timeout: Some(POLL_INTERVAL),
                ..config
            };
            let mut reader = FrameReader::with_config_tcp(stream, config)
                .map_err(|err| frame_error("connect failed", err))?;
            inspect_frames(&mut reader, &registry, &args, format, &running)?
        }
        (None, Some(path)) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            let mut reader = FrameReader::with_config(BufReader::new(file), config);
            inspect_frames(&mut reader, &registry, &args, format, &running)?
        }
        (None, _) => {
            let mut reader = FrameReader::with_config(std::io::stdin().lock(), config);
            inspect_frames(&mut reader, &registry, &args, format, &running)?
        }
    };

    tracing::info!(
        frames = summary.frames,
        accepted = summary.accepted,
        rejected = summary.rejected,
        oversized = summary.oversized,
        "inspection finished"
    );

    if args.fail_on_reject && summary.rejected + summary.oversized > 0 {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

pub fn build_registry(args: &ValidationArgs) -> SchemaRegistry {
    SchemaRegistry::with_config(ValidatorConfig {
        strict_mode: !args.lenient_attributes,
        fail_on_missing_schema: args.require_schema,
    })
}

pub fn frame_config(args: &ValidationArgs) -> FrameConfig {
    FrameConfig {
        max_frame_size: args.max_frame_size,
        ..FrameConfig::default()
    }
}

/// Inspect frames until the stream ends, `--count` is reached, or Ctrl-C.
///
/// Oversized frames are logged and skipped. Read timeouts only give the
/// loop a chance to notice Ctrl-C.
fn inspect_frames<R: Read>(
    reader: &mut FrameReader<R>,
    registry: &SchemaRegistry,
    args: &InspectArgs,
    format: OutputFormat,
    running: &AtomicBool,
) -> CliResult<Summary> {
    let mut summary = Summary::default();

    while running.load(Ordering::SeqCst) {
        let frame = match reader.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(FrameError::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue;
            }
            Err(err @ FrameError::FrameTooLarge { .. }) => {
                tracing::warn!(error = %err, "skipping oversized frame");
                summary.oversized += 1;
                continue;
            }
            Err(err) => return Err(frame_error("read failed", err)),
        };

        let inspection = registry.inspect(&frame, &TracingSink);
        summary.record(&inspection);
        if args.accepted_only && !inspection.is_accepted() {
            continue;
        }

        print_inspection(summary.frames, &frame, &inspection, format);
        summary.printed += 1;

        if args.count.is_some_and(|count| summary.printed >= count) {
            break;
        }
    }

    Ok(summary)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
