mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "hpwire", version, about = "Scanner wire protocol CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "HPWIRE_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inspect_with_validation_flags() {
        let cli = Cli::try_parse_from([
            "hpwire",
            "inspect",
            "capture.bin",
            "--lenient-attributes",
            "--max-frame-size",
            "4096",
            "--count",
            "3",
        ])
        .expect("inspect args should parse");

        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert!(args.validation.lenient_attributes);
        assert!(!args.validation.require_schema);
        assert_eq!(args.validation.max_frame_size, 4096);
        assert_eq!(args.count, Some(3));
    }

    #[test]
    fn rejects_input_with_connect() {
        let err = Cli::try_parse_from([
            "hpwire",
            "inspect",
            "capture.bin",
            "--connect",
            "127.0.0.1:50536",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_send_with_command_args() {
        let cli = Cli::try_parse_from([
            "hpwire",
            "send",
            "127.0.0.1:50536",
            "VOL",
            "15",
            "--wait",
            "--wait-timeout",
            "500ms",
        ])
        .expect("send args should parse");

        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.args, vec!["VOL", "15"]);
        assert!(args.wait);
    }

    #[test]
    fn encode_requires_a_keyword() {
        let err = Cli::try_parse_from(["hpwire", "encode"]).expect_err("missing args");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
