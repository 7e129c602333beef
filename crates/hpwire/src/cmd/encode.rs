use hpwire_frame::{Command, DELIMITER, SEPARATOR};

use crate::cmd::EncodeArgs;
use crate::exit::{CliError, CliResult, SUCCESS};
use crate::output::{print_command, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let command = build_command(&args.args)?;
    print_command(&command, format);
    Ok(SUCCESS)
}

/// Build a command, refusing arguments the wire format cannot carry.
pub fn build_command(args: &[String]) -> CliResult<Command> {
    if let Some(bad) = args
        .iter()
        .find(|arg| arg.contains(SEPARATOR) || arg.contains(char::from(DELIMITER)))
    {
        return Err(CliError::usage(format!(
            "argument {bad:?} contains a tab or carriage return"
        )));
    }
    Ok(args.iter().cloned().collect())
}
