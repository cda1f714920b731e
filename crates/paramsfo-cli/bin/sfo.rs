//! `sfo` binary entry point.
//!
//! This is a thin wrapper around the paramsfo-cli library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Runs the requested listing, query, or edits
//!
//! Exit status is 0 on success, 1 if a queried parameter does not exist or
//! any error occurred, and 2 on usage errors.

use paramsfo_cli::{Cli, init_tracing, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    let (cli, commands) = Cli::from_args_with_commands();
    init_tracing(cli.log_level);

    let stdout = std::io::stdout();
    match run(&cli, &commands, &mut stdout.lock()) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
