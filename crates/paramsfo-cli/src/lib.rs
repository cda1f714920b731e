//! Command-line front end for PSF (`param.sfo`) files.
//!
//! This crate backs the `sfo` binary, which prints and edits the parameters of
//! a standalone param.sfo or of the one embedded in a PS4 PKG:
//!
//! - `cli`: argument parsing and configuration
//! - `runner`: load, edit, save, and query orchestration
//! - `output`: `KEY=VALUE` listings
//! - `error`: invocation errors
//!
//! # Example
//!
//! ```no_run
//! use paramsfo_cli::{Cli, init_tracing, run};
//!
//! fn main() -> anyhow::Result<()> {
//!     let (cli, commands) = Cli::from_args_with_commands();
//!     init_tracing(cli.log_level);
//!
//!     let status = run(&cli, &commands, &mut std::io::stdout().lock())?;
//!     println!("{status:?}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod output;
pub mod runner;

pub use cli::{Cli, LogLevel};
pub use error::CliError;
pub use runner::{Source, Status, run};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
pub fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
