//! Command-line arguments and configuration.
//!
//! Configuration can be provided via:
//! - CLI arguments (`--decimal`, `--force`, `--log-level`, ...)
//! - Environment variables (`SFO_DECIMAL`, `SFO_FORCE`, `SFO_LOG_LEVEL`)
//! - Default values
//!
//! Editing flags may be repeated and mixed freely; they are applied in the
//! order they appear on the command line:
//!
//! ```text
//! sfo param.sfo -e TITLE "My Game" -a int ATTRIBUTE 0x20 -d CATEGORY
//! ```

use crate::error::CliError;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum, error::ErrorKind};
use paramsfo_formats::sfo::{BatchOptions, IntDisplay, ParamFormat, SfoCommand, SfoError};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;

/// Arguments of the `sfo` tool.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sfo",
    about = "Prints and edits SFO information of either a PS4 PKG or param.sfo file",
    long_about = "Prints and edits SFO information of either a PS4 PKG or param.sfo file.\n\n\
        Without a query or editing flags, every parameter is listed as KEY=VALUE. \
        Providing a query outputs the value of that specific key only; the exit \
        status is non-zero if the key does not exist.",
    version
)]
pub struct Cli {
    /// param.sfo or PKG file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the value of this parameter only
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Add a parameter (TYPE is str or int)
    #[arg(
        short,
        long,
        num_args = 3,
        value_names = ["TYPE", "KEY", "VALUE"],
        allow_hyphen_values = true,
        help_heading = "Editing"
    )]
    pub add: Vec<String>,

    /// Delete a parameter
    #[arg(
        short,
        long,
        value_name = "KEY",
        allow_hyphen_values = true,
        help_heading = "Editing"
    )]
    pub delete: Vec<String>,

    /// Change the value of a parameter
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["KEY", "VALUE"],
        allow_hyphen_values = true,
        help_heading = "Editing"
    )]
    pub edit: Vec<String>,

    /// Add a parameter or replace it if it exists
    #[arg(
        short,
        long,
        num_args = 3,
        value_names = ["TYPE", "KEY", "VALUE"],
        allow_hyphen_values = true,
        help_heading = "Editing"
    )]
    pub set: Vec<String>,

    /// Print integers in decimal instead of hexadecimal
    #[arg(long, env = "SFO_DECIMAL")]
    pub decimal: bool,

    /// Skip commands whose parameter already exists or is missing
    #[arg(short, long, env = "SFO_FORCE")]
    pub force: bool,

    /// Start from an empty param.sfo instead of reading FILE
    #[arg(long)]
    pub new_file: bool,

    /// Write the result here instead of overwriting FILE
    #[arg(short, long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Logging level for diagnostics on stderr
    #[arg(long, value_enum, env = "SFO_LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,
}

/// Logging verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Everything, including table resizes
    Trace,
    /// Every applied command
    Debug,
    /// Files read and written
    Info,
    /// Skipped commands
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Directive string understood by `EnvFilter`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

impl Cli {
    /// Parse arguments and collect the editing commands in command-line order.
    ///
    /// Unknown value types are reported as clap usage errors, so callers can
    /// handle every parsing failure with [`clap::Error::exit`].
    pub fn try_parse_with_commands<I, T>(args: I) -> Result<(Self, Vec<SfoCommand>), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command();
        let matches = command.try_get_matches_from_mut(args)?;
        let cli = Self::from_arg_matches(&matches).map_err(|err| err.format(&mut command))?;
        let commands =
            ordered_commands(&matches).map_err(|err| command.error(ErrorKind::InvalidValue, err))?;
        Ok((cli, commands))
    }

    /// Parse the process arguments, exiting with usage on failure.
    pub fn from_args_with_commands() -> (Self, Vec<SfoCommand>) {
        Self::try_parse_with_commands(std::env::args_os()).unwrap_or_else(|err| err.exit())
    }

    /// Whether any editing flag was given
    pub fn has_commands(&self) -> bool {
        !(self.add.is_empty() && self.delete.is_empty() && self.edit.is_empty() && self.set.is_empty())
    }

    /// Options for the command batch.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            int_display: if self.decimal {
                IntDisplay::Decimal
            } else {
                IntDisplay::Hex
            },
            tolerate_failures: self.force,
        }
    }

    /// Validate option combinations.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidOptions` if `--output-file` is given with
    /// nothing to write.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.output_file.is_some() && !self.has_commands() && !self.new_file {
            return Err(CliError::InvalidOptions(
                "--output-file needs an editing flag or --new-file".to_string(),
            ));
        }

        Ok(())
    }
}

/// Rebuild the editing commands in the order their flags appeared.
fn ordered_commands(matches: &ArgMatches) -> Result<Vec<SfoCommand>, SfoError> {
    let mut ordered: Vec<(usize, SfoCommand)> = Vec::new();

    for (id, arity) in [("add", 3), ("delete", 1), ("edit", 2), ("set", 3)] {
        let Some(values) = matches.get_many::<String>(id) else {
            continue;
        };
        let values: Vec<&String> = values.collect();
        let indices: Vec<usize> = matches
            .indices_of(id)
            .map(Iterator::collect)
            .unwrap_or_default();

        for (args, positions) in values.chunks(arity).zip(indices.chunks(arity)) {
            let command = match (id, args) {
                ("add", [format, key, value]) => SfoCommand::Add {
                    format: format.parse::<ParamFormat>()?,
                    key: key.to_string(),
                    value: value.to_string(),
                },
                ("delete", [key]) => SfoCommand::Delete {
                    key: key.to_string(),
                },
                ("edit", [key, value]) => SfoCommand::Edit {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                ("set", [format, key, value]) => SfoCommand::Set {
                    format: format.parse::<ParamFormat>()?,
                    key: key.to_string(),
                    value: value.to_string(),
                },
                _ => continue,
            };
            ordered.push((positions[0], command));
        }
    }

    ordered.sort_by_key(|(position, _)| *position);
    Ok(ordered.into_iter().map(|(_, command)| command).collect())
}
