//! Ordered command batches and point queries

use crate::sfo::{
    entry::ParamFormat,
    error::Result,
    file::SfoFile,
    value::IntDisplay,
};
use std::fmt;
use tracing::{debug, warn};

/// One editing command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SfoCommand {
    /// Add a parameter that must not exist yet
    Add {
        /// Value format
        format: ParamFormat,
        /// Parameter name
        key: String,
        /// Value text
        value: String,
    },
    /// Delete a parameter that must exist
    Delete {
        /// Parameter name
        key: String,
    },
    /// Replace the value of a parameter that must exist
    Edit {
        /// Parameter name
        key: String,
        /// Value text
        value: String,
    },
    /// Add or replace a parameter
    Set {
        /// Value format
        format: ParamFormat,
        /// Parameter name
        key: String,
        /// Value text
        value: String,
    },
}

impl SfoCommand {
    /// Parameter name the command targets
    pub fn key(&self) -> &str {
        match self {
            Self::Add { key, .. }
            | Self::Delete { key }
            | Self::Edit { key, .. }
            | Self::Set { key, .. } => key,
        }
    }

    /// Apply the command to `file`, failing on existence conflicts
    pub fn apply(&self, file: &mut SfoFile) -> Result<()> {
        match self {
            Self::Add { format, key, value } => file.add(*format, key, value, false),
            Self::Delete { key } => file.delete(key, false),
            Self::Edit { key, value } => file.edit(key, value, false),
            Self::Set { format, key, value } => file.set(*format, key, value),
        }
    }
}

impl fmt::Display for SfoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { format, key, value } => write!(f, "add {format} {key}={value:?}"),
            Self::Delete { key } => write!(f, "delete {key}"),
            Self::Edit { key, value } => write!(f, "edit {key}={value:?}"),
            Self::Set { format, key, value } => write!(f, "set {format} {key}={value:?}"),
        }
    }
}

/// Options shared by every command in a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// How integer values are rendered by queries
    pub int_display: IntDisplay,
    /// Skip commands that fail on a duplicate or missing parameter
    pub tolerate_failures: bool,
}

/// Outcome of a successful batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Commands applied
    pub applied: usize,
    /// Commands skipped in tolerate mode, with the reason
    pub skipped: Vec<String>,
}

impl BatchReport {
    /// Whether any command changed the document
    pub fn is_modified(&self) -> bool {
        self.applied > 0
    }
}

/// Apply `commands` in order, all or nothing
///
/// The commands run against a copy of `file`. Unless every command succeeds
/// (or is skipped in tolerate mode) the error is returned and `file` is left
/// exactly as it was.
pub fn apply_batch(
    file: &mut SfoFile,
    commands: &[SfoCommand],
    options: &BatchOptions,
) -> Result<BatchReport> {
    let mut working = file.clone();
    let mut report = BatchReport::default();

    for command in commands {
        match command.apply(&mut working) {
            Ok(()) => {
                debug!(%command, "Applied command");
                report.applied += 1;
            }
            Err(err) if options.tolerate_failures && err.is_tolerable() => {
                warn!(%command, error = %err, "Skipping failed command");
                report.skipped.push(format!("{command}: {err}"));
            }
            Err(err) => {
                debug!(%command, error = %err, "Batch aborted");
                return Err(err);
            }
        }
    }

    *file = working;
    Ok(report)
}

/// Render one parameter per the batch's display options
pub fn query(file: &SfoFile, key: &str, options: &BatchOptions) -> Result<String> {
    file.render(key, options.int_display)
}
