//! Error types for the `sfo` command-line tool.

use std::path::PathBuf;
use thiserror::Error;

/// Invocation errors detected before or while touching the filesystem.
#[derive(Debug, Error)]
pub enum CliError {
    /// Inconsistent combination of options
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Mutations requested on a PKG input without a separate destination
    #[error(
        "Cannot modify {} in place: it is a PKG file; use --output-file to write the edited param.sfo",
        .path.display()
    )]
    PkgReadOnly {
        /// Path of the PKG input
        path: PathBuf,
    },
}
