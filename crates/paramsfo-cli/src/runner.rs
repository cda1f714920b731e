//! Load, edit, save, and query orchestration.
//!
//! The input is read once, the command batch runs on the in-memory document,
//! and the result is written once. Nothing is written unless every command
//! succeeded (or was skipped with `--force`).

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::write_listing;
use anyhow::{Context, Result};
use paramsfo_formats::pkg;
use paramsfo_formats::sfo::{SfoCommand, SfoError, SfoFile, apply_batch, query};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

/// Where the document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Created empty by `--new-file`
    New,
    /// A standalone param.sfo
    Sfo,
    /// The param.sfo embedded in a PKG
    Pkg,
}

/// Result of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Everything requested was done
    Success,
    /// The queried parameter does not exist
    QueryMissed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Self::SUCCESS,
            Status::QueryMissed => Self::FAILURE,
        }
    }
}

/// Load the document named by `cli`.
pub fn load(cli: &Cli) -> Result<(SfoFile, Source)> {
    if cli.new_file {
        info!("Starting from an empty param.sfo");
        return Ok((SfoFile::new(), Source::New));
    }

    let path = &cli.file;
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if pkg::is_pkg(&data) {
        let embedded = pkg::param_sfo_slice(&data)
            .with_context(|| format!("Failed to locate param.sfo in {}", path.display()))?;
        let document = SfoFile::parse(embedded)
            .with_context(|| format!("Failed to parse param.sfo in {}", path.display()))?;
        info!(path = %path.display(), entries = document.len(), "Loaded param.sfo from PKG");
        return Ok((document, Source::Pkg));
    }

    let document =
        SfoFile::parse(&data).with_context(|| format!("Failed to parse {}", path.display()))?;
    info!(path = %path.display(), entries = document.len(), "Loaded param.sfo");
    Ok((document, Source::Sfo))
}

/// Build `document` and write it to `path`.
pub fn save(document: &SfoFile, path: &Path) -> Result<()> {
    let data = document.build().context("Failed to build param.sfo")?;
    fs::write(path, &data).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        path = %path.display(),
        bytes = data.len(),
        entries = document.len(),
        "Wrote param.sfo"
    );
    Ok(())
}

/// Run one invocation.
///
/// Query results and listings go to `out`; diagnostics go through `tracing`.
///
/// # Errors
///
/// Returns an error if the options are inconsistent, the input cannot be
/// read or parsed, a command fails, or the output cannot be written.
pub fn run<W: Write>(cli: &Cli, commands: &[SfoCommand], out: &mut W) -> Result<Status> {
    cli.validate()?;
    let options = cli.batch_options();
    let (mut document, source) = load(cli)?;

    if source == Source::Pkg && !commands.is_empty() && cli.output_file.is_none() {
        return Err(CliError::PkgReadOnly {
            path: cli.file.clone(),
        }
        .into());
    }

    let report = apply_batch(&mut document, commands, &options)
        .with_context(|| format!("Failed to edit {}", cli.file.display()))?;
    debug!(
        applied = report.applied,
        skipped = report.skipped.len(),
        "Command batch finished"
    );

    let changed = report.is_modified() || cli.output_file.is_some();
    if cli.new_file || (!commands.is_empty() && changed) {
        let destination = cli.output_file.as_deref().unwrap_or(&cli.file);
        save(&document, destination)?;
    }

    if let Some(key) = &cli.query {
        return match query(&document, key, &options) {
            Ok(value) => {
                writeln!(out, "{value}")?;
                Ok(Status::Success)
            }
            Err(SfoError::NotFound(key)) => {
                debug!(key = %key, "Queried parameter not found");
                Ok(Status::QueryMissed)
            }
            Err(err) => Err(err.into()),
        };
    }

    if commands.is_empty() && !cli.new_file {
        write_listing(out, &document, options.int_display)?;
    }

    Ok(Status::Success)
}
