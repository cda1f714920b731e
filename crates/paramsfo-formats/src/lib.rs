//! Parsers, builders, and editors for PSF parameter containers
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // PSF/PKG terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate reads, queries, and edits PSF documents (the `param.sfo` files
//! shipped alongside PS4 packages), and locates them inside PKG containers.
//!
//! # Supported Formats
//!
//! - **SFO**: the PSF key/value container with its entry directory, key table,
//!   and data table
//! - **PKG**: just enough of the package container to find the embedded
//!   `param.sfo`
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Derived Offsets**: Table offsets are recomputed on every build, never
//!   trusted from a previous save
//! - **Atomic Batches**: Edits run against a copy and only replace the
//!   document when every command succeeded
//! - **Round-Trip Guarantee**: parse(build(data)) == data

#![warn(missing_docs)]

/// PKG container support for locating an embedded `param.sfo`
pub mod pkg;
/// PSF (`param.sfo`) document model, editing engine, and command batches
///
/// See the [`sfo`] module for the on-disk layout and usage examples.
pub mod sfo;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

/// Common format trait implemented by the whole-file formats
pub trait PsfFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
