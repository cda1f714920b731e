//! Error types for PKG container inspection

use thiserror::Error;

/// Errors that can occur when locating a `param.sfo` inside a PKG
#[derive(Error, Debug)]
pub enum PkgError {
    /// Invalid magic signature detected
    #[error("Invalid PKG magic: expected '\\x7FCNT', got {0:02x?}")]
    InvalidMagic([u8; 4]),

    /// No table entry carries the `param.sfo` identifier
    #[error("Could not find param.sfo inside PKG file")]
    ParamSfoNotFound,

    /// A structure extends past the end of the data
    #[error("PKG {section} truncated: need {needed} bytes, have {available}")]
    Truncated {
        /// Structure being read
        section: &'static str,
        /// Bytes required to read it
        needed: u64,
        /// Bytes actually present
        available: usize,
    },

    /// `BinRW` parsing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for PKG operation results
pub type Result<T> = std::result::Result<T, PkgError>;
