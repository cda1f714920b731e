//! Error types for PSF parsing, building, and editing

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors that can occur when parsing, building, or editing PSF documents
#[derive(Error, Debug)]
pub enum SfoError {
    /// Invalid magic signature detected
    #[error("Invalid PSF magic: expected \"\\0PSF\", got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Input ended before a section was complete
    #[error("Truncated {section}: need {needed} bytes, only {available} available")]
    Truncated {
        /// Section being read
        section: &'static str,
        /// End offset the section requires
        needed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// Header places the data table before the key table
    #[error("Invalid table offsets: key table at {key_table_offset}, data table at {data_table_offset}")]
    InvalidTableOffsets {
        /// Key table offset from the header
        key_table_offset: u32,
        /// Data table offset from the header
        data_table_offset: u32,
    },

    /// Parameter already present
    #[error("Parameter already exists: {0}")]
    DuplicateKey(String),

    /// Parameter not present
    #[error("Parameter not found: {0}")]
    NotFound(String),

    /// Encoded value does not fit the reserved slot
    #[error("Value for {key} needs {needed} bytes but only {max_length} are reserved")]
    ValueTooLarge {
        /// Parameter name
        key: String,
        /// Encoded value size
        needed: usize,
        /// Reserved slot size
        max_length: u32,
    },

    /// Growing a table failed
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Integer value could not be parsed
    #[error("Invalid integer value: {0:?}")]
    InvalidInteger(String),

    /// Parameter name is empty or contains a NUL byte
    #[error("Invalid parameter name: {0:?}")]
    InvalidKey(String),

    /// Parameter type name not recognized
    #[error("Unknown parameter type: {0:?} (expected \"str\" or \"int\")")]
    UnknownType(String),

    /// Parameter stored with a format this crate cannot write
    #[error("Unsupported parameter format 0x{format:04x} for {key}")]
    UnsupportedFormat {
        /// Parameter name
        key: String,
        /// Raw format tag
        format: u16,
    },

    /// A table outgrew the width of its offset field
    #[error("{table} exceeds the {limit}-byte addressable range")]
    TooLarge {
        /// Table that overflowed
        table: &'static str,
        /// Largest representable offset
        limit: u64,
    },

    /// Document violates a layout invariant
    #[error("Inconsistent document: {0}")]
    Inconsistent(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRW` parsing/writing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl SfoError {
    /// Whether a batch running in tolerate mode may skip this failure
    pub fn is_tolerable(&self) -> bool {
        matches!(self, Self::DuplicateKey(_) | Self::NotFound(_))
    }
}

/// Type alias for PSF operation results
pub type Result<T> = std::result::Result<T, SfoError>;
