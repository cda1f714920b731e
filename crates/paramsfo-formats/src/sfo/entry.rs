//! PSF directory entry parsing and building

use crate::sfo::error::SfoError;
use binrw::{BinRead, BinWrite};
use std::fmt;
use std::str::FromStr;

/// Size of one directory record in bytes
pub const ENTRY_SIZE: usize = 16;

/// Value format of a parameter
///
/// The raw tags are little-endian `u16` values as stored in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamFormat {
    /// UTF-8 string without a counted terminator ("utf8-S", bytes `04 00`)
    Utf8Special,
    /// NUL-terminated UTF-8 string (bytes `04 02`)
    Utf8,
    /// 32-bit unsigned integer (bytes `04 04`)
    Integer,
    /// Any other tag, preserved verbatim
    Unknown(u16),
}

impl ParamFormat {
    /// Raw tag for [`ParamFormat::Utf8Special`]
    pub const UTF8_SPECIAL: u16 = 0x0004;
    /// Raw tag for [`ParamFormat::Utf8`]
    pub const UTF8: u16 = 0x0204;
    /// Raw tag for [`ParamFormat::Integer`]
    pub const INTEGER: u16 = 0x0404;

    /// Decode a raw directory tag
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            Self::UTF8_SPECIAL => Self::Utf8Special,
            Self::UTF8 => Self::Utf8,
            Self::INTEGER => Self::Integer,
            other => Self::Unknown(other),
        }
    }

    /// Encode to the raw directory tag
    pub const fn to_raw(self) -> u16 {
        match self {
            Self::Utf8Special => Self::UTF8_SPECIAL,
            Self::Utf8 => Self::UTF8,
            Self::Integer => Self::INTEGER,
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether values of this format are strings
    pub const fn is_string(self) -> bool {
        matches!(self, Self::Utf8 | Self::Utf8Special)
    }
}

impl fmt::Display for ParamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8Special => f.write_str("utf8-S"),
            Self::Utf8 => f.write_str("utf8"),
            Self::Integer => f.write_str("int32"),
            Self::Unknown(raw) => write!(f, "unknown(0x{raw:04x})"),
        }
    }
}

impl FromStr for ParamFormat {
    type Err = SfoError;

    /// Parse a user-facing type name ("str" or "int")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "str" | "string" | "utf8" => Ok(Self::Utf8),
            "int" | "integer" | "int32" => Ok(Self::Integer),
            _ => Err(SfoError::UnknownType(s.to_string())),
        }
    }
}

/// Directory record describing one parameter
///
/// Offsets are relative to the start of the key table and data table
/// respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct SfoEntry {
    /// Offset of the NUL-terminated name in the key table
    pub key_offset: u16,

    /// Value format
    #[br(map = ParamFormat::from_raw)]
    #[bw(map = |format: &ParamFormat| format.to_raw())]
    pub format: ParamFormat,

    /// Bytes of the slot currently in use
    pub length: u32,

    /// Bytes reserved for the slot in the data table
    pub max_length: u32,

    /// Offset of the slot in the data table
    pub data_offset: u32,
}

impl SfoEntry {
    /// Offset one past the end of this entry's slot
    pub fn data_end(&self) -> usize {
        self.data_offset as usize + self.max_length as usize
    }
}
