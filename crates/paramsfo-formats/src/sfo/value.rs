//! Parameter values: decoding, encoding, and display

use crate::sfo::entry::ParamFormat;
use crate::sfo::error::{Result, SfoError};
use std::fmt;

/// How integer values are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntDisplay {
    /// Zero-padded eight digit hexadecimal, e.g. `0x00000001`
    #[default]
    Hex,
    /// Plain decimal
    Decimal,
}

/// Decoded value of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SfoValue {
    /// String value with the terminator removed
    String(String),
    /// 32-bit unsigned integer
    Integer(u32),
    /// Value with an unrecognized format tag
    Unknown {
        /// Raw format tag
        format: u16,
        /// Bytes in use
        bytes: Vec<u8>,
    },
}

impl SfoValue {
    /// Decode a slot given its format and used length
    pub fn decode(format: ParamFormat, slot: &[u8], length: u32) -> Self {
        let used = &slot[..(length as usize).min(slot.len())];
        match format {
            ParamFormat::Utf8 | ParamFormat::Utf8Special => {
                let text = used.split(|&b| b == 0).next().unwrap_or_default();
                Self::String(String::from_utf8_lossy(text).into_owned())
            }
            ParamFormat::Integer => {
                let mut raw = [0u8; 4];
                let n = slot.len().min(4);
                raw[..n].copy_from_slice(&slot[..n]);
                Self::Integer(u32::from_le_bytes(raw))
            }
            ParamFormat::Unknown(format) => Self::Unknown {
                format,
                bytes: used.to_vec(),
            },
        }
    }

    /// String content, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if this is an integer value
    pub fn as_integer(&self) -> Option<u32> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Render for display
    pub fn render(&self, display: IntDisplay) -> String {
        match (self, display) {
            (Self::String(s), _) => s.clone(),
            (Self::Integer(v), IntDisplay::Hex) => format!("0x{v:08x}"),
            (Self::Integer(v), IntDisplay::Decimal) => v.to_string(),
            (Self::Unknown { format, .. }, _) => format!("[UNKNOWN DATA TYPE: 0x{format:04X}]"),
        }
    }
}

impl fmt::Display for SfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(IntDisplay::default()))
    }
}

/// Parse an integer argument
///
/// A `0x`/`0X` prefix selects hexadecimal, anything else is decimal.
pub fn parse_integer(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };
    parsed.map_err(|_| SfoError::InvalidInteger(text.to_string()))
}

/// Encode user text into the bytes stored in a slot
///
/// Strings of format [`ParamFormat::Utf8`] carry a NUL terminator that counts
/// toward their length; special strings do not.
pub(crate) fn encode(format: ParamFormat, key: &str, text: &str) -> Result<Vec<u8>> {
    match format {
        ParamFormat::Utf8 => {
            let mut bytes = Vec::with_capacity(text.len() + 1);
            bytes.extend_from_slice(text.as_bytes());
            bytes.push(0);
            Ok(bytes)
        }
        ParamFormat::Utf8Special => Ok(text.as_bytes().to_vec()),
        ParamFormat::Integer => Ok(parse_integer(text)?.to_le_bytes().to_vec()),
        ParamFormat::Unknown(format) => Err(SfoError::UnsupportedFormat {
            key: key.to_string(),
            format,
        }),
    }
}
