//! PSF header parsing and building

use crate::sfo::error::{Result, SfoError};
use binrw::{BinRead, BinWrite};

/// Magic signature at the start of every PSF document
pub const SFO_MAGIC: [u8; 4] = *b"\0PSF";

/// Format version written by this crate (1.1)
pub const SFO_VERSION: u32 = 0x0000_0101;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 20;

/// PSF header
///
/// The header contains the table layout of the document:
/// - Magic signature "\0PSF" (4 bytes)
/// - Version (4 bytes, little-endian)
/// - Key table offset (4 bytes, little-endian)
/// - Data table offset (4 bytes, little-endian)
/// - Entry count (4 bytes, little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct SfoHeader {
    /// Magic signature, always "\0PSF"
    pub magic: [u8; 4],

    /// Format version, usually 0x101
    pub version: u32,

    /// Absolute offset of the key table
    pub key_table_offset: u32,

    /// Absolute offset of the data table
    pub data_table_offset: u32,

    /// Number of entries in the directory
    pub entry_count: u32,
}

impl SfoHeader {
    /// Create a header for an empty document
    pub fn new() -> Self {
        Self {
            magic: SFO_MAGIC,
            version: SFO_VERSION,
            key_table_offset: HEADER_SIZE as u32,
            data_table_offset: HEADER_SIZE as u32,
            entry_count: 0,
        }
    }

    /// Size of the key table implied by the two table offsets
    pub fn key_table_size(&self) -> Result<usize> {
        self.data_table_offset
            .checked_sub(self.key_table_offset)
            .map(|size| size as usize)
            .ok_or(SfoError::InvalidTableOffsets {
                key_table_offset: self.key_table_offset,
                data_table_offset: self.data_table_offset,
            })
    }

    /// Validate the header fields
    pub fn validate(&self) -> Result<()> {
        if self.magic != SFO_MAGIC {
            return Err(SfoError::InvalidMagic(self.magic));
        }

        self.key_table_size()?;

        Ok(())
    }
}

impl Default for SfoHeader {
    fn default() -> Self {
        Self::new()
    }
}
