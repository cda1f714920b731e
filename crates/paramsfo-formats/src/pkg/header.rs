//! PKG header and file table records

use binrw::{BinRead, BinWrite};

/// Magic signature at the start of every PKG container
pub const PKG_MAGIC: [u8; 4] = *b"\x7FCNT";

/// File table identifier of the embedded `param.sfo`
pub const PARAM_SFO_ID: u32 = 0x1000;

/// Size of the header prefix read from the container
pub const PKG_HEADER_SIZE: usize = 32;

/// Size of one file table record
pub const TABLE_ENTRY_SIZE: usize = 32;

/// Leading fields of a PKG header
///
/// Only the prefix needed to walk the file table is modeled:
/// - Magic signature "\x7FCNT" (4 bytes)
/// - Revision and type (4 bytes each)
/// - File count and table entry count (4 bytes each)
/// - System entry count and a second entry count (2 bytes each)
/// - File table offset and entry data size (4 bytes each)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)] // All multi-byte fields are big-endian
#[bw(big)]
pub struct PkgHeader {
    /// Magic signature, always "\x7FCNT"
    pub magic: [u8; 4],

    /// Package revision
    pub revision: u32,

    /// Package type
    pub pkg_type: u32,

    /// Number of files in the package
    pub file_count: u32,

    /// Number of records in the file table
    pub entry_count: u32,

    /// Number of system entries
    pub sc_entry_count: u16,

    /// Secondary entry count
    pub entry_count_2: u16,

    /// Absolute offset of the file table
    pub table_offset: u32,

    /// Size of the entry data region
    pub entry_data_size: u32,
}

/// One record of the PKG file table
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct PkgTableEntry {
    /// File identifier
    pub id: u32,

    /// Offset of the file name in the name table
    pub filename_offset: u32,

    /// Encryption and key flags
    pub flags1: u32,

    /// Additional flags
    pub flags2: u32,

    /// Absolute offset of the file data
    pub offset: u32,

    /// Size of the file data in bytes
    pub size: u32,

    /// Reserved
    pub padding: u64,
}
