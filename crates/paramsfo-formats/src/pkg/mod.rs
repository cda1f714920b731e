//! PKG container support
//!
//! A PS4 package stores its `param.sfo` as one file of a big-endian file
//! table. Only the parts of the container needed to find that file are read;
//! nothing is decrypted or rewritten.
//!
//! # Container Structure
//!
//! - **Header**: magic `\x7FCNT`, counts, and the file table offset at `0x18`
//! - **File table**: 32-byte records (id, name offset, flags, offset, size)
//! - **Entry data**: file payloads addressed by absolute offset
//!
//! The `param.sfo` is the record with id [`PARAM_SFO_ID`].
//!
//! ```rust,no_run
//! use paramsfo_formats::{pkg, sfo::SfoFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("game.pkg")?;
//! let sfo = SfoFile::parse(pkg::param_sfo_slice(&data)?)?;
//! println!("{} parameters", sfo.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod header;

pub use error::{PkgError, Result};
pub use header::{PARAM_SFO_ID, PKG_HEADER_SIZE, PKG_MAGIC, PkgHeader, PkgTableEntry, TABLE_ENTRY_SIZE};

use binrw::{BinRead, io::Cursor};
use tracing::debug;

/// Whether `data` starts with the PKG magic
pub fn is_pkg(data: &[u8]) -> bool {
    data.starts_with(&PKG_MAGIC)
}

/// Parse the PKG header prefix
pub fn read_header(data: &[u8]) -> Result<PkgHeader> {
    if data.len() < PKG_HEADER_SIZE {
        return Err(PkgError::Truncated {
            section: "header",
            needed: PKG_HEADER_SIZE as u64,
            available: data.len(),
        });
    }
    if !is_pkg(data) {
        let mut found = [0u8; 4];
        found.copy_from_slice(&data[..4]);
        return Err(PkgError::InvalidMagic(found));
    }

    Ok(PkgHeader::read(&mut Cursor::new(data))?)
}

/// Find the file table record of the embedded `param.sfo`
///
/// # Errors
/// Returns error if:
/// - The header is truncated or has the wrong magic
/// - The file table extends past the end of `data`
/// - No record carries [`PARAM_SFO_ID`]
pub fn locate_param_sfo(data: &[u8]) -> Result<PkgTableEntry> {
    let header = read_header(data)?;

    let table_start = u64::from(header.table_offset);
    let table_end = table_start + u64::from(header.entry_count) * TABLE_ENTRY_SIZE as u64;
    if table_end > data.len() as u64 {
        return Err(PkgError::Truncated {
            section: "file table",
            needed: table_end,
            available: data.len(),
        });
    }

    let mut cursor = Cursor::new(data);
    cursor.set_position(table_start);
    for index in 0..header.entry_count {
        let entry = PkgTableEntry::read(&mut cursor)?;
        if entry.id == PARAM_SFO_ID {
            debug!(
                index,
                offset = entry.offset,
                size = entry.size,
                "Found param.sfo in PKG"
            );
            return Ok(entry);
        }
    }

    Err(PkgError::ParamSfoNotFound)
}

/// Bytes of the embedded `param.sfo`
pub fn param_sfo_slice(data: &[u8]) -> Result<&[u8]> {
    let entry = locate_param_sfo(data)?;
    let start = entry.offset as usize;
    let end = start.saturating_add(entry.size as usize);

    data.get(start..end).ok_or(PkgError::Truncated {
        section: "param.sfo",
        needed: end as u64,
        available: data.len(),
    })
}
