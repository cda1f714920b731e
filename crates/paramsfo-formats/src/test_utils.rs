//! Test utilities for format round-trip testing
//!
//! Shared fixtures and round-trip helpers for the format test modules.

use crate::PsfFormat;
use std::fmt::Debug;

/// Test round-trip serialization for a format instance
///
/// Verifies that a format can be built and parsed back to an equivalent
/// value.
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: PsfFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {:?}\nParsed: {:?}",
            original, parsed
        )
        .into());
    }

    Ok(())
}

/// Test round-trip with existing binary data
///
/// Verifies that binary data can be parsed, rebuilt, and reparsed to
/// produce equivalent results, and that the rebuilt bytes match the input.
pub fn test_round_trip_with_data<T>(data: &[u8]) -> Result<(), Box<dyn std::error::Error>>
where
    T: PsfFormat + PartialEq + Debug,
{
    let parsed = T::parse(data)?;
    let rebuilt = parsed.build()?;
    let reparsed = T::parse(&rebuilt)?;

    if parsed != reparsed {
        return Err(format!(
            "Round-trip with data failed:\nParsed: {:?}\nReparsed: {:?}",
            parsed, reparsed
        )
        .into());
    }

    T::verify_round_trip(&rebuilt)
}

/// Test that parsing invalid data fails
pub fn test_invalid_data_rejected<T>(invalid_data: &[u8]) -> Result<(), Box<dyn std::error::Error>>
where
    T: PsfFormat,
{
    match T::parse(invalid_data) {
        Ok(_) => Err("Expected parsing to fail for invalid data, but it succeeded".into()),
        Err(_) => Ok(()),
    }
}

/// A small hand-assembled PSF document
///
/// | key      | format | length | max | offset | value     |
/// |----------|--------|--------|-----|--------|-----------|
/// | APP_TYPE | int32  | 4      | 4   | 0      | 1         |
/// | CATEGORY | utf8   | 3      | 4   | 4      | "gd"      |
/// | TITLE    | utf8   | 8      | 8   | 8      | "My Game" |
pub fn sample_document_bytes() -> Vec<u8> {
    let mut data = Vec::new();

    // Header
    data.extend_from_slice(b"\0PSF");
    data.extend_from_slice(&0x0101u32.to_le_bytes());
    data.extend_from_slice(&68u32.to_le_bytes());
    data.extend_from_slice(&92u32.to_le_bytes());
    data.extend_from_slice(&3u32.to_le_bytes());

    // Directory: key_offset, format, length, max_length, data_offset
    for (key_offset, format, length, max_length, data_offset) in [
        (0u16, 0x0404u16, 4u32, 4u32, 0u32),
        (9, 0x0204, 3, 4, 4),
        (18, 0x0204, 8, 8, 8),
    ] {
        data.extend_from_slice(&key_offset.to_le_bytes());
        data.extend_from_slice(&format.to_le_bytes());
        data.extend_from_slice(&length.to_le_bytes());
        data.extend_from_slice(&max_length.to_le_bytes());
        data.extend_from_slice(&data_offset.to_le_bytes());
    }

    data.extend_from_slice(b"APP_TYPE\0CATEGORY\0TITLE\0");

    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(b"gd\0\0");
    data.extend_from_slice(b"My Game\0");

    data
}

/// A minimal PKG container holding `sfo` as its second file
///
/// Header at 0, two table records at 32, file data at 96.
pub fn sample_pkg_bytes(sfo: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();

    data.extend_from_slice(b"\x7FCNT");
    data.extend_from_slice(&0x8000_0000u32.to_be_bytes()); // revision
    data.extend_from_slice(&1u32.to_be_bytes()); // type
    data.extend_from_slice(&2u32.to_be_bytes()); // file count
    data.extend_from_slice(&2u32.to_be_bytes()); // entry count
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&2u16.to_be_bytes());
    data.extend_from_slice(&32u32.to_be_bytes()); // table offset
    data.extend_from_slice(&(sfo.len() as u32).to_be_bytes());

    for (id, offset, size) in [(0x0001u32, 96u32, 0u32), (0x1000, 96, sfo.len() as u32)] {
        data.extend_from_slice(&id.to_be_bytes());
        data.extend_from_slice(&[0; 12]); // name offset, flags
        data.extend_from_slice(&offset.to_be_bytes());
        data.extend_from_slice(&size.to_be_bytes());
        data.extend_from_slice(&[0; 8]);
    }

    data.extend_from_slice(sfo);
    data
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sfo::SfoFile;

    #[test]
    fn test_sample_document_is_canonical() {
        let data = sample_document_bytes();
        assert_eq!(data.len(), 108);
        test_round_trip_with_data::<SfoFile>(&data).expect("Round-trip with data should succeed");
    }

    #[test]
    fn test_invalid_data_rejected_utility() {
        test_invalid_data_rejected::<SfoFile>(&[0, b'P']).expect("Should reject invalid data");
        assert!(test_invalid_data_rejected::<SfoFile>(&sample_document_bytes()).is_err());
    }

    #[test]
    fn test_sample_pkg_layout() {
        let sfo = sample_document_bytes();
        let pkg = sample_pkg_bytes(&sfo);
        assert_eq!(pkg.len(), 96 + sfo.len());
        assert_eq!(&pkg[96..], sfo.as_slice());
    }
}
