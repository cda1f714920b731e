//! Editing operations on a PSF document
//!
//! Every operation resizes the key and/or data table through [`blob`] and
//! then calls [`SfoFile::reindex`], which rewrites every directory offset and
//! the header from the tables in one pass. An operation that returns an error
//! may leave the document half-edited; [`apply_batch`](crate::sfo::apply_batch)
//! only ever edits a copy.

use crate::sfo::{
    blob::{self, align_up4},
    entry::{ParamFormat, SfoEntry},
    error::{Result, SfoError},
    file::{SfoFile, compare_keys},
    reserved::reserved_length,
    value,
};
use tracing::debug;

impl SfoFile {
    /// Add a new parameter
    ///
    /// The entry is inserted at its key-order position. Strings reserve
    /// `len + 1` bytes rounded up to a multiple of 4, or the key's reserved
    /// length if that is larger; integers reserve 4 bytes.
    ///
    /// # Errors
    /// - `DuplicateKey` if the parameter exists and `tolerate_duplicate` is false
    /// - `InvalidKey`, `InvalidInteger`, `UnsupportedFormat` for bad input
    pub fn add(
        &mut self,
        format: ParamFormat,
        key: &str,
        value: &str,
        tolerate_duplicate: bool,
    ) -> Result<()> {
        let key = normalize_key(key)?;
        if self.find(&key).is_some() {
            if tolerate_duplicate {
                debug!(key = %key, "Parameter exists, add skipped");
                return Ok(());
            }
            return Err(SfoError::DuplicateKey(key));
        }

        let encoded = value::encode(format, &key, value)?;
        let max_length = slot_capacity(format, &key, encoded.len());
        let max_length_u32 = u32::try_from(max_length).map_err(|_| SfoError::TooLarge {
            table: "data table",
            limit: u64::from(u32::MAX),
        })?;

        let index = self.insertion_index(&key);
        let key_position = self.key_insert_position(index);
        let data_position = self.data_insert_position(index);

        let mut name = key.clone().into_bytes();
        name.push(0);
        blob::expand(&mut self.key_table, key_position, name.len())?;
        self.key_table[key_position..key_position + name.len()].copy_from_slice(&name);
        blob::align4(&mut self.key_table);

        blob::expand(&mut self.data_table, data_position, max_length)?;
        self.entries.insert(
            index,
            SfoEntry {
                key_offset: 0,
                format,
                length: 0,
                max_length: max_length_u32,
                data_offset: 0,
            },
        );
        self.reindex()?;
        self.write_slot(index, &encoded)?;

        debug!(
            key = %key,
            %format,
            index,
            length = encoded.len(),
            max_length,
            "Added parameter"
        );
        Ok(())
    }

    /// Delete a parameter
    ///
    /// # Errors
    /// - `NotFound` if the parameter is missing and `tolerate_missing` is false
    pub fn delete(&mut self, key: &str, tolerate_missing: bool) -> Result<()> {
        let key = normalize_key(key)?;
        let Some(index) = self.find(&key) else {
            return missing(key, tolerate_missing);
        };

        let entry = self.entries[index];
        let name_len = self.key_bytes(index).len() + 1;

        blob::shrink(&mut self.key_table, entry.key_offset as usize, name_len);
        blob::align4(&mut self.key_table);
        blob::shrink(
            &mut self.data_table,
            entry.data_offset as usize,
            entry.max_length as usize,
        );
        self.entries.remove(index);
        self.reindex()?;

        debug!(key = %key, index, max_length = entry.max_length, "Deleted parameter");
        Ok(())
    }

    /// Replace the value of an existing parameter, keeping its format
    ///
    /// Integers are overwritten in place. A string that no longer fits grows
    /// its slot to the encoded length rounded up to a multiple of 4; slots
    /// never shrink.
    ///
    /// # Errors
    /// - `NotFound` if the parameter is missing and `tolerate_missing` is false
    /// - `ValueTooLarge` if a non-string slot is too small for its value
    pub fn edit(&mut self, key: &str, value: &str, tolerate_missing: bool) -> Result<()> {
        let key = normalize_key(key)?;
        let Some(index) = self.find(&key) else {
            return missing(key, tolerate_missing);
        };

        let entry = self.entries[index];
        let encoded = value::encode(entry.format, &key, value)?;
        let max_length = entry.max_length as usize;

        if encoded.len() > max_length && entry.format.is_string() {
            let grown = align_up4(encoded.len());
            let delta = grown - max_length;
            blob::expand(&mut self.data_table, entry.data_end(), delta)?;
            self.entries[index].max_length =
                u32::try_from(grown).map_err(|_| SfoError::TooLarge {
                    table: "data table",
                    limit: u64::from(u32::MAX),
                })?;
            self.reindex()?;
            debug!(key = %key, from = max_length, to = grown, "Grew parameter slot");
        }

        self.write_slot(index, &encoded)?;
        debug!(key = %key, index, length = encoded.len(), "Edited parameter");
        Ok(())
    }

    /// Add or replace a parameter
    ///
    /// Equivalent to a tolerant delete followed by a tolerant add, so it
    /// never fails because the parameter does or does not exist. The value is
    /// checked before anything is removed.
    pub fn set(&mut self, format: ParamFormat, key: &str, value: &str) -> Result<()> {
        let normalized = normalize_key(key)?;
        value::encode(format, &normalized, value)?;

        self.delete(&normalized, true)?;
        self.add(format, &normalized, value, true)
    }

    /// Rewrite every directory offset and the header from the tables
    ///
    /// Names are read back to back from the start of the key table and slots
    /// are laid out back to back in the data table, both in directory order.
    pub(crate) fn reindex(&mut self) -> Result<()> {
        let mut key_offset = 0usize;
        let mut data_offset = 0usize;

        for entry in &mut self.entries {
            entry.key_offset = u16::try_from(key_offset).map_err(|_| SfoError::TooLarge {
                table: "key table",
                limit: u64::from(u16::MAX),
            })?;
            entry.data_offset = u32::try_from(data_offset).map_err(|_| SfoError::TooLarge {
                table: "data table",
                limit: u64::from(u32::MAX),
            })?;

            let rest = self.key_table.get(key_offset..).unwrap_or_default();
            let name_len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
            key_offset += name_len + 1;
            data_offset += entry.max_length as usize;
        }

        self.header = self.computed_header()?;
        Ok(())
    }

    /// Zero the slot at `index` and copy `bytes` into it
    fn write_slot(&mut self, index: usize, bytes: &[u8]) -> Result<()> {
        let entry = self.entries[index];
        if bytes.len() > entry.max_length as usize {
            return Err(SfoError::ValueTooLarge {
                key: self.key_at(index).into_owned(),
                needed: bytes.len(),
                max_length: entry.max_length,
            });
        }

        let start = entry.data_offset as usize;
        let slot = self
            .data_table
            .get_mut(start..entry.data_end())
            .ok_or_else(|| {
                SfoError::Inconsistent(format!(
                    "slot {start}..{} lies outside the data table",
                    entry.data_end()
                ))
            })?;
        slot.fill(0);
        slot[..bytes.len()].copy_from_slice(bytes);

        self.entries[index].length = bytes.len() as u32;
        Ok(())
    }

    /// Index of the first entry whose name sorts after `key`
    fn insertion_index(&self, key: &str) -> usize {
        (0..self.entries.len())
            .find(|&i| compare_keys(self.key_bytes(i), key.as_bytes()).is_gt())
            .unwrap_or(self.entries.len())
    }

    /// Key table position for a name inserted at `index`
    fn key_insert_position(&self, index: usize) -> usize {
        if index < self.entries.len() {
            return self.entries[index].key_offset as usize;
        }
        match self.entries.len().checked_sub(1) {
            Some(last) => self.entries[last].key_offset as usize + self.key_bytes(last).len() + 1,
            None => 0,
        }
    }

    /// Data table position for a slot inserted at `index`
    fn data_insert_position(&self, index: usize) -> usize {
        self.entries
            .get(index)
            .map_or(self.data_table.len(), |entry| entry.data_offset as usize)
    }
}

/// Uppercase a parameter name and reject names the key table cannot hold
fn normalize_key(key: &str) -> Result<String> {
    if key.is_empty() || key.contains('\0') {
        return Err(SfoError::InvalidKey(key.to_string()));
    }
    Ok(key.to_ascii_uppercase())
}

/// Bytes to reserve for a new slot holding `encoded_len` bytes
fn slot_capacity(format: ParamFormat, key: &str, encoded_len: usize) -> usize {
    if !format.is_string() {
        return encoded_len;
    }
    let fitted = align_up4(encoded_len).max(4);
    reserved_length(key).map_or(fitted, |reserved| fitted.max(reserved as usize))
}

fn missing(key: String, tolerate_missing: bool) -> Result<()> {
    if tolerate_missing {
        debug!(key = %key, "Parameter missing, skipped");
        return Ok(());
    }
    Err(SfoError::NotFound(key))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sfo::value::SfoValue;
    use crate::test_utils::sample_document_bytes;
    use pretty_assertions::assert_eq;

    fn sample() -> SfoFile {
        SfoFile::parse(&sample_document_bytes()).unwrap()
    }

    #[test]
    fn test_add_to_empty_document() {
        let mut file = SfoFile::new();
        file.add(ParamFormat::Utf8, "TITLE", "My Game", false).unwrap();

        assert_eq!(file.len(), 1);
        let entry = file.entries[0];
        assert_eq!(entry.format, ParamFormat::Utf8);
        assert_eq!(entry.length, 8);
        assert_eq!(entry.max_length, 8);
        assert_eq!(entry.key_offset, 0);
        assert_eq!(entry.data_offset, 0);
        assert_eq!(file.key_table, b"TITLE\0\0\0".to_vec());
        assert_eq!(file.data_table, b"My Game\0".to_vec());
        assert_eq!(file.header.entry_count, 1);
        assert_eq!(file.header.key_table_offset, 36);
        assert_eq!(file.header.data_table_offset, 44);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_add_keeps_key_order() {
        let mut file = sample();
        file.add(ParamFormat::Utf8, "app_ver", "01.00", false).unwrap();
        file.add(ParamFormat::Integer, "ATTRIBUTE", "0x20", false).unwrap();
        file.add(ParamFormat::Utf8, "VERSION", "01.00", false).unwrap();

        let keys: Vec<String> = file.iter().map(|p| p.key.into_owned()).collect();
        assert_eq!(
            keys,
            vec!["APP_TYPE", "APP_VER", "ATTRIBUTE", "CATEGORY", "TITLE", "VERSION"]
        );
        assert_eq!(file.get("APP_VER"), Some(SfoValue::String("01.00".to_string())));
        assert_eq!(file.get("ATTRIBUTE"), Some(SfoValue::Integer(0x20)));
        assert_eq!(file.get("TITLE"), Some(SfoValue::String("My Game".to_string())));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_add_uses_reserved_length() {
        let mut file = SfoFile::new();
        file.add(ParamFormat::Utf8, "TITLE_ID", "ABCD12345", false).unwrap();
        assert_eq!(file.entries[0].length, 10);
        assert_eq!(file.entries[0].max_length, 12);

        file.add(ParamFormat::Utf8, "CONTENT_ID", "X", false).unwrap();
        let index = file.find("CONTENT_ID").unwrap();
        assert_eq!(file.entries[index].length, 2);
        assert_eq!(file.entries[index].max_length, 48);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_add_duplicate() {
        let mut file = sample();
        let before = file.clone();

        assert!(matches!(
            file.add(ParamFormat::Utf8, "title", "Other", false),
            Err(SfoError::DuplicateKey(key)) if key == "TITLE"
        ));
        file.add(ParamFormat::Utf8, "TITLE", "Other", true).unwrap();
        assert_eq!(file, before);
    }

    #[test]
    fn test_add_invalid_input() {
        let mut file = sample();
        let before = file.clone();

        assert!(matches!(
            file.add(ParamFormat::Integer, "PARENTAL_LEVEL", "high", false),
            Err(SfoError::InvalidInteger(_))
        ));
        assert!(matches!(
            file.add(ParamFormat::Utf8, "", "x", false),
            Err(SfoError::InvalidKey(_))
        ));
        assert!(matches!(
            file.add(ParamFormat::Utf8, "BAD\0KEY", "x", false),
            Err(SfoError::InvalidKey(_))
        ));
        assert_eq!(file, before);
    }

    #[test]
    fn test_delete() {
        let mut file = sample();
        file.delete("category", false).unwrap();

        assert_eq!(file.len(), 2);
        assert_eq!(file.key_at(0), "APP_TYPE");
        assert_eq!(file.key_at(1), "TITLE");
        assert_eq!(file.entries[1].key_offset, 9);
        assert_eq!(file.entries[1].data_offset, 4);
        assert_eq!(file.key_table, b"APP_TYPE\0TITLE\0\0".to_vec());
        assert_eq!(file.get("TITLE"), Some(SfoValue::String("My Game".to_string())));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_delete_all() {
        let mut file = sample();
        for key in ["TITLE", "APP_TYPE", "CATEGORY"] {
            file.delete(key, false).unwrap();
        }
        assert!(file.is_empty());
        assert!(file.key_table.is_empty());
        assert!(file.data_table.is_empty());
        assert_eq!(file.build().unwrap(), SfoFile::new().build().unwrap());
    }

    #[test]
    fn test_delete_missing() {
        let mut file = sample();
        let before = file.clone();
        assert!(matches!(
            file.delete("VERSION", false),
            Err(SfoError::NotFound(key)) if key == "VERSION"
        ));
        file.delete("VERSION", true).unwrap();
        assert_eq!(file, before);
    }

    #[test]
    fn test_add_delete_inverse() {
        let original = sample();
        for key in ["AAA", "BOOT", "DETAIL", "ZZZ"] {
            let mut file = original.clone();
            file.add(ParamFormat::Utf8, key, "some value", false).unwrap();
            file.delete(key, false).unwrap();
            assert_eq!(file.build().unwrap(), original.build().unwrap(), "key {key}");
        }
    }

    #[test]
    fn test_edit_integer_in_place() {
        let mut file = sample();
        let before = file.clone();
        file.edit("APP_TYPE", "0x2", false).unwrap();

        assert_eq!(file.get("APP_TYPE"), Some(SfoValue::Integer(2)));
        assert_eq!(file.entries, before.entries);
        assert_eq!(file.key_table, before.key_table);
        assert_eq!(&file.data_table[0..4], &[2, 0, 0, 0]);
    }

    #[test]
    fn test_edit_string_within_capacity() {
        let mut file = SfoFile::new();
        file.add(ParamFormat::Utf8, "TITLE_ID", "ABCD12345", false).unwrap();
        file.add(ParamFormat::Utf8, "VERSION", "01.00", false).unwrap();
        let offsets: Vec<(u16, u32)> = file
            .entries
            .iter()
            .map(|e| (e.key_offset, e.data_offset))
            .collect();

        file.edit("TITLE_ID", "WXYZ99999", false).unwrap();

        let index = file.find("TITLE_ID").unwrap();
        assert_eq!(file.entries[index].max_length, 12);
        assert_eq!(file.entries[index].length, 10);
        assert_eq!(
            file.entries
                .iter()
                .map(|e| (e.key_offset, e.data_offset))
                .collect::<Vec<_>>(),
            offsets
        );
        assert_eq!(file.get("TITLE_ID"), Some(SfoValue::String("WXYZ99999".to_string())));
    }

    #[test]
    fn test_edit_shorter_clears_slot() {
        let mut file = sample();
        file.edit("TITLE", "Go", false).unwrap();

        let index = file.find("TITLE").unwrap();
        assert_eq!(file.entries[index].length, 3);
        assert_eq!(file.entries[index].max_length, 8);
        assert_eq!(file.slot(index), b"Go\0\0\0\0\0\0");
    }

    #[test]
    fn test_edit_grows_slot() {
        let mut file = sample();
        file.add(ParamFormat::Utf8, "VERSION", "01.00", false).unwrap();
        let version_offset = file.entries[file.find("VERSION").unwrap()].data_offset;

        file.edit("CATEGORY", "gdac", false).unwrap();

        let category = file.entries[file.find("CATEGORY").unwrap()];
        assert_eq!(category.length, 5);
        assert_eq!(category.max_length, 8);
        assert_eq!(file.entries[file.find("TITLE").unwrap()].data_offset, 8 + 4);
        assert_eq!(
            file.entries[file.find("VERSION").unwrap()].data_offset,
            version_offset + 4
        );
        assert_eq!(file.get("CATEGORY"), Some(SfoValue::String("gdac".to_string())));
        assert_eq!(file.get("TITLE"), Some(SfoValue::String("My Game".to_string())));
        assert_eq!(file.get("VERSION"), Some(SfoValue::String("01.00".to_string())));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_edit_missing() {
        let mut file = sample();
        assert!(matches!(
            file.edit("VERSION", "01.00", false),
            Err(SfoError::NotFound(_))
        ));
        file.edit("VERSION", "01.00", true).unwrap();
        assert_eq!(file, sample());
    }

    #[test]
    fn test_edit_undersized_integer_slot() {
        let mut file = sample();
        file.entries[0].max_length = 2;
        assert!(matches!(
            file.edit("APP_TYPE", "3", false),
            Err(SfoError::ValueTooLarge {
                needed: 4,
                max_length: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_edit_unknown_format() {
        let mut file = sample();
        file.entries[1].format = ParamFormat::Unknown(0x0808);
        assert!(matches!(
            file.edit("CATEGORY", "gp", false),
            Err(SfoError::UnsupportedFormat { format: 0x0808, .. })
        ));
    }

    #[test]
    fn test_set_missing_matches_add() {
        let mut via_set = sample();
        via_set.set(ParamFormat::Utf8, "DETAIL", "X").unwrap();

        let mut via_add = sample();
        via_add.add(ParamFormat::Utf8, "DETAIL", "X", false).unwrap();

        assert_eq!(via_set, via_add);
    }

    #[test]
    fn test_set_replaces_type() {
        let mut file = sample();
        file.set(ParamFormat::Utf8, "APP_TYPE", "game").unwrap();

        let index = file.find("APP_TYPE").unwrap();
        assert_eq!(file.entries[index].format, ParamFormat::Utf8);
        assert_eq!(file.get("APP_TYPE"), Some(SfoValue::String("game".to_string())));
        assert_eq!(file.len(), 3);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_set_invalid_value_keeps_entry() {
        let mut file = sample();
        let before = file.clone();
        assert!(matches!(
            file.set(ParamFormat::Integer, "TITLE", "not a number"),
            Err(SfoError::InvalidInteger(_))
        ));
        assert_eq!(file, before);
    }

    #[test]
    fn test_special_string_length() {
        let mut file = sample();
        file.entries[1].format = ParamFormat::Utf8Special;
        file.edit("CATEGORY", "gdac", false).unwrap();

        let index = file.find("CATEGORY").unwrap();
        assert_eq!(file.entries[index].length, 4);
        assert_eq!(file.entries[index].max_length, 4);
        assert_eq!(file.get("CATEGORY"), Some(SfoValue::String("gdac".to_string())));
    }

    #[test]
    fn test_slot_capacity() {
        assert_eq!(slot_capacity(ParamFormat::Integer, "APP_TYPE", 4), 4);
        assert_eq!(slot_capacity(ParamFormat::Utf8, "TITLE", 8), 8);
        assert_eq!(slot_capacity(ParamFormat::Utf8, "TITLE", 9), 12);
        assert_eq!(slot_capacity(ParamFormat::Utf8, "TITLE_ID", 2), 12);
        assert_eq!(slot_capacity(ParamFormat::Utf8, "TITLE_ID", 13), 16);
        assert_eq!(slot_capacity(ParamFormat::Utf8Special, "X", 0), 4);
    }
}
