//! PSF document structure, parsing, and building

use crate::sfo::{
    entry::{ENTRY_SIZE, SfoEntry},
    error::{Result, SfoError},
    header::{HEADER_SIZE, SFO_MAGIC, SfoHeader},
    value::{IntDisplay, SfoValue},
};
use binrw::{BinRead, BinWrite, io::Cursor};
use std::borrow::Cow;
use std::io::Write;
use tracing::debug;

/// Complete PSF document
///
/// The document owns the header, the entry directory, and both tables as
/// raw bytes. Entries are kept in key order; each entry's `key_offset` and
/// `data_offset` point into `key_table` and `data_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfoFile {
    /// Document header
    pub header: SfoHeader,
    /// Entry directory in key order
    pub entries: Vec<SfoEntry>,
    /// NUL-terminated names, padded to a multiple of 4
    pub key_table: Vec<u8>,
    /// Value slots, each `max_length` bytes long
    pub data_table: Vec<u8>,
}

/// Borrowed view of one parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfoParam<'a> {
    /// Parameter name
    pub key: Cow<'a, str>,
    /// Directory record
    pub entry: &'a SfoEntry,
    /// Decoded value
    pub value: SfoValue,
}

impl SfoFile {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            header: SfoHeader::new(),
            entries: Vec::new(),
            key_table: Vec::new(),
            data_table: Vec::new(),
        }
    }

    /// Parse a PSF document from binary data
    ///
    /// # Format Layout
    /// 1. Header (20 bytes)
    /// 2. Entry directory (16 bytes per entry)
    /// 3. Key table (`data_table_offset - key_table_offset` bytes)
    /// 4. Data table (last entry's `data_offset + max_length` bytes)
    ///
    /// # Errors
    /// Returns error if:
    /// - The magic signature is wrong
    /// - Any section extends past the end of `data`
    /// - The header places the data table before the key table
    pub fn parse(data: &[u8]) -> Result<Self> {
        let magic = section(data, 0, SFO_MAGIC.len(), "header")?;
        if magic != SFO_MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(SfoError::InvalidMagic(found));
        }
        section(data, 0, HEADER_SIZE, "header")?;

        let mut cursor = Cursor::new(data);
        let header = SfoHeader::read(&mut cursor)?;
        header.validate()?;

        let entry_count = header.entry_count as usize;
        let directory_size = entry_count
            .checked_mul(ENTRY_SIZE)
            .ok_or(SfoError::Truncated {
                section: "entry directory",
                needed: usize::MAX,
                available: data.len(),
            })?;
        section(data, HEADER_SIZE, directory_size, "entry directory")?;

        let mut entries = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            entries.push(SfoEntry::read(&mut cursor)?);
        }

        let key_table_size = header.key_table_size()?;
        let key_table = section(
            data,
            header.key_table_offset as usize,
            key_table_size,
            "key table",
        )?
        .to_vec();

        let data_table_size = entries.last().map_or(0, SfoEntry::data_end);
        let data_table = section(
            data,
            header.data_table_offset as usize,
            data_table_size,
            "data table",
        )?
        .to_vec();

        debug!(
            entries = entry_count,
            key_table = key_table_size,
            data_table = data_table_size,
            "Parsed PSF document"
        );

        Ok(Self {
            header,
            entries,
            key_table,
            data_table,
        })
    }

    /// Build the document to binary data
    ///
    /// Table offsets are derived from the current directory size and key
    /// table length, whatever the header says.
    pub fn build(&self) -> Result<Vec<u8>> {
        let header = self.computed_header()?;
        let total = header.data_table_offset as usize + self.data_table.len();

        let mut buffer = Vec::with_capacity(total);
        self.write_with_header(&mut Cursor::new(&mut buffer), &header)?;
        Ok(buffer)
    }

    /// Write the built document to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.build()?)?;
        Ok(())
    }

    fn write_with_header(&self, cursor: &mut Cursor<&mut Vec<u8>>, header: &SfoHeader) -> Result<()> {
        header.write(cursor)?;
        for entry in &self.entries {
            entry.write(cursor)?;
        }
        cursor.write_all(&self.key_table)?;
        cursor.write_all(&self.data_table)?;
        Ok(())
    }

    /// Header with offsets and count derived from the current tables
    pub fn computed_header(&self) -> Result<SfoHeader> {
        let too_large = || SfoError::TooLarge {
            table: "document",
            limit: u64::from(u32::MAX),
        };

        let entry_count = u32::try_from(self.entries.len()).map_err(|_| too_large())?;
        let key_table_offset = self
            .entries
            .len()
            .checked_mul(ENTRY_SIZE)
            .and_then(|size| size.checked_add(HEADER_SIZE))
            .and_then(|offset| u32::try_from(offset).ok())
            .ok_or_else(too_large)?;
        let data_table_offset = u32::try_from(self.key_table.len())
            .ok()
            .and_then(|size| key_table_offset.checked_add(size))
            .ok_or_else(too_large)?;

        Ok(SfoHeader {
            magic: self.header.magic,
            version: self.header.version,
            key_table_offset,
            data_table_offset,
            entry_count,
        })
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no parameters
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw name bytes of the entry at `index`, without the terminator
    pub(crate) fn key_bytes(&self, index: usize) -> &[u8] {
        let start = self.entries[index].key_offset as usize;
        let rest = self.key_table.get(start..).unwrap_or_default();
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        &rest[..end]
    }

    /// Name of the entry at `index`
    pub fn key_at(&self, index: usize) -> Cow<'_, str> {
        String::from_utf8_lossy(self.key_bytes(index))
    }

    /// Slot bytes of the entry at `index`
    pub fn slot(&self, index: usize) -> &[u8] {
        let entry = &self.entries[index];
        let start = entry.data_offset as usize;
        let end = entry.data_end().min(self.data_table.len());
        self.data_table.get(start..end).unwrap_or_default()
    }

    /// Decoded value of the entry at `index`
    pub fn value_at(&self, index: usize) -> SfoValue {
        let entry = &self.entries[index];
        SfoValue::decode(entry.format, self.slot(index), entry.length)
    }

    /// Find an entry index by name, ignoring ASCII case
    pub fn find(&self, key: &str) -> Option<usize> {
        (0..self.entries.len()).find(|&i| self.key_bytes(i).eq_ignore_ascii_case(key.as_bytes()))
    }

    /// Find an entry index by name or fail with [`SfoError::NotFound`]
    pub fn lookup(&self, key: &str) -> Result<usize> {
        self.find(key)
            .ok_or_else(|| SfoError::NotFound(key.to_ascii_uppercase()))
    }

    /// Decoded value of a parameter
    pub fn get(&self, key: &str) -> Option<SfoValue> {
        self.find(key).map(|index| self.value_at(index))
    }

    /// Rendered value of a parameter
    pub fn render(&self, key: &str, display: IntDisplay) -> Result<String> {
        let index = self.lookup(key)?;
        Ok(self.value_at(index).render(display))
    }

    /// Iterate over all parameters in directory order
    pub fn iter(&self) -> impl Iterator<Item = SfoParam<'_>> {
        (0..self.entries.len()).map(move |index| SfoParam {
            key: self.key_at(index),
            entry: &self.entries[index],
            value: self.value_at(index),
        })
    }

    /// Check the layout invariants
    ///
    /// - names are stored back to back in ascending key order
    /// - every `data_offset` equals the sum of the preceding `max_length`s
    /// - the key table length is a multiple of 4
    /// - every `length` fits its `max_length`, and string slots are 4-aligned
    /// - the data table is exactly as long as the slots it holds
    pub fn validate(&self) -> Result<()> {
        if self.key_table.len() % 4 != 0 {
            return Err(SfoError::Inconsistent(format!(
                "key table length {} is not a multiple of 4",
                self.key_table.len()
            )));
        }

        let mut key_offset = 0usize;
        let mut data_offset = 0usize;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.key_offset as usize != key_offset {
                return Err(SfoError::Inconsistent(format!(
                    "entry {index} key offset {} expected {key_offset}",
                    entry.key_offset
                )));
            }
            if entry.data_offset as usize != data_offset {
                return Err(SfoError::Inconsistent(format!(
                    "entry {index} data offset {} expected {data_offset}",
                    entry.data_offset
                )));
            }
            if entry.length > entry.max_length {
                return Err(SfoError::Inconsistent(format!(
                    "entry {index} length {} exceeds max length {}",
                    entry.length, entry.max_length
                )));
            }
            if entry.format.is_string() && entry.max_length % 4 != 0 {
                return Err(SfoError::Inconsistent(format!(
                    "entry {index} max length {} is not a multiple of 4",
                    entry.max_length
                )));
            }
            if index > 0
                && compare_keys(self.key_bytes(index - 1), self.key_bytes(index)).is_ge()
            {
                return Err(SfoError::Inconsistent(format!(
                    "entry {index} ({}) is out of key order",
                    self.key_at(index)
                )));
            }

            key_offset += self.key_bytes(index).len() + 1;
            data_offset += entry.max_length as usize;
        }

        if key_offset > self.key_table.len() {
            return Err(SfoError::Inconsistent(format!(
                "names need {key_offset} bytes but key table holds {}",
                self.key_table.len()
            )));
        }
        if data_offset != self.data_table.len() {
            return Err(SfoError::Inconsistent(format!(
                "slots need {data_offset} bytes but data table holds {}",
                self.data_table.len()
            )));
        }

        Ok(())
    }
}

impl Default for SfoFile {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::PsfFormat for SfoFile {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::parse(data)?)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(Self::build(self)?)
    }
}

/// Compare names by their ASCII-uppercased bytes
pub(crate) fn compare_keys(a: &[u8], b: &[u8]) -> std::cmp::Ordering {
    a.iter()
        .map(u8::to_ascii_uppercase)
        .cmp(b.iter().map(u8::to_ascii_uppercase))
}

fn section<'a>(data: &'a [u8], offset: usize, len: usize, name: &'static str) -> Result<&'a [u8]> {
    let end = offset.checked_add(len).ok_or(SfoError::Truncated {
        section: name,
        needed: usize::MAX,
        available: data.len(),
    })?;
    data.get(offset..end).ok_or(SfoError::Truncated {
        section: name,
        needed: end,
        available: data.len(),
    })
}
