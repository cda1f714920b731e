//! PSF (`param.sfo`) format support
//!
//! A PSF document stores the metadata of a package (title, title ID, version,
//! content ID, attributes, ...) as a flat list of typed key/value parameters.
//!
//! # Document Structure
//!
//! All multi-byte fields are little-endian:
//!
//! - **Header** (20 bytes): magic `\0PSF`, version, key table offset, data
//!   table offset, entry count
//! - **Entry directory** (16 bytes per entry): key offset (u16), format (u16),
//!   length, max length, data offset
//! - **Key table**: NUL-terminated names in entry order, padded to 4 bytes
//! - **Data table**: one slot of `max_length` bytes per entry, in entry order
//!
//! Entries are sorted by name. Each slot's offset is the sum of the
//! `max_length` of every slot before it, so growing one value shifts every
//! later entry. The editing operations keep all of this consistent and the
//! builder recomputes the header offsets on every save.
//!
//! # Basic Usage
//!
//! ## Reading Parameters
//!
//! ```rust,no_run
//! use paramsfo_formats::sfo::{IntDisplay, SfoFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("param.sfo")?;
//! let sfo = SfoFile::parse(&data)?;
//!
//! for param in sfo.iter() {
//!     println!("{}={}", param.key, param.value.render(IntDisplay::Hex));
//! }
//!
//! println!("Title ID: {}", sfo.render("TITLE_ID", IntDisplay::Hex)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing Parameters
//!
//! ```rust,no_run
//! use paramsfo_formats::sfo::{BatchOptions, ParamFormat, SfoCommand, SfoFile, apply_batch};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sfo = SfoFile::parse(&std::fs::read("param.sfo")?)?;
//!
//! let commands = vec![
//!     SfoCommand::Edit {
//!         key: "TITLE".to_string(),
//!         value: "My Game".to_string(),
//!     },
//!     SfoCommand::Set {
//!         format: ParamFormat::Integer,
//!         key: "ATTRIBUTE".to_string(),
//!         value: "0x00000020".to_string(),
//!     },
//! ];
//!
//! // Either every command applies or `sfo` is untouched
//! apply_batch(&mut sfo, &commands, &BatchOptions::default())?;
//! std::fs::write("param.sfo", sfo.build()?)?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod blob;
pub mod entry;
pub mod error;
pub mod file;
pub mod header;
mod mutate;
pub mod reserved;
pub mod value;

// Re-export main types
pub use batch::{BatchOptions, BatchReport, SfoCommand, apply_batch, query};
pub use entry::{ENTRY_SIZE, ParamFormat, SfoEntry};
pub use error::{Result, SfoError};
pub use file::{SfoFile, SfoParam};
pub use header::{HEADER_SIZE, SFO_MAGIC, SFO_VERSION, SfoHeader};
pub use reserved::reserved_length;
pub use value::{IntDisplay, SfoValue, parse_integer};
