//! Text rendering of parameters.

use paramsfo_formats::sfo::{IntDisplay, SfoFile};
use std::io::{self, Write};

/// Print every parameter as `KEY=VALUE`, in directory order.
pub fn write_listing<W: Write>(out: &mut W, file: &SfoFile, display: IntDisplay) -> io::Result<()> {
    for param in file.iter() {
        writeln!(out, "{}={}", param.key, param.value.render(display))?;
    }
    Ok(())
}
