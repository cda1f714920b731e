//! Resize primitives for the key and data tables
//!
//! Both tables are plain byte vectors. Growing or shrinking one moves every
//! byte behind the resize point, so callers must reindex the directory in the
//! same operation (see [`SfoFile::reindex`](crate::sfo::SfoFile)).

use crate::sfo::error::Result;
use tracing::trace;

/// Insert `additional` zero bytes at `at`, shifting the tail forward
///
/// Offsets past the end append to the table.
pub fn expand(blob: &mut Vec<u8>, at: usize, additional: usize) -> Result<()> {
    if additional == 0 {
        return Ok(());
    }

    debug_assert!(at <= blob.len(), "expand offset {at} past end {}", blob.len());
    let at = at.min(blob.len());

    blob.try_reserve(additional)?;
    blob.splice(at..at, std::iter::repeat_n(0u8, additional));

    trace!(at, additional, len = blob.len(), "Expanded table");
    Ok(())
}

/// Remove `removed` bytes at `at`, shifting the tail backward
pub fn shrink(blob: &mut Vec<u8>, at: usize, removed: usize) {
    let start = at.min(blob.len());
    let end = at.saturating_add(removed).min(blob.len());
    blob.drain(start..end);

    trace!(at, removed, len = blob.len(), "Shrank table");
}

/// Normalize the tail padding of a key table
///
/// Strips every trailing NUL, re-adds a single terminator when the table is
/// non-empty, then pads with NULs to a multiple of 4.
pub fn align4(blob: &mut Vec<u8>) {
    while blob.last() == Some(&0) {
        blob.pop();
    }

    if !blob.is_empty() {
        blob.push(0);
    }

    let padded = align_up4(blob.len());
    blob.resize(padded, 0);
}

/// Round `n` up to the next multiple of 4
pub const fn align_up4(n: usize) -> usize {
    n.next_multiple_of(4)
}
