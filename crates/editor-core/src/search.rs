//! Literal byte search over a cursor range.
//!
//! Works on any `[begin, end)` pair of cursors, so callers can search the
//! whole document or a single line without copying it out of the table.

use crate::cursor::Cursor;
use crate::errors::TextBufferResult;
use crate::piece_table::table::PieceTable;

/// A search hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// First byte of the match.
    pub start: Cursor,
    /// One past the last byte of the match.
    pub end: Cursor,
    /// Distance in bytes from the `begin` of the searched range.
    pub position: usize,
    pub len: usize,
}

/// Whether `needle` occurs at `start`, returning the cursor just past it.
fn match_at(table: &PieceTable, start: Cursor, end: Cursor, needle: &[u8]) -> Option<Cursor> {
    let mut probe = table.range(start, end);

    needle
        .iter()
        .all(|&byte| probe.next() == Some(byte))
        .then(|| probe.front())
}

/// First occurrence of `needle` in `[begin, end)`.
///
/// # Errors
///
/// `InvalidPosition` if either cursor is stale.
pub fn find(
    table: &PieceTable,
    begin: Cursor,
    end: Cursor,
    needle: &[u8],
) -> TextBufferResult<Option<Match>> {
    table.resolve(begin)?;
    table.resolve(end)?;

    let mut start = begin;
    let mut position = 0;

    loop {
        if let Some(match_end) = match_at(table, start, end, needle) {
            return Ok(Some(Match {
                start,
                end: match_end,
                position,
                len: needle.len(),
            }));
        }

        if start == end || start.is_end() {
            return Ok(None);
        }

        start.increment(table)?;
        position += 1;
    }
}

/// Last occurrence of `needle` in `[begin, end)`.
///
/// # Errors
///
/// `InvalidPosition` if either cursor is stale.
pub fn rfind(
    table: &PieceTable,
    begin: Cursor,
    end: Cursor,
    needle: &[u8],
) -> TextBufferResult<Option<Match>> {
    table.resolve(begin)?;
    table.resolve(end)?;

    let mut stop = end;

    loop {
        let mut probe = table.range(begin, stop);

        if needle
            .iter()
            .rev()
            .all(|&byte| probe.next_back() == Some(byte))
        {
            let start = probe.back();

            return Ok(Some(Match {
                start,
                end: stop,
                position: table.range(begin, start).count(),
                len: needle.len(),
            }));
        }

        if stop == begin {
            return Ok(None);
        }

        stop.decrement(table)?;
    }
}
