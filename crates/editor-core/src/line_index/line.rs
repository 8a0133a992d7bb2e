use crate::cursor::{Bytes, Cursor};
use crate::piece_table::table::PieceTable;

/// One line of the document, as seen at the time it was computed.
///
/// `end` stops before the line terminator; `next_line` is the first byte of
/// the following line. Both are plain cursors, so a `Line` is only
/// meaningful until the next edit of the table that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    begin: Cursor,
    end: Cursor,
    next_line: Cursor,
    size: usize,
}

impl Line {
    #[must_use]
    pub fn new(begin: Cursor, end: Cursor, next_line: Cursor, size: usize) -> Self {
        Self {
            begin,
            end,
            next_line,
            size,
        }
    }

    #[inline]
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.begin
    }

    /// One past the last content byte (the terminator, if any).
    #[inline]
    #[must_use]
    pub fn end(&self) -> Cursor {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn next_line(&self) -> Cursor {
        self.next_line
    }

    /// Content length in bytes, terminator excluded.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether the line ends in `\r`, `\n` or a pair of them.
    #[inline]
    #[must_use]
    pub fn has_terminator(&self) -> bool {
        self.end != self.next_line
    }

    /// Content bytes of the line.
    #[must_use]
    pub fn bytes<'table>(&self, table: &'table PieceTable) -> Bytes<'table> {
        table.range(self.begin, self.end)
    }
}
