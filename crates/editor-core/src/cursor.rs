use crate::errors::{TextBufferError, TextBufferResult};
use crate::piece_table::list::PieceId;
use crate::piece_table::table::PieceTable;

/// A position in a [`PieceTable`]: a piece handle plus the offset inside it.
///
/// Cursors hold no borrow of the table. Every operation resolves the cursor
/// against the table passed in, so a cursor can be kept across edits and
/// stays valid unless the piece it refers to is removed. The end sentinel
/// (one past the last byte) has no piece.
///
/// Equality is identity: two cursors are equal when both are the end
/// sentinel or both name the same piece and offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    piece: Option<PieceId>,
    offset: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::end()
    }
}

impl Cursor {
    /// The end sentinel.
    #[inline]
    #[must_use]
    pub const fn end() -> Self {
        Self {
            piece: None,
            offset: 0,
        }
    }

    #[inline]
    pub(crate) fn at(piece: PieceId, offset: usize) -> Self {
        Self {
            piece: Some(piece),
            offset,
        }
    }

    /// Cursor at the first byte of `piece`, or the end sentinel for `None`.
    #[inline]
    pub(crate) fn start_of(piece: Option<PieceId>) -> Self {
        Self { piece, offset: 0 }
    }

    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.piece.is_none()
    }

    #[inline]
    #[must_use]
    pub fn piece(&self) -> Option<PieceId> {
        self.piece
    }

    /// Offset inside the referenced piece.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the byte under the cursor.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` for the end sentinel or a cursor whose piece was removed.
    pub fn dereference(&self, table: &PieceTable) -> TextBufferResult<u8> {
        let Some((_, piece)) = table.resolve(*self)? else {
            return Err(TextBufferError::InvalidPosition(
                "cannot dereference the end of the document",
            ));
        };

        table
            .slice_of(&piece)
            .get(self.offset)
            .copied()
            .ok_or(TextBufferError::InvalidPosition(
                "cursor offset lies outside its backing store",
            ))
    }

    /// Moves one byte forward, crossing into the next piece when the current
    /// one runs out.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` when the cursor is already at the end or is stale.
    pub fn increment(&mut self, table: &PieceTable) -> TextBufferResult<()> {
        let Some((id, piece)) = table.resolve(*self)? else {
            return Err(TextBufferError::InvalidPosition(
                "cannot increment past the end of the document",
            ));
        };

        if self.offset + 1 < piece.len {
            self.offset += 1;
        } else {
            *self = Self::start_of(table.pieces.next(id));
        }

        Ok(())
    }

    /// Moves one byte backward. From the end sentinel this lands on the last
    /// byte of the last piece.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` on an empty document, at the first byte, or when
    /// the cursor is stale.
    pub fn decrement(&mut self, table: &PieceTable) -> TextBufferResult<()> {
        let target = match table.resolve(*self)? {
            None => table.pieces.last().ok_or(TextBufferError::InvalidPosition(
                "cannot decrement in an empty document",
            ))?,
            Some(_) if self.offset > 0 => {
                self.offset -= 1;

                return Ok(());
            }
            Some((id, _)) => table
                .pieces
                .prev(id)
                .ok_or(TextBufferError::InvalidPosition(
                    "cannot decrement before the beginning of the document",
                ))?,
        };
        // Pieces are never empty once an operation completes.
        let len = table.pieces.get(target).map_or(0, |piece| piece.len);

        *self = Self::at(target, len.saturating_sub(1));

        Ok(())
    }

    /// Steps forward `count` bytes.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if the walk would pass the end of the document.
    pub fn advance(&mut self, table: &PieceTable, mut count: usize) -> TextBufferResult<()> {
        while count > 0 {
            let Some((id, piece)) = table.resolve(*self)? else {
                return Err(TextBufferError::InvalidPosition(
                    "cannot advance past the end of the document",
                ));
            };
            let remaining = piece.len - self.offset;

            if count < remaining {
                self.offset += count;

                return Ok(());
            }

            count -= remaining;
            *self = Self::start_of(table.pieces.next(id));
        }

        Ok(())
    }

    /// Steps backward `count` bytes.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if the walk would pass the beginning of the document.
    pub fn retreat(&mut self, table: &PieceTable, count: usize) -> TextBufferResult<()> {
        for _ in 0..count {
            self.decrement(table)?;
        }

        Ok(())
    }
}

/// Bidirectional byte iterator over the half-open cursor range `[front, back)`.
///
/// Iteration ends early if an endpoint is stale; callers that must tell that
/// apart from a short range resolve the endpoints first, as `search` does.
///
/// This is the adapter that lets generic algorithms (`position`, `eq`,
/// `rev`, ...) run over both backing stores without knowing about them.
#[derive(Clone, Debug)]
pub struct Bytes<'table> {
    table: &'table PieceTable,
    front: Cursor,
    back: Cursor,
}

impl<'table> Bytes<'table> {
    pub(crate) fn new(table: &'table PieceTable, front: Cursor, back: Cursor) -> Self {
        Self { table, front, back }
    }

    /// Position of the next byte `next()` would yield.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Cursor {
        self.front
    }

    /// One past the byte `next_back()` would yield.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Cursor {
        self.back
    }
}

impl Iterator for Bytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.front == self.back {
            return None;
        }

        let byte = self.front.dereference(self.table).ok()?;

        self.front.increment(self.table).ok()?;

        Some(byte)
    }
}

impl DoubleEndedIterator for Bytes<'_> {
    fn next_back(&mut self) -> Option<u8> {
        if self.front == self.back {
            return None;
        }

        self.back.decrement(self.table).ok()?;
        self.back.dereference(self.table).ok()
    }
}

#[cfg(test)]
mod cursor_tests {
    use super::Cursor;
    use crate::errors::TextBufferError;
    use crate::piece_table::table::PieceTable;
    use pretty_assertions::assert_eq;

    fn table_from(bytes: &[u8]) -> PieceTable {
        let mut table = PieceTable::new();

        for &byte in bytes {
            table.insert(table.end(), byte).unwrap();
        }

        table
    }

    /// "ab" in the add buffer, then "X" spliced in front so the document
    /// spans two pieces in non-contiguous buffer order.
    fn two_piece_table() -> PieceTable {
        let mut table = table_from(b"ab");

        table.insert(table.begin(), b'X').unwrap();
        assert_eq!(table.piece_count(), 2);

        table
    }

    #[test]
    fn increment_crosses_piece_boundaries() {
        let table = two_piece_table();
        let mut it = table.begin();
        let mut seen = Vec::new();

        while !it.is_end() {
            seen.push(it.dereference(&table).unwrap());
            it.increment(&table).unwrap();
        }

        assert_eq!(seen, b"Xab");
        assert_eq!(it, table.end());
    }

    #[test]
    fn decrement_from_end_walks_back_to_begin() {
        let table = two_piece_table();
        let mut it = table.end();
        let mut seen = Vec::new();

        while it != table.begin() {
            it.decrement(&table).unwrap();
            seen.push(it.dereference(&table).unwrap());
        }

        assert_eq!(seen, b"baX");
    }

    #[test]
    fn stepping_outside_the_document_is_an_error() {
        let table = two_piece_table();
        let mut end = table.end();
        let mut begin = table.begin();

        assert!(matches!(
            end.dereference(&table),
            Err(TextBufferError::InvalidPosition(_))
        ));
        assert!(matches!(
            end.increment(&table),
            Err(TextBufferError::InvalidPosition(_))
        ));
        assert!(matches!(
            begin.decrement(&table),
            Err(TextBufferError::InvalidPosition(_))
        ));

        let empty = PieceTable::new();
        let mut it = empty.end();

        assert_eq!(empty.begin(), empty.end());
        assert!(matches!(
            it.decrement(&empty),
            Err(TextBufferError::InvalidPosition(_))
        ));
    }

    #[test]
    fn advance_and_retreat_are_repeated_steps() {
        let table = two_piece_table();
        let mut it = table.begin();

        it.advance(&table, 2).unwrap();
        assert_eq!(it.dereference(&table).unwrap(), b'b');

        it.retreat(&table, 2).unwrap();
        assert_eq!(it, table.begin());

        it.advance(&table, 3).unwrap();
        assert_eq!(it, table.end());
        assert!(it.advance(&table, 1).is_err());
    }

    #[test]
    fn copies_do_not_alias() {
        let table = table_from(b"abc");
        let original = table.begin();
        let mut copy = original;

        copy.increment(&table).unwrap();

        assert_eq!(original.dereference(&table).unwrap(), b'a');
        assert_eq!(copy.dereference(&table).unwrap(), b'b');
        assert_ne!(original, copy);
        assert_eq!(Cursor::default(), table.end());
    }

    #[test]
    fn bytes_is_double_ended() {
        let table = two_piece_table();

        assert_eq!(table.bytes().collect::<Vec<_>>(), b"Xab");
        assert_eq!(table.bytes().rev().collect::<Vec<_>>(), b"baX");
        assert_eq!(table.bytes().rev().position(|b| b == b'X'), Some(2));

        let mut bytes = table.bytes();

        assert_eq!(bytes.next(), Some(b'X'));
        assert_eq!(bytes.next_back(), Some(b'b'));
        assert_eq!(bytes.next(), Some(b'a'));
        assert_eq!(bytes.next_back(), None);
        assert_eq!(bytes.next(), None);
    }
}
