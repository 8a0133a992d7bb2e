use crate::cursor::{Bytes, Cursor};
use crate::enums::{BufferKind, Edit};
use crate::errors::{TextBufferError, TextBufferResult};
use crate::piece_table::list::{PieceId, PieceList};
use crate::piece_table::piece::Piece;

#[derive(Debug)]
pub struct PieceTable {
    /// Original unchanged file contents (zero-copy). `None` when the table
    /// was created empty or the file was missing or empty.
    original: Option<io::mmap::MmapFile>,
    /// Append-only buffer storing every inserted byte.
    buf: Vec<u8>,
    /// Ordered list of pieces describing the visible document.
    pub(crate) pieces: PieceList,
    /// Document length in bytes.
    len: usize,
    dirty: bool,
    /// A piece near the last edit and the document offset it starts at.
    /// Lets `offset_of` skip the list walk for cursors around the caret.
    anchor: Option<(PieceId, usize)>,

    pub(crate) line_index: crate::line_index::cache::LineIndex,
    history: crate::history::History,
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::new()
    }
}

/*

====================================
========= CREATION METHOD ==========
====================================

*/

impl PieceTable {
    /// Creates an empty table with no backing file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            original: None,
            buf: Vec::with_capacity(crate::piece_table::BASELINE_CAPACITY),
            pieces: PieceList::new(),
            len: 0,
            dirty: false,
            anchor: None,
            line_index: crate::line_index::cache::LineIndex::default(),
            history: crate::history::History::default(),
        }
    }

    /// Opens `path` as the original content of the document.
    ///
    /// A missing or empty file yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns `TextBufferError::System` if the file exists but cannot be
    /// opened, inspected or memory-mapped.
    pub fn open(path: impl AsRef<std::path::Path>) -> TextBufferResult<Self> {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "file does not exist, starting empty");

                return Ok(Self::new());
            }
            Err(err) => {
                return Err(TextBufferError::system(
                    format!("Error opening file {}", path.display()),
                    err,
                ));
            }
        };
        let size = file
            .metadata()
            .map_err(|err| {
                TextBufferError::system(format!("Error reading size of {}", path.display()), err)
            })?
            .len();

        if size == 0 {
            tracing::debug!(path = %path.display(), "file is empty, starting empty");

            return Ok(Self::new());
        }

        let mmap = io::mmap::MmapFile::from_file(file, path).map_err(|err| {
            TextBufferError::system(format!("Error mapping original file {}", path.display()), err)
        })?;
        let mut table = Self::new();

        table.len = mmap.len();
        table
            .pieces
            .push_back(Piece::new(BufferKind::Original, 0, mmap.len()));
        table.original = Some(mmap);

        tracing::debug!(path = %path.display(), len = table.len, "opened original file");

        Ok(table)
    }
}

/*

====================================
========= INLINE METHODS  ==========
====================================

*/

impl PieceTable {
    /// Total document length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the document changed since it was opened or last saved.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    #[inline]
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Pieces in document order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().map(|(_, piece)| piece)
    }

    #[inline]
    #[must_use]
    pub fn add_buffer(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    #[must_use]
    pub fn original(&self) -> Option<&io::mmap::MmapFile> {
        self.original.as_ref()
    }

    /// Cursor at the first byte (equal to [`PieceTable::end`] when empty).
    #[inline]
    #[must_use]
    pub fn begin(&self) -> Cursor {
        Cursor::start_of(self.pieces.first())
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> Cursor {
        Cursor::end()
    }

    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Bytes referenced by `piece` in whichever store it tags.
    #[inline]
    #[must_use]
    pub fn slice_of(&self, piece: &Piece) -> &[u8] {
        match piece.buf_kind {
            BufferKind::Original => self
                .original
                .as_ref()
                .and_then(|mmap| mmap.get_bytes_exact(piece.start, piece.len))
                .unwrap_or_default(),
            BufferKind::Add => self.buf.get(piece.start..piece.end()).unwrap_or_default(),
        }
    }

    /// Resolves `cursor` to its piece, `None` for the end sentinel.
    pub(crate) fn resolve(&self, cursor: Cursor) -> TextBufferResult<Option<(PieceId, Piece)>> {
        let Some(id) = cursor.piece() else {
            return Ok(None);
        };
        let piece = self
            .pieces
            .get(id)
            .ok_or(TextBufferError::InvalidPosition(
                "cursor refers to a removed piece",
            ))?;

        if cursor.offset() >= piece.len {
            return Err(TextBufferError::InvalidPosition(
                "cursor offset lies outside its piece",
            ));
        }

        Ok(Some((id, *piece)))
    }
}

/*

=====================================
========= INSERT / DELETE  ==========
=====================================

*/

impl PieceTable {
    /// Materializes a piece boundary at `cursor` and returns the pieces on
    /// either side of it. Never removes a piece.
    pub(crate) fn split_at(
        &mut self,
        cursor: Cursor,
    ) -> TextBufferResult<(Option<PieceId>, Option<PieceId>)> {
        let Some((id, piece)) = self.resolve(cursor)? else {
            return Ok((self.pieces.last(), None));
        };
        let offset = cursor.offset();

        if offset == 0 {
            return Ok((self.pieces.prev(id), Some(id)));
        }

        let tail = Piece::new(piece.buf_kind, piece.start + offset, piece.len - offset);

        if let Some(head) = self.pieces.get_mut(id) {
            head.len = offset;
        }

        let after = self
            .pieces
            .insert_after(id, tail)
            .ok_or(TextBufferError::InvalidPosition(
                "cursor refers to a removed piece",
            ))?;

        Ok((Some(id), Some(after)))
    }

    /// `pos` must be the document offset of `cursor`.
    fn insert_no_history(
        &mut self,
        cursor: Cursor,
        pos: usize,
        byte: u8,
    ) -> TextBufferResult<Cursor> {
        // Validate before touching any state so a bad cursor changes nothing.
        self.resolve(cursor)?;

        let preceding = match cursor.piece() {
            None => self.pieces.last(),
            Some(id) if cursor.offset() == 0 => self.pieces.prev(id),
            Some(_) => None,
        };
        let old_tail = self.buf.len();

        self.buf.push(byte);

        let inserted = if let Some(prev_id) = preceding
            && let Some(prev) = self.pieces.get_mut(prev_id)
            && prev.buf_kind == BufferKind::Add
            && prev.end() == old_tail
        {
            prev.len += 1;

            Cursor::at(prev_id, prev.len - 1)
        } else {
            let (before, _) = self.split_at(cursor)?;
            let piece = Piece::new(BufferKind::Add, old_tail, 1);
            let id = match before {
                Some(before) => self.pieces.insert_after(before, piece).ok_or(
                    TextBufferError::InvalidPosition("cursor refers to a removed piece"),
                )?,
                None => self.pieces.push_front(piece),
            };

            Cursor::at(id, 0)
        };

        self.len += 1;
        self.touch();
        self.anchor = inserted.piece().map(|id| (id, pos - inserted.offset()));

        Ok(inserted)
    }

    /// `pos` must be the document offset of `cursor`.
    fn erase_no_history(
        &mut self,
        cursor: Cursor,
        pos: usize,
    ) -> TextBufferResult<(Cursor, Option<u8>)> {
        let Some((id, piece)) = self.resolve(cursor)? else {
            return Ok((Cursor::end(), None));
        };
        let offset = cursor.offset();
        let byte = self.slice_of(&piece).get(offset).copied();
        let is_trivial_erase = piece.buf_kind == BufferKind::Add
            && piece.end() == self.buf.len()
            && offset + 1 == piece.len;

        let following = if is_trivial_erase {
            self.buf.pop();

            let next = self.pieces.next(id);

            if piece.len == 1 {
                self.pieces.remove(id);
            } else if let Some(piece) = self.pieces.get_mut(id) {
                piece.len -= 1;
            }

            Cursor::start_of(next)
        } else {
            match self.split_at(cursor)? {
                (_, Some(after)) => {
                    let next = self.pieces.next(after);
                    let drained = self.pieces.get_mut(after).is_some_and(|piece| {
                        piece.start += 1;
                        piece.len -= 1;
                        piece.is_empty()
                    });

                    if drained {
                        self.pieces.remove(after);

                        Cursor::start_of(next)
                    } else {
                        Cursor::at(after, 0)
                    }
                }
                (Some(before), None) => {
                    let drained = self.pieces.get_mut(before).is_some_and(|piece| {
                        piece.len -= 1;
                        piece.is_empty()
                    });

                    if drained {
                        self.pieces.remove(before);
                    }

                    Cursor::end()
                }
                (None, None) => return Ok((Cursor::end(), None)),
            }
        };

        self.len -= 1;
        self.touch();
        self.anchor = match following.piece() {
            Some(id) => Some((id, pos - following.offset())),
            None => self
                .pieces
                .last()
                .and_then(|id| Some((id, self.len - self.pieces.get(id)?.len))),
        };

        Ok((following, byte))
    }

    /// Marks the document changed and drops every cached line.
    fn touch(&mut self) {
        self.dirty = true;
        self.line_index.clear();

        tracing::trace!(len = self.len, pieces = self.pieces.len(), "line index invalidated");
    }

    /// Inserts `byte` before `cursor` and returns a cursor at the new byte.
    ///
    /// Typing sequentially at the same spot extends the last add-buffer piece
    /// in place instead of allocating a new one.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if `cursor` refers to a removed piece.
    pub fn insert(&mut self, cursor: Cursor, byte: u8) -> TextBufferResult<Cursor> {
        let pos = self.offset_of(cursor)?;
        let inserted = self.insert_no_history(cursor, pos, byte)?;

        self.history.record(Edit::Insert { pos, byte });

        Ok(inserted)
    }

    /// Removes the byte under `cursor` and returns a cursor to the byte that
    /// now occupies its position (or the end). Erasing at the end is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if `cursor` refers to a removed piece.
    pub fn erase(&mut self, cursor: Cursor) -> TextBufferResult<Cursor> {
        let pos = self.offset_of(cursor)?;
        let (following, byte) = self.erase_no_history(cursor, pos)?;

        if let Some(byte) = byte {
            self.history.record(Edit::Erase { pos, byte });
        }

        Ok(following)
    }

    /// Inserts every byte of `bytes` before `cursor`, returning the cursor
    /// just past the inserted run.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if `cursor` refers to a removed piece.
    pub fn insert_bytes(&mut self, mut cursor: Cursor, bytes: &[u8]) -> TextBufferResult<Cursor> {
        for &byte in bytes {
            cursor = self.insert(cursor, byte)?;
            cursor.increment(self)?;
        }

        Ok(cursor)
    }
}

/*

====================================
=========== UNDO / REDO ============
====================================

*/

impl PieceTable {
    fn apply(&mut self, edit: Edit, reverse: bool) -> TextBufferResult<Cursor> {
        let pos = edit.pos();
        let cursor = self.cursor_at(pos)?;

        match (edit, reverse) {
            (Edit::Insert { byte, .. }, false) | (Edit::Erase { byte, .. }, true) => {
                self.insert_no_history(cursor, pos, byte)
            }
            (Edit::Insert { .. }, true) | (Edit::Erase { .. }, false) => {
                Ok(self.erase_no_history(cursor, pos)?.0)
            }
        }
    }

    /// Reverts the most recent edit. Returns the cursor at the affected
    /// position, or `None` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the recorded offset no longer exists, which means the
    /// history and the document drifted apart.
    pub fn undo(&mut self) -> TextBufferResult<Option<Cursor>> {
        let Some(edit) = self.history.pop_undo() else {
            return Ok(None);
        };
        let cursor = self.apply(edit, true)?;

        self.history.push_redo(edit);

        Ok(Some(cursor))
    }

    /// Re-applies the most recently undone edit.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::undo`].
    pub fn redo(&mut self) -> TextBufferResult<Option<Cursor>> {
        let Some(edit) = self.history.pop_redo() else {
            return Ok(None);
        };
        let cursor = self.apply(edit, false)?;

        self.history.push_undo(edit);

        Ok(Some(cursor))
    }
}

/*

====================================
========== MISCELLANEOUS ===========
====================================

*/

impl PieceTable {
    /// Cursor at absolute byte offset `offset`; `len()` maps to the end.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `offset > len()`.
    pub fn cursor_at(&self, offset: usize) -> TextBufferResult<Cursor> {
        if offset > self.len {
            return Err(TextBufferError::OutOfBounds {
                offset,
                len: self.len,
            });
        }

        let mut remaining = offset;

        for (id, piece) in self.pieces.iter() {
            if remaining < piece.len {
                return Ok(Cursor::at(id, remaining));
            }

            remaining -= piece.len;
        }

        Ok(Cursor::end())
    }

    /// Offset of `cursor` when its piece is the anchor or one of the
    /// anchor's neighbours, without walking the list.
    pub(crate) fn offset_near_anchor(&self, cursor: Cursor) -> Option<usize> {
        let target = cursor.piece()?;
        let (anchor, start) = self.anchor?;
        let piece_start = if target == anchor {
            start
        } else if self.pieces.next(anchor) == Some(target) {
            start + self.pieces.get(anchor)?.len
        } else if self.pieces.prev(anchor) == Some(target) {
            start.checked_sub(self.pieces.get(target)?.len)?
        } else {
            return None;
        };

        Some(piece_start + cursor.offset())
    }

    /// Absolute byte offset of `cursor`.
    ///
    /// O(1) for the end and for cursors next to the last edit, so typing
    /// does not depend on how fragmented the document is. Other cursors
    /// walk the piece list.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if `cursor` refers to a removed piece.
    pub fn offset_of(&self, cursor: Cursor) -> TextBufferResult<usize> {
        let Some((target, _)) = self.resolve(cursor)? else {
            return Ok(self.len);
        };

        if let Some(offset) = self.offset_near_anchor(cursor) {
            return Ok(offset);
        }

        let mut offset = 0;

        for (id, piece) in self.pieces.iter() {
            if id == target {
                return Ok(offset + cursor.offset());
            }

            offset += piece.len;
        }

        Err(TextBufferError::InvalidPosition(
            "cursor refers to a removed piece",
        ))
    }

    /// Iterator over the whole document.
    #[must_use]
    pub fn bytes(&self) -> Bytes<'_> {
        Bytes::new(self, self.begin(), self.end())
    }

    /// Iterator over `[begin, end)`.
    #[must_use]
    pub fn range(&self, begin: Cursor, end: Cursor) -> Bytes<'_> {
        Bytes::new(self, begin, end)
    }

    /// Sequential zero-copy slices of the document, one per piece.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.pieces.iter().map(move |(_, piece)| self.slice_of(piece))
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut res = Vec::with_capacity(self.len);

        for chunk in self.chunks() {
            res.extend_from_slice(chunk);
        }

        res
    }
}

#[cfg(test)]
mod piece_table_tests {
    use super::PieceTable;
    use crate::enums::BufferKind;
    use crate::errors::TextBufferError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn fixture(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("could not create temp dir");
        let path = dir.path().join("fixture.txt");
        let mut file = std::fs::File::create(&path).expect("could not create file");

        write!(file, "{contents}").expect("could not write");

        (dir, path)
    }

    /// Checks the content both through the piece slices and by walking the
    /// cursor byte by byte, and that both agree with `len()`.
    fn assert_contents(table: &PieceTable, expected: &str) {
        assert_eq!(table.len(), expected.len());
        assert_eq!(String::from_utf8(table.to_bytes()).unwrap(), expected);
        assert_eq!(
            String::from_utf8(table.bytes().collect()).unwrap(),
            expected
        );
        assert!(table.pieces().all(|piece| !piece.is_empty()));
    }

    #[test]
    fn new_table_is_empty() {
        let table = PieceTable::new();

        assert!(table.is_empty());
        assert_eq!(table.piece_count(), 0);
        assert_eq!(table.begin(), table.end());
        assert!(!table.is_dirty());
        assert!(table.original().is_none());
    }

    #[test]
    fn open_missing_or_empty_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = PieceTable::open(dir.path().join("missing.txt")).unwrap();

        assert!(missing.is_empty());
        assert_eq!(missing.piece_count(), 0);

        let (_dir, path) = fixture("");
        let empty = PieceTable::open(path).unwrap();

        assert!(empty.is_empty());
        assert!(empty.original().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn open_directory_is_a_system_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PieceTable::open(dir.path()).unwrap_err();

        assert!(matches!(err, TextBufferError::System { .. }));
        assert!(err.code().is_some());
    }

    #[test]
    fn open_seeds_a_single_original_piece() {
        let (_dir, path) = fixture("bizz buzz");
        let table = PieceTable::open(&path).unwrap();

        assert_contents(&table, "bizz buzz");
        assert_eq!(table.piece_count(), 1);
        assert_eq!(
            table.pieces().next().unwrap().buf_kind,
            BufferKind::Original
        );
        assert!(!table.is_dirty());
    }

    #[test]
    fn append_buffer_only() {
        let mut table = PieceTable::new();

        for &byte in b"foo\n bar" {
            table.insert(table.end(), byte).unwrap();
        }

        assert_contents(&table, "foo\n bar");
        assert_eq!(table.add_buffer(), b"foo\n bar");
        assert!(table.is_dirty());
    }

    #[test]
    fn sequential_typing_keeps_a_single_piece() {
        let mut table = PieceTable::new();
        let mut it = table.end();

        for i in 0..10_000_u32 {
            let byte = b'a' + u8::try_from(i % 26).unwrap();

            it = table.insert(it, byte).unwrap();
            it.increment(&table).unwrap();
        }

        assert_eq!(table.len(), 10_000);
        assert_eq!(table.piece_count(), 1);
    }

    #[test]
    fn typing_in_the_middle_splits_once() {
        let (_dir, path) = fixture("bizz buzz");
        let mut table = PieceTable::open(&path).unwrap();
        let mut it = table.begin();

        it.advance(&table, 4).unwrap();

        for &byte in b"foo " {
            it.increment(&table).unwrap();
            it = table.insert(it, byte).unwrap();
        }

        assert_contents(&table, "bizz foo buzz");
        // "bizz " + "foo " + "buzz"
        assert_eq!(table.piece_count(), 3);
    }

    #[test]
    fn typing_in_a_fragmented_document_does_not_walk_the_list() {
        let mut table = PieceTable::new();

        // Inserting at the front never extends a piece, so this leaves one
        // piece per byte.
        for byte in (b'a'..=b'z').rev() {
            table.insert(table.begin(), byte).unwrap();
        }

        assert_eq!(table.piece_count(), 26);

        // Jumping into the middle has to walk once.
        let mut it = table.insert(table.cursor_at(13).unwrap(), b'0').unwrap();

        it.increment(&table).unwrap();

        let walked = |table: &PieceTable, it| Some(table.range(table.begin(), it).count());

        for byte in b"123456789".iter().copied() {
            assert_eq!(table.offset_near_anchor(it), walked(&table, it));

            it = table.insert(it, byte).unwrap();
            it.increment(&table).unwrap();
        }

        for _ in 0..3 {
            it.decrement(&table).unwrap();
            assert_eq!(table.offset_near_anchor(it), walked(&table, it));
            it = table.erase(it).unwrap();
            assert_eq!(table.offset_near_anchor(it), walked(&table, it));
        }

        assert_contents(&table, "abcdefghijklm0123456nopqrstuvwxyz");
        assert_eq!(table.offset_of(it).unwrap(), 20);
        assert_eq!(table.piece_count(), 27);

        while table.undo().unwrap().is_some() {}

        assert_contents(&table, "");
    }

    #[test]
    fn insert_returns_cursor_at_inserted_byte() {
        let (_dir, path) = fixture("ac");
        let mut table = PieceTable::open(&path).unwrap();
        let mut it = table.begin();

        it.increment(&table).unwrap();

        let inserted = table.insert(it, b'b').unwrap();

        assert_eq!(inserted.dereference(&table).unwrap(), b'b');
        assert_eq!(table.offset_of(inserted).unwrap(), 1);
        assert_contents(&table, "abc");
    }

    #[test]
    fn erase_original_file() {
        let (_dir, path) = fixture("bizz buzz");
        let mut table = PieceTable::open(&path).unwrap();
        let mut it = table.begin();

        it.advance(&table, 4).unwrap();
        table.erase(it).unwrap();
        assert_contents(&table, "bizzbuzz");

        let mut it = table.begin();

        it.advance(&table, 6).unwrap();
        table.erase(it).unwrap();
        assert_contents(&table, "bizzbuz");

        table.erase(table.begin()).unwrap();
        assert_contents(&table, "izzbuz");

        table.insert(table.begin(), b'f').unwrap();

        let mut it = table.begin();

        it.advance(&table, 7).unwrap();
        table.insert(it, b'f').unwrap();
        assert_contents(&table, "fizzbuzf");

        let mut it = table.begin();

        it.advance(&table, 3).unwrap();

        let mut it = table.erase(it).unwrap();

        it.increment(&table).unwrap();
        table.insert(it, b'u').unwrap();
        assert_contents(&table, "fizbuuzf");
    }

    #[test]
    fn erase_returns_following_byte() {
        let (_dir, path) = fixture("abc");
        let mut table = PieceTable::open(&path).unwrap();
        let mut it = table.begin();

        it.increment(&table).unwrap();

        let next = table.erase(it).unwrap();

        assert_eq!(next.dereference(&table).unwrap(), b'c');

        let next = table.erase(next).unwrap();

        assert_eq!(next, table.end());
        assert_contents(&table, "a");
    }

    #[test]
    fn erase_at_end_is_a_noop() {
        let (_dir, path) = fixture("abc");
        let mut table = PieceTable::open(&path).unwrap();

        assert_eq!(table.erase(table.end()).unwrap(), table.end());
        assert_contents(&table, "abc");
        assert!(!table.is_dirty());
        assert!(!table.can_undo());
    }

    #[test]
    fn trivial_erase_shrinks_the_add_buffer() {
        let mut table = PieceTable::new();

        for &byte in b"abc" {
            table.insert(table.end(), byte).unwrap();
        }

        let mut last = table.end();

        last.decrement(&table).unwrap();

        let next = table.erase(last).unwrap();

        assert_eq!(next, table.end());
        assert_eq!(table.add_buffer(), b"ab");
        assert_eq!(table.piece_count(), 1);
        assert_contents(&table, "ab");

        table.erase(table.begin()).unwrap();
        table.erase(table.begin()).unwrap();

        assert!(table.is_empty());
        assert_eq!(table.piece_count(), 0);
    }

    #[test]
    fn size_tracks_inserts_minus_erases() {
        let (_dir, path) = fixture("0123456789");
        let mut table = PieceTable::open(&path).unwrap();
        let mut expected = b"0123456789".to_vec();

        for step in 0..40_usize {
            let pos = (step * 7) % (expected.len() + 1);
            let it = table.cursor_at(pos).unwrap();

            if step % 3 == 0 && pos < expected.len() {
                table.erase(it).unwrap();
                expected.remove(pos);
            } else {
                let byte = b'a' + u8::try_from(step % 26).unwrap();

                table.insert(it, byte).unwrap();
                expected.insert(pos, byte);
            }

            assert_eq!(table.to_bytes(), expected);
            assert_eq!(table.bytes().count(), table.len());
        }
    }

    #[test]
    fn stale_cursor_is_rejected() {
        let (_dir, path) = fixture("abc");
        let mut table = PieceTable::open(&path).unwrap();
        let mut it = table.begin();

        it.increment(&table).unwrap();

        let inserted = table.insert(it, b'X').unwrap();

        table.erase(inserted).unwrap();

        assert!(matches!(
            inserted.dereference(&table),
            Err(TextBufferError::InvalidPosition(_))
        ));
        assert!(matches!(
            table.insert(inserted, b'Y'),
            Err(TextBufferError::InvalidPosition(_))
        ));
        assert_contents(&table, "abc");
    }

    #[test]
    fn untouched_cursors_survive_edits() {
        let (_dir, path) = fixture("hello world");
        let mut table = PieceTable::open(&path).unwrap();
        let first = table.begin();
        let mut space = table.begin();

        space.advance(&table, 5).unwrap();
        table.insert(space, b',').unwrap();

        assert_eq!(first.dereference(&table).unwrap(), b'h');
        assert_contents(&table, "hello, world");
    }

    #[test]
    fn cursor_at_and_offset_of_agree() {
        let (_dir, path) = fixture("abcdef");
        let mut table = PieceTable::open(&path).unwrap();

        table.insert(table.cursor_at(3).unwrap(), b'X').unwrap();

        for offset in 0..=table.len() {
            let it = table.cursor_at(offset).unwrap();

            assert_eq!(table.offset_of(it).unwrap(), offset);
        }

        assert!(matches!(
            table.cursor_at(table.len() + 1),
            Err(TextBufferError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn insert_bytes_returns_cursor_after_run() {
        let (_dir, path) = fixture("world");
        let mut table = PieceTable::open(&path).unwrap();
        let after = table.insert_bytes(table.begin(), b"hello ").unwrap();

        assert_eq!(after.dereference(&table).unwrap(), b'w');
        assert_contents(&table, "hello world");
    }

    #[test]
    fn undo_redo_insert() {
        let (_dir, path) = fixture("abc");
        let mut table = PieceTable::open(&path).unwrap();

        table.insert(table.cursor_at(1).unwrap(), b'X').unwrap();
        assert_contents(&table, "aXbc");

        let at = table.undo().unwrap().unwrap();

        assert_contents(&table, "abc");
        assert_eq!(at.dereference(&table).unwrap(), b'b');

        table.redo().unwrap();
        assert_contents(&table, "aXbc");
    }

    #[test]
    fn undo_redo_erase() {
        let (_dir, path) = fixture("abcdef");
        let mut table = PieceTable::open(&path).unwrap();

        table.erase(table.cursor_at(2).unwrap()).unwrap();
        table.erase(table.cursor_at(2).unwrap()).unwrap();
        assert_contents(&table, "abef");

        table.undo().unwrap();
        table.undo().unwrap();
        assert_contents(&table, "abcdef");
        // Undone erases come back through the add buffer, newest first.
        assert_eq!(table.add_buffer(), b"dc");

        table.redo().unwrap();
        assert_contents(&table, "abdef");
        table.redo().unwrap();
        assert_contents(&table, "abef");
        assert_eq!(table.redo().unwrap(), None);
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut table = PieceTable::new();

        table.insert_bytes(table.end(), b"Hello").unwrap();
        table.insert_bytes(table.end(), b"World").unwrap();

        for _ in 0..5 {
            table.undo().unwrap();
        }

        assert_contents(&table, "Hello");
        assert!(table.can_redo());

        table.insert(table.end(), b'!').unwrap();

        assert!(!table.can_redo());
        assert_contents(&table, "Hello!");

        while table.undo().unwrap().is_some() {}

        assert_contents(&table, "");
        assert!(!table.can_undo());
    }
}
