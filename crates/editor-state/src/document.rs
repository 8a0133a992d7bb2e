use editor_core::cursor::Cursor;
use editor_core::errors::{TextBufferError, TextBufferResult};
use editor_core::line_index::is_eol;
use editor_core::piece_table::table::PieceTable;

/// One open file: its piece table plus the path it is saved to.
#[derive(Debug, Default)]
pub struct Document {
    table: PieceTable,
    path: Option<std::path::PathBuf>,
}

/*

====================================
========= CREATION METHOD ==========
====================================

*/

impl Document {
    /// An empty, unnamed document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path`. A missing file gives an empty document that saves to
    /// `path`.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::open`].
    pub fn open(path: impl AsRef<std::path::Path>) -> TextBufferResult<Self> {
        let path = path.as_ref();
        let table = PieceTable::open(path)?;

        tracing::debug!(path = %path.display(), len = table.len(), "document opened");

        Ok(Self {
            table,
            path: Some(path.to_path_buf()),
        })
    }
}

/*

====================================
========= INLINE METHODS  ==========
====================================

*/

impl Document {
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.table.is_dirty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn table(&self) -> &PieceTable {
        &self.table
    }

    #[inline]
    pub fn table_mut(&mut self) -> &mut PieceTable {
        &mut self.table
    }

    /// Whole document as bytes.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.table.to_bytes()
    }
}

/*

====================================
======== POSITION TRANSLATION ======
====================================

*/

impl Document {
    /// Whether the last byte of the document is a line terminator.
    fn ends_with_terminator(&self) -> TextBufferResult<bool> {
        if self.table.is_empty() {
            return Ok(false);
        }

        let mut last = self.table.end();

        last.decrement(&self.table)?;

        Ok(is_eol(last.dereference(&self.table)?))
    }

    /// Translates a zero-based `(row, column)` into a cursor.
    ///
    /// `column` may equal the line's length, which addresses its terminator
    /// (or the end of the document on the last line). Row `line_count()`,
    /// column 0 is accepted when that row would be the empty line after a
    /// trailing terminator, or the first line of an empty document.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` if the row lies past the end of the document or the
    /// column past the end of the line.
    pub fn cursor_at(&mut self, row: usize, column: usize) -> TextBufferResult<Cursor> {
        if let Some(line) = self.table.get_line(row)? {
            if column > line.size() {
                return Err(TextBufferError::InvalidPosition(
                    "column lies past the end of the line",
                ));
            }

            let mut cursor = line.begin();

            cursor.advance(&self.table, column)?;

            return Ok(cursor);
        }

        let open_row = self.table.is_empty() || self.ends_with_terminator()?;

        if column == 0 && open_row && row == self.table.line_count()? {
            return Ok(self.table.end());
        }

        Err(TextBufferError::InvalidPosition(
            "row lies past the end of the document",
        ))
    }

    /// Number of lines, not counting the open row after a trailing
    /// terminator.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::line_count`].
    pub fn line_count(&mut self) -> TextBufferResult<usize> {
        self.table.line_count()
    }

    /// Text of `row` without its terminator, with invalid UTF-8 replaced.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::get_line`].
    pub fn line_text(&mut self, row: usize) -> TextBufferResult<Option<String>> {
        Ok(self
            .table
            .line_bytes(row)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/*

=====================================
========= INSERT / DELETE  ==========
=====================================

*/

impl Document {
    /// Inserts `byte` before the position `(row, column)`.
    ///
    /// # Errors
    ///
    /// See [`Document::cursor_at`].
    pub fn insert(&mut self, row: usize, column: usize, byte: u8) -> TextBufferResult<()> {
        let cursor = self.cursor_at(row, column)?;

        self.table.insert(cursor, byte)?;

        tracing::trace!(row, column, byte, "inserted byte");

        Ok(())
    }

    /// Inserts every byte of `text` starting at `(row, column)`.
    ///
    /// # Errors
    ///
    /// See [`Document::cursor_at`].
    pub fn insert_str(&mut self, row: usize, column: usize, text: &str) -> TextBufferResult<()> {
        let cursor = self.cursor_at(row, column)?;

        self.table.insert_bytes(cursor, text.as_bytes())?;

        tracing::trace!(row, column, len = text.len(), "inserted text");

        Ok(())
    }

    /// Removes the byte at `(row, column)`. Erasing a terminator joins the
    /// line with the next one; erasing at the end of the document does
    /// nothing.
    ///
    /// # Errors
    ///
    /// See [`Document::cursor_at`].
    pub fn erase(&mut self, row: usize, column: usize) -> TextBufferResult<()> {
        let cursor = self.cursor_at(row, column)?;

        self.table.erase(cursor)?;

        tracing::trace!(row, column, "erased byte");

        Ok(())
    }

    /// Reverts the latest edit. Returns `false` when there was nothing to
    /// undo.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::undo`].
    pub fn undo(&mut self) -> TextBufferResult<bool> {
        Ok(self.table.undo()?.is_some())
    }

    /// Re-applies the latest undone edit. Returns `false` when there was
    /// nothing to redo.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::redo`].
    pub fn redo(&mut self) -> TextBufferResult<bool> {
        Ok(self.table.redo()?.is_some())
    }
}

/*

====================================
============== SAVE ================
====================================

*/

impl Document {
    /// Saves to the path the document was opened from or last saved as.
    ///
    /// # Errors
    ///
    /// `System` with `InvalidInput` when the document has no path, otherwise
    /// see [`PieceTable::save`].
    pub fn save(&mut self) -> TextBufferResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Err(TextBufferError::system(
                "Cannot save an unnamed document",
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "document has no path"),
            ));
        };

        self.table.save(path)
    }

    /// Saves to `path` and remembers it for later [`Document::save`] calls.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::save`]. The remembered path only changes on success.
    pub fn save_as(&mut self, path: impl AsRef<std::path::Path>) -> TextBufferResult<()> {
        let path = path.as_ref();

        self.table.save(path)?;
        self.path = Some(path.to_path_buf());

        Ok(())
    }
}
