use crate::cursor::Cursor;
use crate::errors::TextBufferResult;
use crate::line_index::is_eol;
use crate::line_index::line::Line;
use crate::piece_table::table::PieceTable;

impl PieceTable {
    /// Computes the line starting at `begin`.
    ///
    /// Content runs up to the first `\r` or `\n`. The break then swallows
    /// terminators for as long as each differs from the one before it, so
    /// `\r\n`, `\n\r` and `\r\n\r\n` are single breaks. Two equal terminators
    /// in a row are two breaks, the second starting an empty line.
    pub(crate) fn scan_line(&self, begin: Cursor) -> TextBufferResult<Line> {
        let mut it = begin;
        let mut size = 0;

        while let Some((id, piece)) = self.resolve(it)? {
            let rest = self
                .slice_of(&piece)
                .get(it.offset()..)
                .unwrap_or_default();

            if let Some(idx) = memchr::memchr2(b'\r', b'\n', rest) {
                size += idx;
                it = Cursor::at(id, it.offset() + idx);

                break;
            }

            size += rest.len();
            it = Cursor::start_of(self.pieces.next(id));
        }

        let end = it;
        let mut previous = None;

        while !it.is_end() {
            let byte = it.dereference(self)?;

            if !is_eol(byte) || previous == Some(byte) {
                break;
            }

            previous = Some(byte);
            it.increment(self)?;
        }

        Ok(Line::new(begin, end, it, size))
    }

    /// Returns line `line_number` (zero-based), or `None` when the document
    /// has fewer lines.
    ///
    /// Served from the line cache when possible; otherwise the walk starts at
    /// the nearest cached line before it and caches every line it passes.
    ///
    /// # Errors
    ///
    /// Only if the piece list is internally inconsistent.
    pub fn get_line(&mut self, line_number: usize) -> TextBufferResult<Option<Line>> {
        if self.pieces.is_empty() {
            return Ok(None);
        }

        if let Some(line) = self.line_index.get(line_number) {
            return Ok(Some(line));
        }

        let (mut current, mut line) = match self.line_index.nearest_at_or_before(line_number) {
            Some(entry) => entry,
            None => {
                let first = self.scan_line(self.begin())?;

                self.line_index.insert(0, first);

                (0, first)
            }
        };
        let from = current;

        while current < line_number && !line.next_line().is_end() {
            line = self.scan_line(line.next_line())?;
            current += 1;
            self.line_index.insert(current, line);
        }

        tracing::trace!(line = line_number, from, reached = current, "walked line index");

        Ok((current == line_number).then_some(line))
    }

    /// Number of lines in the document. A trailing terminator does not start
    /// an extra line.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::get_line`].
    pub fn line_count(&mut self) -> TextBufferResult<usize> {
        let mut count = self.line_index.last_cached().map_or(0, |last| last + 1);

        while self.get_line(count)?.is_some() {
            count += 1;
        }

        Ok(count)
    }

    /// Content of line `line_number` without its terminator.
    ///
    /// # Errors
    ///
    /// See [`PieceTable::get_line`].
    pub fn line_bytes(&mut self, line_number: usize) -> TextBufferResult<Option<Vec<u8>>> {
        Ok(self
            .get_line(line_number)?
            .map(|line| line.bytes(self).collect()))
    }
}
