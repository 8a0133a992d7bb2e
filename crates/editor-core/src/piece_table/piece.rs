/// A contiguous run of bytes inside exactly one backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub buf_kind: crate::enums::BufferKind,
    pub start: usize,
    pub len: usize,
}

impl Piece {
    #[inline]
    #[must_use]
    pub fn new(buf_kind: crate::enums::BufferKind, start: usize, len: usize) -> Self {
        Self {
            buf_kind,
            start,
            len,
        }
    }

    /// One past the last referenced byte in the backing store.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
