/// Backing store a piece refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferKind {
    /// The read-only view of the file present at open time.
    Original,
    /// The append-only buffer of inserted bytes.
    Add,
}

/// One reversible single-byte edit, recorded by absolute document offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    Insert {
        /// Offset of the inserted byte. This starts at 0.
        pos: usize,
        byte: u8,
    },
    Erase {
        /// Offset the erased byte occupied. This starts at 0.
        pos: usize,
        /// The byte that was removed, kept so undo can put it back.
        byte: u8,
    },
}

impl Edit {
    #[inline]
    #[must_use]
    pub fn pos(&self) -> usize {
        match self {
            Edit::Insert { pos, .. } | Edit::Erase { pos, .. } => *pos,
        }
    }
}
