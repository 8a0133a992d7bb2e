use crate::enums::Edit;

/// Undo and redo stacks of single-byte edits, newest last.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
}

impl History {
    /// Records a fresh edit. Any new action invalidates the redo stack.
    pub fn record(&mut self, edit: Edit) {
        self.redo_stack.clear();
        self.undo_stack.push(edit);
    }

    pub fn pop_undo(&mut self) -> Option<Edit> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<Edit> {
        self.redo_stack.pop()
    }

    /// Pushes an undone edit so `redo` can replay it.
    pub fn push_redo(&mut self, edit: Edit) {
        self.redo_stack.push(edit);
    }

    /// Pushes a replayed edit back without clearing the redo stack.
    pub fn push_undo(&mut self, edit: Edit) {
        self.undo_stack.push(edit);
    }

    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
