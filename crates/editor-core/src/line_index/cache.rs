use crate::line_index::line::Line;

/// Sparse map from line number to computed line.
#[derive(Debug, Default)]
pub struct LineIndex {
    lines: std::collections::BTreeMap<usize, Line>,
}

impl LineIndex {
    #[inline]
    #[must_use]
    pub fn get(&self, line_number: usize) -> Option<Line> {
        self.lines.get(&line_number).copied()
    }

    /// Greatest cached line whose number is `<= line_number`.
    #[must_use]
    pub fn nearest_at_or_before(&self, line_number: usize) -> Option<(usize, Line)> {
        self.lines
            .range(..=line_number)
            .next_back()
            .map(|(number, line)| (*number, *line))
    }

    /// Highest cached line number.
    #[must_use]
    pub fn last_cached(&self) -> Option<usize> {
        self.lines.keys().next_back().copied()
    }

    pub fn insert(&mut self, line_number: usize, line: Line) {
        self.lines.insert(line_number, line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
