//! Keyboard cursor over the board row.

/// Horizontal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

/// Highlighted column, always inside `0..columns` (or 0 on an empty row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    columns: usize,
}

impl Cursor {
    pub fn new(columns: usize) -> Self {
        Self { index: 0, columns }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Move one step, stopping at the edges.
    pub fn step(&mut self, dir: Direction) {
        if let Some(next) = self.neighbour(dir) {
            self.index = next;
        }
    }

    /// Index next to the cursor, or `None` past an edge.
    pub fn neighbour(&self, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Left => self.index.checked_sub(1),
            Direction::Right => Some(self.index + 1).filter(|&i| i < self.columns),
        }
    }

    /// Jump to `index`, clamped to the row.
    pub fn set(&mut self, index: usize) {
        self.index = index.min(self.columns.saturating_sub(1));
    }

    /// Resize the row, keeping the cursor inside it.
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns;
        self.set(self.index);
    }
}
