use serde::{Deserialize, Serialize};

use crate::Coord2;

/// What a cell holds once the board has been populated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    /// Not populated yet, only seen between grid creation and the first reveal.
    Unset,
    /// No adjacent mines, flood fill expands through these.
    Empty,
    /// Number of adjacent mines, always in `1..=8`.
    Count(u8),
    Mine,
}

impl CellValue {
    /// Value of a non-mine cell with `adjacent` neighboring mines.
    pub const fn from_adjacent(adjacent: u8) -> Self {
        match adjacent {
            0 => Self::Empty,
            n => Self::Count(n),
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Adjacent mine count, `None` for mines and unpopulated cells.
    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Empty => Some(0),
            Self::Count(n) => Some(n),
            Self::Unset | Self::Mine => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Unset
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    value: CellValue,
    revealed: bool,
    flagged: bool,
    position: Coord2,
}

impl Cell {
    pub(crate) const fn new(position: Coord2) -> Self {
        Self {
            value: CellValue::Unset,
            revealed: false,
            flagged: false,
            position,
        }
    }

    pub const fn value(&self) -> CellValue {
        self.value
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn is_mine(&self) -> bool {
        self.value.is_mine()
    }

    /// `(row, col)` of this cell, fixed at creation.
    pub const fn position(&self) -> Coord2 {
        self.position
    }

    pub(crate) fn set_value(&mut self, value: CellValue) {
        self.value = value;
    }

    /// Marks the cell revealed, returns whether it was hidden before.
    pub(crate) fn reveal(&mut self) -> bool {
        !core::mem::replace(&mut self.revealed, true)
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }
}
