use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::array_size;
use crate::*;

/// Rectangular board of [`Cell`]s stored row-major. Dimensions never change after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedGrid")]
pub struct Grid {
    cells: Array2<Cell>,
}

/// Wire form of [`Grid`] before its shape has been checked.
#[derive(Deserialize)]
struct UncheckedGrid {
    cells: Array2<Cell>,
}

impl TryFrom<UncheckedGrid> for Grid {
    type Error = GameError;

    /// Both axes have to fit in [`Coord`] and every cell has to sit where it claims to be.
    fn try_from(unchecked: UncheckedGrid) -> Result<Self> {
        let (rows, cols) = unchecked.cells.dim();
        if rows > Coord::MAX as usize || cols > Coord::MAX as usize {
            return Err(GameError::InvalidBoardShape);
        }
        let misplaced = unchecked
            .cells
            .indexed_iter()
            .any(|((row, col), cell)| cell.position().to_nd_index() != [row, col]);
        if misplaced {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self {
            cells: unchecked.cells,
        })
    }
}

impl Grid {
    /// Unpopulated grid, every cell is [`CellValue::Unset`], hidden and unflagged.
    pub fn new(size: Coord2) -> Self {
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            Cell::new((row as Coord, col as Coord))
        });
        Self { cells }
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.cells)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_cells(Cell::is_mine)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_cells(Cell::is_revealed)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_cells(Cell::is_flagged)
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|&cell| predicate(cell))
            .fold(0, |count, _| count + 1)
    }

    /// Whether mines have been placed and every cell carries its final value.
    pub fn is_populated(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.value() != CellValue::Unset)
    }

    /// Turns `coords` into a mine, returns `false` if it already was one.
    pub(crate) fn lay_mine(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_mine() {
            false
        } else {
            cell.set_value(CellValue::Mine);
            true
        }
    }

    /// Puts mines on exactly the given cells, leaving the rest untouched.
    pub fn place_mines_at(&mut self, mines: &[Coord2]) -> Result<()> {
        for &coords in mines {
            self.validate_coords(coords)?;
        }
        for &coords in mines {
            self.lay_mine(coords);
        }
        Ok(())
    }

    /// Places `mines` mines with `placer` and computes every adjacency count.
    pub fn populate(&mut self, placer: impl MinePlacer, mines: CellCount) -> Result<()> {
        placer.place(self, mines)?;
        self.compute_adjacency();
        Ok(())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .fold(0, |count, _| count + 1)
    }

    /// Sets the value of every non-mine cell from the number of mines around it.
    pub fn compute_adjacency(&mut self) {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if self[coords].is_mine() {
                    continue;
                }
                let value = CellValue::from_adjacent(self.adjacent_mine_count(coords));
                self.cells[coords.to_nd_index()].set_value(value);
            }
        }
    }

    /// Reveals `coords`, cascading through connected empty cells.
    ///
    /// Revealed and flagged cells are left alone. The cascade stops at numbered cells, which are
    /// revealed but not expanded. Loss and win are left for the caller to decide.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cascade(coords, |pending| pending.pop()))
    }

    /// Flood fill over an explicit work list. `next` picks which pending cell to visit; any
    /// order yields the same revealed set since `revealed` doubles as the visited marker.
    pub(crate) fn cascade<F>(&mut self, start: Coord2, mut next: F) -> RevealOutcome
    where
        F: FnMut(&mut Vec<Coord2>) -> Option<Coord2>,
    {
        let cell = self[start];
        if cell.is_revealed() || cell.is_flagged() {
            return RevealOutcome::NoChange;
        }

        self.cells[start.to_nd_index()].reveal();
        if cell.is_mine() {
            return RevealOutcome::HitMine;
        }

        let mut pending: Vec<Coord2> = Vec::new();
        if cell.value().is_empty() {
            pending.extend(self.iter_neighbors(start));
        }

        let mut opened: CellCount = 1;
        while let Some(coords) = next(&mut pending) {
            let cell = &mut self.cells[coords.to_nd_index()];
            if cell.is_flagged() || !cell.reveal() {
                continue;
            }
            opened += 1;

            if cell.value().is_empty() {
                let neighbors = self
                    .iter_neighbors(coords)
                    .filter(|&pos| !self[pos].is_revealed());
                pending.extend(neighbors);
            }
        }

        log::trace!("revealed {} cells from {:?}", opened, start);
        RevealOutcome::Revealed
    }

    /// Exposes every mine for the end-of-game display, returns how many were still hidden.
    pub fn reveal_all_mines(&mut self) -> CellCount {
        let mut exposed = 0;
        for cell in self.cells.iter_mut() {
            if cell.is_mine() && cell.reveal() {
                exposed += 1;
            }
        }
        exposed
    }

    /// Won when the revealed cells are exactly the safe ones. Flags are ignored.
    pub fn is_won(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_mine() != cell.is_revealed())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }
        cell.set_flagged(!cell.is_flagged());
        Ok(MarkOutcome::Changed)
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}
