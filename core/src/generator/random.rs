use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;

/// Uniform rejection sampling that keeps a single cell, usually the first click, free of mines.
///
/// Only the excluded cell itself is guaranteed safe, its neighbors may still hold mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinePlacer {
    seed: u64,
    excluded: Coord2,
}

impl RandomMinePlacer {
    pub fn new(seed: u64, excluded: Coord2) -> Self {
        Self { seed, excluded }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place(self, grid: &mut Grid, mines: CellCount) -> Result<()> {
        let excluded = grid.validate_coords(self.excluded)?;

        // cells that can still take a mine, anything past this would never terminate
        let mut free_cells = grid.total_cells() - grid.mine_count();
        if !grid[excluded].is_mine() {
            free_cells -= 1;
        }
        if mines > free_cells {
            log::warn!(
                "Cannot place {} mines, only {} cells are free outside {:?}",
                mines,
                free_cells,
                excluded
            );
            return Err(GameError::TooManyMines);
        }

        let (rows, cols) = grid.size();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed = 0;
        let mut draws: u32 = 0;
        while placed < mines {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            draws += 1;
            if coords != excluded && grid.lay_mine(coords) {
                placed += 1;
            }
        }

        log::debug!(
            "Placed {} mines on {}x{} in {} draws, seed {}, excluded {:?}",
            placed,
            rows,
            cols,
            draws,
            self.seed,
            excluded
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(size: Coord2, mines: CellCount, seed: u64, excluded: Coord2) -> Result<Grid> {
        let mut grid = Grid::new(size);
        RandomMinePlacer::new(seed, excluded).place(&mut grid, mines)?;
        Ok(grid)
    }

    #[test]
    fn places_exact_count_and_spares_excluded_cell() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            for seed in 0..32 {
                let excluded = (config.size.0 / 2, config.size.1 / 2);
                let grid = place(config.size, config.mines, seed, excluded).unwrap();

                assert_eq!(grid.mine_count(), config.mines, "{} seed {}", difficulty, seed);
                assert!(!grid[excluded].is_mine());
            }
        }
    }

    #[test]
    fn fills_everything_but_the_excluded_cell() {
        for seed in 0..8 {
            let grid = place((3, 3), 8, seed, (1, 2)).unwrap();

            assert_eq!(grid.mine_count(), 8);
            assert!(!grid[(1, 2)].is_mine());
        }
    }

    #[test]
    fn leaves_non_mine_cells_untouched() {
        let grid = place((5, 5), 6, 7, (0, 0)).unwrap();

        for cell in grid.iter().filter(|cell| !cell.is_mine()) {
            assert_eq!(cell.value(), CellValue::Unset);
            assert!(!cell.is_revealed());
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = place((16, 30), 99, 1234, (3, 3)).unwrap();
        let b = place((16, 30), 99, 1234, (3, 3)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn rejects_counts_that_cannot_fit() {
        assert_eq!(place((3, 3), 9, 0, (0, 0)), Err(GameError::TooManyMines));
        assert_eq!(place((1, 1), 1, 0, (0, 0)), Err(GameError::TooManyMines));
        assert_eq!(place((3, 3), 1, 0, (3, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn populated_first_click_is_never_a_mine() {
        for seed in 0..64 {
            let mut grid = Grid::new((9, 9));
            grid.populate(RandomMinePlacer::new(seed, (4, 4)), 10).unwrap();

            assert!(grid.is_populated());
            assert_eq!(grid.mine_count(), 10);
            assert_ne!(grid[(4, 4)].value(), CellValue::Mine);

            grid.reveal((4, 4)).unwrap();
            if grid[(4, 4)].value().is_empty() {
                for pos in grid.iter_neighbors((4, 4)) {
                    assert!(grid[pos].is_revealed(), "seed {} at {:?}", seed, pos);
                }
            }
        }
    }
}
