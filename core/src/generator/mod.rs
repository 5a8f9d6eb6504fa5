use crate::*;
pub use random::*;

mod random;

/// Strategy for scattering mines over a grid.
pub trait MinePlacer {
    /// Adds `mines` mines to `grid`, leaving every other cell as it was.
    fn place(self, grid: &mut Grid, mines: CellCount) -> Result<()>;
}
