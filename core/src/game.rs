use alloc::format;
use alloc::string::String;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    /// Board is still empty, mines get placed on the first reveal.
    Ready,
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Ready
    }
}

/// One game session: owns the grid, populates it on the first reveal and tracks the outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    grid: Grid,
    flagged_count: Saturating<CellCount>,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Game {
    /// Fresh game with an empty board. `seed` drives mine placement once the first cell is
    /// revealed. Invalid configurations are rejected here rather than at the first reveal.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            grid: Grid::new(config.size),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        })
    }

    /// Game on a fixed layout instead of a random one. The first reveal gets no protection.
    pub fn with_mines(size: Coord2, mines: &[Coord2]) -> Result<Self> {
        let mut grid = Grid::new(size);
        grid.place_mines_at(mines)?;
        grid.compute_adjacency();
        let config = GameConfig::new(size, grid.mine_count())?;

        Ok(Self {
            grid,
            ..Self::new(config, 0)?
        })
    }

    /// Throws away the current board, e.g. for "new game" or a difficulty change.
    /// On an invalid `config` the current game is kept as it was.
    pub fn restart(&mut self, config: GameConfig, seed: u64) -> Result<()> {
        log::debug!("Restarting with {:?}, seed {}", config, seed);
        *self = Self::new(config, seed)?;
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Remaining-mines indicator. Purely informational, goes negative with too many flags.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count.0 as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        self.grid.get(coords).ok_or(GameError::InvalidCoords)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.state.is_ready() && !self.grid.is_populated() {
            self.grid.populate(
                RandomMinePlacer::new(self.seed, coords),
                self.config.mines,
            )?;
        }

        Ok(match self.grid.reveal(coords)? {
            RevealOutcome::HitMine => {
                self.triggered_mine = Some(coords);
                self.grid.reveal_all_mines();
                self.end_game(false);
                RevealOutcome::HitMine
            }
            RevealOutcome::Revealed if self.grid.is_won() => {
                self.end_game(true);
                RevealOutcome::Won
            }
            RevealOutcome::Revealed => {
                self.mark_started();
                RevealOutcome::Revealed
            }
            outcome => outcome,
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_active()?;

        let outcome = self.grid.toggle_flag(coords)?;
        if outcome.has_update() {
            if self.grid[coords].is_flagged() {
                self.flagged_count += 1;
            } else {
                self.flagged_count -= 1;
            }
        }
        Ok(outcome)
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            self.state = GameState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { GameState::Won } else { GameState::Lost };
        log::debug!(
            "Game over ({:?}) after revealing {} cells",
            self.state,
            self.grid.revealed_count()
        );
    }

    fn check_active(&self) -> Result<()> {
        match self.state {
            GameState::Active => Ok(()),
            GameState::Ready => Err(GameError::NotStarted),
            GameState::Won | GameState::Lost => Err(GameError::AlreadyEnded),
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

/// Formats elapsed seconds as `MM:SS`, minutes keep growing past 99.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
