use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("At least one mine is required")]
    NoMines,
    #[error("Too many mines, at least one cell must stay safe")]
    TooManyMines,
    #[error("Board shape does not match its cells")]
    InvalidBoardShape,
    #[error("Unknown difficulty, expected beginner, intermediate or expert")]
    UnknownDifficulty,
    #[error("Game has not started yet, reveal a cell first")]
    NotStarted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
