use thiserror;

use crate::engine::tile::Position;

/// The Result type for exponentile.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("position {position} is outside of a {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },

    #[error("board still had matches after {0} cascade iterations")]
    CascadeOverflow(usize),

    #[error("unable to generate a board without matches after {0} passes")]
    GenerationExhausted(usize),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("invalid board size {0}")]
    InvalidSize(usize),

    #[error("io error")]
    StdIOError(#[from] std::io::Error),

    #[error("log error")]
    LogError(#[from] log::SetLoggerError),

    #[error("{source:?}")]
    AnyhowError {
        #[from]
        source: anyhow::Error,
    },

    #[error("{source:?}")]
    TuiError {
        #[from]
        source: crate::tui::error::TuiError,
    },
}
