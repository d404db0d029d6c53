//! Error types for mazelab

use thiserror::Error;

use crate::maze::Coord;

/// mazelab error type
#[derive(Error, Debug)]
pub enum LabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Grid side must be odd and between 5 and 255, got {0}")]
    InvalidSize(u16),

    #[error("Unknown cell character {0:?}")]
    InvalidCell(char),

    #[error("Coordinate {0:?} is outside the grid")]
    OutOfBounds(Coord),

    #[error("Coordinate {0:?} is a wall")]
    Blocked(Coord),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<toml::de::Error> for LabError {
    fn from(e: toml::de::Error) -> Self {
        LabError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LabError>;
