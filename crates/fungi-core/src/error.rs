//! Error types for the simulation.

use crate::types::{DishSize, Location};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Location {location} is outside the {size} dish")]
    OutOfBounds { location: Location, size: DishSize },

    #[error("Location {location} is already occupied")]
    Occupied { location: Location },

    #[error("Population is at capacity ({capacity})")]
    CapacityExhausted { capacity: u32 },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
