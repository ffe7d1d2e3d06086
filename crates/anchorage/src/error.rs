use std::result::Result as StdResult;

use thiserror::Error;

use crate::geom;

/// Result type for overlay operations.
pub type Result<T> = StdResult<T, Error>;

/// Overlay error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("invalid structure: {0}")]
    /// The overlay root lacks the slots an overlay needs.
    InvalidStructure(String),
    #[error("unknown event: {0}")]
    /// An event kind that the registry does not know.
    UnknownEvent(String),
    #[error("unknown callback")]
    /// The callback to remove was never registered.
    UnknownCallback,
    #[error("illegal state: {0}")]
    /// The operation is not valid in the overlay's current state.
    IllegalState(String),
    #[error("unknown node")]
    /// A node id that the host does not resolve.
    UnknownNode,
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("config: {0}")]
    /// Configuration could not be parsed.
    Config(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
