use thiserror::Error;

/// Usage errors raised by the galaxy core.
///
/// Data-shape problems (orphaned notes, empty datasets, out-of-range zoom)
/// are never reported here; they fall back to empty or clamped results.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GalaxyError {
    #[error("neighbour count must be greater than zero")]
    InvalidNeighborCount,
    #[error("unknown cluster `{0}`")]
    UnknownCluster(String),
    #[error("unknown note `{0}`")]
    UnknownNote(String),
}

pub type Result<T> = std::result::Result<T, GalaxyError>;
