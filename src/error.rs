//! The one error type the crate exposes. Every fallible constructor
//! returns `Result<Self, SearchError>` - invalid configuration is refused
//! outright rather than clamped or silently ignored.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("max_depth must be a positive integer, got {0}")]
    InvalidDepth(i64),

    #[error("max_time_seconds must be a positive number, got {0}")]
    InvalidTimeout(f64),

    #[error("a Game instance is required to construct this algorithm")]
    MissingGame,

    #[error("unknown algorithm name: {0:?}")]
    UnknownAlgorithm(String),
}
