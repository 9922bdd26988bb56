//! Error types for the simulation engine.

use thiserror::Error;

/// Failures raised by [`BoundedCollection`](crate::collection::BoundedCollection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Index outside `[0, len)`.
    #[error("index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// Push refused because the collection is full and its policy is `Reject`.
    #[error("collection is at capacity ({capacity})")]
    CapacityExceeded { capacity: usize },
}

/// Failures raised while stepping the world.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),
}

/// Failures raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
