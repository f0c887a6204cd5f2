//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Failures reported synchronously by cache operations.
///
/// None of these leave the cache partially mutated: the cache stays in
/// the state it had before the failing call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be strictly positive
    #[error("Invalid capacity: {0} (must be > 0)")]
    InvalidCapacity(i64),

    /// A single entry cannot fit, even in an empty cache
    #[error("Entry too large: size {size} does not fit below max size {max_size}")]
    EntryTooLarge { size: i64, max_size: i64 },

    /// The size resolver returned a negative size
    #[error("Invalid size: resolver returned {0}")]
    InvalidSize(i64),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
