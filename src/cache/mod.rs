//! Cache Module
//!
//! Provides a generic, size-aware LRU cache engine.

mod size;
mod store;


// Re-export public types
pub use size::{SizeResolver, UnitSize};
pub use store::SizedLruCache;
