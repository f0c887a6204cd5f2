//! Sized LRU - A size-aware LRU cache engine
//!
//! Provides a generic key/value cache bounded by a pluggable size function,
//! plus a byte-bounded artwork repository built on top of it.

pub mod artwork;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use artwork::ArtworkRepository;
pub use cache::{SizeResolver, SizedLruCache, UnitSize};
pub use config::Config;
pub use error::{CacheError, Result};
