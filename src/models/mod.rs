//! Report models
//!
//! Serializable views over cache state, used for diagnostics output.

pub mod report;

pub use report::{CacheReport, EntryReport};
