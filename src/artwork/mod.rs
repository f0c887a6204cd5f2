//! Artwork Module
//!
//! Byte-bounded in-memory cache of raw artwork files, built on the
//! generic cache engine.

mod repository;

pub use repository::{Artwork, ArtworkBytes, ArtworkRepository};
