//! Regional catalog backend implementations.
//!
//! Each module provides a struct implementing [`crate::backend::RegionBackend`]
//! against a specific catalog's lookup API.

pub mod itunes;

pub use itunes::ItunesBackend;
