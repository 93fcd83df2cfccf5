//! Ambient icon pool: a persisted set of artwork URLs for a fixed catalog
//! of popular apps, refreshed on a TTL and never touched by the search path.

pub mod cache;
pub mod catalog;
pub mod store;

pub use cache::{AssetCache, WarmReport, WarmSource};
pub use catalog::DEFAULT_CATALOG;
pub use store::AssetStore;
