//! AppIcon: find an app across regional storefronts and save its icon.
//!
//! The catalog search itself lives in [`appicon_search`]. This crate adds
//! the host around it:
//!
//! - [`config`]: `config.toml` loading and validation
//! - [`assets`]: the persisted ambient icon pool with its TTL warm
//! - [`download`]: saving artwork under a sanitized file name
//! - [`ambient`]: the falling-icon feed over the icon pool
//! - [`context`]: one [`AppContext`] wiring it all together

pub mod ambient;
pub mod app_dirs;
pub mod assets;
pub mod config;
pub mod context;
pub mod download;
pub mod error;
pub mod logging;

pub use appicon_search::{
    AppRecord, AppSearch, MergePolicy, Region, ScoredApp, ScoredResultSet, SearchConfig,
    SearchError, SearchOutcome,
};
pub use config::AppConfig;
pub use context::AppContext;
pub use error::{AppError, Result};
