//! # appicon-search
//!
//! Cross-region app catalog search for AppIcon.
//!
//! A free-text query is classified by script, looked up in two regional
//! storefronts with a "closer match first" fallback order, deduplicated,
//! scored on name relevance, rating, popularity and release age, and
//! cached per normalised query.
//!
//! ## Design
//!
//! - Local-script (CJK) queries try the local region first; everything else
//!   tries the alternate region first
//! - Known local-script brand names are searched under their storefront name,
//!   with one retry on the original input if that finds nothing
//! - `fallback` policy stops at the first region with matches; `union`
//!   queries both regions concurrently and merges them
//! - Relevance dominates the order unless two matches are within 20 points,
//!   where the weighted total decides
//! - Regional failures are absorbed: a region that cannot answer is skipped
//!
//! ## Logging
//!
//! - Query text is logged only at trace level
//! - Region failures are logged at warn level with the region code

pub mod backend;
pub mod backends;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod service;
pub mod types;

pub use backend::RegionBackend;
pub use backends::ItunesBackend;
pub use cache::ResultCache;
pub use classifier::{classify, Classification, Script};
pub use config::{MergePolicy, SearchConfig};
pub use error::{Result, SearchError};
pub use service::{AppSearch, SearchOutcome};
pub use types::{AppRecord, Region, RegionLookup, ScoredApp, ScoredResultSet, Scores};

/// Search the catalog once with a fresh service.
///
/// Builds an [`ItunesBackend`] and an [`AppSearch`] for this call only, so
/// nothing is cached between calls. Long-lived callers should construct an
/// [`AppSearch`] once and reuse it.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid `config`,
/// [`SearchError::Query`] for a blank query, and
/// [`SearchError::SearchFailed`] if no region matched and a lookup failed.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> appicon_search::Result<()> {
/// let config = appicon_search::SearchConfig::default();
/// let results = appicon_search::search("spotify", &config).await?;
/// for app in &results.apps {
///     println!("{}: {}", app.record.name, app.record.artwork_url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<ScoredResultSet> {
    config.validate()?;
    let backend = ItunesBackend::new(config)?;
    let service = AppSearch::new(backend, config.clone())?;
    service.search(query).await
}

/// Search with the default configuration.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(query: &str) -> Result<ScoredResultSet> {
    search(query, &SearchConfig::default()).await
}
