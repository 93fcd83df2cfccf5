//! Error types for the appicon-search crate.
//!
//! Transport failures against a single region never surface here: the
//! region backend absorbs them as [`crate::types::RegionLookup::Unavailable`].
//! Only configuration problems, invalid queries, and searches that ran out
//! of region attempts after a failed lookup reach the caller.

/// Errors that can occur during an app catalog search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No region attempt (including the unmapped-term retry) produced a
    /// match, and at least one of them was unavailable.
    #[error("search failed: {0}")]
    SearchFailed(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The query cannot be searched (for example, it is empty after trimming).
    #[error("query error: {0}")]
    Query(String),
}

/// Convenience type alias for appicon-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
