//! Error types for the appicon host application.

use appicon_search::SearchError;

/// Top-level error type for the host application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Catalog search failed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Configuration could not be loaded, parsed or saved.
    #[error("config error: {0}")]
    Config(String),

    /// Asset cache warm or persistence failure.
    #[error("asset cache error: {0}")]
    Asset(String),

    /// Artwork download or save failure.
    #[error("download error: {0}")]
    Download(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
