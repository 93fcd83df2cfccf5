//! Long-lived application state, built once at startup and shared.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use appicon_search::http::random_user_agent;
use appicon_search::{AppSearch, ItunesBackend, ScoredApp, ScoredResultSet, SearchOutcome};
use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::ambient::spawn_icon_rain;
use crate::assets::{AssetCache, WarmReport, WarmSource};
use crate::config::AppConfig;
use crate::download::download_artwork;
use crate::error::{AppError, Result};

/// Search service, icon pool and download client behind one handle.
///
/// Clone the surrounding `Arc` to share it between tasks.
pub struct AppContext {
    config: AppConfig,
    search: Arc<AppSearch<ItunesBackend>>,
    assets: Mutex<AssetCache>,
    http: reqwest::Client,
}

impl AppContext {
    /// Build every collaborator from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for invalid settings and
    /// [`AppError::Search`] if the catalog client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let backend = ItunesBackend::new(&config.search)?;
        let assets = AssetCache::from_config(&config.assets);
        Self::with_parts(config, backend, assets)
    }

    /// Build around an explicit backend and icon pool.
    ///
    /// # Errors
    ///
    /// Same as [`AppContext::new`].
    pub fn with_parts(config: AppConfig, backend: ItunesBackend, assets: AssetCache) -> Result<Self> {
        let search = AppSearch::new(backend, config.search.clone())?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.search.timeout_seconds))
            .user_agent(random_user_agent())
            .build()
            .map_err(|e| AppError::Download(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            search: Arc::new(search),
            assets: Mutex::new(assets),
            http,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared search service.
    pub fn search_service(&self) -> Arc<AppSearch<ItunesBackend>> {
        Arc::clone(&self.search)
    }

    /// Run one catalog search.
    ///
    /// # Errors
    ///
    /// See [`AppSearch::search`].
    pub async fn search(&self, query: &str) -> Result<ScoredResultSet> {
        Ok(self.search.search(query).await?)
    }

    /// Run a search that may be overtaken by a later [`AppContext::submit`].
    ///
    /// # Errors
    ///
    /// See [`AppSearch::submit`].
    pub async fn submit(&self, query: &str) -> Result<SearchOutcome> {
        Ok(self.search.submit(query).await?)
    }

    /// Save the artwork of `app` into `dir`, or the configured download dir.
    ///
    /// # Errors
    ///
    /// See [`download_artwork`].
    pub async fn download(&self, app: &ScoredApp, dir: Option<&Path>) -> Result<PathBuf> {
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.download.resolved_dir());
        download_artwork(
            &self.http,
            &app.record.artwork_url,
            &app.record.name,
            &dir,
            &self.config.download.suffix,
        )
        .await
    }

    /// Load the icon pool from disk if fresh, otherwise warm it.
    ///
    /// Does nothing when `assets.enabled` is off.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Asset`] if a warm resolved nothing.
    pub async fn warm_assets(&self, force: bool) -> Result<WarmReport> {
        if !self.config.assets.enabled {
            tracing::debug!("icon pool disabled, skipping warm");
            return Ok(WarmReport {
                source: WarmSource::Disabled,
                count: 0,
                failed: 0,
            });
        }
        let mut assets = self.assets.lock().await;
        assets
            .refresh(self.search.backend(), Utc::now(), force)
            .await
    }

    /// Current icon pool contents.
    pub async fn icon_snapshot(&self) -> Vec<String> {
        self.assets.lock().await.snapshot()
    }

    /// Start the falling-icon feed over the current icon pool.
    pub async fn start_icon_rain(&self, cancel: CancellationToken) -> tokio::sync::mpsc::Receiver<String> {
        spawn_icon_rain(
            self.icon_snapshot().await,
            self.config.ambient.interval(),
            cancel,
        )
    }
}
