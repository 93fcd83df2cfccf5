//! TTL-guarded warm of the ambient icon pool.
//!
//! On load, a persisted URL set younger than the TTL is used as-is with no
//! network traffic. Otherwise every catalog name is looked up in turn
//! (one result each, fixed region) and the artwork URLs that resolved are
//! persisted with the current time. Names that fail are skipped; only a
//! warm that resolves nothing is an error.

use std::collections::HashSet;

use appicon_search::{Region, RegionBackend, RegionLookup};
use chrono::{DateTime, Utc};

use super::catalog::DEFAULT_CATALOG;
use super::store::AssetStore;
use crate::config::AssetConfig;
use crate::error::{AppError, Result};

/// Where the current URL set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmSource {
    /// Loaded from the persisted slots.
    Persisted,
    /// Fetched from the catalog during this call.
    Network,
    /// The pool is switched off in the configuration; nothing was loaded.
    Disabled,
}

/// Outcome of [`AssetCache::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmReport {
    pub source: WarmSource,
    /// URLs now held by the cache.
    pub count: usize,
    /// Catalog names that produced no URL. Always 0 for persisted loads.
    pub failed: usize,
}

/// In-memory view of the ambient icon pool plus its backing store.
#[derive(Debug, Clone)]
pub struct AssetCache {
    store: AssetStore,
    region: Region,
    ttl: chrono::Duration,
    catalog: Vec<String>,
    urls: Vec<String>,
}

impl AssetCache {
    pub fn new(store: AssetStore, region: Region, ttl: chrono::Duration) -> Self {
        Self {
            store,
            region,
            ttl,
            catalog: DEFAULT_CATALOG.iter().map(|n| (*n).to_owned()).collect(),
            urls: Vec::new(),
        }
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(
            AssetStore::new(config.resolved_dir()),
            config.region,
            config.ttl(),
        )
    }

    /// Replace the catalog of names to warm.
    #[must_use]
    pub fn with_catalog<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Current URL set, in catalog order.
    pub fn snapshot(&self) -> Vec<String> {
        self.urls.clone()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns `true` while `now` is strictly before `stored_at + ttl`.
    pub fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - stored_at < self.ttl
    }

    /// When the persisted set expires, if one is stored.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.store.read_timestamp().map(|at| at + self.ttl)
    }

    /// Use the persisted set if fresh, otherwise warm from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Asset`] if a warm was needed and resolved nothing.
    pub async fn load_or_warm<B: RegionBackend>(
        &mut self,
        backend: &B,
        now: DateTime<Utc>,
    ) -> Result<WarmReport> {
        self.refresh(backend, now, false).await
    }

    /// Like [`AssetCache::load_or_warm`], but `force` skips the freshness check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Asset`] if the warm resolved nothing. The
    /// previously held set is kept in that case.
    pub async fn refresh<B: RegionBackend>(
        &mut self,
        backend: &B,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<WarmReport> {
        if !force {
            if let Some(report) = self.load_fresh(now) {
                return Ok(report);
            }
        }
        self.warm(backend, now).await
    }

    fn load_fresh(&mut self, now: DateTime<Utc>) -> Option<WarmReport> {
        let stored_at = self.store.read_timestamp()?;
        if !self.is_fresh(stored_at, now) {
            tracing::debug!(%stored_at, "persisted icon set expired");
            return None;
        }
        let urls = self.store.read_urls().filter(|u| !u.is_empty())?;
        tracing::debug!(count = urls.len(), %stored_at, "loaded persisted icon set");
        self.urls = urls;
        Some(WarmReport {
            source: WarmSource::Persisted,
            count: self.urls.len(),
            failed: 0,
        })
    }

    async fn warm<B: RegionBackend>(&mut self, backend: &B, now: DateTime<Utc>) -> Result<WarmReport> {
        tracing::info!(
            names = self.catalog.len(),
            region = %self.region,
            "warming icon set"
        );

        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        let mut failed = 0;

        for name in &self.catalog {
            let url = match backend.lookup(name, self.region, 1).await {
                RegionLookup::Found(records) => records
                    .into_iter()
                    .next()
                    .map(|r| r.artwork_url)
                    .filter(|u| !u.is_empty()),
                RegionLookup::Unavailable => None,
            };
            match url {
                Some(url) => {
                    if seen.insert(url.clone()) {
                        urls.push(url);
                    }
                }
                None => {
                    tracing::debug!(name = %name, "catalog name did not resolve");
                    failed += 1;
                }
            }
        }

        if urls.is_empty() {
            return Err(AppError::Asset(format!(
                "no icons resolved from {} catalog names",
                self.catalog.len()
            )));
        }

        if let Err(e) = self.store.write(&urls, now) {
            tracing::warn!(error = %e, "cannot persist icon set; keeping it in memory");
        }

        tracing::info!(count = urls.len(), failed, "icon set warmed");
        self.urls = urls;
        Ok(WarmReport {
            source: WarmSource::Network,
            count: self.urls.len(),
            failed,
        })
    }
}
