//! iTunes Search API backend.
//!
//! Issues `GET /search?term=..&entity=software&limit=..&country=..` and maps
//! the JSON `results` array to [`AppRecord`] values. A body without a
//! `results` field, or with an empty array, is a valid "no matches" answer.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::backend::RegionBackend;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::{AppRecord, Region, RegionLookup};

/// Low-resolution artwork size marker rewritten when no high-res URL exists.
const LOW_RES_MARKER: &str = "100x100";
/// Replacement size marker for synthesized high-res artwork.
const HIGH_RES_MARKER: &str = "512x512";

/// Raw response envelope.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Option<Vec<RawApp>>,
}

/// One raw software entry. Every field is optional so a single odd record
/// does not make the whole region unavailable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawApp {
    track_id: Option<u64>,
    track_name: Option<String>,
    #[serde(rename = "artworkUrl512")]
    artwork_url_512: Option<String>,
    #[serde(rename = "artworkUrl100")]
    artwork_url_100: Option<String>,
    #[serde(rename = "artworkUrl60")]
    artwork_url_60: Option<String>,
    track_view_url: Option<String>,
    average_user_rating: Option<f64>,
    user_rating_count: Option<u64>,
    release_date: Option<String>,
}

/// iTunes Search API client scoped to one configuration.
#[derive(Debug, Clone)]
pub struct ItunesBackend {
    client: reqwest::Client,
    search_url: Url,
}

impl ItunesBackend {
    /// Build a backend from the search configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `base_url` cannot carry a path, or
    /// [`SearchError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = http::build_client(config)?;
        Self::with_client(client, &config.base_url)
    }

    /// Build a backend around an existing client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `base_url` is not a usable base URL.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, SearchError> {
        let search_url = search_endpoint(base_url)?;
        Ok(Self { client, search_url })
    }

    /// The fully-qualified lookup endpoint (without query string).
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

impl RegionBackend for ItunesBackend {
    async fn lookup(&self, term: &str, region: Region, limit: usize) -> RegionLookup {
        tracing::trace!(term, %region, limit, "catalog lookup");

        let limit = limit.to_string();
        let sent = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("term", term),
                ("entity", "software"),
                ("limit", limit.as_str()),
                ("country", region.code()),
            ])
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%region, timeout = e.is_timeout(), error = %e, "catalog request failed");
                return RegionLookup::Unavailable;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%region, %status, "catalog returned non-success status");
            return RegionLookup::Unavailable;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%region, timeout = e.is_timeout(), error = %e, "catalog response read failed");
                return RegionLookup::Unavailable;
            }
        };

        match parse_lookup_body(&body) {
            Some(records) => {
                tracing::debug!(%region, count = records.len(), "catalog lookup answered");
                RegionLookup::Found(records)
            }
            None => {
                tracing::warn!(%region, bytes = body.len(), "catalog response was not valid JSON");
                RegionLookup::Unavailable
            }
        }
    }

    fn name(&self) -> &'static str {
        "itunes"
    }
}

/// Append the `/search` path segment to `base_url`.
fn search_endpoint(base_url: &str) -> Result<Url, SearchError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| SearchError::Config(format!("invalid base_url {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| SearchError::Config(format!("base_url cannot be a base: {base_url}")))?
        .pop_if_empty()
        .push("search");
    Ok(url)
}

/// Parse a lookup response body into records.
///
/// Returns `None` when the body is not a JSON object of the expected shape;
/// a missing `results` field yields `Some(vec![])`.
pub fn parse_lookup_body(body: &str) -> Option<Vec<AppRecord>> {
    let response: LookupResponse = serde_json::from_str(body).ok()?;
    Some(
        response
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawApp::into_record)
            .collect(),
    )
}

impl RawApp {
    fn into_record(self) -> Option<AppRecord> {
        let id = self.track_id?;
        let name = self.track_name?;
        let low_res = non_empty(self.artwork_url_100).or_else(|| non_empty(self.artwork_url_60));
        let artwork_url = synthesize_artwork_url(
            non_empty(self.artwork_url_512).as_deref(),
            low_res.as_deref(),
        );

        Some(AppRecord {
            id,
            name,
            artwork_url,
            store_url: self.track_view_url.unwrap_or_default(),
            rating: self.average_user_rating.unwrap_or(0.0).clamp(0.0, 5.0),
            rating_count: self.user_rating_count.unwrap_or(0),
            release_date: self.release_date.as_deref().and_then(parse_release_date),
        })
    }
}

/// Pick the best artwork URL.
///
/// The high-res URL wins when present. Otherwise the low-res URL is used
/// with `100x100` rewritten to `512x512` if that marker occurs. Returns an
/// empty string when the source provided no artwork at all.
pub fn synthesize_artwork_url(high_res: Option<&str>, low_res: Option<&str>) -> String {
    match (high_res, low_res) {
        (Some(high), _) => high.to_string(),
        (None, Some(low)) if low.contains(LOW_RES_MARKER) => {
            low.replace(LOW_RES_MARKER, HIGH_RES_MARKER)
        }
        (None, Some(low)) => low.to_string(),
        (None, None) => String::new(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_release_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}
