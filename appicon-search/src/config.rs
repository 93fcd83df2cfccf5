//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the region pair, the merge policy, request
//! limits, timeouts and result cache bounds. The defaults match the public
//! catalog's behaviour and are safe to use unchanged.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::Region;

/// Smallest per-request result ceiling accepted by [`SearchConfig::validate`].
pub const MIN_RESULT_LIMIT: usize = 30;
/// Largest per-request result ceiling accepted by [`SearchConfig::validate`].
pub const MAX_RESULT_LIMIT: usize = 50;

/// How the aggregator combines the two regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Sequential: try the first region, fall through to the second only when
    /// the first is empty or unavailable.
    #[default]
    Fallback,
    /// Parallel: query both regions concurrently and merge, first region first.
    Union,
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "union" => Ok(Self::Union),
            other => Err(format!("unknown merge policy: {other}")),
        }
    }
}

/// Configuration for an app catalog search.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Region merge policy.
    pub policy: MergePolicy,
    /// Region tried first for local-script (CJK) queries.
    pub local_region: Region,
    /// Region tried first for latin-script queries.
    pub alternate_region: Region,
    /// Result ceiling sent with every regional lookup.
    pub result_limit: usize,
    /// Number of ranked results kept after scoring.
    pub max_results: usize,
    /// Per-region HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Result cache size above which eviction runs.
    pub cache_capacity: usize,
    /// Number of oldest entries removed per eviction.
    pub cache_evict_batch: usize,
    /// Catalog base URL; the lookup path `/search` is appended.
    pub base_url: String,
    /// Custom User-Agent string. If `None`, rotates through a built-in list.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            policy: MergePolicy::Fallback,
            local_region: Region::Cn,
            alternate_region: Region::Us,
            result_limit: 50,
            max_results: 30,
            timeout_seconds: 8,
            cache_capacity: 50,
            cache_evict_batch: 20,
            base_url: "https://itunes.apple.com".into(),
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `result_limit` within `30..=50`
    /// - `max_results` greater than 0
    /// - `timeout_seconds` within `5..=10`
    /// - `local_region` differs from `alternate_region`
    /// - `cache_evict_batch` in `1..=cache_capacity`
    /// - `base_url` parses as an absolute URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if !(MIN_RESULT_LIMIT..=MAX_RESULT_LIMIT).contains(&self.result_limit) {
            return Err(SearchError::Config(format!(
                "result_limit must be between {MIN_RESULT_LIMIT} and {MAX_RESULT_LIMIT}"
            )));
        }
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if !(5..=10).contains(&self.timeout_seconds) {
            return Err(SearchError::Config(
                "timeout_seconds must be between 5 and 10".into(),
            ));
        }
        if self.local_region == self.alternate_region {
            return Err(SearchError::Config(
                "local_region and alternate_region must differ".into(),
            ));
        }
        if self.cache_evict_batch == 0 || self.cache_evict_batch > self.cache_capacity {
            return Err(SearchError::Config(
                "cache_evict_batch must be between 1 and cache_capacity".into(),
            ));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(SearchError::Config(format!(
                "base_url is not a valid URL: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}
