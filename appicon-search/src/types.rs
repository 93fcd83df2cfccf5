//! Core types for app catalog records, regions and scored result sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A storefront-specific partition of the catalog, selected by country code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Mainland China storefront.
    Cn,
    /// United States storefront.
    Us,
    /// Japan storefront.
    Jp,
    /// United Kingdom storefront.
    Gb,
}

impl Region {
    /// Returns the lower-case country code sent to the backend.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cn => "cn",
            Self::Us => "us",
            Self::Jp => "jp",
            Self::Gb => "gb",
        }
    }

    /// Returns all available region variants.
    pub fn all() -> &'static [Region] {
        &[Self::Cn, Self::Us, Self::Jp, Self::Gb]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|r| r.code() == code)
            .ok_or_else(|| format!("unknown region code: {s}"))
    }
}

/// One catalog entry as returned by a regional backend.
///
/// Records are never mutated after construction; scoring wraps a copy in
/// [`ScoredApp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppRecord {
    /// Stable catalog identifier, used as the deduplication key.
    pub id: u64,
    /// Display name with internal whitespace collapsed to single spaces.
    pub name: String,
    /// Highest-resolution artwork URL available (may be empty before filtering).
    pub artwork_url: String,
    /// Deep link to the store page.
    pub store_url: String,
    /// Average user rating in `[0, 5]`, 0 when absent.
    pub rating: f64,
    /// Number of user ratings, 0 when absent.
    pub rating_count: u64,
    /// Original release timestamp, if the backend reported one.
    pub release_date: Option<DateTime<Utc>>,
}

/// Outcome of one lookup against one region.
///
/// `Found(vec![])` means the region was searched and nothing matched;
/// `Unavailable` means the lookup could not be completed at all.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionLookup {
    /// The region answered; the list may be empty.
    Found(Vec<AppRecord>),
    /// Transport failure, non-success status, malformed body or timeout.
    Unavailable,
}

impl RegionLookup {
    /// Returns `true` if the region answered with at least one record.
    pub fn has_matches(&self) -> bool {
        matches!(self, Self::Found(records) if !records.is_empty())
    }

    /// Returns `true` if the lookup could not be completed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// Consume the lookup, yielding its records (empty when unavailable).
    pub fn into_records(self) -> Vec<AppRecord> {
        match self {
            Self::Found(records) => records,
            Self::Unavailable => Vec::new(),
        }
    }
}

/// Per-query derived scores. Not part of a record's identity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Name-to-query match strength, 0..=100.
    pub relevance: f64,
    /// `rating * 20`, 0..=100.
    pub rating: f64,
    /// Log-scaled rating count, 0..=100.
    pub popularity: f64,
    /// Capped years since release times 10, 0..=50.
    pub release: f64,
    /// Weighted combination of the four components.
    pub total: f64,
}

/// A record paired with the scores it earned for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredApp {
    /// The catalog record.
    pub record: AppRecord,
    /// Scores computed against the query that produced this set.
    pub scores: Scores,
}

/// An ordered, `id`-unique sequence of scored apps for one query term.
///
/// This is the unit stored in the result cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoredResultSet {
    /// The term the records were scored against.
    pub term: String,
    /// Region(s) whose lookups contributed, in fallback order.
    pub regions: Vec<Region>,
    /// Apps in ranked order.
    pub apps: Vec<ScoredApp>,
}

impl ScoredResultSet {
    /// Number of apps in the set.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Returns `true` if the set holds no apps.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Iterate over the ranked records.
    pub fn records(&self) -> impl Iterator<Item = &AppRecord> {
        self.apps.iter().map(|app| &app.record)
    }
}
