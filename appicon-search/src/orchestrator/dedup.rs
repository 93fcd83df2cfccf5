//! Record merging, deduplication and pre-scoring cleanup.
//!
//! Regional lists are merged in fallback order and deduplicated by catalog
//! `id`: the first record seen for an id is kept and later copies are
//! dropped, so the region tried first always wins.

use std::collections::HashSet;

use url::Url;

use crate::types::AppRecord;

/// Merge regional lists in the given order, keeping the first record per `id`.
///
/// Duplicates inside a single list are dropped the same way.
pub fn merge_first_seen<I>(lists: I) -> Vec<AppRecord>
where
    I: IntoIterator<Item = Vec<AppRecord>>,
{
    let mut seen: HashSet<u64> = HashSet::new();
    let mut merged = Vec::new();

    for list in lists {
        for record in list {
            if seen.insert(record.id) {
                merged.push(record);
            }
        }
    }

    merged
}

/// Drop records without usable artwork and collapse whitespace in names.
pub fn prepare_for_scoring(records: Vec<AppRecord>) -> Vec<AppRecord> {
    let before = records.len();
    let kept: Vec<AppRecord> = records
        .into_iter()
        .filter(|r| has_usable_artwork(&r.artwork_url))
        .map(|r| AppRecord {
            name: normalize_name(&r.name),
            ..r
        })
        .collect();

    let dropped = before - kept.len();
    if dropped > 0 {
        tracing::debug!(dropped, "records without usable artwork filtered");
    }
    kept
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An artwork URL is usable when it is an absolute `http(s)` URL.
pub fn has_usable_artwork(artwork_url: &str) -> bool {
    Url::parse(artwork_url.trim())
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
