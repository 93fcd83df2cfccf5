//! Multi-factor relevance scoring for catalog records.
//!
//! Every record receives four component scores against the query and a
//! weighted total:
//!
//! ```text
//! total = 0.4 * relevance + 0.3 * rating + 0.2 * popularity + 0.1 * release
//! ```
//!
//! | component  | rule                                                        |
//! |------------|-------------------------------------------------------------|
//! | relevance  | 100 exact, 80 prefix, 60 substring, else token overlap * 40 |
//! | rating     | `rating * 20`                                               |
//! | popularity | `min(log10(max(count, 1)) * 10, 100)`                       |
//! | release    | `min(years since release, 5) * 10`, 0 if unknown            |
//!
//! Names and queries are compared lower-cased. Scoring is a pure function
//! of the record, the query and the reference instant.

use chrono::{DateTime, Utc};

use crate::types::{AppRecord, Scores};

/// Weight of the relevance component in the total.
pub const RELEVANCE_WEIGHT: f64 = 0.4;
/// Weight of the rating component in the total.
pub const RATING_WEIGHT: f64 = 0.3;
/// Weight of the popularity component in the total.
pub const POPULARITY_WEIGHT: f64 = 0.2;
/// Weight of the release-age component in the total.
pub const RELEASE_WEIGHT: f64 = 0.1;

/// Release age beyond which the release component stops growing.
const RELEASE_CAP_YEARS: f64 = 5.0;
const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// Score how well `name` matches `query`.
pub fn relevance_score(name: &str, query: &str) -> f64 {
    let name = name.to_lowercase();
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0.0;
    }

    if name == query {
        return 100.0;
    }
    if name.starts_with(&query) {
        return 80.0;
    }
    if name.contains(&query) {
        return 60.0;
    }

    let name_tokens: Vec<&str> = name.split_whitespace().collect();
    let query_tokens: Vec<&str> = query.split_whitespace().collect();
    let matched = query_tokens
        .iter()
        .filter(|qt| name_tokens.iter().any(|nt| nt.contains(*qt)))
        .count();

    (matched as f64 / query_tokens.len() as f64) * 40.0
}

/// `rating * 20`, so a perfect five stars contributes 100.
pub fn rating_score(rating: f64) -> f64 {
    rating.clamp(0.0, 5.0) * 20.0
}

/// Log-scaled rating count, capped at 100.
pub fn popularity_score(rating_count: u64) -> f64 {
    let count = rating_count.max(1) as f64;
    (count.log10() * 10.0).min(100.0)
}

/// Older releases score higher, up to a five-year cap.
pub fn release_score(release_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(released) = release_date else {
        return 0.0;
    };
    let years = (now - released).num_seconds() as f64 / SECONDS_PER_YEAR;
    years.clamp(0.0, RELEASE_CAP_YEARS) * 10.0
}

/// Compute all component scores and the weighted total for one record.
pub fn score_record(record: &AppRecord, query: &str, now: DateTime<Utc>) -> Scores {
    let relevance = relevance_score(&record.name, query);
    let rating = rating_score(record.rating);
    let popularity = popularity_score(record.rating_count);
    let release = release_score(record.release_date, now);
    let total = RELEVANCE_WEIGHT * relevance
        + RATING_WEIGHT * rating
        + POPULARITY_WEIGHT * popularity
        + RELEASE_WEIGHT * release;

    Scores {
        relevance,
        rating,
        popularity,
        release,
        total,
    }
}
