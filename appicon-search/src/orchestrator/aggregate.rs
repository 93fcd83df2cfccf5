//! Region fan-out under the configured merge policy.
//!
//! # Pipeline
//!
//! 1. Look up the canonical term in the classifier's region order:
//!    - [`MergePolicy::Fallback`]: sequentially, stopping at the first region
//!      with usable matches
//!    - [`MergePolicy::Union`]: both regions concurrently, merged first region
//!      first
//! 2. Drop records without usable artwork and normalise names per lookup
//! 3. If a brand-mapped term found nothing, retry once with the original
//!    input through the same policy and region order
//! 4. Merge every contributing list, first-seen `id` wins

use crate::backend::RegionBackend;
use crate::classifier::Classification;
use crate::config::{MergePolicy, SearchConfig};
use crate::types::{AppRecord, Region, RegionLookup};

use super::dedup::{merge_first_seen, prepare_for_scoring};

/// What one region lookup produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Usable records were returned.
    Matches(usize),
    /// The region answered but nothing usable matched.
    Empty,
    /// The lookup could not be completed.
    Unavailable,
}

/// One region lookup made while aggregating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Term sent to the backend.
    pub term: String,
    /// Region queried.
    pub region: Region,
    /// What came back.
    pub outcome: AttemptOutcome,
}

/// Merged records plus the trail of lookups that produced them.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Deduplicated, artwork-filtered, name-normalised records.
    pub records: Vec<AppRecord>,
    /// Term that produced `records` (the canonical term unless the retry hit).
    pub term: String,
    /// Regions that contributed records, in fallback order.
    pub regions: Vec<Region>,
    /// Every lookup made, in issue order.
    pub attempts: Vec<Attempt>,
}

impl Aggregation {
    /// Returns `true` if at least one lookup could not complete.
    pub fn any_unavailable(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| a.outcome == AttemptOutcome::Unavailable)
    }

    /// Returns `true` if lookups were made and every one was unavailable.
    pub fn all_unavailable(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|a| a.outcome == AttemptOutcome::Unavailable)
    }

    /// One-line summary of the attempt trail for error messages.
    pub fn attempt_summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| {
                let outcome = match a.outcome {
                    AttemptOutcome::Matches(n) => format!("{n} matches"),
                    AttemptOutcome::Empty => "no matches".to_string(),
                    AttemptOutcome::Unavailable => "unavailable".to_string(),
                };
                format!("{}: {outcome}", a.region)
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Fan a classified query out to its regions and merge the results.
pub async fn aggregate<B: RegionBackend>(
    backend: &B,
    classification: &Classification,
    config: &SearchConfig,
) -> Aggregation {
    let mut attempts = Vec::new();

    let (records, regions) = run_policy(
        backend,
        &classification.canonical,
        classification.regions,
        config,
        &mut attempts,
    )
    .await;

    if !records.is_empty() || !classification.was_mapped() {
        return Aggregation {
            records,
            term: classification.canonical.clone(),
            regions,
            attempts,
        };
    }

    tracing::debug!(
        policy = ?config.policy,
        "mapped term found nothing, retrying with original input"
    );
    let (retry_records, retry_regions) = run_policy(
        backend,
        &classification.original,
        classification.regions,
        config,
        &mut attempts,
    )
    .await;

    Aggregation {
        records: merge_first_seen([records, retry_records]),
        term: classification.original.clone(),
        regions: retry_regions,
        attempts,
    }
}

/// Run one pass of the merge policy for `term`.
async fn run_policy<B: RegionBackend>(
    backend: &B,
    term: &str,
    regions: [Region; 2],
    config: &SearchConfig,
    attempts: &mut Vec<Attempt>,
) -> (Vec<AppRecord>, Vec<Region>) {
    let limit = config.result_limit;

    match config.policy {
        MergePolicy::Fallback => {
            for region in regions {
                let lookup = backend.lookup(term, region, limit).await;
                let records = record_attempt(attempts, term, region, lookup);
                if !records.is_empty() {
                    return (merge_first_seen([records]), vec![region]);
                }
                tracing::debug!(%region, "region yielded nothing, falling through");
            }
            (Vec::new(), Vec::new())
        }
        MergePolicy::Union => {
            let [first, second] = regions;
            let (first_lookup, second_lookup) = futures::future::join(
                backend.lookup(term, first, limit),
                backend.lookup(term, second, limit),
            )
            .await;

            let first_records = record_attempt(attempts, term, first, first_lookup);
            let second_records = record_attempt(attempts, term, second, second_lookup);

            let contributing: Vec<Region> = [(first, &first_records), (second, &second_records)]
                .into_iter()
                .filter(|(_, records)| !records.is_empty())
                .map(|(region, _)| region)
                .collect();

            (
                merge_first_seen([first_records, second_records]),
                contributing,
            )
        }
    }
}

/// Clean a lookup's records and log the attempt.
fn record_attempt(
    attempts: &mut Vec<Attempt>,
    term: &str,
    region: Region,
    lookup: RegionLookup,
) -> Vec<AppRecord> {
    let (records, outcome) = match lookup {
        RegionLookup::Unavailable => (Vec::new(), AttemptOutcome::Unavailable),
        RegionLookup::Found(raw) => {
            let usable = prepare_for_scoring(raw);
            let outcome = if usable.is_empty() {
                AttemptOutcome::Empty
            } else {
                AttemptOutcome::Matches(usable.len())
            };
            (usable, outcome)
        }
    };

    attempts.push(Attempt {
        term: term.to_string(),
        region,
        outcome,
    });
    records
}
