//! Two-tier ordering of scored records.
//!
//! When two records' relevance scores differ by more than
//! [`RELEVANCE_TIER_GAP`], the more relevant one comes first no matter what
//! their totals are. Otherwise the higher total comes first.
//!
//! That pairwise rule is not transitive (A ≈ B, B ≈ C, A ≫ C), so it cannot
//! be handed to `sort_by`. Instead the ranker builds the order greedily:
//! at each step it considers only records that no remaining record must
//! precede (none is more than the gap more relevant) and emits the one with
//! the highest total. The result always honours the relevance rule and
//! falls back to plain total order whenever relevances are close.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::types::{AppRecord, ScoredApp};

use super::scoring::score_record;

/// Relevance difference above which relevance alone decides the order.
pub const RELEVANCE_TIER_GAP: f64 = 20.0;

/// Returns `true` if `a` must be placed before `b` regardless of totals.
pub fn must_precede(a: &ScoredApp, b: &ScoredApp) -> bool {
    a.scores.relevance - b.scores.relevance > RELEVANCE_TIER_GAP
}

/// Pairwise preference used among near-equally relevant records.
///
/// Higher total first; ties broken by higher relevance, then higher rating
/// count, then lower id, so the output is fully deterministic.
fn prefer(a: &ScoredApp, b: &ScoredApp) -> Ordering {
    b.scores
        .total
        .total_cmp(&a.scores.total)
        .then_with(|| b.scores.relevance.total_cmp(&a.scores.relevance))
        .then_with(|| b.record.rating_count.cmp(&a.record.rating_count))
        .then_with(|| a.record.id.cmp(&b.record.id))
}

/// Order already-scored apps by the two-tier rule.
pub fn order_scored(mut pending: Vec<ScoredApp>) -> Vec<ScoredApp> {
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let mut best: Option<usize> = None;
        for (i, candidate) in pending.iter().enumerate() {
            let blocked = pending.iter().any(|other| must_precede(other, candidate));
            if blocked {
                continue;
            }
            best = match best {
                Some(j) if prefer(&pending[j], candidate) != Ordering::Greater => Some(j),
                _ => Some(i),
            };
        }

        // The most relevant remaining record is never blocked, so `best` is set.
        let Some(index) = best else { break };
        ordered.push(pending.swap_remove(index));
    }

    ordered
}

/// Score `records` against `query`, order them and keep the top `limit`.
pub fn rank(
    records: Vec<AppRecord>,
    query: &str,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<ScoredApp> {
    let scored: Vec<ScoredApp> = records
        .into_iter()
        .map(|record| {
            let scores = score_record(&record, query, now);
            ScoredApp { record, scores }
        })
        .collect();

    let mut ordered = order_scored(scored);
    ordered.truncate(limit);
    ordered
}
