//! Search orchestration: region fan-out, dedup, scoring, ranking.
//!
//! This module fans a classified query out to its regions under the
//! configured merge policy, deduplicates records by catalog id, scores
//! every record against the query and returns a two-tier ranked list.

pub mod aggregate;
pub mod dedup;
pub mod rank;
pub mod scoring;
