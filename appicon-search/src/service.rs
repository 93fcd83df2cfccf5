//! The search service: classifier, aggregator, ranker and result cache
//! behind one injectable object.
//!
//! [`AppSearch`] is constructed once and shared (`Arc<AppSearch<_>>`) by
//! whatever needs to search. The result cache sits behind a [`Mutex`] that
//! is never held across an `.await`.
//!
//! [`AppSearch::submit`] adds the stale-response guard used for
//! search-as-you-type: every submission takes a generation ticket and a
//! result whose ticket has been overtaken is reported as
//! [`SearchOutcome::Superseded`] instead of being handed back for display.
//! Submitting the term that is already in flight again is a no-op reported
//! as [`SearchOutcome::InFlight`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::backend::RegionBackend;
use crate::cache::{cache_key, ResultCache};
use crate::classifier::classify;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::orchestrator::aggregate::aggregate;
use crate::orchestrator::rank::rank;
use crate::types::ScoredResultSet;

/// What a guarded submission produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// This submission is still the newest; display the set.
    Current(ScoredResultSet),
    /// A newer submission started while this one was in flight; discard.
    Superseded,
    /// The same normalised term is already being searched; its submission
    /// delivers the result.
    InFlight,
}

/// Search service owning the backend, configuration and result cache.
pub struct AppSearch<B> {
    backend: B,
    config: SearchConfig,
    cache: Mutex<ResultCache>,
    generation: AtomicU64,
    /// Ticket and cache key of the submission currently running, if any.
    in_flight: Mutex<Option<(u64, String)>>,
}

impl<B: RegionBackend> AppSearch<B> {
    /// Create a service after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn new(backend: B, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let cache = ResultCache::new(config.cache_capacity, config.cache_evict_batch);
        Ok(Self {
            backend,
            config,
            cache: Mutex::new(cache),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        })
    }

    /// The configuration this service was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The backend regions are queried through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Return the cached set for `query` without touching the network.
    pub fn cached(&self, query: &str) -> Option<ScoredResultSet> {
        self.lock_cache().get(query).cloned()
    }

    /// Number of cached result sets.
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Classify, aggregate, rank and cache `query`.
    ///
    /// A cache hit returns immediately. Non-empty sets are cached under the
    /// normalised query; empty sets are not, so a later search retries the
    /// network.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Query`] if `query` is blank
    /// - [`SearchError::SearchFailed`] if every lookup, including the
    ///   unmapped-term retry, came back without a match and at least one of
    ///   them was unavailable. When every region answered with zero matches
    ///   the result is an empty set instead.
    pub async fn search(&self, query: &str) -> Result<ScoredResultSet, SearchError> {
        let key = cache_key(query);
        if key.is_empty() {
            return Err(SearchError::Query("query must not be empty".into()));
        }

        if let Some(hit) = self.cached(&key) {
            tracing::debug!(count = hit.len(), "result cache hit");
            return Ok(hit);
        }

        let classification = classify(query, &self.config);
        tracing::trace!(
            original = %classification.original,
            canonical = %classification.canonical,
            "query classified"
        );
        tracing::debug!(
            script = ?classification.script,
            regions = ?classification.regions,
            mapped = classification.was_mapped(),
            policy = ?self.config.policy,
            "searching regions"
        );

        let aggregation = aggregate(&self.backend, &classification, &self.config).await;

        if aggregation.records.is_empty() {
            if aggregation.any_unavailable() {
                tracing::warn!(
                    attempts = aggregation.attempts.len(),
                    all_unavailable = aggregation.all_unavailable(),
                    "regions exhausted without a match"
                );
                return Err(SearchError::SearchFailed(
                    aggregation.attempt_summary(),
                ));
            }
            tracing::debug!("every region answered with no matches");
            return Ok(ScoredResultSet {
                term: aggregation.term,
                regions: Vec::new(),
                apps: Vec::new(),
            });
        }

        let apps = rank(
            aggregation.records,
            &aggregation.term,
            Utc::now(),
            self.config.max_results,
        );
        let set = ScoredResultSet {
            term: aggregation.term,
            regions: aggregation.regions,
            apps,
        };

        tracing::debug!(count = set.len(), regions = ?set.regions, "search ranked");
        self.lock_cache().put(&key, set.clone());
        Ok(set)
    }

    /// Search with the stale-response guard.
    ///
    /// Results are still cached when superseded; only the hand-back is
    /// suppressed. Errors from a superseded submission are swallowed too.
    /// A repeat of the term currently in flight takes no ticket and issues no
    /// lookups; once that search has finished, a repeat is served from the
    /// cache by [`AppSearch::search`].
    ///
    /// # Errors
    ///
    /// Same as [`AppSearch::search`], for the newest submission only.
    pub async fn submit(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let key = cache_key(query);
        let ticket = {
            let mut in_flight = self.lock_in_flight();
            if !key.is_empty()
                && in_flight.as_ref().is_some_and(|(_, running)| *running == key)
            {
                tracing::debug!("identical search already in flight");
                return Ok(SearchOutcome::InFlight);
            }
            let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *in_flight = Some((ticket, key));
            ticket
        };

        let result = self.search(query).await;

        {
            let mut in_flight = self.lock_in_flight();
            if in_flight.as_ref().is_some_and(|(running, _)| *running == ticket) {
                *in_flight = None;
            }
        }

        if !self.is_current(ticket) {
            tracing::debug!(ticket, "discarding superseded search result");
            return Ok(SearchOutcome::Superseded);
        }
        result.map(SearchOutcome::Current)
    }

    /// Returns `true` if `ticket` belongs to the newest submission.
    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    fn lock_cache(&self) -> MutexGuard<'_, ResultCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<(u64, String)>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppRecord, Region, RegionLookup};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    /// Returns one record named after the term, optionally after a delay.
    struct EchoBackend {
        calls: AtomicUsize,
        delay_for: Option<(&'static str, Duration)>,
        down: bool,
    }

    impl EchoBackend {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay_for: None,
                down: false,
            }
        }
    }

    impl RegionBackend for EchoBackend {
        async fn lookup(&self, term: &str, _region: Region, _limit: usize) -> RegionLookup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((slow_term, delay)) = self.delay_for {
                if slow_term == term {
                    tokio::time::sleep(delay).await;
                }
            }
            if self.down {
                return RegionLookup::Unavailable;
            }
            RegionLookup::Found(vec![AppRecord {
                id: term.len() as u64,
                name: term.to_string(),
                artwork_url: "https://cdn.example.com/512x512bb.jpg".into(),
                store_url: String::new(),
                rating: 4.0,
                rating_count: 10,
                release_date: None,
            }])
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn second_search_is_served_from_cache() {
        let search = AppSearch::new(EchoBackend::new(), SearchConfig::default()).expect("valid");

        let first = search.search("Spotify").await.expect("search");
        let second = search.search("  spotify ").await.expect("search");

        assert_eq!(first, second);
        assert_eq!(search.backend().calls.load(Ordering::SeqCst), 1);
        assert!(search.cached("SPOTIFY").is_some());
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let search = AppSearch::new(EchoBackend::new(), SearchConfig::default()).expect("valid");
        let err = search.search("   ").await.unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert_eq!(search.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn all_unavailable_is_an_error_and_not_cached() {
        let backend = EchoBackend {
            down: true,
            ..EchoBackend::new()
        };
        let search = AppSearch::new(backend, SearchConfig::default()).expect("valid");

        let err = search.search("zoom").await.unwrap_err();
        assert!(matches!(err, SearchError::SearchFailed(_)));
        assert_eq!(search.cached_len(), 0);
    }

    /// Unavailable for `down_region`, empty everywhere else.
    struct HalfDownBackend {
        down_region: Region,
    }

    impl RegionBackend for HalfDownBackend {
        async fn lookup(&self, _term: &str, region: Region, _limit: usize) -> RegionLookup {
            if region == self.down_region {
                RegionLookup::Unavailable
            } else {
                RegionLookup::Found(vec![])
            }
        }

        fn name(&self) -> &'static str {
            "half-down"
        }
    }

    #[tokio::test]
    async fn unavailable_then_empty_is_a_failure() {
        for down_region in [Region::Us, Region::Cn] {
            let search = AppSearch::new(HalfDownBackend { down_region }, SearchConfig::default())
                .expect("valid");
            let err = search.search("zoom").await.unwrap_err();
            assert!(matches!(err, SearchError::SearchFailed(_)), "{down_region}: {err}");
            assert_eq!(search.cached_len(), 0);
        }
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(AppSearch::new(EchoBackend::new(), config).is_err());
    }

    #[tokio::test]
    async fn newest_submission_wins() {
        let backend = EchoBackend {
            delay_for: Some(("slow", Duration::from_millis(200))),
            ..EchoBackend::new()
        };
        let search = Arc::new(AppSearch::new(backend, SearchConfig::default()).expect("valid"));

        let slow = {
            let search = Arc::clone(&search);
            tokio::spawn(async move { search.submit("slow").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast = search.submit("fast").await.expect("fast search");

        let slow = slow.await.expect("join").expect("slow search");
        assert_eq!(slow, SearchOutcome::Superseded);
        match fast {
            SearchOutcome::Current(set) => assert_eq!(set.term, "fast"),
            other => panic!("newest submission must be current, got {other:?}"),
        }
        // The superseded result is still cached for later.
        assert!(search.cached("slow").is_some());
    }

    #[tokio::test]
    async fn repeat_of_in_flight_term_is_not_reissued() {
        let backend = EchoBackend {
            delay_for: Some(("slow", Duration::from_millis(200))),
            ..EchoBackend::new()
        };
        let search = Arc::new(AppSearch::new(backend, SearchConfig::default()).expect("valid"));

        let first = {
            let search = Arc::clone(&search);
            tokio::spawn(async move { search.submit("slow").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let repeat = search.submit("  SLOW ").await.expect("repeat");
        assert_eq!(repeat, SearchOutcome::InFlight);

        match first.await.expect("join").expect("first search") {
            SearchOutcome::Current(set) => assert_eq!(set.term, "slow"),
            other => panic!("original submission must stay current, got {other:?}"),
        }
        assert_eq!(search.backend().calls.load(Ordering::SeqCst), 1);

        // Finished: a repeat now comes straight from the cache.
        let again = search.submit("slow").await.expect("cached");
        assert!(matches!(again, SearchOutcome::Current(_)));
        assert_eq!(search.backend().calls.load(Ordering::SeqCst), 1);
    }
}
