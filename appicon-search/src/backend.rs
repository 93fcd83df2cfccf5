//! Trait definition for pluggable regional catalog backends.
//!
//! The aggregator talks to regions only through [`RegionBackend`], so tests
//! can substitute a scripted backend and the host can swap catalogs.

use std::sync::Arc;

use crate::types::{Region, RegionLookup};

/// A catalog that can be searched one region at a time.
///
/// Implementors never return an error: any transport failure, non-success
/// status, malformed body or timeout is reported as
/// [`RegionLookup::Unavailable`] so the caller always has a next step.
///
/// All implementations must be `Send + Sync` so the union policy can issue
/// both regions concurrently.
pub trait RegionBackend: Send + Sync {
    /// Look up `term` in `region`, asking for at most `limit` records.
    fn lookup(
        &self,
        term: &str,
        region: Region,
        limit: usize,
    ) -> impl std::future::Future<Output = RegionLookup> + Send;

    /// Short backend name used in log fields.
    fn name(&self) -> &'static str;
}

impl<T: RegionBackend> RegionBackend for Arc<T> {
    fn lookup(
        &self,
        term: &str,
        region: Region,
        limit: usize,
    ) -> impl std::future::Future<Output = RegionLookup> + Send {
        T::lookup(self, term, region, limit)
    }

    fn name(&self) -> &'static str {
        T::name(self)
    }
}
