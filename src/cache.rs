// In-process TTL cache for the census view. The data is a reconstructible
// view of upstream state, so losing it on restart is fine.
use moka::sync::Cache;
use std::time::Duration;

use crate::types::CensusTable;

/// The single slot the census view lives under.
pub const CENSUS_KEY: &str = "cwl_census";

const TTL: Duration = Duration::from_secs(3600);

/// Expiring store for computed census tables.
///
/// Entries are never explicitly invalidated; they fall out after the TTL.
/// There is no lock around the miss-then-insert window: two interleaved
/// requests may both recompute, and the second insert overwrites the first
/// with an identical table.
#[derive(Clone)]
pub struct CensusCache {
    cache: Cache<&'static str, CensusTable>,
}

impl CensusCache {
    pub fn new() -> Self {
        Self::with_ttl(TTL)
    }

    /// Cache with a caller-chosen expiry, for tests with short clocks.
    pub fn with_ttl(ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).build();

        CensusCache { cache }
    }

    pub fn get(&self, key: &'static str) -> Option<CensusTable> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: &'static str, value: CensusTable) {
        self.cache.insert(key, value);
    }
}

impl Default for CensusCache {
    fn default() -> Self {
        Self::new()
    }
}
