use parking_lot::Mutex;
use crate::cache::ResultCache;
use crate::stats::StatsTracker;

/// The mutable part of a search instance: the result cache and the counters.
#[derive(Debug)]
pub(crate) struct SearchState {
    pub cache: ResultCache,
    pub stats: StatsTracker,
}

impl SearchState {
    pub fn new(caching: bool) -> Mutex<Self> {
        Mutex::new(Self {
            cache: ResultCache::new(caching),
            stats: StatsTracker::default(),
        })
    }
}
