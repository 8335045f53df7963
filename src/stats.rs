use std::time::Duration;
use serde::Serialize;

/// Point-in-time copy of a search instance's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Calls to `find`, `find_by_path` and `find_where`
    pub searches: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Running mean of per-query wall time, in milliseconds
    pub average_search_time: f64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsTracker {
    current: Statistics,
}

impl StatsTracker {
    /// Count one query and fold its duration into the running mean.
    pub fn record_search(&mut self, elapsed: Duration) {
        let stats = &mut self.current;
        stats.searches += 1;
        let n = stats.searches as f64;
        let ms = elapsed.as_secs_f64() * 1000.0;
        stats.average_search_time = (stats.average_search_time * (n - 1.0) + ms) / n;
    }

    pub fn record_hit(&mut self) {
        self.current.cache_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.current.cache_misses += 1;
    }

    pub fn snapshot(&self) -> Statistics {
        self.current
    }
}
