//! Cache statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of cache activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from an existing entry.
    pub hits: u64,
    /// Lookups answered "absent" because no project was set.
    pub absent: u64,
    /// Entries constructed.
    pub entries_created: u64,
    /// Constructions that failed in the store.
    pub construction_failures: u64,
    /// Completed watcher scans.
    pub watch_cycles: u64,
    /// `DataChanged` notifications sent.
    pub data_notifications: u64,
    /// `ParamsChanged` notifications sent.
    pub params_notifications: u64,
    /// Entries currently in the cache.
    pub entry_count: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} hits, {} created ({} failed), {} scans",
            self.entry_count,
            self.hits,
            self.entries_created,
            self.construction_failures,
            self.watch_cycles
        )
    }
}

/// Lock-free counters behind [`CacheStats`].
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    pub(crate) hits: AtomicU64,
    pub(crate) absent: AtomicU64,
    pub(crate) entries_created: AtomicU64,
    pub(crate) construction_failures: AtomicU64,
    pub(crate) watch_cycles: AtomicU64,
    pub(crate) data_notifications: AtomicU64,
    pub(crate) params_notifications: AtomicU64,
}

impl CacheCounters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entry_count: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
            entries_created: self.entries_created.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
            watch_cycles: self.watch_cycles.load(Ordering::Relaxed),
            data_notifications: self.data_notifications.load(Ordering::Relaxed),
            params_notifications: self.params_notifications.load(Ordering::Relaxed),
            entry_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let counters = CacheCounters::default();
        CacheCounters::bump(&counters.hits);
        CacheCounters::bump(&counters.hits);
        CacheCounters::bump(&counters.entries_created);

        let stats = counters.snapshot(1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.entries_created, 1);
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.absent, 0);
    }

    #[test]
    fn test_stats_display() {
        let stats = CacheStats {
            hits: 10,
            entries_created: 3,
            construction_failures: 1,
            watch_cycles: 7,
            entry_count: 2,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("2 entries"));
        assert!(text.contains("10 hits"));
        assert!(text.contains("7 scans"));
    }
}
