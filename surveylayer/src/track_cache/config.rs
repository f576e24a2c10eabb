//! Configuration for the track projection cache.

use std::time::Duration;

/// Default interval between watcher scans.
///
/// Fast enough for the map to follow live acquisition, slow enough that the
/// watcher's brief entry locks do not compete with rendering.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_millis(300);

/// Shortest watcher interval; shorter values are raised to this.
pub const MIN_WATCH_INTERVAL: Duration = Duration::from_millis(1);

/// Default number of undelivered notifications kept per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configuration for [`TrackProjectionCache`](super::TrackProjectionCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Interval between background staleness scans.
    ///
    /// The watcher never scans more often than [`MIN_WATCH_INTERVAL`].
    pub watch_interval: Duration,

    /// Notification backlog per subscriber.
    ///
    /// A subscriber that falls further behind skips the oldest notifications.
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            watch_interval: DEFAULT_WATCH_INTERVAL,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the watcher scan interval (at least [`MIN_WATCH_INTERVAL`]).
    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = interval.max(MIN_WATCH_INTERVAL);
        self
    }

    /// Set the notification backlog per subscriber (at least 1).
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.watch_interval, Duration::from_millis(300));
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CacheConfig::new()
            .with_watch_interval(Duration::from_millis(50))
            .with_event_capacity(8);

        assert_eq!(config.watch_interval, Duration::from_millis(50));
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_watch_interval_has_floor() {
        let config = CacheConfig::new().with_watch_interval(Duration::ZERO);
        assert_eq!(config.watch_interval, MIN_WATCH_INTERVAL);

        let config = CacheConfig::new().with_watch_interval(Duration::from_micros(10));
        assert_eq!(config.watch_interval, MIN_WATCH_INTERVAL);
    }

    #[test]
    fn test_event_capacity_has_floor() {
        let config = CacheConfig::new().with_event_capacity(0);
        assert_eq!(config.event_capacity, 1);
    }
}
