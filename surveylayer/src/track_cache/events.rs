//! Change notifications raised by the cache.

use std::fmt;

/// Notification delivered to cache subscribers.
///
/// `TracksChanged` is sent from the thread calling
/// [`set_tracks`](super::TrackProjectionCache::set_tracks). `DataChanged` and
/// `ParamsChanged` come from the background watcher, at most one of each per
/// scan however many tracks changed. Consumers owning a UI thread drain their
/// receiver there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEvent {
    /// The watched track list was replaced.
    TracksChanged,
    /// At least one watched track's data changed.
    DataChanged,
    /// At least one watched track's projection parameters changed.
    ParamsChanged,
}

impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheEvent::TracksChanged => "tracks-changed",
            CacheEvent::DataChanged => "data-changed",
            CacheEvent::ParamsChanged => "params-changed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        assert_eq!(CacheEvent::TracksChanged.to_string(), "tracks-changed");
        assert_eq!(CacheEvent::DataChanged.to_string(), "data-changed");
        assert_eq!(CacheEvent::ParamsChanged.to_string(), "params-changed");
    }
}
