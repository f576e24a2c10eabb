//! Track cache error types.

use thiserror::Error;

use crate::projection::StoreError;

/// Errors returned by [`TrackProjectionCache`](super::TrackProjectionCache).
///
/// Absence (no project set, unknown track) is not an error; it is reported
/// as `None`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store failed to build a track's projection object.
    ///
    /// Nothing was inserted into the cache; the call can be retried.
    #[error("Failed to open track '{track}': {source}")]
    Store {
        track: String,
        #[source]
        source: StoreError,
    },

    /// The store failed to provide the project's parameter object.
    #[error("Failed to load parameters for project '{project}': {source}")]
    Params {
        project: String,
        #[source]
        source: StoreError,
    },

    /// The background watcher thread could not be started.
    #[error("Failed to spawn track watcher: {0}")]
    WatcherSpawn(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_store_error_display_names_track() {
        let err = CacheError::Store {
            track: "line-12".to_string(),
            source: StoreError::Unavailable("offline".to_string()),
        };
        let text = err.to_string();
        assert!(text.contains("line-12"));
        assert!(text.contains("offline"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_spawn_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "no threads");
        let err: CacheError = io_err.into();
        assert!(matches!(err, CacheError::WatcherSpawn(_)));
    }
}
