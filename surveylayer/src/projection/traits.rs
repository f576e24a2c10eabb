//! Projection and store trait definitions.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::geo::GeodeticPoint;

/// Errors reported by a [`TrackStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The project has no track with this name.
    #[error("Track '{track}' not found in project '{project}'")]
    TrackNotFound { project: String, track: String },

    /// The project does not exist in the store.
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    /// The store could not be reached or read.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// I/O error while reading track data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared cartographic transform.
///
/// A projection is immutable once shared: changing the map projection means
/// building a new one and handing it to the cache, never mutating this one.
pub trait Projection: Send + Sync + fmt::Debug {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Map a geodetic point onto the 2-D map surface.
    fn forward(&self, point: &GeodeticPoint) -> (f64, f64);
}

/// Display parameters attached to a project's track projections.
pub trait ProjectionParams: Send + Sync {
    /// Current modification counter.
    fn revision(&self) -> u64;
}

/// One track's projected working object.
///
/// Owned by exactly one cache entry and only touched while that entry's lock
/// is held, so implementations need `Send` but not `Sync`.
pub trait TrackProjection: Send {
    /// Reconfigure for `projection`, re-projecting samples as needed.
    fn apply(&mut self, projection: &Arc<dyn Projection>);

    /// Current data modification counter.
    fn data_revision(&self) -> u64;

    /// Parameter object this projection renders with.
    fn params(&self) -> &dyn ProjectionParams;
}

/// The survey store.
///
/// Calls may block on disk or network; the cache makes them on the calling
/// thread and propagates failures.
pub trait TrackStore: Send + Sync {
    /// Build a projection object for `track` from its raw samples.
    fn open_track(&self, project: &str, track: &str)
        -> Result<Box<dyn TrackProjection>, StoreError>;

    /// Parameter object shared by the tracks of `project`.
    fn project_params(&self, project: &str) -> Result<Arc<dyn ProjectionParams>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::TrackNotFound {
            project: "harbour".to_string(),
            track: "line-007".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Track 'line-007' not found in project 'harbour'"
        );

        let err = StoreError::Unavailable("database locked".to_string());
        assert!(err.to_string().contains("database locked"));
    }

    #[test]
    fn test_store_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
