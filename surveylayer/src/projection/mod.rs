//! Collaborator contracts for track projection.
//!
//! The cache in [`crate::track_cache`] does not know how tracks are stored or
//! how they are projected. It works against these traits:
//!
//! - [`TrackStore`] - the survey store, builds per-track projection objects
//! - [`Projection`] - the shared cartographic transform, swapped wholesale
//! - [`TrackProjection`] - one track's projected working object
//! - [`ProjectionParams`] - display parameters shared by a project's tracks
//!
//! Modification counters ("revisions") are monotonically increasing integers
//! bumped whenever the underlying data changes. The cache compares them to
//! detect staleness without inspecting the data itself.

mod traits;

pub use traits::{Projection, ProjectionParams, StoreError, TrackProjection, TrackStore};
