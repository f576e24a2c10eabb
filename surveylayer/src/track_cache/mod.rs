//! Shared cache of per-track projection objects.
//!
//! The map view renders recorded survey tracks through a cartographic
//! projection. Building a track's projection object means reading its raw
//! samples from the store, so objects are built once per project and shared
//! by every thread that draws or inspects the track.
//!
//! # Locking
//!
//! Two levels: one cache-wide lock guarding the active project, the watched
//! tracks, the active projection and the name map, and one lock per entry
//! guarding its projection object. The cache lock is only ever taken before
//! an entry lock, never while holding one; doing so panics.
//!
//! # Notifications
//!
//! [`TrackProjectionCache::subscribe`] hands out a broadcast receiver of
//! [`CacheEvent`]s. The background watcher coalesces changes so each scan
//! sends at most one `DataChanged` and one `ParamsChanged`.
//!
//! # Example
//!
//! ```ignore
//! let cache = TrackProjectionCache::with_defaults(store)?;
//! cache.set_project("harbour-2024");
//! cache.set_tracks(["line-001", "line-002"]);
//!
//! if let Some(mut track) = cache.lock("line-001")? {
//!     // exclusive access, reconfigured for the active projection
//!     render(&mut *track);
//!     cache.unlock(track);
//! }
//! ```

mod cache;
mod config;
mod entry;
mod error;
mod events;
mod lock_order;
mod stats;
mod watcher;

pub use cache::TrackProjectionCache;
pub use config::{
    CacheConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_WATCH_INTERVAL, MIN_WATCH_INTERVAL,
};
pub use entry::{LockedTrack, RevisionChange, TrackEntry, TrackRef};
pub use error::CacheError;
pub use events::CacheEvent;
pub use stats::CacheStats;
pub use watcher::BackgroundWatcher;
