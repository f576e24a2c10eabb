//! SurveyLayer - Track projection caching and survey route planning
//!
//! This library provides the shared pieces a hydrographic survey map view
//! builds on: a thread-safe cache of per-track projection objects with a
//! background staleness watcher, and a nearest-neighbour orderer for the
//! planned legs of a survey zone.
//!
//! # High-Level API
//!
//! ```ignore
//! use surveylayer::track_cache::{CacheEvent, TrackProjectionCache};
//!
//! let cache = TrackProjectionCache::with_defaults(store)?;
//! cache.set_project("harbour-2024");
//! cache.set_tracks(["line-001", "line-002"]);
//!
//! let mut events = cache.subscribe();
//! if let Ok(CacheEvent::DataChanged) = events.try_recv() {
//!     redraw();
//! }
//! ```

pub mod config;
pub mod geo;
pub mod logging;
pub mod projection;
pub mod route;
pub mod track_cache;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
