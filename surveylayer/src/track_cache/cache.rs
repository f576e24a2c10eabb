//! The track projection cache.

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use super::config::{CacheConfig, MIN_WATCH_INTERVAL};
use super::entry::{LockedTrack, RevisionChange, TrackEntry, TrackRef};
use super::error::CacheError;
use super::events::CacheEvent;
use super::lock_order::assert_no_entry_lock_held;
use super::stats::{CacheCounters, CacheStats};
use super::watcher::{self, BackgroundWatcher};
use crate::projection::{Projection, ProjectionParams, TrackStore};

/// Everything guarded by the cache-wide lock.
#[derive(Default)]
struct CacheState {
    project: Option<String>,
    tracks: Vec<String>,
    projection: Option<Arc<dyn Projection>>,
    /// Every key was built under `project`.
    entries: HashMap<String, TrackRef>,
}

/// State shared between the cache handle and its watcher thread.
pub(crate) struct CacheShared {
    store: Arc<dyn TrackStore>,
    state: Mutex<CacheState>,
    events: broadcast::Sender<CacheEvent>,
    pub(crate) counters: CacheCounters,
}

impl CacheShared {
    fn new(store: Arc<dyn TrackStore>, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            store,
            state: Mutex::new(CacheState::default()),
            events,
            counters: CacheCounters::default(),
        }
    }

    /// Take the cache-wide lock.
    ///
    /// # Panics
    ///
    /// If the calling thread holds any track entry lock.
    fn state(&self, operation: &str) -> MutexGuard<'_, CacheState> {
        assert_no_entry_lock_held(operation);
        self.state.lock()
    }

    /// Return the entry for `name`, building it if a project is set.
    ///
    /// Check, construction and insert all happen under the cache lock, so
    /// concurrent callers for the same unseen name share one instance. The
    /// active projection is captured in the same critical section.
    fn lookup(
        &self,
        name: &str,
        operation: &str,
    ) -> Result<Option<(TrackRef, Option<Arc<dyn Projection>>)>, CacheError> {
        let mut state = self.state(operation);
        let projection = state.projection.clone();

        if let Some(entry) = state.entries.get(name) {
            CacheCounters::bump(&self.counters.hits);
            return Ok(Some((Arc::clone(entry), projection)));
        }

        let Some(project) = state.project.clone() else {
            CacheCounters::bump(&self.counters.absent);
            return Ok(None);
        };

        let track_projection = self.store.open_track(&project, name).map_err(|source| {
            CacheCounters::bump(&self.counters.construction_failures);
            CacheError::Store {
                track: name.to_string(),
                source,
            }
        })?;

        let entry = Arc::new(TrackEntry::new(project, name, track_projection));
        state.entries.insert(name.to_string(), Arc::clone(&entry));
        CacheCounters::bump(&self.counters.entries_created);

        debug!(
            project = %entry.project(),
            track = %name,
            entries = state.entries.len(),
            "Built track projection"
        );

        Ok(Some((entry, projection)))
    }

    pub(crate) fn get(&self, name: &str) -> Result<Option<TrackRef>, CacheError> {
        Ok(self.lookup(name, "get")?.map(|(entry, _)| entry))
    }

    /// Snapshot of the watched track names.
    pub(crate) fn watched_tracks(&self) -> Vec<String> {
        self.state("watch scan").tracks.clone()
    }

    /// Send a notification; having no subscribers is not an error.
    pub(crate) fn emit(&self, event: CacheEvent) {
        let receivers = self.events.send(event).unwrap_or(0);
        trace!(%event, receivers, "Cache event sent");
    }

    fn entry_count(&self) -> usize {
        self.state("entry_count").entries.len()
    }
}

/// Cache of per-track projection objects for the active project.
///
/// Entries are built lazily on first [`get`](Self::get) and shared by
/// reference ([`TrackRef`]). Switching project drops the cache's own
/// references at once; callers holding older references keep a valid entry
/// until they let go of it.
///
/// A background thread polls the watched tracks every
/// [`CacheConfig::watch_interval`] and reports changes through
/// [`subscribe`](Self::subscribe). The thread is stopped and joined when the
/// cache is dropped.
///
/// # Lock order
///
/// The cache lock may be taken before an entry lock but never while one is
/// held. Calling into the cache while holding a [`LockedTrack`] (or from
/// inside [`TrackEntry::read`]) panics. So does dropping the cache on a
/// thread that holds one, since the watcher thread could be waiting on it.
pub struct TrackProjectionCache {
    // Stopped first on drop.
    watcher: BackgroundWatcher,
    shared: Arc<CacheShared>,
    config: CacheConfig,
}

impl TrackProjectionCache {
    /// Create a cache backed by `store` and start its watcher thread.
    pub fn new(store: Arc<dyn TrackStore>, mut config: CacheConfig) -> Result<Self, CacheError> {
        config.watch_interval = config.watch_interval.max(MIN_WATCH_INTERVAL);
        let shared = Arc::new(CacheShared::new(store, config.event_capacity));
        let watcher = BackgroundWatcher::start(Arc::clone(&shared), config.watch_interval)?;

        info!(
            watch_interval_ms = config.watch_interval.as_millis() as u64,
            event_capacity = config.event_capacity,
            "Track projection cache started"
        );

        Ok(Self {
            watcher,
            shared,
            config,
        })
    }

    /// Create a cache with the default configuration.
    pub fn with_defaults(store: Arc<dyn TrackStore>) -> Result<Self, CacheError> {
        Self::new(store, CacheConfig::default())
    }

    /// Make `project` the active project and drop every cached entry.
    ///
    /// Setting the current project again still clears the cache.
    pub fn set_project(&self, project: impl Into<String>) {
        self.replace_project(Some(project.into()));
    }

    /// Unset the active project and drop every cached entry.
    pub fn clear_project(&self) {
        self.replace_project(None);
    }

    fn replace_project(&self, project: Option<String>) {
        let released = {
            let mut state = self.shared.state("set_project");
            state.project = project.clone();
            mem::take(&mut state.entries)
        };

        info!(
            project = project.as_deref().unwrap_or("<none>"),
            released = released.len(),
            "Active project changed"
        );

        // Entries nobody else holds are torn down here, outside the lock.
        drop(released);
    }

    /// Replace the list of tracks the watcher polls.
    ///
    /// Sends [`CacheEvent::TracksChanged`].
    pub fn set_tracks<I, S>(&self, tracks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tracks: Vec<String> = tracks.into_iter().map(Into::into).collect();
        let count = tracks.len();
        self.shared.state("set_tracks").tracks = tracks;

        debug!(tracks = count, "Watched tracks replaced");
        self.shared.emit(CacheEvent::TracksChanged);
    }

    /// Replace the shared projection, or clear it with `None`.
    ///
    /// Existing entries pick it up on their next [`lock`](Self::lock).
    pub fn set_projection(&self, projection: Option<Arc<dyn Projection>>) {
        let name = projection.as_ref().map(|p| p.name().to_string());
        self.shared.state("set_projection").projection = projection;

        info!(
            projection = name.as_deref().unwrap_or("<none>"),
            "Active projection changed"
        );
    }

    /// Reference to the entry for `track`, building it if needed.
    ///
    /// Returns `Ok(None)` when the entry does not exist and no project is
    /// set. A store failure inserts nothing, so the call can be retried.
    pub fn get(&self, track: &str) -> Result<Option<TrackRef>, CacheError> {
        self.shared.get(track)
    }

    /// Take exclusive access to the entry for `track`.
    ///
    /// Blocks until no other thread holds the entry, then reconfigures it
    /// for the active projection if one is set.
    pub fn lock(&self, track: &str) -> Result<Option<LockedTrack>, CacheError> {
        let Some((entry, projection)) = self.shared.lookup(track, "lock")? else {
            return Ok(None);
        };

        let mut locked = LockedTrack::acquire(entry);
        if let Some(projection) = &projection {
            locked.apply(projection);
            trace!(track = %track, projection = %projection.name(), "Applied projection");
        }

        Ok(Some(locked))
    }

    /// Release a lock taken with [`lock`](Self::lock).
    ///
    /// Equivalent to dropping it: the entry lock goes first, the reference
    /// second.
    pub fn unlock(&self, locked: LockedTrack) {
        trace!(track = %locked.name(), "Unlocked track");
        drop(locked);
    }

    /// Active project, if any.
    pub fn project(&self) -> Option<String> {
        self.shared.state("project").project.clone()
    }

    /// Tracks the watcher currently polls.
    pub fn tracks(&self) -> Vec<String> {
        self.shared.watched_tracks()
    }

    /// Active projection, if any.
    pub fn projection(&self) -> Option<Arc<dyn Projection>> {
        self.shared.state("projection").projection.clone()
    }

    /// Number of entries currently cached.
    pub fn entry_count(&self) -> usize {
        self.shared.entry_count()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.shared.counters.snapshot(self.shared.entry_count())
    }

    /// Receive change notifications.
    ///
    /// Only notifications sent after this call are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.shared.events.subscribe()
    }

    /// Parameter object of the active project.
    ///
    /// The store is queried without holding the cache lock.
    pub fn project_params(&self) -> Result<Option<Arc<dyn ProjectionParams>>, CacheError> {
        let Some(project) = self.project() else {
            return Ok(None);
        };

        self.shared
            .store
            .project_params(&project)
            .map(Some)
            .map_err(|source| CacheError::Params { project, source })
    }

    /// Configuration the cache was created with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Whether the watcher thread is still running.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_running()
    }

    /// Run one watcher scan on the calling thread.
    ///
    /// Polls and notifies exactly as a background cycle does.
    pub fn scan_now(&self) -> RevisionChange {
        watcher::scan_once(&self.shared)
    }
}

impl std::fmt::Debug for TrackProjectionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackProjectionCache")
            .field("config", &self.config)
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}
