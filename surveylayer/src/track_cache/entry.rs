//! Cache entries and exclusive entry access.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, Deref, DerefMut};
use std::sync::Arc;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use tracing::debug;

use super::lock_order::EntryLockScope;
use crate::projection::{Projection, TrackProjection};

/// Shared reference to a cache entry.
///
/// Cloning takes a reference, dropping releases it. The projection object
/// is torn down when the last reference (including the cache's own) goes.
pub type TrackRef = Arc<TrackEntry>;

/// Which modification counters moved since the previous poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevisionChange {
    /// The track's data counter changed.
    pub data: bool,
    /// The track's parameter counter changed.
    pub params: bool,
}

impl RevisionChange {
    /// Whether either counter changed.
    pub fn any(&self) -> bool {
        self.data || self.params
    }
}

impl BitOr for RevisionChange {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            data: self.data || rhs.data,
            params: self.params || rhs.params,
        }
    }
}

impl BitOrAssign for RevisionChange {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// State guarded by an entry's own lock.
pub(crate) struct EntryState {
    projection: Box<dyn TrackProjection>,
    observed_data: u64,
    observed_params: u64,
}

/// One track's projection object, owned by the cache.
///
/// The projection object is only reachable under the entry's lock: briefly
/// through [`TrackEntry::read`], or for as long as a [`LockedTrack`] lives.
pub struct TrackEntry {
    project: String,
    name: String,
    state: Arc<Mutex<EntryState>>,
}

impl TrackEntry {
    /// Wrap a freshly built projection object.
    ///
    /// The current counters are taken as already observed, so a new entry
    /// does not report a change on its first poll.
    pub(crate) fn new(
        project: impl Into<String>,
        name: impl Into<String>,
        projection: Box<dyn TrackProjection>,
    ) -> Self {
        let observed_data = projection.data_revision();
        let observed_params = projection.params().revision();

        Self {
            project: project.into(),
            name: name.into(),
            state: Arc::new(Mutex::new(EntryState {
                projection,
                observed_data,
                observed_params,
            })),
        }
    }

    /// Track name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project the entry was built under.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Run `f` with shared access to the projection object.
    ///
    /// Blocks while another thread holds the entry locked. The closure must
    /// not call back into the cache.
    pub fn read<R>(&self, f: impl FnOnce(&dyn TrackProjection) -> R) -> R {
        let _scope = EntryLockScope::enter();
        let state = self.state.lock();
        f(state.projection.as_ref())
    }

    /// Whether some thread currently holds this entry's lock.
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Compare the counters with the last observed values and record them.
    ///
    /// Holds the entry lock only for the two counter reads.
    pub(crate) fn poll_revisions(&self) -> RevisionChange {
        let _scope = EntryLockScope::enter();
        let mut state = self.state.lock();

        let data = state.projection.data_revision();
        let params = state.projection.params().revision();
        let change = RevisionChange {
            data: data != state.observed_data,
            params: params != state.observed_params,
        };
        state.observed_data = data;
        state.observed_params = params;

        change
    }
}

impl fmt::Debug for TrackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackEntry")
            .field("project", &self.project)
            .field("name", &self.name)
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

impl Drop for TrackEntry {
    fn drop(&mut self) {
        debug!(
            project = %self.project,
            track = %self.name,
            "Released track projection"
        );
    }
}

/// Exclusive access to one entry's projection object.
///
/// Obtained from [`TrackProjectionCache::lock`](super::TrackProjectionCache::lock)
/// and handed back with
/// [`TrackProjectionCache::unlock`](super::TrackProjectionCache::unlock), or
/// simply dropped. Either way the entry lock is released first and the
/// reference second. Being a move-only value, a lock cannot be released
/// twice.
pub struct LockedTrack {
    // Field order is drop order: unlock, then unref.
    guard: ArcMutexGuard<RawMutex, EntryState>,
    entry: TrackRef,
    _scope: EntryLockScope,
}

impl LockedTrack {
    /// Block until `entry`'s lock is free and take it.
    pub(crate) fn acquire(entry: TrackRef) -> Self {
        let scope = EntryLockScope::enter();
        let guard = entry.state.lock_arc();
        Self {
            guard,
            entry,
            _scope: scope,
        }
    }

    /// Reconfigure the projection object for `projection`.
    pub(crate) fn apply(&mut self, projection: &Arc<dyn Projection>) {
        self.guard.projection.apply(projection);
    }

    /// The entry this lock belongs to.
    pub fn entry(&self) -> &TrackRef {
        &self.entry
    }

    /// Track name.
    pub fn name(&self) -> &str {
        self.entry.name()
    }
}

impl Deref for LockedTrack {
    type Target = dyn TrackProjection;

    fn deref(&self) -> &Self::Target {
        self.guard.projection.as_ref()
    }
}

impl DerefMut for LockedTrack {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard.projection.as_mut()
    }
}

impl fmt::Debug for LockedTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedTrack")
            .field("project", &self.entry.project)
            .field("name", &self.entry.name)
            .finish_non_exhaustive()
    }
}
