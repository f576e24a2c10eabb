//! Background staleness watcher.
//!
//! One thread per cache. Every interval it walks the watched tracks, compares
//! each entry's modification counters with the values seen on the previous
//! pass, and sends at most one `DataChanged` and one `ParamsChanged` for the
//! whole pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::cache::CacheShared;
use super::config::MIN_WATCH_INTERVAL;
use super::entry::RevisionChange;
use super::events::CacheEvent;
use super::lock_order::{assert_no_entry_lock_held, entry_locks_held};
use super::stats::CacheCounters;

const THREAD_NAME: &str = "track-watcher";

/// Handle to a cache's watcher thread.
///
/// Dropping the handle stops the thread and waits for it.
pub struct BackgroundWatcher {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundWatcher {
    /// Spawn the watcher thread.
    ///
    /// `interval` is raised to [`MIN_WATCH_INTERVAL`] if shorter.
    pub(crate) fn start(shared: Arc<CacheShared>, interval: Duration) -> std::io::Result<Self> {
        let interval = interval.max(MIN_WATCH_INTERVAL);
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                debug!(interval_ms = interval.as_millis() as u64, "Track watcher started");
                while wait(&flag, interval) {
                    scan_once(&shared);
                }
                debug!("Track watcher stopped");
            })?;

        Ok(Self {
            shutdown,
            handle: Some(handle),
        })
    }

    /// Whether the thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Signal the thread to stop and wait for it.
    ///
    /// Returns at once if the thread was already stopped.
    ///
    /// # Panics
    ///
    /// If the calling thread holds a track entry lock: the watcher may be
    /// blocked on that lock and could never be joined. The thread is still
    /// told to stop and exits once the lock is released.
    pub fn stop(&mut self) {
        self.signal();
        let Some(handle) = self.handle.take() else {
            return;
        };

        assert_no_entry_lock_held("watcher shutdown");
        if handle.join().is_err() {
            warn!("Track watcher thread panicked");
        }
    }

    fn signal(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }
}

impl Drop for BackgroundWatcher {
    fn drop(&mut self) {
        if thread::panicking() && entry_locks_held() > 0 {
            // A second panic would abort; detach instead of joining.
            self.signal();
            self.handle.take();
            return;
        }
        self.stop();
    }
}

/// Sleep for `interval` or until shutdown is requested.
///
/// Returns `false` when the thread should exit.
fn wait(shutdown: &AtomicBool, interval: Duration) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        // Wakes early on unpark; spurious wakeups loop back here.
        thread::park_timeout(deadline - now);
    }
}

/// Poll every watched track once and send the batched notifications.
pub(crate) fn scan_once(shared: &CacheShared) -> RevisionChange {
    let tracks = shared.watched_tracks();
    let mut change = RevisionChange::default();

    for track in &tracks {
        match shared.get(track) {
            // The transient reference is released at the end of the arm.
            Ok(Some(entry)) => change |= entry.poll_revisions(),
            Ok(None) => {}
            Err(e) => {
                warn!(track = %track, error = %e, "Track watcher skipped track");
            }
        }
    }

    CacheCounters::bump(&shared.counters.watch_cycles);

    if change.data {
        CacheCounters::bump(&shared.counters.data_notifications);
        shared.emit(CacheEvent::DataChanged);
    }
    if change.params {
        CacheCounters::bump(&shared.counters.params_notifications);
        shared.emit(CacheEvent::ParamsChanged);
    }

    trace!(
        tracks = tracks.len(),
        data_changed = change.data,
        params_changed = change.params,
        "Track watcher cycle complete"
    );

    change
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track_cache::lock_order::EntryLockScope;

    #[test]
    fn test_wait_returns_false_once_shutdown() {
        let flag = AtomicBool::new(true);
        assert!(!wait(&flag, Duration::from_secs(3600)));
    }

    #[test]
    fn test_wait_returns_true_after_interval() {
        let flag = AtomicBool::new(false);
        let started = Instant::now();
        assert!(wait(&flag, Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_stop_wakes_a_long_wait() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || wait(&flag, Duration::from_secs(3600)));

        let mut watcher = BackgroundWatcher {
            shutdown,
            handle: None,
        };
        watcher.stop();
        handle.thread().unpark();

        assert!(!handle.join().unwrap());
        assert!(!watcher.is_running());
    }

    #[test]
    #[should_panic(expected = "lock-order violation")]
    fn test_stop_while_holding_entry_lock_panics() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            wait(&flag, Duration::from_secs(3600));
        });

        let mut watcher = BackgroundWatcher {
            shutdown,
            handle: Some(handle),
        };
        let _scope = EntryLockScope::enter();
        watcher.stop();
    }

    #[test]
    fn test_stop_signals_before_checking_lock_order() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            wait(&flag, Duration::from_secs(3600));
        });
        let mut watcher = BackgroundWatcher {
            shutdown: Arc::clone(&shutdown),
            handle: Some(handle),
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = EntryLockScope::enter();
            watcher.stop();
        }));

        assert!(result.is_err());
        // The detached thread was still told to exit
        assert!(shutdown.load(Ordering::SeqCst));
    }
}
