//! Lock ordering guard.
//!
//! The cache-wide lock must never be taken by a thread that already holds a
//! track entry lock. Each thread counts the entry locks it holds; cache-wide
//! operations assert the count is zero.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static ENTRY_LOCKS_HELD: Cell<usize> = const { Cell::new(0) };
}

/// Marks the current thread as holding one entry lock until dropped.
///
/// Not `Send`: it must be dropped on the thread that created it.
pub(crate) struct EntryLockScope {
    _not_send: PhantomData<*const ()>,
}

impl EntryLockScope {
    pub(crate) fn enter() -> Self {
        ENTRY_LOCKS_HELD.with(|held| held.set(held.get() + 1));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for EntryLockScope {
    fn drop(&mut self) {
        ENTRY_LOCKS_HELD.with(|held| held.set(held.get().saturating_sub(1)));
    }
}

/// Number of entry locks the current thread holds.
pub(crate) fn entry_locks_held() -> usize {
    ENTRY_LOCKS_HELD.with(Cell::get)
}

/// Panic if the current thread holds any entry lock.
pub(crate) fn assert_no_entry_lock_held(operation: &str) {
    let held = entry_locks_held();
    assert!(
        held == 0,
        "lock-order violation: {} needs the cache lock but this thread holds {} track entry lock(s)",
        operation,
        held
    );
}
