//! Lock-guarded set
//!
//! One mutex protects the whole list. Each operation holds the lock for its
//! full traversal, so operations on one instance never overlap no matter how
//! many threads share it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Key, LinkedSet};

/// [`LinkedSet`] behind a single global lock
#[derive(Debug, Default)]
pub struct GuardedSet {
    inner: Mutex<LinkedSet>,
}

impl GuardedSet {
    /// Wrap an already populated set
    pub fn new(set: LinkedSet) -> Self {
        Self {
            inner: Mutex::new(set),
        }
    }

    // Every operation restores the list invariants before releasing the
    // lock, so a poisoned lock still guards a consistent list.
    fn lock(&self) -> MutexGuard<'_, LinkedSet> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locked membership test
    pub fn member(&self, key: Key) -> bool {
        self.lock().member(key)
    }

    /// Locked insert-if-absent
    pub fn insert(&self, key: Key) -> bool {
        self.lock().insert(key)
    }

    /// Locked delete-if-present
    pub fn delete(&self, key: Key) -> bool {
        self.lock().delete(key)
    }

    /// Copy of all keys, taken atomically under the lock
    pub fn snapshot(&self) -> Vec<Key> {
        self.lock().iter().collect()
    }

    /// Release the lock and hand back the set
    pub fn into_inner(self) -> LinkedSet {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<LinkedSet> for GuardedSet {
    fn from(set: LinkedSet) -> Self {
        Self::new(set)
    }
}
