//! Set module
//!
//! The unordered linked set under study, the lock-guarded wrapper shared by
//! worker threads, and the access trait the workers drive.

pub mod guarded;
pub mod linked;

// Re-export commonly used types
pub use guarded::GuardedSet;
pub use linked::LinkedSet;

/// Element key. Keys are drawn from `[0, key_space)`.
pub type Key = u32;

/// The three set operations a worker issues, independent of locking.
///
/// Implemented by [`LinkedSet`] for the serial baseline and by `&GuardedSet`
/// for the threaded runs, so the same worker loop drives both.
pub trait SetAccess {
    /// True iff `key` is present
    fn member(&mut self, key: Key) -> bool;
    /// Add `key` if absent; true iff the set changed
    fn insert(&mut self, key: Key) -> bool;
    /// Remove `key` if present; true iff the set changed
    fn delete(&mut self, key: Key) -> bool;
}

impl SetAccess for LinkedSet {
    fn member(&mut self, key: Key) -> bool {
        LinkedSet::member(self, key)
    }

    fn insert(&mut self, key: Key) -> bool {
        LinkedSet::insert(self, key)
    }

    fn delete(&mut self, key: Key) -> bool {
        LinkedSet::delete(self, key)
    }
}

impl SetAccess for &GuardedSet {
    fn member(&mut self, key: Key) -> bool {
        (**self).member(key)
    }

    fn insert(&mut self, key: Key) -> bool {
        (**self).insert(key)
    }

    fn delete(&mut self, key: Key) -> bool {
        (**self).delete(key)
    }
}
