//! Read-copy-update publication (C5) for [`HammingIndex`]
//!
//! The intended usage pattern: a single writer holds a private
//! [`HammingIndex`], mutates it directly or via [`HammingIndex::dup`], and
//! publishes the result by swapping it into a process-wide handle. Readers
//! dereference the handle once per query and hold that reference for the
//! query's duration, which yields linearizable snapshots without locks.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::hamming_index::HammingIndex;

/// A lock-free published handle to a [`HammingIndex`].
///
/// Cloning a `SharedIndex` is cheap (it clones the inner `Arc<ArcSwap<_>>`)
/// and all clones observe the same published snapshot.
#[derive(Clone)]
pub struct SharedIndex {
    inner: Arc<ArcSwap<HammingIndex>>,
}

impl SharedIndex {
    /// Publishes `index` as the initial snapshot.
    pub fn new(index: HammingIndex) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(index)),
        }
    }

    /// Loads the current snapshot. Never blocks; concurrent writers may
    /// publish a newer snapshot at any time without affecting a reference
    /// already obtained from this call.
    pub fn load(&self) -> Arc<HammingIndex> {
        self.inner.load_full()
    }

    /// Atomically publishes `index`, replacing the previous snapshot.
    /// Readers that already hold an older snapshot (from [`Self::load`])
    /// keep observing it until they call `load` again.
    pub fn publish(&self, index: HammingIndex) {
        self.inner.store(Arc::new(index));
    }
}
