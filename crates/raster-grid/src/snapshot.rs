//! Versioned, copy-on-write container for sharing a grid across threads.
//!
//! Readers take an `Arc` snapshot and query it without holding any lock.
//! Writers mutate through [`SharedField::update`], which clones the grid
//! only if snapshots are still alive, so in-flight readers keep a
//! consistent view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// A grid shared between one writer and many readers.
#[derive(Debug)]
pub struct SharedField<G> {
    current: RwLock<Arc<G>>,
    version: AtomicU64,
}

impl<G: Clone> SharedField<G> {
    pub fn new(grid: G) -> Self {
        Self {
            current: RwLock::new(Arc::new(grid)),
            version: AtomicU64::new(0),
        }
    }

    /// Immutable view of the current grid.
    pub fn snapshot(&self) -> Arc<G> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Number of completed updates.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Mutate the grid (e.g. `update_data`, `set_filter`).
    ///
    /// The version is bumped even if `f` returns an error, since it may
    /// have mutated the grid before failing.
    pub fn update<R>(&self, f: impl FnOnce(&mut G) -> R) -> R {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let result = f(Arc::make_mut(&mut guard));
        self.version.fetch_add(1, Ordering::AcqRel);
        result
    }

    /// Swap in a whole new grid.
    pub fn replace(&self, grid: G) {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(grid);
        self.version.fetch_add(1, Ordering::AcqRel);
    }
}
