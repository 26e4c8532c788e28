//! Thread-local owner accounting for shared handles.

use std::cell::Cell;

thread_local! {
    static STATS: Cell<RefStats> = const { Cell::new(RefStats::ZERO) };
}

/// Counters of handle lifecycle events on the current thread.
///
/// A build or donate creates the first owner; every acquire adds one more and
/// every release removes one. After all handles created in a region are gone,
/// `outstanding()` for the region's delta is zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RefStats {
    /// Handles constructed by build, donate or copy-on-write.
    pub built: u64,
    /// Additional owners taken with `acquire`.
    pub acquired: u64,
    /// Owners dropped with `release`.
    pub released: u64,
}

impl RefStats {
    const ZERO: RefStats = RefStats {
        built: 0,
        acquired: 0,
        released: 0,
    };

    /// Current counters for this thread.
    pub fn snapshot() -> Self {
        STATS.with(Cell::get)
    }

    /// Events recorded after `earlier` was taken.
    #[must_use]
    pub fn since(self, earlier: RefStats) -> RefStats {
        RefStats {
            built: self.built.saturating_sub(earlier.built),
            acquired: self.acquired.saturating_sub(earlier.acquired),
            released: self.released.saturating_sub(earlier.released),
        }
    }

    /// Owners taken but not yet released.
    pub fn outstanding(self) -> i128 {
        i128::from(self.built) + i128::from(self.acquired) - i128::from(self.released)
    }
}

fn update(f: impl FnOnce(&mut RefStats)) {
    STATS.with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
    });
}

#[inline]
pub(crate) fn record_build() {
    update(|s| s.built = s.built.wrapping_add(1));
}

#[inline]
pub(crate) fn record_acquire() {
    update(|s| s.acquired = s.acquired.wrapping_add(1));
}

#[inline]
pub(crate) fn record_release() {
    update(|s| s.released = s.released.wrapping_add(1));
}
