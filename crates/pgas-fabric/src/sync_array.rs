// crates/pgas-fabric/src/sync_array.rs

//! `pSync`: a symmetric array of remote-atomic 64-bit notification cells,
//! one `AtomicI64` per (PE, round).

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

use pgas_core::SYNC_VALUE;

/// Comparison operator for [`SyncArray::wait_until`], mirroring the
/// `SHMEM_CMP_*` constants spec §6 assumes the fabric provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cmp {
    /// Not equal.
    Ne,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal to.
    Ge,
}

impl Cmp {
    #[inline]
    fn holds(self, observed: i64, value: i64) -> bool {
        match self {
            Self::Ne => observed != value,
            Self::Gt => observed > value,
            Self::Ge => observed >= value,
        }
    }
}

/// A symmetric array of `pSync` cells: `num_pes` rows of `cells_per_pe`
/// `AtomicI64`s each, all initialised to [`SYNC_VALUE`].
#[derive(Clone)]
pub struct SyncArray {
    cells: Arc<Vec<Vec<AtomicI64>>>,
}

impl SyncArray {
    /// Allocate a `pSync` array sized for `cells_per_pe` rounds across
    /// `num_pes` PEs, all cells quiescent.
    #[must_use]
    pub fn new(num_pes: usize, cells_per_pe: usize) -> Self {
        let cells = (0..num_pes)
            .map(|_| (0..cells_per_pe).map(|_| AtomicI64::new(SYNC_VALUE)).collect())
            .collect();
        Self {
            cells: Arc::new(cells),
        }
    }

    /// Number of rounds (cells per PE) this array is sized for.
    #[inline]
    #[must_use]
    pub fn cells_per_pe(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Single-word put (`p`): store `value` into `target_as`'s cell `round`.
    pub fn p(&self, round: usize, value: i64, target_as: usize) {
        self.cells[target_as][round].store(value, Ordering::Release);
    }

    /// `atomic_add`: add `delta` to `target_as`'s cell `round`, returning
    /// nothing (matches spec §6's `atomic_add` signature; use
    /// [`Self::atomic_fetch`] separately to observe the result).
    pub fn atomic_add(&self, round: usize, delta: i64, target_as: usize) {
        self.cells[target_as][round].fetch_add(delta, Ordering::AcqRel);
    }

    /// `atomic_fetch`: read `me_as`'s own cell `round`.
    #[must_use]
    pub fn atomic_fetch(&self, round: usize, me_as: usize) -> i64 {
        self.cells[me_as][round].load(Ordering::Acquire)
    }

    /// Poll `me_as`'s own cell `round` until `cmp(observed, value)` holds.
    /// Busy-waits with a yield between polls; there is no timeout (spec
    /// §4.9: a caller that mis-uses `pSync` deadlocks rather than corrupts
    /// memory, and this simulation preserves that rather than papering
    /// over misuse with a timeout).
    pub fn wait_until(&self, round: usize, me_as: usize, cmp: Cmp, value: i64) -> i64 {
        loop {
            let observed = self.atomic_fetch(round, me_as);
            if cmp.holds(observed, value) {
                return observed;
            }
            thread::yield_now();
        }
    }

    /// Local ordering boundary: in this simulation `put`/`p`/`atomic_add`
    /// all take effect synchronously under `Release`/`AcqRel` orderings
    /// before the call returns, so a real transport's `fence` (which
    /// orders outstanding asynchronous stores) has nothing left to do. The
    /// call is kept so algorithm code reads the same as the spec and the
    /// real `shcoll` source it was ported from.
    pub fn fence(&self) {
        std::sync::atomic::fence(Ordering::SeqCst);
    }

    /// Find the first of `me_as`'s own cells in `0..count` that is not
    /// quiescent, if any. Used at entry to every reducer to turn a caller
    /// precondition violation (spec §7: non-quiescent `pSync` on entry) into
    /// an [`pgas_core::Error::PSyncNotQuiescent`] instead of the silent
    /// miscompute or deadlock the spec says undefined behaviour may produce.
    #[must_use]
    pub fn first_non_quiescent(&self, me_as: usize, count: usize) -> Option<(usize, i64)> {
        self.cells[me_as][..count]
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.load(Ordering::Acquire)))
            .find(|&(_, v)| v != SYNC_VALUE)
    }

    /// Assert every cell across every PE is quiescent. Used by tests and by
    /// the CLI to confirm the restoration invariant (spec §3 invariant 2)
    /// after a collective returns.
    #[must_use]
    pub fn all_quiescent(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|c| c.load(Ordering::Acquire) == SYNC_VALUE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_and_fetch_round_trip() {
        let s = SyncArray::new(2, 3);
        s.p(1, 42, 0);
        assert_eq!(s.atomic_fetch(1, 0), 42);
        assert!(!s.all_quiescent());
    }

    #[test]
    fn atomic_add_accumulates() {
        let s = SyncArray::new(2, 1);
        s.atomic_add(0, 0b001, 1);
        s.atomic_add(0, 0b010, 1);
        assert_eq!(s.atomic_fetch(0, 1), 0b011);
    }

    #[test]
    fn wait_until_observes_concurrent_write() {
        let s = SyncArray::new(1, 1);
        let s2 = s.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(5));
            s2.p(0, 7, 0);
        });
        let observed = s.wait_until(0, 0, Cmp::Ne, SYNC_VALUE);
        assert_eq!(observed, 7);
        handle.join().unwrap();
    }
}
