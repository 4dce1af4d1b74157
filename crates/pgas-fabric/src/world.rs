// crates/pgas-fabric/src/world.rs

//! `World`: the one concrete implementation of the PGAS transport contract
//! (spec §6) this workspace provides — an in-process stand-in for real
//! interconnect hardware, used to drive and test the algorithms in
//! `pgas-collectives`.

use std::thread;

use crate::sym::SymmetricArray;
use crate::sync_array::SyncArray;

/// A simulated PGAS job of `num_pes` PEs sharing one process.
#[derive(Clone, Copy, Debug)]
pub struct World {
    num_pes: i32,
}

impl World {
    /// Create a world of `num_pes` simulated PEs. Panics if `num_pes == 0`.
    #[must_use]
    pub fn new(num_pes: i32) -> Self {
        assert!(num_pes > 0, "a world needs at least one PE");
        Self { num_pes }
    }

    /// Number of PEs in this world.
    #[inline]
    #[must_use]
    pub fn num_pes(&self) -> i32 {
        self.num_pes
    }

    /// Allocate a symmetric array of `len` elements per PE, all initialised
    /// to `fill`. Mirrors the symmetric allocator spec §6 assumes exists.
    #[must_use]
    pub fn alloc<T: Copy + Send + Sync>(&self, len: usize, fill: T) -> SymmetricArray<T> {
        SymmetricArray::new(self.num_pes as usize, len, fill)
    }

    /// Allocate a `pSync` array with `cells_per_pe` quiescent cells per PE.
    #[must_use]
    pub fn alloc_psync(&self, cells_per_pe: usize) -> SyncArray {
        SyncArray::new(self.num_pes as usize, cells_per_pe)
    }

    /// Run `body` once per PE on its own OS thread (the SPMD model of spec
    /// §5: one independent, single-threaded control flow per PE), passing
    /// each thread its active-set index `0..num_pes`. Blocks until every PE
    /// has returned, then returns their results in PE order.
    ///
    /// # Panics
    /// Propagates (by panicking) if any PE's thread panics, after joining
    /// every other PE's thread.
    pub fn run<F, R>(&self, body: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Send + Sync,
        R: Send,
    {
        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.num_pes as usize)
                .map(|me_as| {
                    let body = &body;
                    scope.spawn(move || body(me_as))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("PE thread panicked"))
                .collect()
        })
    }
}
