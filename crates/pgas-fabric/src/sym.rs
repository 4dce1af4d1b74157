// crates/pgas-fabric/src/sym.rs

//! Symmetric memory: an object allocated identically on every simulated PE,
//! remotely addressable by active-set index.
//!
//! Real PGAS symmetric heaps hand every PE a raw pointer valid at the same
//! offset on every other PE, and `get`/`put` move bytes across the network
//! directly into that memory. We have no network and no raw pointers here
//! (this crate is `#![forbid(unsafe_code)]`, matching the rest of the
//! workspace): instead each [`SymmetricArray`] owns one
//! `RwLock<Vec<T>>` slot per PE behind a shared `Arc`, and `get`/`put` take
//! the corresponding peer's lock. This reproduces the data-movement
//! semantics exactly; it does not reproduce the *cost* semantics (a `get`
//! here is a memcpy behind an uncontended lock, not a network round trip).

use std::sync::{Arc, RwLock};

/// A symmetric array: one `Vec<T>` of the same length per PE, addressable
/// from any PE by active-set index.
#[derive(Clone)]
pub struct SymmetricArray<T> {
    slots: Arc<Vec<RwLock<Vec<T>>>>,
    len: usize,
}

impl<T: Copy + Send + Sync> SymmetricArray<T> {
    /// Allocate a symmetric array of `len` elements per PE, all PEs
    /// initialised to `fill`.
    #[must_use]
    pub fn new(num_pes: usize, len: usize, fill: T) -> Self {
        let slots = (0..num_pes).map(|_| RwLock::new(vec![fill; len])).collect();
        Self {
            slots: Arc::new(slots),
            len,
        }
    }

    /// Build directly from each PE's initial contents (used to seed
    /// `source` from test/CLI input).
    #[must_use]
    pub fn from_per_pe(per_pe: Vec<Vec<T>>) -> Self {
        let len = per_pe.first().map_or(0, Vec::len);
        assert!(
            per_pe.iter().all(|v| v.len() == len),
            "all PEs must contribute equal-length vectors"
        );
        Self {
            slots: Arc::new(per_pe.into_iter().map(RwLock::new).collect()),
            len,
        }
    }

    /// Per-PE element count.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the per-PE element count is zero.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of PEs this array is allocated over.
    #[inline]
    #[must_use]
    pub fn num_pes(&self) -> usize {
        self.slots.len()
    }

    /// `get`: copy `local.len()` elements starting at `offset` from
    /// `target_as`'s slot into `local`.
    ///
    /// # Panics
    /// Panics if the requested range is out of bounds for this array.
    pub fn get_at(&self, local: &mut [T], target_as: usize, offset: usize) {
        let guard = self.slots[target_as].read().unwrap();
        local.copy_from_slice(&guard[offset..offset + local.len()]);
    }

    /// `get` of the full array from `target_as`.
    pub fn get(&self, local: &mut [T], target_as: usize) {
        self.get_at(local, target_as, 0);
    }

    /// `put`: copy `local` into `target_as`'s slot starting at `offset`.
    ///
    /// # Panics
    /// Panics if the requested range is out of bounds for this array.
    pub fn put_at(&self, target_as: usize, offset: usize, local: &[T]) {
        let mut guard = self.slots[target_as].write().unwrap();
        guard[offset..offset + local.len()].copy_from_slice(local);
    }

    /// `put` the full array into `target_as`.
    pub fn put(&self, target_as: usize, local: &[T]) {
        self.put_at(target_as, 0, local);
    }

    /// Read `me_as`'s own slot via a closure (mirrors a local, non-remote
    /// read of one's own symmetric variable).
    pub fn read_own<R>(&self, me_as: usize, f: impl FnOnce(&[T]) -> R) -> R {
        let guard = self.slots[me_as].read().unwrap();
        f(&guard)
    }

    /// Mutate `me_as`'s own slot via a closure.
    pub fn write_own<R>(&self, me_as: usize, f: impl FnOnce(&mut [T]) -> R) -> R {
        let mut guard = self.slots[me_as].write().unwrap();
        f(&mut guard)
    }

    /// Copy out `me_as`'s own slot.
    #[must_use]
    pub fn snapshot_own(&self, me_as: usize) -> Vec<T> {
        self.slots[me_as].read().unwrap().clone()
    }
}
