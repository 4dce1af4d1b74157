// crates/pgas-core/src/active_set.rs

//! Active-set arithmetic: PE-index ↔ active-set-index mapping, and the
//! power-of-two subset used by the recursive-doubling and Rabenseifner
//! reducers.
//!
//! All of this is pure integer arithmetic with no side effects, so it is
//! tested with `proptest` rather than by driving a fabric.

/// A participating set of PEs `{ PE_start + i * 2^logPE_stride | 0 <= i < PE_size }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveSet {
    /// First participating PE.
    pub pe_start: i32,
    /// `log2` of the stride between participating PEs.
    pub log_pe_stride: u32,
    /// Number of participating PEs.
    pub pe_size: u32,
}

impl ActiveSet {
    /// Construct an active set. Panics if `pe_size == 0`; every algorithm in
    /// this workspace requires at least one participant.
    #[inline]
    #[must_use]
    pub fn new(pe_start: i32, log_pe_stride: u32, pe_size: u32) -> Self {
        assert!(pe_size > 0, "active set must have at least one PE");
        Self {
            pe_start,
            log_pe_stride,
            pe_size,
        }
    }

    /// `stride = 2^logPE_stride`.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> i32 {
        1 << self.log_pe_stride
    }

    /// Map a global PE id to its active-set index, or `None` if `pe` is not a
    /// member of this active set.
    #[inline]
    #[must_use]
    pub fn active_index_of(&self, pe: i32) -> Option<u32> {
        let stride = self.stride();
        let delta = pe.checked_sub(self.pe_start)?;
        if delta < 0 || delta % stride != 0 {
            return None;
        }
        let idx = (delta / stride) as u32;
        (idx < self.pe_size).then_some(idx)
    }

    /// Map an active-set index back to a global PE id. Does not check that
    /// `as_idx < pe_size`.
    #[inline]
    #[must_use]
    pub fn pe_of(&self, as_idx: u32) -> i32 {
        self.pe_start + (as_idx as i32) * self.stride()
    }

    /// The largest power of two that is `<= pe_size`.
    #[inline]
    #[must_use]
    pub fn p2s_size(&self) -> u32 {
        largest_pow2_le(self.pe_size)
    }

    /// `log2` of [`Self::p2s_size`].
    #[inline]
    #[must_use]
    pub fn log_p2s_size(&self) -> u32 {
        self.p2s_size().trailing_zeros()
    }

    /// Compute the power-of-two subset view of this active set.
    #[inline]
    #[must_use]
    pub fn power_of_two_subset(&self) -> PowerOfTwoSubset {
        PowerOfTwoSubset::new(self.pe_size)
    }
}

/// Largest power of two `<= n`. `n` must be nonzero.
#[inline]
#[must_use]
const fn largest_pow2_le(n: u32) -> u32 {
    debug_assert!(n > 0);
    1 << (31 - n.leading_zeros())
}

/// The power-of-two "core" subset of an active set of size `pe_size`, plus
/// the mapping needed to find each "extra" PE's sibling in the core.
///
/// See spec §3 "Power-of-two subset": every active-set index `me_as` maps to
/// a candidate `me_p2s = me_as * p2s_size / PE_size`; it belongs to the core
/// iff `ceil(me_p2s * PE_size / p2s_size) == me_as`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerOfTwoSubset {
    /// Total active-set size this subset was computed from.
    pub pe_size: u32,
    /// Size of the power-of-two core, `<= pe_size`.
    pub p2s_size: u32,
    /// `log2(p2s_size)`.
    pub log_p2s_size: u32,
}

impl PowerOfTwoSubset {
    /// Compute the power-of-two subset view for an active set of `pe_size`.
    #[inline]
    #[must_use]
    pub fn new(pe_size: u32) -> Self {
        let p2s_size = largest_pow2_le(pe_size);
        Self {
            pe_size,
            p2s_size,
            log_p2s_size: p2s_size.trailing_zeros(),
        }
    }

    /// Map an active-set index to its p2s-space index, or `None` if `me_as`
    /// is an "extra" (not a core member).
    #[inline]
    #[must_use]
    pub fn p2s_of(&self, me_as: u32) -> Option<u32> {
        let candidate = me_as * self.p2s_size / self.pe_size;
        let back = ceil_div(candidate * self.pe_size, self.p2s_size);
        (back == me_as).then_some(candidate)
    }

    /// Map a p2s-space index back to an active-set index.
    #[inline]
    #[must_use]
    pub fn as_of(&self, me_p2s: u32) -> u32 {
        ceil_div(me_p2s * self.pe_size, self.p2s_size)
    }

    /// Whether `me_as` is a core member (equivalent to `p2s_of(me_as).is_some()`).
    #[inline]
    #[must_use]
    pub fn is_core(&self, me_as: u32) -> bool {
        self.p2s_of(me_as).is_some()
    }

    /// For an "extra" `me_as` (not core), its designated sibling: the core
    /// PE immediately before it in active-set order. Caller must ensure
    /// `me_as` is not core and `me_as > 0` (every extra has `me_as >= 1`
    /// because index 0 is always core).
    #[inline]
    #[must_use]
    pub fn sibling_of_extra(&self, me_as: u32) -> u32 {
        debug_assert!(!self.is_core(me_as));
        me_as - 1
    }

    /// For a core `me_as`, whether it is the designated sibling of the
    /// following extra: `(me_as + 1) * p2s_size / pe_size == me_p2s`, the
    /// same floor-division test the original `shcoll` source uses (mirrored
    /// here rather than re-derived, since it is the load-bearing identity
    /// that hands each extra exactly one sibling).
    #[inline]
    #[must_use]
    pub fn is_core_sibling_of_next_extra(&self, me_as: u32) -> bool {
        let Some(me_p2s) = self.p2s_of(me_as) else {
            return false;
        };
        me_as + 1 < self.pe_size && (me_as + 1) * self.p2s_size / self.pe_size == me_p2s
    }
}

/// Ceiling division for non-negative integers: `ceil(a / b)`.
#[inline]
#[must_use]
const fn ceil_div(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

/// Reverse the low `n` bits of `x`. Used by the Rabenseifner allgather to
/// compute the bit-reversed starting block index.
#[inline]
#[must_use]
pub const fn reverse_bits(x: u32, n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    x.reverse_bits() >> (u32::BITS - n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn active_index_round_trips() {
        let set = ActiveSet::new(4, 2, 6); // PEs 4, 8, 12, 16, 20, 24
        for i in 0..6u32 {
            let pe = set.pe_of(i);
            assert_eq!(set.active_index_of(pe), Some(i));
        }
        assert_eq!(set.active_index_of(5), None);
        assert_eq!(set.active_index_of(28), None);
    }

    #[test]
    fn power_of_two_pe_size_is_all_core() {
        let p2s = PowerOfTwoSubset::new(8);
        assert_eq!(p2s.p2s_size, 8);
        for i in 0..8 {
            assert!(p2s.is_core(i));
            assert_eq!(p2s.as_of(p2s.p2s_of(i).unwrap()), i);
        }
    }

    #[test]
    fn five_pes_has_one_extra() {
        // p2s_size = 4; exactly one of the 5 active indices is "extra".
        let p2s = PowerOfTwoSubset::new(5);
        assert_eq!(p2s.p2s_size, 4);
        let extras: Vec<u32> = (0..5).filter(|&i| !p2s.is_core(i)).collect();
        assert_eq!(extras.len(), 1);
        let extra = extras[0];
        let sibling = p2s.sibling_of_extra(extra);
        assert!(p2s.is_core(sibling));
        assert!(p2s.is_core_sibling_of_next_extra(sibling));
    }

    #[test]
    fn reverse_bits_examples() {
        assert_eq!(reverse_bits(0b001, 3), 0b100);
        assert_eq!(reverse_bits(0b011, 3), 0b110);
        assert_eq!(reverse_bits(0, 3), 0);
        assert_eq!(reverse_bits(5, 0), 0);
    }

    proptest! {
        #[test]
        fn core_members_map_back_to_themselves(pe_size in 1u32..=4096) {
            let p2s = PowerOfTwoSubset::new(pe_size);
            for me_as in 0..pe_size {
                if let Some(me_p2s) = p2s.p2s_of(me_as) {
                    prop_assert_eq!(p2s.as_of(me_p2s), me_as);
                    prop_assert!(me_p2s < p2s.p2s_size);
                }
            }
        }

        #[test]
        fn exactly_p2s_size_core_members(pe_size in 1u32..=4096) {
            let p2s = PowerOfTwoSubset::new(pe_size);
            let core_count = (0..pe_size).filter(|&i| p2s.is_core(i)).count() as u32;
            prop_assert_eq!(core_count, p2s.p2s_size);
        }

        #[test]
        fn active_set_round_trip(pe_start in -1000i32..1000, log_stride in 0u32..4, pe_size in 1u32..64) {
            let set = ActiveSet::new(pe_start, log_stride, pe_size);
            for i in 0..pe_size {
                prop_assert_eq!(set.active_index_of(set.pe_of(i)), Some(i));
            }
        }

        #[test]
        fn every_extra_has_exactly_one_flagged_sibling(pe_size in 1u32..=4096) {
            let p2s = PowerOfTwoSubset::new(pe_size);
            for me_as in 0..pe_size {
                if !p2s.is_core(me_as) {
                    let sibling = p2s.sibling_of_extra(me_as);
                    prop_assert!(p2s.is_core(sibling));
                    prop_assert!(p2s.is_core_sibling_of_next_extra(sibling));
                }
            }
        }
    }
}
