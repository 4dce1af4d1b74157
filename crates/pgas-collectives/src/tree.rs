// crates/pgas-collectives/src/tree.rs

//! Binomial-tree child/parent arithmetic, shared between the binomial
//! reducer's up-tree gather and the binomial broadcast's down-tree fan-out —
//! the down-tree is the up-tree walked backwards over the same bitmask.

/// The set of bit positions `me_as` expects traffic on, as a bitmask: the
/// same `to_receive` computation the binomial reduce helper in the original
/// `shcoll` source builds, generalised to an active set of `size` members.
///
/// Bit `k` is set iff `me_as` has a `0` in bit `k` and `me_as | (1 << k)` is
/// still a member of the active set — i.e. `me_as` has a child reachable by
/// flipping exactly that bit on.
#[inline]
#[must_use]
pub fn children_mask(me_as: u32, size: u32) -> u32 {
    let mut mask = 1u32;
    let mut to_receive = 0u32;
    while (me_as & mask) == 0 && (me_as | mask) < size {
        to_receive |= mask;
        mask <<= 1;
    }
    to_receive
}

/// `me_as`'s parent in the binomial tree: `me_as` with its lowest set bit
/// cleared. Undefined (returns `0`, the root) for `me_as == 0`.
#[inline]
#[must_use]
pub const fn parent_of(me_as: u32) -> u32 {
    me_as & me_as.wrapping_sub(1)
}

/// The bit that links `me_as` to [`parent_of`]: its lowest set bit. Only
/// meaningful for `me_as != 0`.
#[inline]
#[must_use]
pub const fn link_bit(me_as: u32) -> u32 {
    me_as & me_as.wrapping_neg()
}
