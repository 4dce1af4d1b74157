// crates/pgas-collectives/src/broadcast.rs

//! Broadcast (spec §4.4): fan `root_as`'s contents of `dest` out to every
//! other PE. Two shapes, both data-then-notify with a fence in between so a
//! waiter never observes the notification before the payload has landed.

use pgas_core::SYNC_VALUE;
use pgas_fabric::{Cmp, SymmetricArray, SyncArray};

use crate::tree;

/// One root, one round trip per non-root PE.
pub fn broadcast_linear<T: Copy + Send + Sync>(
    dest: &SymmetricArray<T>,
    root_as: usize,
    me_as: usize,
    pe_size: u32,
    psync: &SyncArray,
    round: usize,
) {
    if me_as == root_as {
        let payload = dest.snapshot_own(me_as);
        for target in 0..pe_size as usize {
            if target == root_as {
                continue;
            }
            dest.put(target, &payload);
        }
        psync.fence();
        for target in 0..pe_size as usize {
            if target == root_as {
                continue;
            }
            psync.p(round, pgas_core::SyncState::Armed.to_wire(), target);
        }
    } else {
        psync.wait_until(round, me_as, Cmp::Ne, SYNC_VALUE);
        psync.p(round, SYNC_VALUE, me_as);
    }
}

/// Binomial-tree fan-out: `root_as` forwards to `log2(pe_size)` children,
/// each of which forwards to its own children, halving the distance to full
/// coverage at every hop. Shares [`tree::children_mask`] with the binomial
/// reducer's up-tree gather — this is that same tree walked root-to-leaves.
///
/// `round` is the base `pSync` index; this uses
/// `round + k` for `k` in `0..ceil_log2(pe_size)`.
pub fn broadcast_binomial_tree<T: Copy + Send + Sync>(
    dest: &SymmetricArray<T>,
    root_as: usize,
    me_as: usize,
    pe_size: u32,
    psync: &SyncArray,
    round: usize,
) {
    let rel = (me_as as i64 - root_as as i64).rem_euclid(i64::from(pe_size)) as u32;

    if rel != 0 {
        let recv_bit = tree::link_bit(rel).trailing_zeros() as usize;
        psync.wait_until(round + recv_bit, me_as, Cmp::Ne, SYNC_VALUE);
        psync.p(round + recv_bit, SYNC_VALUE, me_as);
    }

    let mut children = tree::children_mask(rel, pe_size);
    if children == 0 {
        return;
    }
    let payload = dest.snapshot_own(me_as);
    while children != 0 {
        let bit = children & children.wrapping_neg();
        let child_rel = rel | bit;
        let child_as = ((u64::from(child_rel) + root_as as u64) % u64::from(pe_size)) as usize;
        dest.put(child_as, &payload);
        psync.fence();
        psync.p(
            round + bit.trailing_zeros() as usize,
            pgas_core::SyncState::Armed.to_wire(),
            child_as,
        );
        children &= !bit;
    }
}
