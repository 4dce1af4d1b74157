// crates/pgas-collectives/src/barrier.rs

//! Linear barrier (spec §4.3): every non-root PE reports arrival to a fixed
//! root, the root waits for all reports then releases everyone individually.
//! Uses a single `pSync` cell per PE, restored to quiescent before return.

use pgas_core::SYNC_VALUE;
use pgas_fabric::{Cmp, SyncArray};

/// Root of the active set for every barrier in this workspace (spec's
/// reducers always root their barrier at active-set index 0).
const ROOT_AS: usize = 0;

/// Synchronise every PE in a `pe_size`-member active set at `psync`'s cell
/// `round`. Blocks until every PE has called this with the same `round`.
///
/// # Panics
/// Panics (via the underlying busy-wait) never returning if some PE in the
/// active set never calls this with a matching `round` — there is no
/// timeout, matching spec §4.9.
pub fn barrier(psync: &SyncArray, round: usize, me_as: usize, pe_size: u32) {
    if pe_size == 1 {
        return;
    }
    if me_as != ROOT_AS {
        psync.atomic_add(round, 1, ROOT_AS);
        psync.wait_until(round, me_as, Cmp::Ne, SYNC_VALUE);
        psync.p(round, SYNC_VALUE, me_as);
        return;
    }
    psync.wait_until(round, ROOT_AS, Cmp::Ge, i64::from(pe_size) - 1);
    psync.p(round, SYNC_VALUE, ROOT_AS);
    for other in 1..pe_size as usize {
        psync.p(round, pgas_core::SyncState::Armed.to_wire(), other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgas_fabric::World;

    #[test]
    fn every_pe_leaves_together() {
        let world = World::new(6);
        let psync = world.alloc_psync(1);
        world.run(|me_as| {
            barrier(&psync, 0, me_as, 6);
        });
        assert!(psync.all_quiescent());
    }

    #[test]
    fn single_pe_is_a_no_op() {
        let world = World::new(1);
        let psync = world.alloc_psync(1);
        world.run(|me_as| barrier(&psync, 0, me_as, 1));
        assert!(psync.all_quiescent());
    }

    #[test]
    fn cell_is_reusable_across_two_calls() {
        let world = World::new(4);
        let psync = world.alloc_psync(1);
        world.run(|me_as| {
            barrier(&psync, 0, me_as, 4);
            barrier(&psync, 0, me_as, 4);
        });
        assert!(psync.all_quiescent());
    }
}
