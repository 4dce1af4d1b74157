// crates/pgas-collectives/src/binomial.rs

//! The binomial reducer (spec §4.6): each PE gathers its children's partial
//! sums along a binomial tree rooted at active-set index 0, one `pSync` cell
//! shared by every child via `atomic_add`-accumulated bitmask rather than
//! `ceil_log2(pe_size)` separate cells — spec §9's explicit exception to the
//! three-state `pSync` protocol used everywhere else in this workspace.

use pgas_core::{local_reduce, Error, ReduceOp, SYNC_VALUE};
use pgas_fabric::{Cmp, SymmetricArray, SyncArray};

use crate::{barrier, broadcast, tree};

/// Cell 0: up-tree bitmask. Cell 1: barrier. Remaining cells: binomial
/// broadcast. See [`pgas_core::sync::psync_size::binomial`].
pub fn reduce_to_all<T, Op>(
    me_as: usize,
    pe_size: u32,
    dest: &SymmetricArray<T>,
    source: &SymmetricArray<T>,
    psync: &SyncArray,
) -> Result<(), Error>
where
    T: Copy + Send + Sync,
    Op: ReduceOp<T>,
{
    let n = dest.len();
    let needed = pgas_core::sync::psync_size::binomial(pe_size);
    crate::check_preconditions(n, me_as, needed, psync)?;

    let me_u32 = me_as as u32;
    let mut acc = source.snapshot_own(me_as);
    let mut to_receive = tree::children_mask(me_u32, pe_size);
    let mut old_pSync: i64 = SYNC_VALUE;

    while to_receive != 0 {
        let observed = psync.wait_until(0, me_as, Cmp::Ne, old_pSync);
        #[allow(clippy::cast_sign_loss)]
        let arrived = observed as u32 & to_receive;
        let recv_bit = arrived & arrived.wrapping_neg();
        let child_as = (me_u32 | recv_bit) as usize;

        let mut child_buf = vec![Op::identity(); n];
        dest.get(&mut child_buf, child_as);
        let prev = acc.clone();
        local_reduce::<T, Op>(&mut acc, &prev, &child_buf);

        to_receive &= !recv_bit;
        old_pSync |= i64::from(recv_bit);
    }

    dest.write_own(me_as, |slot| slot.copy_from_slice(&acc));

    if me_as != 0 {
        let parent_as = tree::parent_of(me_u32) as usize;
        let link = i64::from(tree::link_bit(me_u32));
        psync.atomic_add(0, link, parent_as);
    }
    psync.p(0, SYNC_VALUE, me_as);

    barrier::barrier(psync, 1, me_as, pe_size);
    broadcast::broadcast_binomial_tree(dest, 0, me_as, pe_size, psync, 2);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgas_core::{Max, Sum};
    use pgas_fabric::World;

    #[test]
    fn sums_across_power_of_two_pes() {
        let world = World::new(8);
        let dest = world.alloc::<i32>(2, 0);
        let source =
            SymmetricArray::from_per_pe((0..8).map(|pe| vec![pe as i32, 1]).collect());
        let psync = world.alloc_psync(pgas_core::sync::psync_size::binomial(8));
        world.run(|me_as| {
            reduce_to_all::<i32, Sum>(me_as, 8, &dest, &source, &psync).unwrap();
        });
        for pe in 0..8 {
            assert_eq!(dest.snapshot_own(pe), vec![28, 8]);
        }
        assert!(psync.all_quiescent());
    }

    #[test]
    fn max_across_non_power_of_two_pes() {
        let world = World::new(6);
        let dest = world.alloc::<i32>(1, 0);
        let source = SymmetricArray::from_per_pe(
            (0..6).map(|pe| vec![if pe == 4 { 99 } else { pe as i32 }]).collect(),
        );
        let psync = world.alloc_psync(pgas_core::sync::psync_size::binomial(6));
        world.run(|me_as| {
            reduce_to_all::<i32, Max>(me_as, 6, &dest, &source, &psync).unwrap();
        });
        for pe in 0..6 {
            assert_eq!(dest.snapshot_own(pe), vec![99]);
        }
        assert!(psync.all_quiescent());
    }

    #[test]
    fn single_pe_is_identity() {
        let world = World::new(1);
        let dest = world.alloc::<i32>(1, 0);
        let source = SymmetricArray::from_per_pe(vec![vec![7]]);
        let psync = world.alloc_psync(pgas_core::sync::psync_size::binomial(1));
        world.run(|me_as| {
            reduce_to_all::<i32, Sum>(me_as, 1, &dest, &source, &psync).unwrap();
        });
        assert_eq!(dest.snapshot_own(0), vec![7]);
        assert!(psync.all_quiescent());
    }
}
