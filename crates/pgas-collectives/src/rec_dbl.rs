// crates/pgas-collectives/src/rec_dbl.rs

//! The recursive-doubling reducer (spec §4.7): an "extra" PE (when `pe_size`
//! is not a power of two) folds into its core sibling before the doubling
//! rounds and receives the finished result from it afterward; the
//! `p2s_size` core members run `log2(p2s_size)` pairwise-exchange rounds, at
//! the end of which every core member already holds the full reduction — no
//! separate broadcast phase is needed inside the core.
//!
//! Each round's scratch value is carried in a plain `Vec<T>` (`acc`), so the
//! original's "free a temporary only when it is `NULL`" defect (spec §9
//! Design Notes) has no analogue here: there is no pointer to free, just an
//! owned buffer dropped normally at the end of the function.
//!
//! Each exchange round is a two-phase handshake, the same shape as the
//! Rabenseifner reduce-scatter: post `Armed` once we've published this
//! round's `acc` to our own `dest` slot, wait for the partner's `Armed`, pull
//! their slot, then post `DataReady` and wait for *their* `DataReady` before
//! looping back to overwrite `dest` for the next round. Without that second
//! wait a PE could start round `r+1`'s write before the partner has read
//! round `r`'s value out of `dest`.

use pgas_core::{local_reduce, Error, PowerOfTwoSubset, ReduceOp, SyncState, SYNC_VALUE};
use pgas_fabric::{Cmp, SymmetricArray, SyncArray};

/// Cell 0: extras/siblings pre- and post-phase. Cells `1..=log2(p2s_size)`:
/// core exchange rounds. See [`pgas_core::sync::psync_size::rec_dbl`].
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
    let p2s = PowerOfTwoSubset::new(pe_size);
    let needed = pgas_core::sync::psync_size::rec_dbl(p2s.p2s_size);
    crate::check_preconditions(n, me_as, needed, psync)?;

    let me_u32 = me_as as u32;

    let Some(me_p2s) = p2s.p2s_of(me_u32) else {
        // Extra: no rounds of our own. Our sibling folds our source in and
        // hands back the finished result.
        psync.wait_until(0, me_as, Cmp::Ne, SYNC_VALUE);
        psync.p(0, SYNC_VALUE, me_as);
        return Ok(());
    };

    let mut acc = source.snapshot_own(me_as);
    if p2s.is_core_sibling_of_next_extra(me_u32) {
        let extra_as = me_as + 1;
        let mut extra_src = vec![Op::identity(); n];
        source.get(&mut extra_src, extra_as);
        let prev = acc.clone();
        local_reduce::<T, Op>(&mut acc, &prev, &extra_src);
    }

    for r in 0..p2s.log_p2s_size {
        let round = 1 + r as usize;
        let partner_p2s = me_p2s ^ (1 << r);
        let partner_as = p2s.as_of(partner_p2s) as usize;

        dest.write_own(me_as, |slot| slot.copy_from_slice(&acc));
        psync.fence();
        psync.p(round, SyncState::Armed.to_wire(), partner_as);
        psync.wait_until(round, me_as, Cmp::Ge, SyncState::Armed.to_wire());

        let mut partner_buf = vec![Op::identity(); n];
        dest.get(&mut partner_buf, partner_as);
        psync.p(round, SyncState::DataReady.to_wire(), partner_as);

        let prev = acc.clone();
        local_reduce::<T, Op>(&mut acc, &prev, &partner_buf);

        psync.wait_until(round, me_as, Cmp::Ge, SyncState::DataReady.to_wire());
        psync.p(round, SYNC_VALUE, me_as);
    }

    dest.write_own(me_as, |slot| slot.copy_from_slice(&acc));

    if p2s.is_core_sibling_of_next_extra(me_u32) {
        let extra_as = me_as + 1;
        dest.put(extra_as, &acc);
        psync.fence();
        psync.p(0, SyncState::Armed.to_wire(), extra_as);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgas_core::Sum;
    use pgas_fabric::World;

    #[test]
    fn sums_across_power_of_two_pes() {
        let world = World::new(4);
        let dest = world.alloc::<i32>(1, 0);
        let source = SymmetricArray::from_per_pe((0..4).map(|pe| vec![pe as i32]).collect());
        let psync = world.alloc_psync(pgas_core::sync::psync_size::rec_dbl(4));
        world.run(|me_as| {
            reduce_to_all::<i32, Sum>(me_as, 4, &dest, &source, &psync).unwrap();
        });
        for pe in 0..4 {
            assert_eq!(dest.snapshot_own(pe), vec![6]);
        }
        assert!(psync.all_quiescent());
    }

    #[test]
    fn sums_across_non_power_of_two_pes() {
        let world = World::new(5);
        let dest = world.alloc::<i32>(1, 0);
        let source = SymmetricArray::from_per_pe((0..5).map(|pe| vec![pe as i32]).collect());
        let p2s = PowerOfTwoSubset::new(5);
        let psync = world.alloc_psync(pgas_core::sync::psync_size::rec_dbl(p2s.p2s_size));
        world.run(|me_as| {
            reduce_to_all::<i32, Sum>(me_as, 5, &dest, &source, &psync).unwrap();
        });
        for pe in 0..5 {
            assert_eq!(dest.snapshot_own(pe), vec![10]);
        }
        assert!(psync.all_quiescent());
    }

    #[test]
    fn single_pe_is_identity() {
        let world = World::new(1);
        let dest = world.alloc::<i32>(1, 0);
        let source = SymmetricArray::from_per_pe(vec![vec![11]]);
        let psync = world.alloc_psync(pgas_core::sync::psync_size::rec_dbl(1));
        world.run(|me_as| {
            reduce_to_all::<i32, Sum>(me_as, 1, &dest, &source, &psync).unwrap();
        });
        assert_eq!(dest.snapshot_own(0), vec![11]);
        assert!(psync.all_quiescent());
    }
}
