// crates/pgas-collectives/src/linear.rs

//! The linear reducer (spec §4.5): active-set index 0 pulls every other PE's
//! contribution and folds it in place, then broadcasts the result. The
//! original `shcoll` source pushes contributions into a root-side scratch
//! array and folds from there; pulling directly from each PE's `source` via
//! `get` reaches the same result without ever allocating that scratch array
//! (spec §5.5's "fold directly into dest" simplification).

use pgas_core::{local_reduce, Error, ReduceOp};
use pgas_fabric::{SymmetricArray, SyncArray};

use crate::{barrier, broadcast};

const ROOT_AS: usize = 0;

/// Round 0: barrier. Round 1: broadcast. See [`pgas_core::sync::psync_size::linear`].
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
    let needed = pgas_core::sync::psync_size::linear();
    crate::check_preconditions(n, me_as, needed, psync)?;

    if me_as == ROOT_AS {
        let mut acc = source.snapshot_own(ROOT_AS);
        let mut scratch = vec![Op::identity(); n];
        for other in 1..pe_size as usize {
            source.get(&mut scratch, other);
            let prev = acc.clone();
            local_reduce::<T, Op>(&mut acc, &prev, &scratch);
        }
        dest.write_own(ROOT_AS, |slot| slot.copy_from_slice(&acc));
    }

    barrier::barrier(psync, 0, me_as, pe_size);
    broadcast::broadcast_linear(dest, ROOT_AS, me_as, pe_size, psync, 1);
    Ok(())
}
