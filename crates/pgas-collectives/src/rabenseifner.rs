// crates/pgas-collectives/src/rabenseifner.rs

//! The Rabenseifner reducer (spec §4.8): reduce-scatter across the
//! power-of-two core, each member ending up holding exactly one block of the
//! array, followed by an allgather that doubles every member's held range
//! back up to the full array.
//!
//! The reduce-scatter walks partner distance `1, 2, 4, ...` (least
//! significant bit first); because each round's keep/drop decision reads
//! the *same* bit of `me_p2s` that selects the partner, the block a member
//! ends up owning after `log2(p2s_size)` rounds is `me_p2s` with its bits
//! reversed, not `me_p2s` itself — the allgather has to start from that
//! bit-reversed block index ([`pgas_core::active_set::reverse_bits`]) to
//! walk the halving back up correctly. This is the one place in the
//! workspace where getting an index formula slightly wrong produces a
//! silently wrong sum rather than a panic, which is why it is grounded
//! directly on the original arithmetic rather than re-derived.
//!
//! Spec §9's documented defect — the allgather's round-index arithmetic
//! overflowing a small `pSync` array because it started counting from
//! `sizeof(int) * CHAR_BIT + 1` — is fixed here by simply continuing the
//! cell numbering where the reduce-scatter phase left off.

use pgas_core::{active_set::reverse_bits, local_reduce, Error, PowerOfTwoSubset, ReduceOp, SyncState, SYNC_VALUE};
use pgas_fabric::{Cmp, SymmetricArray, SyncArray};

fn block_offset(n: usize, p2s_size: u32, block_idx: u32) -> usize {
    (block_idx as u64 * n as u64 / u64::from(p2s_size)) as usize
}

/// Cell 0: unused — the sibling's pre-phase pull of an extra's `source` needs
/// no handshake, same reasoning as the linear barrier DESIGN.md drops (the
/// array is caller-fixed before any PE thread runs). Cells `1..=log2(p2s_size)`:
/// reduce-scatter. Cells `log2(p2s_size)+1..=2*log2(p2s_size)`: allgather.
/// Final cell: post-phase hand-back to the extra. See
/// [`pgas_core::sync::psync_size::rabenseifner`].
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
    let needed = pgas_core::sync::psync_size::rabenseifner(p2s.p2s_size);
    crate::check_preconditions(n, me_as, needed, psync)?;

    let log = p2s.log_p2s_size;
    let final_round = 2 * log as usize + 1;
    let me_u32 = me_as as u32;

    let Some(me_p2s) = p2s.p2s_of(me_u32) else {
        // Extra: our sibling pulls our contribution straight out of `source`
        // with no handshake needed (it's caller-fixed before any PE thread
        // starts), then we just wait for the finished answer at the very end.
        psync.wait_until(final_round, me_as, Cmp::Ge, SyncState::Armed.to_wire());
        psync.p(final_round, SYNC_VALUE, me_as);
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
    dest.write_own(me_as, |slot| slot.copy_from_slice(&acc));

    // Reduce-scatter: distance 1, 2, 4, ... across the power-of-two core.
    let mut begin = 0u32;
    let mut end = p2s.p2s_size;
    for bit in 0..log {
        let distance = 1u32 << bit;
        let partner_p2s = if me_p2s & distance == 0 {
            me_p2s + distance
        } else {
            me_p2s - distance
        };
        let partner_as = p2s.as_of(partner_p2s) as usize;
        let round = 1 + bit as usize;

        if me_p2s & distance == 0 {
            end = (begin + end) / 2;
        } else {
            begin = (begin + end) / 2;
        }
        let off = block_offset(n, p2s.p2s_size, begin);
        let len = block_offset(n, p2s.p2s_size, end) - off;

        psync.p(round, SyncState::Armed.to_wire(), partner_as);
        psync.wait_until(round, me_as, Cmp::Ge, SyncState::Armed.to_wire());

        let mut peer_buf = vec![Op::identity(); len];
        dest.get_at(&mut peer_buf, partner_as, off);
        psync.p(round, SyncState::DataReady.to_wire(), partner_as);

        let own_slice = dest.snapshot_own(me_as);
        let prev = own_slice[off..off + len].to_vec();
        let mut folded = vec![Op::identity(); len];
        local_reduce::<T, Op>(&mut folded, &prev, &peer_buf);
        dest.write_own(me_as, |slot| slot[off..off + len].copy_from_slice(&folded));

        psync.wait_until(round, me_as, Cmp::Ge, SyncState::DataReady.to_wire());
        psync.p(round, SYNC_VALUE, me_as);
    }

    // Allgather: distance p2s_size/2, ..., 1 — the mirror image, starting
    // from the bit-reversed block this member ended reduce-scatter holding.
    let mut block_begin = reverse_bits(me_p2s, log);
    let mut block_end = block_begin + 1;
    for bit in (0..log).rev() {
        let distance = 1u32 << bit;
        let partner_p2s = if me_p2s & distance == 0 {
            me_p2s + distance
        } else {
            me_p2s - distance
        };
        let partner_as = p2s.as_of(partner_p2s) as usize;
        let round = 1 + log as usize + (log - 1 - bit) as usize;

        let off = block_offset(n, p2s.p2s_size, block_begin);
        let len = block_offset(n, p2s.p2s_size, block_end) - off;
        let payload = dest.snapshot_own(me_as)[off..off + len].to_vec();

        dest.put_at(partner_as, off, &payload);
        psync.fence();
        psync.p(round, SyncState::Armed.to_wire(), partner_as);
        psync.wait_until(round, me_as, Cmp::Ge, SyncState::Armed.to_wire());
        psync.p(round, SYNC_VALUE, me_as);

        if me_p2s & distance == 0 {
            block_end += block_end - block_begin;
        } else {
            block_begin -= block_end - block_begin;
        }
    }

    if p2s.is_core_sibling_of_next_extra(me_u32) {
        let extra_as = me_as + 1;
        let full = dest.snapshot_own(me_as);
        dest.put(extra_as, &full);
        psync.fence();
        psync.p(final_round, SyncState::Armed.to_wire(), extra_as);
    }
    Ok(())
}
