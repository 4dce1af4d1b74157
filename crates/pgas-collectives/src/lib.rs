// crates/pgas-collectives/src/lib.rs

//! The four collective reductions this workspace exists to provide —
//! linear, binomial-tree, recursive-doubling, and Rabenseifner — built on
//! [`pgas_core`]'s active-set arithmetic and operator set and
//! [`pgas_fabric`]'s simulated one-sided transport. [`barrier`] and
//! [`broadcast`] are the synchronisation primitives the reducers share;
//! [`tree`] is the binomial-tree bit arithmetic both the binomial reducer
//! and the binomial broadcast walk in opposite directions.
//!
//! Every `reduce_to_all` function here takes `me_as` (this PE's active-set
//! index, not a raw PE id — see [`pgas_core::ActiveSet`] for the mapping
//! between the two) and a `pSync` array sized per
//! [`pgas_core::sync::psync_size`]; callers are responsible for presenting a
//! quiescent array and leave with one (spec §3, invariant 2).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

pub mod api;
pub mod barrier;
pub mod binomial;
pub mod broadcast;
pub mod linear;
pub mod rabenseifner;
pub mod rec_dbl;
pub mod tree;

pub use barrier::barrier;
pub use broadcast::{broadcast_binomial_tree, broadcast_linear};

use pgas_core::Error;
use pgas_fabric::SyncArray;

/// Shared entry-point precondition check every reducer runs before touching
/// the fabric: `nreduce` nonzero, `pSync` long enough, and this PE's own
/// cells quiescent (spec §3 invariant 2 on entry, §7's "non-quiescent pSync"
/// precondition violation).
pub(crate) fn check_preconditions(
    n: usize,
    me_as: usize,
    needed: usize,
    psync: &SyncArray,
) -> Result<(), Error> {
    if n == 0 {
        return Err(Error::EmptyReduction(n));
    }
    if psync.cells_per_pe() < needed {
        return Err(Error::PSyncTooShort {
            needed,
            got: psync.cells_per_pe(),
        });
    }
    if let Some((index, value)) = psync.first_non_quiescent(me_as, needed) {
        return Err(Error::PSyncNotQuiescent { index, value });
    }
    Ok(())
}
