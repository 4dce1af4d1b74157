// crates/pgas-core/src/lib.rs

//! Canonical types shared across the PGAS collective-reduction workspace.
//!
//! This crate owns the parts of the design that are pure arithmetic and have
//! no dependency on a transport: active-set/power-of-two-subset mapping
//! ([`active_set`]), the local fold kernel and operator capability set
//! ([`fold`], [`ops`]), the `pSync` cell protocol modeled as a small state
//! machine ([`sync`]), and the precondition-violation error type
//! ([`error`]).
//!
//! Nothing here talks to a fabric. `pgas-fabric` depends on this crate, not
//! the other way around.

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

pub mod active_set;
pub mod error;
pub mod fold;
pub mod ops;
pub mod sync;

pub use active_set::{ActiveSet, PowerOfTwoSubset};
pub use error::Error;
pub use fold::local_reduce;
pub use ops::{And, Max, Min, Or, Prod, ReduceOp, Sum, Xor};
pub use sync::{SyncState, SYNC_VALUE};
