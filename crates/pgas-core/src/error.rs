// crates/pgas-core/src/error.rs

//! Precondition-violation errors (spec §7). Resource exhaustion is not
//! represented here: it aborts the process via Rust's default allocator
//! behaviour, with no `Result` in the path.

use thiserror::Error;

/// A precondition the caller violated. Spec §7 calls the resulting
/// behaviour "undefined" (deadlock or silent miscompute); these variants
/// exist for the defensive `debug_assert!`-style checks this workspace
/// performs at entry points, which are diagnostic aids, not a recoverable
/// error path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// `nreduce` was zero; every entry point requires at least one element.
    #[error("nreduce must be at least 1, got {0}")]
    EmptyReduction(usize),

    /// A supplied `pSync` array was shorter than the algorithm's sizing
    /// contract (spec §6).
    #[error("pSync too short: need at least {needed} cells, got {got}")]
    PSyncTooShort {
        /// Minimum required length.
        needed: usize,
        /// Actual length supplied.
        got: usize,
    },

    /// A `pSync` cell was not quiescent (`SYNC_VALUE`) on entry.
    #[error("pSync cell {index} was not quiescent on entry (got {value})")]
    PSyncNotQuiescent {
        /// Index of the offending cell.
        index: usize,
        /// Value observed.
        value: i64,
    },
}
