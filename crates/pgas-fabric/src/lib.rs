// crates/pgas-fabric/src/lib.rs

//! An in-process simulation of the one-sided PGAS transport spec §6 treats
//! as an external collaborator: symmetric heap allocation, `get`/`put`/`p`/
//! `atomic_add`/`atomic_fetch`/`wait_until`/`fence`, and `my_pe()`.
//!
//! There is exactly one implementation of this contract in the workspace
//! ([`World`]), so it is exposed as a concrete type rather than behind a
//! trait — a trait with one implementor would be abstraction with no
//! payoff here. [`pgas_core`] defines the pure arithmetic (active sets,
//! operators); `pgas_collectives` composes this crate's primitives with
//! that arithmetic into the four reduction algorithms.
//!
//! # Mapping to the spec §6 contract
//!
//! | spec §6 primitive | this crate |
//! |---|---|
//! | symmetric allocator | [`World::alloc`], [`World::alloc_psync`] |
//! | `my_pe()` | the `me_as` index [`World::run`] hands each PE's closure |
//! | `get`/`put` | [`SymmetricArray::get`]/[`SymmetricArray::put`] (and the `_at` variants for sub-ranges) |
//! | `p` | [`SyncArray::p`] |
//! | `atomic_add`/`atomic_fetch` | [`SyncArray::atomic_add`]/[`SyncArray::atomic_fetch`] |
//! | `wait_until` | [`SyncArray::wait_until`] |
//! | `fence` | [`SyncArray::fence`] |

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

pub mod sym;
pub mod sync_array;
pub mod world;

pub use sym::SymmetricArray;
pub use sync_array::{Cmp, SyncArray};
pub use world::World;
