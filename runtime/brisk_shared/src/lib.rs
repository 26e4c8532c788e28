//! Brisk Shared - the reference-counted payload substrate.
//!
//! Strings and lists that are passed around the macro runtime live behind a
//! [`SharedRef`]. The contract every consumer relies on:
//!
//! - `acquire` (`Clone`) adds an owner and returns the same payload
//! - `release` (`Drop`) removes an owner; the last release frees the payload
//! - a handle with exactly one owner may be mutated in place
//! - a handle with more than one owner must be copied before mutation
//!
//! # Thread Safety
//!
//! `SharedRef` is `!Send`/`!Sync`. The macro runtime is single-threaded and
//! owner counts are not atomic.
//!
//! # Accounting
//!
//! Every build, acquire and release is recorded in a thread-local
//! [`RefStats`] counter so ownership discipline can be checked in tests.

mod atom;
mod handle;
mod stats;

pub use atom::{Atom, Payload, PayloadKind};
pub use handle::SharedRef;
pub use stats::RefStats;
