//! Brisk Value - the tagged value cell and its two deployments.
//!
//! A [`ValueCell`] holds exactly one of integer, float, borrowed literal,
//! owned growable buffer, shared handle or null. Every assignment replaces the
//! previous [`Value`], so whatever the cell owned is released before the new
//! value is visible.
//!
//! The cell is deployed twice:
//! - [`Accumulator`]: the runtime's "last computed value" register, the return
//!   channel of every built-in
//! - [`GenericValue`]: per-slot storage behind record fields and properties,
//!   carrying an [`Attributes`] mask that its owner enforces
//!
//! # Contract violations
//!
//! Reading a cell as a type a built-in assumed but the cell does not hold is a
//! defect in the built-in, not a macro-language error. Those paths go through
//! [`contract_violation!`] and abort the operation with a panic.

mod accumulator;
mod buffer;
mod cell;
mod contract;
mod generic;
mod trace;
mod value;

pub use accumulator::Accumulator;
pub use buffer::{OwnedBuf, BUFFER_BLOCK};
pub use cell::ValueCell;
pub use contract::contract_failure;
pub use generic::{Attributes, GenericValue, PropertyBag};
pub use trace::{set_trace_enabled, set_trace_hook, trace_enabled, TraceHook, TraceSite};
pub use value::{Value, ValueKind};
