//! Brisk IR - identifiers shared by every layer of the macro runtime.
//!
//! This crate provides:
//! - `Name`: a compact interned identifier for symbol, function and module names
//! - `StringInterner` / `SharedInterner`: the table that owns the name text
//! - `VarType`: the declared type of a macro-language variable
//! - `BufferId`, `ModuleId`, `FunctionId`: keys for the per-buffer,
//!   per-module and per-function scope tables

mod ids;
mod interner;
mod name;
mod var_type;

pub use ids::{BufferId, FunctionId, ModuleId};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use var_type::VarType;
