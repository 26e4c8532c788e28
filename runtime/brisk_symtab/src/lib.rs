//! Brisk Symtab - symbols and the multi-scope symbol table.
//!
//! # Architecture
//!
//! - [`Symbol`]: a named, typed storage location. It holds a value cell, an
//!   alias to another symbol, or a getter computing the value on every read.
//! - [`SymbolArena`]: owns every symbol; [`SymbolId`]s are generational so a
//!   destroyed symbol can never be reached through a stale id.
//! - [`SymbolTable`]: a name-keyed collection of symbol ids.
//! - [`Scopes`]: the global table, the stack of per-call local tables, the
//!   per-buffer, per-function (static) and per-module tables, and the fixed
//!   resolution order across them.
//! - [`RegisterFile`]: integer-indexed argument/return registers of a call level.
//!
//! Scoping is dynamic: a name not found in the calling function's own tables
//! is looked up in the local tables of its callers, innermost first.

mod arena;
mod errors;
mod flags;
mod registers;
mod scopes;
mod symbol;
mod table;

pub use arena::{SymbolArena, SymbolId};
pub use errors::{AssignError, DeclareError};
pub use flags::SymFlags;
pub use registers::{RegisterFile, REGISTER_BLOCK};
pub use scopes::{ResolveSite, ScopeKind, ScopeLimits, Scopes, SymbolInfo, TableRef};
pub use symbol::{Getter, Symbol};
pub use table::SymbolTable;

/// Longest symbol name accepted by a declaration, in bytes.
pub const MAX_SYMBOL_NAME: usize = 64;

/// Default bound on call nesting (number of local tables).
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Default bound on registers per call level.
pub const DEFAULT_MAX_REGISTERS: usize = 64;
