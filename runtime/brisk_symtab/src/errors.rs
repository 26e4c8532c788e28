//! Recoverable symbol-table errors.
//!
//! Contract violations (wrong-type writes to a non-polymorphic symbol, stale
//! ids, alias cycles) are not represented here: they panic.

/// Error returned when a declaration is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeclareError {
    /// The name is longer than `MAX_SYMBOL_NAME`.
    #[error("symbol name '{name}' is too long ({len} bytes, max {max})")]
    NameTooLong { name: String, len: usize, max: usize },
    /// The name belongs to a system symbol.
    #[error("'{name}' is a system symbol")]
    Reserved { name: String },
}

/// Error returned when an assignment is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    /// The symbol is constant or computed.
    #[error("cannot assign to read-only symbol '{name}'")]
    ReadOnly { name: String },
}
