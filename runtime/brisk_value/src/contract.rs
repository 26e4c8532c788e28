//! Fatal contract violations between the runtime core and its built-in callers.

use std::fmt;

/// Report a contract violation and abort the current operation.
///
/// Use the [`contract_violation!`](crate::contract_violation) macro instead of
/// calling this directly.
#[cold]
#[track_caller]
pub fn contract_failure(args: fmt::Arguments<'_>) -> ! {
    tracing::error!(target: "brisk::contract", "{args}");
    panic!("contract violation: {args}")
}

/// Abort with a contract-violation diagnostic.
///
/// ```text
/// contract_violation!("expected string, found {}", cell.kind());
/// ```
#[macro_export]
macro_rules! contract_violation {
    ($($arg:tt)*) => {
        $crate::contract_failure(::std::format_args!($($arg)*))
    };
}
