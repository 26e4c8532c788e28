//! Brisk Eval - the runtime context of the brisk macro language.
//!
//! This crate ties the value cells and scope tables together into the context
//! the evaluator and the built-ins share.
//!
//! # Architecture
//!
//! - [`Runtime`]: Accumulator, scope tables, call frames, current buffer and
//!   module, early-return flag. Built with [`RuntimeBuilder`].
//! - [`CallGuard`]: leaves a call level when dropped.
//! - [`Callables`]: the macro registry consulted (and autoloaded) when a name
//!   is not a variable.
//! - [`ArgVec`]: positional arguments of a built-in call.
//! - [`MessageHandler`]: where user-visible diagnostics go.
//! - [`builtins`]: the core symbol built-ins.

mod args;
pub mod builtins;
mod callables;
mod errors;
mod messages;
mod runtime;

use std::sync::Once;

pub use args::{Arg, ArgVec};
pub use callables::{CallableRegistry, CallableState, Callables, Loader};
pub use errors::ResolveError;
pub use messages::{
    buffer_handler, silent_handler, tracing_handler, BufferMessageHandler, MessageHandler,
    MessageLevel, SharedMessageHandler, TracingMessageHandler,
};
pub use runtime::{CallGuard, Runtime, RuntimeBuilder};

// Re-exports for built-in authors
pub use brisk_symtab::{AssignError, DeclareError, SymFlags, SymbolId, TableRef};
pub use brisk_value::{Value, ValueKind};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Enable with `RUST_LOG=brisk_eval=debug`, or
/// `RUST_LOG=brisk::assign=trace` together with assignment tracing.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
