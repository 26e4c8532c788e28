//! Assignment tracing.
//!
//! A process-wide flag gates an observation point fired after every
//! assignment to the accumulator, a generic container or a symbol. When on,
//! each assignment emits a `tracing` event on target `brisk::assign` and calls
//! the hook installed on the current thread, if any. Tracing never changes the
//! assigned value.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use brisk_ir::Name;

use crate::Value;

static TRACE_ENABLED: AtomicBool = AtomicBool::new(false);

thread_local! {
    static TRACE_HOOK: Cell<Option<TraceHook>> = const { Cell::new(None) };
}

/// Observer called after a traced assignment.
pub type TraceHook = fn(TraceSite, &Value);

/// Which cell an assignment went to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceSite {
    Accumulator,
    Generic,
    Symbol(Name),
}

/// Turn assignment tracing on or off for the whole process.
pub fn set_trace_enabled(enabled: bool) {
    TRACE_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn trace_enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
}

/// Install (or remove) this thread's hook, returning the previous one.
pub fn set_trace_hook(hook: Option<TraceHook>) -> Option<TraceHook> {
    TRACE_HOOK.with(|cell| cell.replace(hook))
}

#[inline]
pub(crate) fn after_assign(site: TraceSite, value: &Value) {
    if !trace_enabled() {
        return;
    }
    tracing::trace!(target: "brisk::assign", ?site, kind = %value.kind(), value = %value.display());
    if let Some(hook) = TRACE_HOOK.with(Cell::get) {
        hook(site, value);
    }
}
