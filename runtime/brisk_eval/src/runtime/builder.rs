//! `RuntimeBuilder` for creating a [`Runtime`] with non-default settings.

use brisk_ir::{BufferId, ModuleId, SharedInterner};
use brisk_symtab::{ScopeLimits, Scopes};
use brisk_value::{set_trace_enabled, Accumulator};

use super::Runtime;
use crate::{tracing_handler, CallableRegistry, Callables, SharedMessageHandler};

/// Builder for [`Runtime`].
///
/// Defaults: a fresh interner, nesting limit 256, 64 registers per call,
/// messages forwarded to `tracing`, an empty [`CallableRegistry`], assignment
/// tracing left as it is.
pub struct RuntimeBuilder {
    interner: Option<SharedInterner>,
    limits: ScopeLimits,
    trace_assignments: Option<bool>,
    messages: Option<SharedMessageHandler>,
    callables: Option<Box<dyn Callables>>,
    buffer: Option<BufferId>,
    module: Option<ModuleId>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        RuntimeBuilder {
            interner: None,
            limits: ScopeLimits::default(),
            trace_assignments: None,
            messages: None,
            callables: None,
            buffer: None,
            module: None,
        }
    }

    /// Share an interner with the rest of the editor.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Maximum call nesting. Exceeding it is fatal.
    #[must_use]
    pub fn max_nesting(mut self, max: usize) -> Self {
        self.limits.max_nesting = max;
        self
    }

    #[must_use]
    pub fn max_registers(mut self, max: usize) -> Self {
        self.limits.max_registers = max;
        self
    }

    /// Turn the process-wide assignment trace on or off when building.
    #[must_use]
    pub fn trace_assignments(mut self, enabled: bool) -> Self {
        self.trace_assignments = Some(enabled);
        self
    }

    #[must_use]
    pub fn messages(mut self, handler: SharedMessageHandler) -> Self {
        self.messages = Some(handler);
        self
    }

    #[must_use]
    pub fn callables(mut self, callables: Box<dyn Callables>) -> Self {
        self.callables = Some(callables);
        self
    }

    /// Start with `buffer` current and its local table attached.
    #[must_use]
    pub fn buffer(mut self, buffer: BufferId) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// Start with `module` as the module of top-level code.
    #[must_use]
    pub fn module(mut self, module: ModuleId) -> Self {
        self.module = Some(module);
        self
    }

    pub fn build(self) -> Runtime {
        if let Some(enabled) = self.trace_assignments {
            set_trace_enabled(enabled);
        }
        let mut scopes = Scopes::new(self.interner.unwrap_or_default(), self.limits);
        if let Some(buffer) = self.buffer {
            scopes.attach_buffer(buffer);
        }
        if let Some(module) = self.module {
            scopes.attach_module(module);
        }
        Runtime {
            acc: Accumulator::new(),
            scopes,
            frames: Vec::new(),
            buffer: self.buffer,
            module: self.module,
            returning: false,
            messages: self.messages.unwrap_or_else(tracing_handler),
            callables: self
                .callables
                .unwrap_or_else(|| Box::new(CallableRegistry::new())),
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
