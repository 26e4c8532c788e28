//! The runtime context shared by the evaluator and every built-in.
//!
//! # Architecture
//!
//! A [`Runtime`] owns the Accumulator, the scope tables, one frame per active
//! macro call and the early-return flag. The evaluator (out of this crate)
//! drives it:
//!
//! 1. `enter_call` (or [`Runtime::call`] for a guard) opens a call level
//! 2. arguments are bound to registers, built-ins read and write symbols
//!    through [`Runtime::lookup`] and leave their result in the Accumulator
//! 3. after every statement the evaluator checks [`Runtime::is_returning`]
//! 4. `leave_call` closes the level, clears the early-return flag and moves
//!    the call's pending implicit return value into the Accumulator
//!
//! # Resolution failures
//!
//! [`Runtime::lookup`] reports an undefined name as a [`ResolveError`].
//! [`Runtime::lookup_or_signal`] is the entry point built-ins use: it shows
//! "Undefined symbol" through the message handler and raises the early-return
//! flag so the running macro unwinds to its caller.

mod builder;
mod call_guard;

use brisk_ir::{BufferId, FunctionId, ModuleId, Name, SharedInterner};
use brisk_symtab::{ResolveSite, Scopes, SymbolId};
use brisk_value::{contract_violation, Accumulator, Value};

use crate::{Arg, CallableState, Callables, ResolveError, SharedMessageHandler};

pub use builder::RuntimeBuilder;
pub use call_guard::CallGuard;

struct Frame {
    function: FunctionId,
    /// Set by `returns`; becomes the call's result when the call exits.
    pending_return: Option<Value>,
}

pub struct Runtime {
    acc: Accumulator,
    scopes: Scopes,
    frames: Vec<Frame>,
    buffer: Option<BufferId>,
    module: Option<ModuleId>,
    returning: bool,
    messages: SharedMessageHandler,
    callables: Box<dyn Callables>,
}

impl Runtime {
    /// A runtime with default limits, tracing messages and an empty registry.
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        self.scopes.interner()
    }

    #[inline]
    pub fn acc(&self) -> &Accumulator {
        &self.acc
    }

    #[inline]
    pub fn acc_mut(&mut self) -> &mut Accumulator {
        &mut self.acc
    }

    #[inline]
    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    #[inline]
    pub fn scopes_mut(&mut self) -> &mut Scopes {
        &mut self.scopes
    }

    #[inline]
    pub fn messages(&self) -> &SharedMessageHandler {
        &self.messages
    }

    pub fn callables_mut(&mut self) -> &mut dyn Callables {
        self.callables.as_mut()
    }

    // Context

    #[inline]
    pub fn buffer(&self) -> Option<BufferId> {
        self.buffer
    }

    /// Make `buffer` current. Its local table is created on first use.
    pub fn set_buffer(&mut self, buffer: Option<BufferId>) {
        self.buffer = buffer;
    }

    /// Module of top-level code, used when no call is active.
    #[inline]
    pub fn module(&self) -> Option<ModuleId> {
        self.module
    }

    pub fn set_module(&mut self, module: Option<ModuleId>) {
        self.module = module;
    }

    pub fn current_function(&self) -> Option<FunctionId> {
        self.frames.last().map(|frame| frame.function)
    }

    /// Where a lookup made now resolves from: the running function's statics
    /// and module, and the current buffer.
    pub fn site(&self) -> ResolveSite {
        let function = self.current_function();
        ResolveSite {
            function,
            buffer: self.buffer,
            module: function.and_then(FunctionId::module).or(self.module),
        }
    }

    #[inline]
    pub fn nesting_level(&self) -> usize {
        self.frames.len()
    }

    // Calls

    /// Open a call level for `function`.
    ///
    /// Entering the outermost call starts a fresh macro run, so an early
    /// return left over from top-level code is dropped.
    ///
    /// # Panics
    /// Exceeding the nesting limit is fatal.
    pub fn enter_call(&mut self, function: FunctionId) {
        if self.frames.is_empty() {
            self.returning = false;
        }
        self.scopes.push_level();
        self.frames.push(Frame {
            function,
            pending_return: None,
        });
        tracing::debug!(
            function = self.interner().lookup(function.name()),
            level = self.frames.len(),
            "enter call"
        );
    }

    /// Close the innermost call level.
    ///
    /// Clears the early-return flag; a pending value set by `returns` becomes
    /// the Accumulator.
    pub fn leave_call(&mut self) {
        let Some(frame) = self.frames.pop() else {
            contract_violation!("leave_call with no active call")
        };
        self.scopes.pop_level();
        self.returning = false;
        if let Some(value) = frame.pending_return {
            self.acc.set(value);
        }
        tracing::debug!(
            function = self.interner().lookup(frame.function.name()),
            level = self.frames.len() + 1,
            "leave call"
        );
    }

    // Returns

    /// Whether the running macro must stop and return to its caller.
    #[inline]
    pub fn is_returning(&self) -> bool {
        self.returning
    }

    /// Raise the early-return flag.
    pub fn signal_return(&mut self) {
        self.returning = true;
    }

    /// Drop an early return raised outside any call, once the evaluator has
    /// finished the top-level form.
    pub fn clear_return(&mut self) {
        self.returning = false;
    }

    /// Set the value the current call returns, without returning.
    ///
    /// With no active call the value goes straight to the Accumulator.
    pub fn set_pending_return(&mut self, value: Value) {
        match self.frames.last_mut() {
            Some(frame) => frame.pending_return = Some(value),
            None => self.acc.set(value),
        }
    }

    /// Return from the current call now, optionally with `value`.
    ///
    /// An explicit value overrides any pending one.
    pub fn return_now(&mut self, value: Option<Value>) {
        if let Some(value) = value {
            if let Some(frame) = self.frames.last_mut() {
                frame.pending_return = None;
            }
            self.acc.set(value);
        }
        self.returning = true;
    }

    // Resolution

    /// Resolve `name` from the current site.
    ///
    /// A name no table holds is tried as a callable; an autoload callable is
    /// loaded and the search repeated once.
    pub fn lookup(&mut self, name: Name) -> Result<SymbolId, ResolveError> {
        if let Some(id) = self.scopes.find(name, &self.site()) {
            return Ok(id);
        }
        if self.callables.state(name) == CallableState::Autoload {
            tracing::debug!(name = self.interner().lookup(name), "autoload");
            if self.callables.load(name, &mut self.scopes) {
                if let Some(id) = self.scopes.find(name, &self.site()) {
                    return Ok(id);
                }
            }
        }
        tracing::trace!(name = self.interner().lookup(name), "unresolved");
        Err(ResolveError::Undefined {
            name: self.interner().lookup(name).to_owned(),
        })
    }

    /// Resolve `name`, or tell the user it is undefined and start an early
    /// return.
    pub fn lookup_or_signal(&mut self, name: Name) -> Option<SymbolId> {
        match self.lookup(name) {
            Ok(id) => Some(id),
            Err(err) => {
                self.report_unresolved(&err);
                None
            }
        }
    }

    /// Tell the user `name` is undefined and start an early return, for a
    /// name that was never interned and so cannot resolve.
    pub fn signal_undefined(&mut self, name: &str) {
        let err = ResolveError::Undefined {
            name: name.to_owned(),
        };
        self.report_unresolved(&err);
    }

    fn report_unresolved(&mut self, err: &ResolveError) {
        self.messages.error(&err.to_string());
        self.returning = true;
    }

    /// The value an argument stands for; a by-reference argument reads the
    /// referenced symbol.
    pub fn value_of(&self, arg: Option<&Arg>) -> Value {
        match arg {
            None => Value::Null,
            Some(Arg::Symbol(id)) => self.scopes.read(*id).into_owned(),
            Some(arg) => arg.to_value().unwrap_or_default(),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
