//! RAII guard for call levels.
//!
//! The guard holds `&mut Runtime` and implements `Deref`/`DerefMut`, so the
//! body of a call uses the runtime through it. Dropping the guard leaves the
//! call, also during unwinding, so a panicking built-in cannot leave a stale
//! local table on the stack.

use std::ops::{Deref, DerefMut};

use brisk_ir::FunctionId;

use super::Runtime;

/// An active call level; leaves the call when dropped.
pub struct CallGuard<'rt> {
    runtime: &'rt mut Runtime,
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.runtime.leave_call();
    }
}

impl Deref for CallGuard<'_> {
    type Target = Runtime;

    fn deref(&self) -> &Self::Target {
        self.runtime
    }
}

impl DerefMut for CallGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.runtime
    }
}

impl Runtime {
    /// Enter a call of `function`, returning a guard that leaves it.
    ///
    /// ```text
    /// {
    ///     let mut call = runtime.call(function);
    ///     call.scopes_mut().declare(TableRef::Local, name, VarType::Int, SymFlags::empty())?;
    ///     run_body(&mut call);
    /// } // call left here, even on panic
    /// ```
    pub fn call(&mut self, function: FunctionId) -> CallGuard<'_> {
        self.enter_call(function);
        CallGuard { runtime: self }
    }

    /// Run `f` inside a call of `function`.
    pub fn with_call<T, F>(&mut self, function: FunctionId, f: F) -> T
    where
        F: FnOnce(&mut CallGuard<'_>) -> T,
    {
        let mut call = self.call(function);
        f(&mut call)
    }
}
