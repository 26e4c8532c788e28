//! The accumulator: the "last computed value" register.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{TraceSite, Value, ValueCell};

/// The runtime's result register.
///
/// Every built-in leaves its result here; the evaluator reads it back as the
/// value of the call. There is one per runtime, owned by the runtime context
/// and passed by reference rather than reached through global state.
///
/// All cell operations are available through `Deref`/`DerefMut`.
pub struct Accumulator(ValueCell);

impl Accumulator {
    /// A fresh accumulator holding integer zero.
    pub fn new() -> Self {
        Accumulator(ValueCell::with_value(TraceSite::Accumulator, Value::Int(0)))
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Accumulator {
    type Target = ValueCell;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Accumulator {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Accumulator").field(self.0.value()).finish()
    }
}
