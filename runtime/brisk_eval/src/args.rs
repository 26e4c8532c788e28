//! Positional arguments of a built-in call.
//!
//! The evaluator builds one [`ArgVec`] per call. Built-ins extract typed
//! values by position; the evaluator has already checked arity and types
//! against the built-in's declared parameters, so a wrong-typed required
//! argument is a contract violation rather than a user error.

use brisk_shared::{Atom, PayloadKind, SharedRef};
use brisk_symtab::SymbolId;
use brisk_value::{contract_violation, Value};
use smallvec::SmallVec;

/// A single evaluated argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// Omitted optional argument.
    Null,
    Int(i64),
    Float(f64),
    Str(SharedRef),
    List(SharedRef),
    /// Reference to a caller's variable (by-reference parameter).
    Symbol(SymbolId),
}

impl Arg {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Int(_) => "integer",
            Arg::Float(_) => "float",
            Arg::Str(_) => "string",
            Arg::List(_) => "list",
            Arg::Symbol(_) => "symbol",
        }
    }

    /// The argument as a value; a symbol reference has none.
    ///
    /// Shared payloads are acquired, not copied.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Arg::Null => Some(Value::Null),
            Arg::Int(n) => Some(Value::Int(*n)),
            Arg::Float(f) => Some(Value::Float(*f)),
            Arg::Str(handle) | Arg::List(handle) => Some(Value::Shared(handle.acquire())),
            Arg::Symbol(_) => None,
        }
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Arg::Float(f)
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Str(SharedRef::build_str(text.as_bytes()))
    }
}

impl From<SymbolId> for Arg {
    fn from(id: SymbolId) -> Self {
        Arg::Symbol(id)
    }
}

impl From<SharedRef> for Arg {
    fn from(handle: SharedRef) -> Self {
        match handle.kind() {
            PayloadKind::Str => Arg::Str(handle),
            PayloadKind::List => Arg::List(handle),
        }
    }
}

/// Positional argument vector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgVec {
    args: SmallVec<[Arg; 8]>,
}

impl ArgVec {
    pub fn new() -> Self {
        ArgVec::default()
    }

    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.args.push(arg.into());
    }

    /// Append `arg`, by value.
    #[must_use]
    pub fn with(mut self, arg: impl Into<Arg>) -> Self {
        self.push(arg);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    /// Whether the argument is absent or Null.
    pub fn is_null(&self, index: usize) -> bool {
        matches!(self.args.get(index), None | Some(Arg::Null))
    }

    fn required(&self, index: usize, expected: &str) -> &Arg {
        match self.args.get(index) {
            Some(Arg::Null) | None => {
                contract_violation!("missing {expected} argument {index}")
            }
            Some(arg) => arg,
        }
    }

    /// Integer argument; a float truncates.
    pub fn int(&self, index: usize) -> i64 {
        match self.opt_int(index) {
            Some(n) => n,
            None => contract_violation!("missing integer argument {index}"),
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to integer argument coercion truncates"
    )]
    pub fn opt_int(&self, index: usize) -> Option<i64> {
        match self.args.get(index)? {
            Arg::Null => None,
            Arg::Int(n) => Some(*n),
            Arg::Float(f) => Some(*f as i64),
            other => contract_violation!("argument {index}: expected integer, found {}", other.kind_name()),
        }
    }

    /// Float argument; an integer widens.
    pub fn float(&self, index: usize) -> f64 {
        match self.opt_float(index) {
            Some(f) => f,
            None => contract_violation!("missing float argument {index}"),
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "integer to float argument coercion"
    )]
    pub fn opt_float(&self, index: usize) -> Option<f64> {
        match self.args.get(index)? {
            Arg::Null => None,
            Arg::Int(n) => Some(*n as f64),
            Arg::Float(f) => Some(*f),
            other => contract_violation!("argument {index}: expected float, found {}", other.kind_name()),
        }
    }

    pub fn str(&self, index: usize) -> &[u8] {
        match self.opt_str(index) {
            Some(bytes) => bytes,
            None => contract_violation!("missing string argument {index}"),
        }
    }

    pub fn opt_str(&self, index: usize) -> Option<&[u8]> {
        match self.args.get(index)? {
            Arg::Null => None,
            Arg::Str(handle) => handle.as_bytes(),
            other => contract_violation!("argument {index}: expected string, found {}", other.kind_name()),
        }
    }

    pub fn list(&self, index: usize) -> &[Atom] {
        match self.required(index, "list") {
            Arg::List(handle) => handle.as_list().unwrap_or_default(),
            other => contract_violation!("argument {index}: expected list, found {}", other.kind_name()),
        }
    }

    /// By-reference argument.
    pub fn symbol(&self, index: usize) -> SymbolId {
        match self.required(index, "symbol") {
            Arg::Symbol(id) => *id,
            other => contract_violation!("argument {index}: expected symbol, found {}", other.kind_name()),
        }
    }
}

impl FromIterator<Arg> for ArgVec {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        ArgVec {
            args: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
