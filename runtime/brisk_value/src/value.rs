//! The value sum type held by every cell.

use std::borrow::Cow;
use std::fmt;

use brisk_ir::VarType;
use brisk_shared::{Atom, PayloadKind, SharedRef};

use crate::OwnedBuf;

/// The value carried by a cell.
///
/// Ownership is explicit per variant: a `Literal` borrows static text, an
/// `Owned` buffer belongs to the cell alone, and a `Shared` handle is one owner
/// of a reference-counted payload. Dropping a `Value` releases what it owns.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    /// Borrowed literal text (string constants of compiled macros).
    Literal(&'static str),
    /// Private growable buffer.
    Owned(OwnedBuf),
    /// Shared string or list payload.
    Shared(SharedRef),
}

/// The observable type of a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Int,
    Float,
    Str,
    List,
}

impl ValueKind {
    /// The declared variable type able to hold this kind, if any.
    pub const fn var_type(self) -> Option<VarType> {
        match self {
            ValueKind::Null => None,
            ValueKind::Int => Some(VarType::Int),
            ValueKind::Float => Some(VarType::Float),
            ValueKind::Str => Some(VarType::Str),
            ValueKind::List => Some(VarType::List),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Create an owned string value by copying `text`.
    pub fn string(text: impl AsRef<[u8]>) -> Self {
        Value::Owned(OwnedBuf::from_slice(text.as_ref()))
    }

    /// Create a shared list value taking ownership of `items`.
    pub fn list(items: Vec<Atom>) -> Self {
        Value::Shared(SharedRef::donate_list(items))
    }

    /// The default value of a freshly declared variable of type `ty`.
    pub fn default_for(ty: VarType) -> Self {
        match ty {
            VarType::Int => Value::Int(0),
            VarType::Float => Value::Float(0.0),
            VarType::Str => Value::Literal(""),
            VarType::List => Value::list(Vec::new()),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Literal(_) | Value::Owned(_) => ValueKind::Str,
            Value::Shared(handle) => match handle.kind() {
                PayloadKind::Str => ValueKind::Str,
                PayloadKind::List => ValueKind::List,
            },
        }
    }

    /// Integer view: floats truncate toward zero, non-numeric values read as 0.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to int truncation is the documented coercion"
    )]
    pub fn to_int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            Value::Float(f) => *f as i64,
            _ => 0,
        }
    }

    /// Float view: integers widen, non-numeric values read as 0.0.
    #[expect(
        clippy::cast_precision_loss,
        reason = "int to float widening is the documented coercion"
    )]
    pub fn to_float(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            _ => 0.0,
        }
    }

    /// String bytes for literal, owned and shared-string values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Literal(text) => Some(text.as_bytes()),
            Value::Owned(buf) => Some(buf.as_slice()),
            Value::Shared(handle) => handle.as_bytes(),
            Value::Null | Value::Int(_) | Value::Float(_) => None,
        }
    }

    /// List cells for shared-list values.
    pub fn as_list(&self) -> Option<&[Atom]> {
        match self {
            Value::Shared(handle) => handle.as_list(),
            _ => None,
        }
    }

    /// The shared handle, if this value holds one.
    pub fn shared(&self) -> Option<&SharedRef> {
        match self {
            Value::Shared(handle) => Some(handle),
            _ => None,
        }
    }

    /// Text rendering for messages and diagnostics.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed("NULL"),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Float(f) => Cow::Owned(f.to_string()),
            Value::Literal(text) => Cow::Borrowed(*text),
            Value::Owned(buf) => String::from_utf8_lossy(buf.as_slice()),
            Value::Shared(handle) => match handle.as_bytes() {
                Some(bytes) => String::from_utf8_lossy(bytes),
                None => Cow::Owned(format!("<list:{}>", handle.len())),
            },
        }
    }

    /// Convert to a list cell, sharing string payloads where possible.
    pub fn to_atom(&self) -> Atom {
        match self {
            Value::Null => Atom::Null,
            Value::Int(n) => Atom::Int(*n),
            Value::Float(f) => Atom::Float(*f),
            Value::Literal(text) => Atom::str(*text),
            Value::Owned(buf) => Atom::str(buf.as_slice()),
            Value::Shared(handle) => match handle.kind() {
                PayloadKind::Str => Atom::Str(handle.acquire()),
                PayloadKind::List => Atom::List(handle.acquire()),
            },
        }
    }

    /// Convert a list cell back into a value. Identifier cells read as Null.
    pub fn from_atom(atom: &Atom) -> Self {
        match atom {
            Atom::Null | Atom::Id(_) => Value::Null,
            Atom::Int(n) => Value::Int(*n),
            Atom::Float(f) => Value::Float(*f),
            Atom::Str(handle) | Atom::List(handle) => Value::Shared(handle.acquire()),
        }
    }
}
