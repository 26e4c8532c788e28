//! Payload contents: byte strings and lists of atoms.

use std::fmt;

use brisk_ir::Name;

use crate::SharedRef;

/// Discriminates the two payload shapes a handle can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Str,
    List,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Str => f.write_str("string"),
            PayloadKind::List => f.write_str("list"),
        }
    }
}

/// The storage behind a [`SharedRef`].
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Byte string. Macro strings are not required to be UTF-8.
    Str(Vec<u8>),
    /// List cells; nested strings and lists are themselves shared handles.
    List(Vec<Atom>),
}

impl Payload {
    #[inline]
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Str(_) => PayloadKind::Str,
            Payload::List(_) => PayloadKind::List,
        }
    }

    /// Logical length: bytes for a string, cells for a list.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Payload::Str(bytes) => bytes.len(),
            Payload::List(items) => items.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One cell of a list payload.
///
/// Lists also carry the compiled expression trees of macro functions, so an
/// atom can name an identifier directly.
#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    Null,
    Int(i64),
    Float(f64),
    Str(SharedRef),
    List(SharedRef),
    /// Identifier reference (variable or function name).
    Id(Name),
}

impl Atom {
    /// Build a string atom by copying `text`.
    pub fn str(text: impl AsRef<[u8]>) -> Self {
        Atom::Str(SharedRef::build_str(text.as_ref()))
    }

    /// Build a list atom taking ownership of `items`.
    pub fn list(items: Vec<Atom>) -> Self {
        Atom::List(SharedRef::donate_list(items))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Atom::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Atom::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Atom::Str(handle) => handle.as_bytes(),
            _ => None,
        }
    }
}
