//! The value cell: release-then-set assignment, coercing reads and
//! copy-on-write mutable access.

use std::borrow::Cow;
use std::fmt;

use brisk_shared::{Atom, PayloadKind, SharedRef};

use crate::trace::{after_assign, TraceSite};
use crate::{contract_violation, OwnedBuf, Value, ValueKind};

/// A tagged value cell.
///
/// Exactly one variant of [`Value`] is live. Every `assign_*` replaces it, and
/// the replaced value (owned buffer or shared handle) is released before the
/// assignment returns. The one exception is an owned buffer assigned another
/// string: the buffer is rewritten in place and keeps its capacity.
pub struct ValueCell {
    value: Value,
    site: TraceSite,
}

impl ValueCell {
    /// A cell holding Null.
    pub fn new(site: TraceSite) -> Self {
        ValueCell {
            value: Value::Null,
            site,
        }
    }

    /// A cell holding `value`.
    pub fn with_value(site: TraceSite, value: Value) -> Self {
        ValueCell { value, site }
    }

    #[inline]
    fn traced(&self) {
        after_assign(self.site, &self.value);
    }

    // Assignment

    pub fn assign_int(&mut self, n: i64) {
        self.value = Value::Int(n);
        self.traced();
    }

    pub fn assign_float(&mut self, f: f64) {
        self.value = Value::Float(f);
        self.traced();
    }

    /// Borrow static text without copying it.
    pub fn assign_literal(&mut self, text: &'static str) {
        self.value = Value::Literal(text);
        self.traced();
    }

    /// Copy `src` into the cell's private buffer.
    pub fn assign_str(&mut self, src: &[u8]) {
        if let Value::Owned(buf) = &mut self.value {
            buf.assign(src);
        } else {
            self.value = Value::Owned(OwnedBuf::from_slice(src));
        }
        self.traced();
    }

    /// Copy the first `len` bytes of `src` into the cell's private buffer.
    pub fn assign_nstr(&mut self, src: &[u8], len: usize) {
        if len > src.len() {
            contract_violation!("string length {len} exceeds source of {} bytes", src.len());
        }
        self.assign_str(&src[..len]);
    }

    /// Store the concatenation of `a` and `b` in the cell's private buffer.
    pub fn assign_concat(&mut self, a: &[u8], b: &[u8]) {
        if let Value::Owned(buf) = &mut self.value {
            buf.assign_concat(a, b);
        } else {
            let mut buf = OwnedBuf::new();
            buf.assign_concat(a, b);
            self.value = Value::Owned(buf);
        }
        self.traced();
    }

    /// Append `src` to the cell's string, promoting it to a private buffer.
    pub fn append_str(&mut self, src: &[u8]) {
        if let Value::Owned(buf) = &mut self.value {
            buf.append(src);
        } else {
            let current = self.require_str();
            let mut buf = OwnedBuf::new();
            buf.assign_concat(current, src);
            self.value = Value::Owned(buf);
        }
        self.traced();
    }

    /// Store a shared handle. The cell becomes one of its owners; the caller
    /// hands over the owner it acquired.
    pub fn assign_shared(&mut self, handle: SharedRef) {
        self.value = Value::Shared(handle);
        self.traced();
    }

    pub fn assign_null(&mut self) {
        self.value = Value::Null;
        self.traced();
    }

    /// Release whatever the cell holds and reset it to integer zero.
    pub fn clear(&mut self) {
        self.value = Value::Int(0);
        self.traced();
    }

    /// General assignment of an already-built value.
    pub fn set(&mut self, value: Value) {
        self.value = value;
        self.traced();
    }

    /// Move the value out, leaving Null behind.
    pub fn take(&mut self) -> Value {
        std::mem::take(&mut self.value)
    }

    // Reads

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    /// Integer view with numeric cross-coercion (floats truncate).
    #[inline]
    pub fn get_int(&self) -> i64 {
        self.value.to_int()
    }

    /// Float view with numeric cross-coercion (ints widen).
    #[inline]
    pub fn get_float(&self) -> f64 {
        self.value.to_float()
    }

    /// String bytes, or `None` when the cell does not hold a string.
    #[inline]
    pub fn get_str(&self) -> Option<&[u8]> {
        self.value.as_bytes()
    }

    /// List cells, or `None` when the cell does not hold a list.
    #[inline]
    pub fn get_list(&self) -> Option<&[Atom]> {
        self.value.as_list()
    }

    #[inline]
    pub fn shared(&self) -> Option<&SharedRef> {
        self.value.shared()
    }

    /// Lossy text rendering.
    pub fn text(&self) -> Cow<'_, str> {
        self.value.display()
    }

    /// The integer a built-in knows is there.
    pub fn require_int(&self) -> i64 {
        match self.value {
            Value::Int(n) => n,
            _ => contract_violation!("expected integer in {:?}, found {}", self.site, self.kind()),
        }
    }

    /// The string a built-in knows is there.
    pub fn require_str(&self) -> &[u8] {
        match self.value.as_bytes() {
            Some(bytes) => bytes,
            None => contract_violation!("expected string in {:?}, found {}", self.site, self.kind()),
        }
    }

    /// The list a built-in knows is there.
    pub fn require_list(&self) -> &[Atom] {
        match self.value.as_list() {
            Some(items) => items,
            None => contract_violation!("expected list in {:?}, found {}", self.site, self.kind()),
        }
    }

    // Mutable access

    /// Writable string storage owned by this cell alone.
    ///
    /// - literal: promoted to a private copy first
    /// - owned buffer: returned directly
    /// - shared handle with one owner: returned directly, no copy
    /// - shared handle with several owners: copied into a private buffer,
    ///   and this cell's owner of the shared payload is released
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        let private = match &self.value {
            Value::Literal(text) => Some(OwnedBuf::from_slice(text.as_bytes())),
            Value::Owned(_) => None,
            Value::Shared(handle) => match handle.kind() {
                PayloadKind::Str if handle.is_exclusive() => None,
                PayloadKind::Str => Some(OwnedBuf::from_slice(handle.as_bytes().unwrap_or_default())),
                PayloadKind::List => {
                    contract_violation!("mutable buffer requested on a list in {:?}", self.site)
                }
            },
            Value::Null | Value::Int(_) | Value::Float(_) => {
                contract_violation!("mutable buffer requested on {} in {:?}", self.kind(), self.site)
            }
        };
        if let Some(buf) = private {
            self.value = Value::Owned(buf);
        }

        let site = self.site;
        match &mut self.value {
            Value::Owned(buf) => buf.as_mut_slice(),
            Value::Shared(handle) => match handle.bytes_mut() {
                Some(bytes) => bytes.as_mut_slice(),
                None => contract_violation!("shared string lost exclusivity in {site:?}"),
            },
            other => contract_violation!("mutable buffer unavailable for {} in {site:?}", other.kind()),
        }
    }
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("site", &self.site)
            .field("value", &self.value)
            .finish()
    }
}
