//! The shared handle type.

// Rc is the intentional implementation detail of SharedRef
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of SharedRef"
)]

use std::fmt;
use std::rc::Rc;

use crate::stats::{record_acquire, record_build, record_release};
use crate::{Atom, Payload, PayloadKind};

/// Reference-counted handle to a string or list payload.
///
/// `Clone` is the substrate's *acquire* and `Drop` is its *release*. Handles
/// can only be created through the `build_*` (copying) and `donate_*`
/// (ownership-taking) constructors.
pub struct SharedRef(Rc<Payload>);

impl SharedRef {
    fn from_payload(payload: Payload) -> Self {
        record_build();
        SharedRef(Rc::new(payload))
    }

    /// Build a string handle by copying `bytes`.
    pub fn build_str(bytes: &[u8]) -> Self {
        Self::from_payload(Payload::Str(bytes.to_vec()))
    }

    /// Build a list handle by copying `items`; nested handles are acquired.
    pub fn build_list(items: &[Atom]) -> Self {
        Self::from_payload(Payload::List(items.to_vec()))
    }

    /// Wrap an already-allocated byte buffer without copying it.
    pub fn donate_str(bytes: Vec<u8>) -> Self {
        Self::from_payload(Payload::Str(bytes))
    }

    /// Wrap an already-built list without copying it.
    pub fn donate_list(items: Vec<Atom>) -> Self {
        Self::from_payload(Payload::List(items))
    }

    /// Take an additional owner of the same payload.
    #[inline]
    #[must_use]
    pub fn acquire(&self) -> Self {
        self.clone()
    }

    /// Give up this owner. The payload is freed when the last owner releases.
    #[inline]
    pub fn release(self) {
        drop(self);
    }

    #[inline]
    pub fn kind(&self) -> PayloadKind {
        self.0.kind()
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.0
    }

    /// The string bytes, or `None` for a list payload.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &*self.0 {
            Payload::Str(bytes) => Some(bytes),
            Payload::List(_) => None,
        }
    }

    /// The list cells, or `None` for a string payload.
    pub fn as_list(&self) -> Option<&[Atom]> {
        match &*self.0 {
            Payload::List(items) => Some(items),
            Payload::Str(_) => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of live owners of the payload.
    #[inline]
    pub fn owners(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// True when this handle is the only owner, so in-place mutation is allowed.
    #[inline]
    pub fn is_exclusive(&self) -> bool {
        self.owners() == 1
    }

    /// Mutable access to the payload, only when this is the sole owner.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut Payload> {
        Rc::get_mut(&mut self.0)
    }

    /// Mutable string bytes, only when this is the sole owner of a string.
    pub fn bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
        match self.get_mut()? {
            Payload::Str(bytes) => Some(bytes),
            Payload::List(_) => None,
        }
    }

    /// Mutable list cells, only when this is the sole owner of a list.
    pub fn list_mut(&mut self) -> Option<&mut Vec<Atom>> {
        match self.get_mut()? {
            Payload::List(items) => Some(items),
            Payload::Str(_) => None,
        }
    }

    /// Mutable payload, copying it first if other owners exist.
    ///
    /// After the copy this handle owns a private payload and the other owners
    /// keep the original.
    pub fn make_exclusive(&mut self) -> &mut Payload {
        if !self.is_exclusive() {
            // make_mut drops our owner of the shared payload and builds a copy.
            record_release();
            record_build();
        }
        Rc::make_mut(&mut self.0)
    }

    /// Construct a new, independent handle holding a copy of the payload.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self::from_payload((*self.0).clone())
    }

    /// True when both handles refer to the same payload storage.
    #[inline]
    pub fn ptr_eq(a: &SharedRef, b: &SharedRef) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl Clone for SharedRef {
    #[inline]
    fn clone(&self) -> Self {
        record_acquire();
        SharedRef(Rc::clone(&self.0))
    }
}

impl Drop for SharedRef {
    #[inline]
    fn drop(&mut self) {
        record_release();
    }
}

/// Content equality.
impl PartialEq for SharedRef {
    fn eq(&self, other: &Self) -> bool {
        SharedRef::ptr_eq(self, other) || *self.0 == *other.0
    }
}

impl fmt::Debug for SharedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Payload::Str(bytes) => f
                .debug_struct("SharedRef")
                .field("str", &String::from_utf8_lossy(bytes))
                .field("owners", &self.owners())
                .finish(),
            Payload::List(items) => f
                .debug_struct("SharedRef")
                .field("list", items)
                .field("owners", &self.owners())
                .finish(),
        }
    }
}
