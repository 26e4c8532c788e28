//! A single symbol.

use std::fmt;

use brisk_ir::{Name, VarType};
use brisk_value::{TraceSite, Value, ValueCell};

use crate::{SymFlags, SymbolId};

/// Computes a computed symbol's value on each read.
pub type Getter = Box<dyn Fn() -> Value>;

pub(crate) enum Storage {
    Cell(ValueCell),
    /// Reads and writes go to the target. Owns nothing.
    Alias(SymbolId),
    Computed(Getter),
}

/// A named, typed storage location.
pub struct Symbol {
    name: Name,
    ty: VarType,
    flags: SymFlags,
    pub(crate) storage: Storage,
}

impl Symbol {
    /// A symbol holding the default value of `ty`.
    pub(crate) fn new(name: Name, ty: VarType, flags: SymFlags) -> Self {
        Symbol {
            name,
            ty,
            flags,
            storage: Storage::Cell(ValueCell::with_value(
                TraceSite::Symbol(name),
                Value::default_for(ty),
            )),
        }
    }

    pub(crate) fn alias(name: Name, ty: VarType, target: SymbolId) -> Self {
        Symbol {
            name,
            ty,
            flags: SymFlags::REFERENCE,
            storage: Storage::Alias(target),
        }
    }

    pub(crate) fn computed(name: Name, ty: VarType, flags: SymFlags, getter: Getter) -> Self {
        Symbol {
            name,
            ty,
            flags: flags | SymFlags::COMPUTED,
            storage: Storage::Computed(getter),
        }
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    /// Declared type. For polymorphic symbols, the type of the last write.
    #[inline]
    pub fn ty(&self) -> VarType {
        self.ty
    }

    #[inline]
    pub fn flags(&self) -> SymFlags {
        self.flags
    }

    #[inline]
    pub fn is_alias(&self) -> bool {
        matches!(self.storage, Storage::Alias(_))
    }

    /// The symbol this one aliases (one hop).
    pub fn alias_target(&self) -> Option<SymbolId> {
        match self.storage {
            Storage::Alias(target) => Some(target),
            _ => None,
        }
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.flags.intersects(SymFlags::CONSTANT | SymFlags::COMPUTED)
    }

    pub(crate) fn set_ty(&mut self, ty: VarType) {
        self.ty = ty;
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Symbol");
        s.field("name", &self.name)
            .field("ty", &self.ty)
            .field("flags", &self.flags);
        match &self.storage {
            Storage::Cell(cell) => s.field("value", cell.value()),
            Storage::Alias(target) => s.field("alias", target),
            Storage::Computed(_) => s.field("computed", &true),
        };
        s.finish()
    }
}
