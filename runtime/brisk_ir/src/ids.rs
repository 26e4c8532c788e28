//! Keys for the buffer, module and function scope tables.

use std::fmt;

use crate::Name;

/// Identity of an editor buffer. Allocated by the editor core.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BufferId(u32);

impl BufferId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        BufferId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Identity of a loaded macro module (one per source file).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ModuleId(Name);

impl ModuleId {
    #[inline]
    pub const fn new(name: Name) -> Self {
        ModuleId(name)
    }

    #[inline]
    pub const fn name(self) -> Name {
        self.0
    }
}

/// Synthesized identity of a macro function, keying its static table.
///
/// Two functions with the same name in different modules are distinct.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId {
    module: Option<ModuleId>,
    name: Name,
}

impl FunctionId {
    /// Identity of a function defined in `module` (or at top level when `None`).
    #[inline]
    pub const fn new(module: Option<ModuleId>, name: Name) -> Self {
        FunctionId { module, name }
    }

    #[inline]
    pub const fn module(self) -> Option<ModuleId> {
        self.module
    }

    #[inline]
    pub const fn name(self) -> Name {
        self.name
    }
}
