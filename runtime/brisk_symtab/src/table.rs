//! Name-keyed collections of symbols.

use brisk_ir::Name;
use rustc_hash::FxHashMap;

use crate::SymbolId;

/// One scope table: global, a call level's locals, a buffer's locals, a
/// function's statics or a module's variables.
///
/// The table maps names to ids; the symbols themselves live in the arena and
/// are destroyed by [`Scopes`](crate::Scopes) when the table goes away.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<Name, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<SymbolId> {
        self.entries.get(&name).copied()
    }

    /// Bind `name`, returning the id it previously had in this table.
    pub(crate) fn insert(&mut self, name: Name, id: SymbolId) -> Option<SymbolId> {
        self.entries.insert(name, id)
    }

    pub(crate) fn remove(&mut self, name: Name) -> Option<SymbolId> {
        self.entries.remove(&name)
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.entries.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, SymbolId)> + '_ {
        self.entries.iter().map(|(&name, &id)| (name, id))
    }

    /// Take every id out of the table, leaving it empty.
    pub(crate) fn drain_ids(&mut self) -> impl Iterator<Item = SymbolId> + '_ {
        self.entries.drain().map(|(_, id)| id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
