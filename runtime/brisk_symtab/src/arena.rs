//! Generational storage for symbols.

use std::fmt;

use brisk_value::contract_violation;

use crate::Symbol;

/// Handle to a symbol in a [`SymbolArena`].
///
/// Carries the generation of the slot at insertion time. Once the symbol is
/// removed the slot's generation moves on and the id no longer resolves.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SymbolId {
    index: u32,
    generation: u32,
}

impl SymbolId {
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({}v{})", self.index, self.generation)
    }
}

struct Slot {
    generation: u32,
    symbol: Option<Symbol>,
}

/// Owner of every symbol of a runtime.
#[derive(Default)]
pub struct SymbolArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena::default()
    }

    pub(crate) fn insert(&mut self, symbol: Symbol) -> SymbolId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.symbol = Some(symbol);
            return SymbolId {
                index,
                generation: slot.generation,
            };
        }
        let Ok(index) = u32::try_from(self.slots.len()) else {
            contract_violation!("symbol arena exhausted ({} slots)", self.slots.len())
        };
        self.slots.push(Slot {
            generation: 0,
            symbol: Some(symbol),
        });
        SymbolId {
            index,
            generation: 0,
        }
    }

    /// Destroy a symbol, releasing its value. Stale ids return `None`.
    pub(crate) fn remove(&mut self, id: SymbolId) -> Option<Symbol> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let symbol = slot.symbol.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(symbol)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.symbol.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.symbol.as_mut()
    }

    #[inline]
    pub fn contains(&self, id: SymbolId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live symbols.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests;
