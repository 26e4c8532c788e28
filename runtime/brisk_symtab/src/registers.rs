//! Integer-indexed registers of a call level.
//!
//! The evaluator passes arguments and return channels by associating register
//! numbers with symbols. Storage grows in blocks of [`REGISTER_BLOCK`],
//! doubling as higher registers are associated, up to the configured bound.

use brisk_value::contract_violation;

use crate::SymbolId;

/// Register storage grows in multiples of this many entries.
pub const REGISTER_BLOCK: usize = 8;

#[derive(Clone, Debug)]
pub struct RegisterFile {
    slots: Vec<Option<SymbolId>>,
    max: usize,
}

impl RegisterFile {
    /// An empty register file accepting indices below `max`.
    pub fn new(max: usize) -> Self {
        RegisterFile {
            slots: Vec::new(),
            max,
        }
    }

    fn grow_to_fit(&mut self, index: usize) {
        let blocks = (index + 1).div_ceil(REGISTER_BLOCK) * REGISTER_BLOCK;
        let doubled = self.slots.len() * 2;
        let len = blocks.max(doubled).min(self.max.max(index + 1));
        self.slots.resize(len, None);
    }

    /// Bind register `index` to `id`, replacing any earlier binding.
    pub fn associate(&mut self, index: usize, id: SymbolId) {
        if index >= self.max {
            contract_violation!("register {index} out of range (max {})", self.max);
        }
        if index >= self.slots.len() {
            self.grow_to_fit(index);
        }
        self.slots[index] = Some(id);
    }

    /// The symbol bound to register `index`.
    pub fn get(&self, index: usize) -> SymbolId {
        match self.slots.get(index).copied().flatten() {
            Some(id) => id,
            None => contract_violation!("register {index} read before association"),
        }
    }

    pub fn is_associated(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Number of allocated register entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
