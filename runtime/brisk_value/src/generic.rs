//! Generic value containers: independently owned cells behind record fields
//! and properties.

use std::ops::{Deref, DerefMut};

use bitflags::bitflags;
use brisk_ir::Name;
use rustc_hash::FxHashMap;

use crate::{TraceSite, ValueCell};

bitflags! {
    /// Attributes stored with a generic container.
    ///
    /// The container only records them; the property layer that owns the
    /// container decides what they mean and enforces them.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Attributes: u32 {
        /// Writes should be refused by the owner.
        const READ_ONLY = 1 << 0;
        /// Excluded from listings.
        const HIDDEN = 1 << 1;
        /// Created by the editor rather than by macro code.
        const SYSTEM = 1 << 2;
    }
}

/// A value cell with an attribute mask.
///
/// Offers the same operations as the accumulator through `Deref`/`DerefMut`,
/// on its own independent storage.
#[derive(Debug)]
pub struct GenericValue {
    cell: ValueCell,
    attributes: Attributes,
}

impl GenericValue {
    /// A container holding Null with no attributes.
    pub fn new() -> Self {
        Self::with_attributes(Attributes::empty())
    }

    pub fn with_attributes(attributes: Attributes) -> Self {
        GenericValue {
            cell: ValueCell::new(TraceSite::Generic),
            attributes,
        }
    }

    #[inline]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    pub fn insert_attributes(&mut self, attributes: Attributes) {
        self.attributes.insert(attributes);
    }

    pub fn remove_attributes(&mut self, attributes: Attributes) {
        self.attributes.remove(attributes);
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.attributes.contains(Attributes::READ_ONLY)
    }
}

impl Default for GenericValue {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for GenericValue {
    type Target = ValueCell;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.cell
    }
}

impl DerefMut for GenericValue {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cell
    }
}

/// Name-keyed slots of generic containers (a record or property list).
///
/// A slot's container is created on the first write and destroyed, releasing
/// its value, when the slot is removed or the bag is dropped.
#[derive(Debug, Default)]
pub struct PropertyBag {
    slots: FxHashMap<Name, GenericValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        PropertyBag::default()
    }

    /// The container for `name`, creating an empty one on first use.
    pub fn write(&mut self, name: Name) -> &mut GenericValue {
        self.slots.entry(name).or_default()
    }

    pub fn get(&self, name: Name) -> Option<&GenericValue> {
        self.slots.get(&name)
    }

    pub fn get_mut(&mut self, name: Name) -> Option<&mut GenericValue> {
        self.slots.get_mut(&name)
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.slots.contains_key(&name)
    }

    /// Destroy the slot's container. Returns whether the slot existed.
    pub fn remove(&mut self, name: Name) -> bool {
        self.slots.remove(&name).is_some()
    }

    /// Slot names, excluding containers marked hidden.
    pub fn visible_names(&self) -> impl Iterator<Item = Name> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.attributes().contains(Attributes::HIDDEN))
            .map(|(name, _)| *name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
