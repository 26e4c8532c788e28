//! Callables consulted when a name is not a variable.
//!
//! A name that no scope table holds may still be a macro that has not been
//! loaded yet. Resolution asks the runtime's [`Callables`] about the name and,
//! for an autoload entry, loads it and searches again once. Loading runs the
//! module's initialisation, which may declare the variable being looked up.

use brisk_ir::Name;
use brisk_symtab::Scopes;
use rustc_hash::FxHashMap;

/// What the callable registry knows about a name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallableState {
    Missing,
    Loaded,
    /// Registered but its defining module is not loaded yet.
    Autoload,
}

/// The evaluator's view of macro definitions.
pub trait Callables {
    fn state(&self, name: Name) -> CallableState;

    /// Load the module defining `name`. Returns false if loading failed.
    fn load(&mut self, name: Name, scopes: &mut Scopes) -> bool;
}

/// Runs a module's initialisation against the scope tables.
pub type Loader = Box<dyn FnMut(&mut Scopes) -> bool>;

enum Entry {
    Loaded,
    Autoload(Loader),
}

/// Name-keyed callable registry with autoload entries.
#[derive(Default)]
pub struct CallableRegistry {
    entries: FxHashMap<Name, Entry>,
}

impl CallableRegistry {
    pub fn new() -> Self {
        CallableRegistry::default()
    }

    /// Record `name` as a loaded callable.
    pub fn define(&mut self, name: Name) {
        self.entries.insert(name, Entry::Loaded);
    }

    /// Record `name` as loadable on first use.
    pub fn autoload(&mut self, name: Name, loader: Loader) {
        self.entries.insert(name, Entry::Autoload(loader));
    }

    pub fn contains(&self, name: Name) -> bool {
        self.entries.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Callables for CallableRegistry {
    fn state(&self, name: Name) -> CallableState {
        match self.entries.get(&name) {
            None => CallableState::Missing,
            Some(Entry::Loaded) => CallableState::Loaded,
            Some(Entry::Autoload(_)) => CallableState::Autoload,
        }
    }

    /// A failed load forgets the entry so it is not attempted again.
    fn load(&mut self, name: Name, scopes: &mut Scopes) -> bool {
        match self.entries.remove(&name) {
            Some(Entry::Autoload(mut loader)) => {
                let loaded = loader(scopes);
                if loaded {
                    self.entries.insert(name, Entry::Loaded);
                }
                loaded
            }
            Some(Entry::Loaded) => {
                self.entries.insert(name, Entry::Loaded);
                true
            }
            None => false,
        }
    }
}
