//! The scope tables and the resolution order across them.
//!
//! # Resolution order
//!
//! [`Scopes::find`] stops at the first table containing the name:
//!
//! 1. the static table of the calling function
//! 2. the table of the current buffer
//! 3. the local tables of every active call level, innermost first
//! 4. the table of the current module
//! 5. the global table
//!
//! Step 3 is what makes scoping dynamic: a callee sees its callers' locals.

use std::borrow::Cow;

use brisk_ir::{BufferId, FunctionId, ModuleId, Name, SharedInterner, VarType};
use brisk_shared::{PayloadKind, SharedRef};
use brisk_value::{contract_violation, Value, ValueCell, ValueKind};
use rustc_hash::FxHashMap;

use crate::symbol::Storage;
use crate::{
    AssignError, DeclareError, Getter, RegisterFile, SymFlags, Symbol, SymbolArena, SymbolId,
    SymbolTable, DEFAULT_MAX_NESTING, DEFAULT_MAX_REGISTERS, MAX_SYMBOL_NAME,
};

/// Fixed bounds of a scope stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScopeLimits {
    /// Maximum number of simultaneously active call levels.
    pub max_nesting: usize,
    /// Maximum register index (exclusive) per call level.
    pub max_registers: usize,
}

impl Default for ScopeLimits {
    fn default() -> Self {
        ScopeLimits {
            max_nesting: DEFAULT_MAX_NESTING,
            max_registers: DEFAULT_MAX_REGISTERS,
        }
    }
}

/// Where a lookup happens: the running function, the current buffer and the
/// module the running code belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveSite {
    pub function: Option<FunctionId>,
    pub buffer: Option<BufferId>,
    pub module: Option<ModuleId>,
}

/// Selects one table for declarations and direct lookups.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableRef {
    Global,
    /// The innermost call level; the global table when no call is active.
    Local,
    Buffer(BufferId),
    Static(FunctionId),
    Module(ModuleId),
}

/// The kind of table a lookup was satisfied from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Static,
    Buffer,
    /// Call level, 1 being the outermost call.
    Local(usize),
    Module,
    Global,
}

/// Listing entry for symbol dumps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: &'static str,
    pub ty: VarType,
    pub flags: SymFlags,
}

struct Level {
    table: SymbolTable,
    registers: RegisterFile,
}

/// Every scope table of a runtime, plus the arena owning their symbols.
pub struct Scopes {
    interner: SharedInterner,
    limits: ScopeLimits,
    arena: SymbolArena,
    global: SymbolTable,
    levels: Vec<Level>,
    buffers: FxHashMap<BufferId, SymbolTable>,
    statics: FxHashMap<FunctionId, SymbolTable>,
    modules: FxHashMap<ModuleId, SymbolTable>,
}

/// Destroy every symbol of `table`, returning how many were live.
fn destroy_table(arena: &mut SymbolArena, table: &mut SymbolTable) -> usize {
    let mut destroyed = 0;
    for id in table.drain_ids() {
        if arena.remove(id).is_some() {
            destroyed += 1;
        }
    }
    destroyed
}

#[cold]
fn nesting_overflow(max: usize) -> ! {
    tracing::error!(max, "macro nesting limit exceeded");
    panic!("macro nesting limit of {max} levels exceeded")
}

fn kind_of(handle: &SharedRef) -> ValueKind {
    match handle.kind() {
        PayloadKind::Str => ValueKind::Str,
        PayloadKind::List => ValueKind::List,
    }
}

impl Scopes {
    pub fn new(interner: SharedInterner, limits: ScopeLimits) -> Self {
        Scopes {
            interner,
            limits,
            arena: SymbolArena::new(),
            global: SymbolTable::new(),
            levels: Vec::new(),
            buffers: FxHashMap::default(),
            statics: FxHashMap::default(),
            modules: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn limits(&self) -> ScopeLimits {
        self.limits
    }

    #[inline]
    pub fn arena(&self) -> &SymbolArena {
        &self.arena
    }

    /// Number of active call levels.
    #[inline]
    pub fn nesting_level(&self) -> usize {
        self.levels.len()
    }

    // Call levels

    /// Open the local table of a new call level.
    ///
    /// # Panics
    /// Exceeding `max_nesting` is fatal.
    pub fn push_level(&mut self) {
        if self.levels.len() >= self.limits.max_nesting {
            nesting_overflow(self.limits.max_nesting);
        }
        self.levels.push(Level {
            table: SymbolTable::new(),
            registers: RegisterFile::new(self.limits.max_registers),
        });
        tracing::trace!(level = self.levels.len(), "push call level");
    }

    /// Close the innermost call level, destroying its local symbols.
    pub fn pop_level(&mut self) {
        let Some(mut level) = self.levels.pop() else {
            contract_violation!("call level popped with no active call")
        };
        let destroyed = destroy_table(&mut self.arena, &mut level.table);
        tracing::trace!(level = self.levels.len() + 1, destroyed, "pop call level");
    }

    // Tables

    fn table(&self, table: TableRef) -> Option<&SymbolTable> {
        match table {
            TableRef::Global => Some(&self.global),
            TableRef::Local => Some(self.levels.last().map_or(&self.global, |level| &level.table)),
            TableRef::Buffer(buffer) => self.buffers.get(&buffer),
            TableRef::Static(function) => self.statics.get(&function),
            TableRef::Module(module) => self.modules.get(&module),
        }
    }

    /// The table, created on first use for buffer, static and module tables.
    fn table_mut(&mut self, table: TableRef) -> &mut SymbolTable {
        match table {
            TableRef::Global => &mut self.global,
            TableRef::Local => match self.levels.last_mut() {
                Some(level) => &mut level.table,
                None => &mut self.global,
            },
            TableRef::Buffer(buffer) => self.buffers.entry(buffer).or_default(),
            TableRef::Static(function) => self.statics.entry(function).or_default(),
            TableRef::Module(module) => self.modules.entry(module).or_default(),
        }
    }

    /// Whether `buffer` has any buffer-local table.
    pub fn has_buffer(&self, buffer: BufferId) -> bool {
        self.buffers.contains_key(&buffer)
    }

    /// Give `buffer` an empty local table. Returns false if it already had one.
    pub fn attach_buffer(&mut self, buffer: BufferId) -> bool {
        let fresh = !self.buffers.contains_key(&buffer);
        self.buffers.entry(buffer).or_default();
        if fresh {
            tracing::debug!(%buffer, "attach buffer table");
        }
        fresh
    }

    /// Give `module` an empty variable table. Returns false if it already had one.
    pub fn attach_module(&mut self, module: ModuleId) -> bool {
        let fresh = !self.modules.contains_key(&module);
        self.modules.entry(module).or_default();
        if fresh {
            tracing::debug!(module = self.interner.lookup(module.name()), "attach module table");
        }
        fresh
    }

    /// Destroy a buffer's local variables (the buffer is being deleted).
    pub fn detach_buffer(&mut self, buffer: BufferId) -> usize {
        let destroyed = match self.buffers.remove(&buffer) {
            Some(mut table) => destroy_table(&mut self.arena, &mut table),
            None => 0,
        };
        tracing::debug!(%buffer, destroyed, "detach buffer table");
        destroyed
    }

    /// Destroy a module's variables (the module is being unloaded).
    pub fn detach_module(&mut self, module: ModuleId) -> usize {
        let destroyed = match self.modules.remove(&module) {
            Some(mut table) => destroy_table(&mut self.arena, &mut table),
            None => 0,
        };
        tracing::debug!(module = self.interner.lookup(module.name()), destroyed, "detach module table");
        destroyed
    }

    /// Destroy a function's static variables (the function is being replaced).
    pub fn forget_statics(&mut self, function: FunctionId) -> usize {
        match self.statics.remove(&function) {
            Some(mut table) => destroy_table(&mut self.arena, &mut table),
            None => 0,
        }
    }

    // Declarations

    fn check_name(&self, name: Name) -> Result<(), DeclareError> {
        let text = self.interner.lookup(name);
        if text.len() > MAX_SYMBOL_NAME {
            return Err(DeclareError::NameTooLong {
                name: text.to_owned(),
                len: text.len(),
                max: MAX_SYMBOL_NAME,
            });
        }
        Ok(())
    }

    fn check_not_system(&self, existing: Option<SymbolId>) -> Result<(), DeclareError> {
        match existing {
            Some(id) if self.symbol(id).flags().contains(SymFlags::SYSTEM) => {
                Err(DeclareError::Reserved {
                    name: self.name_of(id).to_owned(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Put `symbol` into `table`, destroying any symbol it replaces.
    fn install(&mut self, table: TableRef, name: Name, symbol: Symbol) -> SymbolId {
        let id = self.arena.insert(symbol);
        if let Some(old) = self.table_mut(table).insert(name, id) {
            self.arena.remove(old);
        }
        id
    }

    /// Declare a variable holding the default value of `ty`.
    ///
    /// If `table` already has a symbol of that name and type it is returned
    /// unchanged (static storage survives repeated declarations); a symbol of
    /// another type is destroyed and replaced.
    pub fn declare(
        &mut self,
        table: TableRef,
        name: Name,
        ty: VarType,
        flags: SymFlags,
    ) -> Result<SymbolId, DeclareError> {
        self.check_name(name)?;
        let existing = self.find_in(table, name);
        self.check_not_system(existing)?;
        if let Some(id) = existing {
            let symbol = self.symbol(id);
            let same_type = symbol.ty() == ty
                || (flags.contains(SymFlags::POLY) && symbol.flags().contains(SymFlags::POLY));
            if same_type && !symbol.is_alias() && !symbol.flags().contains(SymFlags::COMPUTED) {
                return Ok(id);
            }
        }
        let id = self.install(table, name, Symbol::new(name, ty, flags));
        tracing::trace!(name = self.interner.lookup(name), ?table, %ty, "declare");
        Ok(id)
    }

    /// Declare `name` in `table` as an alias of `target`.
    ///
    /// Reads and writes through the alias reach the end of the alias chain.
    pub fn declare_alias(
        &mut self,
        table: TableRef,
        name: Name,
        target: SymbolId,
    ) -> Result<SymbolId, DeclareError> {
        self.check_name(name)?;
        let existing = self.find_in(table, name);
        self.check_not_system(existing)?;
        if let Some(old) = existing {
            if self.chain_contains(target, old) {
                contract_violation!(
                    "alias '{}' would replace its own target",
                    self.interner.lookup(name)
                );
            }
        }
        let ty = self.symbol(self.resolve(target)).ty();
        Ok(self.install(table, name, Symbol::alias(name, ty, target)))
    }

    /// Declare a read-only symbol whose value `getter` computes on each read.
    pub fn declare_computed(
        &mut self,
        table: TableRef,
        name: Name,
        ty: VarType,
        flags: SymFlags,
        getter: Getter,
    ) -> Result<SymbolId, DeclareError> {
        self.check_name(name)?;
        let existing = self.find_in(table, name);
        self.check_not_system(existing)?;
        Ok(self.install(table, name, Symbol::computed(name, ty, flags, getter)))
    }

    /// Remove `name` from `table`, destroying the symbol.
    ///
    /// Returns `Ok(false)` when the table has no such name.
    pub fn undeclare(&mut self, table: TableRef, name: Name) -> Result<bool, DeclareError> {
        let Some(id) = self.find_in(table, name) else {
            return Ok(false);
        };
        self.check_not_system(Some(id))?;
        self.table_mut(table).remove(name);
        self.arena.remove(id);
        Ok(true)
    }

    // Lookup

    /// Look `name` up in a single table.
    pub fn find_in(&self, table: TableRef, name: Name) -> Option<SymbolId> {
        self.table(table)?.get(name)
    }

    /// Resolve `name` from `site` in the fixed scope order.
    pub fn find(&self, name: Name, site: &ResolveSite) -> Option<SymbolId> {
        self.find_with_scope(name, site).map(|(id, _)| id)
    }

    /// Like [`find`](Self::find), also reporting which table matched.
    pub fn find_with_scope(&self, name: Name, site: &ResolveSite) -> Option<(SymbolId, ScopeKind)> {
        if let Some(function) = site.function {
            if let Some(id) = self.statics.get(&function).and_then(|t| t.get(name)) {
                return Some((id, ScopeKind::Static));
            }
        }
        if let Some(buffer) = site.buffer {
            if let Some(id) = self.buffers.get(&buffer).and_then(|t| t.get(name)) {
                return Some((id, ScopeKind::Buffer));
            }
        }
        for (depth, level) in self.levels.iter().enumerate().rev() {
            if let Some(id) = level.table.get(name) {
                return Some((id, ScopeKind::Local(depth + 1)));
            }
        }
        if let Some(module) = site.module {
            if let Some(id) = self.modules.get(&module).and_then(|t| t.get(name)) {
                return Some((id, ScopeKind::Module));
            }
        }
        self.global.get(name).map(|id| (id, ScopeKind::Global))
    }

    /// The symbol behind `id`.
    ///
    /// # Panics
    /// A destroyed symbol's id is a contract violation.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        match self.arena.get(id) {
            Some(symbol) => symbol,
            None => contract_violation!("stale symbol id {id:?}"),
        }
    }

    /// Name text of a symbol.
    pub fn name_of(&self, id: SymbolId) -> &'static str {
        self.interner.lookup(self.symbol(id).name())
    }

    /// Follow the alias chain from `id` to the symbol that holds the value.
    ///
    /// A chain longer than the number of live symbols must revisit a symbol,
    /// which is reported as a contract violation.
    pub fn resolve(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        for _ in 0..=self.arena.live() {
            match self.symbol(current).alias_target() {
                Some(next) => current = next,
                None => return current,
            }
        }
        contract_violation!("alias cycle through '{}'", self.name_of(id))
    }

    /// Whether the alias chain starting at `from` passes through `needle`.
    fn chain_contains(&self, from: SymbolId, needle: SymbolId) -> bool {
        let mut current = from;
        for _ in 0..=self.arena.live() {
            if current == needle {
                return true;
            }
            match self.symbol(current).alias_target() {
                Some(next) => current = next,
                None => return false,
            }
        }
        true
    }

    // Reading

    /// The value of a symbol, through aliases; computed symbols are evaluated.
    pub fn read(&self, id: SymbolId) -> Cow<'_, Value> {
        let target = self.resolve(id);
        match &self.symbol(target).storage {
            Storage::Cell(cell) => Cow::Borrowed(cell.value()),
            Storage::Computed(getter) => Cow::Owned(getter()),
            Storage::Alias(_) => contract_violation!("alias survived resolution"),
        }
    }

    /// Integer view of a symbol's value (numeric cross-coercion).
    pub fn get_int(&self, id: SymbolId) -> i64 {
        self.read(id).to_int()
    }

    /// Float view of a symbol's value (numeric cross-coercion).
    pub fn get_float(&self, id: SymbolId) -> f64 {
        self.read(id).to_float()
    }

    /// Declared (or, for polymorphic symbols, current) type at the end of the
    /// alias chain.
    pub fn type_of(&self, id: SymbolId) -> VarType {
        self.symbol(self.resolve(id)).ty()
    }

    // Writing

    fn writable(
        &mut self,
        id: SymbolId,
        kind: ValueKind,
        initializing: bool,
    ) -> Result<&mut ValueCell, AssignError> {
        let target = self.resolve(id);
        let Some(symbol) = self.arena.get_mut(target) else {
            contract_violation!("stale symbol id {target:?}")
        };
        let read_only = if initializing {
            symbol.flags().contains(SymFlags::COMPUTED)
        } else {
            symbol.is_read_only()
        };
        if read_only {
            return Err(AssignError::ReadOnly {
                name: self.interner.lookup(symbol.name()).to_owned(),
            });
        }
        if let Some(ty) = kind.var_type() {
            if ty != symbol.ty() {
                if symbol.flags().contains(SymFlags::POLY) {
                    symbol.set_ty(ty);
                } else {
                    contract_violation!(
                        "assigning {kind} to {} symbol '{}'",
                        symbol.ty(),
                        self.interner.lookup(symbol.name())
                    );
                }
            }
        }
        match &mut symbol.storage {
            Storage::Cell(cell) => Ok(cell),
            Storage::Alias(_) | Storage::Computed(_) => {
                contract_violation!("symbol {target:?} has no value cell")
            }
        }
    }

    /// Store `value` in the symbol at the end of the alias chain.
    ///
    /// # Panics
    /// A value of another type than a non-polymorphic symbol's declared type
    /// is a contract violation. Null is accepted by every symbol.
    pub fn assign(&mut self, id: SymbolId, value: Value) -> Result<(), AssignError> {
        self.writable(id, value.kind(), false)?.set(value);
        Ok(())
    }

    /// Set the initial value of a (possibly constant) symbol.
    pub fn initialize(&mut self, id: SymbolId, value: Value) -> Result<(), AssignError> {
        self.writable(id, value.kind(), true)?.set(value);
        Ok(())
    }

    pub fn assign_int(&mut self, id: SymbolId, n: i64) -> Result<(), AssignError> {
        self.writable(id, ValueKind::Int, false)?.assign_int(n);
        Ok(())
    }

    pub fn assign_float(&mut self, id: SymbolId, f: f64) -> Result<(), AssignError> {
        self.writable(id, ValueKind::Float, false)?.assign_float(f);
        Ok(())
    }

    /// Copy `src` into the symbol's private string buffer.
    pub fn assign_str(&mut self, id: SymbolId, src: &[u8]) -> Result<(), AssignError> {
        self.writable(id, ValueKind::Str, false)?.assign_str(src);
        Ok(())
    }

    pub fn assign_literal(&mut self, id: SymbolId, text: &'static str) -> Result<(), AssignError> {
        self.writable(id, ValueKind::Str, false)?.assign_literal(text);
        Ok(())
    }

    /// Store a shared handle; the symbol takes over the caller's owner.
    pub fn assign_shared(&mut self, id: SymbolId, handle: SharedRef) -> Result<(), AssignError> {
        self.writable(id, kind_of(&handle), false)?.assign_shared(handle);
        Ok(())
    }

    pub fn assign_null(&mut self, id: SymbolId) -> Result<(), AssignError> {
        self.writable(id, ValueKind::Null, false)?.assign_null();
        Ok(())
    }

    /// Writable string storage of a string symbol (copy-on-write).
    pub fn buffer_mut(&mut self, id: SymbolId) -> Result<&mut [u8], AssignError> {
        Ok(self.writable(id, ValueKind::Str, false)?.buffer_mut())
    }

    // Registers

    /// Bind register `index` of the innermost call level to `id`.
    pub fn associate_register(&mut self, index: usize, id: SymbolId) {
        match self.levels.last_mut() {
            Some(level) => level.registers.associate(index, id),
            None => contract_violation!("register {index} associated outside any call"),
        }
    }

    /// The symbol bound to register `index` of the innermost call level.
    pub fn register(&self, index: usize) -> SymbolId {
        match self.levels.last() {
            Some(level) => level.registers.get(index),
            None => contract_violation!("register {index} read outside any call"),
        }
    }

    /// Whether register `index` of the innermost call level is bound.
    pub fn has_register(&self, index: usize) -> bool {
        self.levels
            .last()
            .is_some_and(|level| level.registers.is_associated(index))
    }

    // Listing

    /// The symbols of one table, sorted by name.
    pub fn symbols_in(&self, table: TableRef) -> Vec<SymbolInfo> {
        let Some(table) = self.table(table) else {
            return Vec::new();
        };
        let mut infos: Vec<SymbolInfo> = table
            .iter()
            .map(|(name, id)| {
                let symbol = self.symbol(id);
                SymbolInfo {
                    name: self.interner.lookup(name),
                    ty: symbol.ty(),
                    flags: symbol.flags(),
                }
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(b.name));
        infos
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
