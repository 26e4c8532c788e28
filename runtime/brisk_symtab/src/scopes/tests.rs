use super::*;
use brisk_shared::RefStats;
use pretty_assertions::assert_eq;

fn scopes() -> Scopes {
    Scopes::new(SharedInterner::new(), ScopeLimits::default())
}

fn int(scopes: &mut Scopes, table: TableRef, name: &str) -> SymbolId {
    let name = scopes.interner().intern(name);
    scopes
        .declare(table, name, VarType::Int, SymFlags::empty())
        .unwrap_or_else(|e| panic!("{e}"))
}

// Dynamic scoping

#[test]
fn test_callee_sees_caller_local_until_pop() {
    let mut s = scopes();
    let x = s.interner().intern("x");
    let site = ResolveSite::default();

    s.push_level();
    let outer = int(&mut s, TableRef::Local, "x");
    s.assign_int(outer, 5).unwrap();

    s.push_level();
    let seen = s.find_with_scope(x, &site);
    assert_eq!(seen, Some((outer, ScopeKind::Local(1))));
    s.assign_int(outer, 6).unwrap();
    s.pop_level();

    assert_eq!(s.get_int(outer), 6);
    s.pop_level();
    assert_eq!(s.find(x, &site), None);
    assert!(!s.arena().contains(outer));
}

#[test]
fn test_inner_local_shadows_outer() {
    let mut s = scopes();
    let x = s.interner().intern("x");
    let site = ResolveSite::default();
    let global = int(&mut s, TableRef::Global, "x");
    s.push_level();
    let first = int(&mut s, TableRef::Local, "x");
    s.push_level();
    let second = int(&mut s, TableRef::Local, "x");

    assert_eq!(s.find_with_scope(x, &site), Some((second, ScopeKind::Local(2))));
    s.pop_level();
    assert_eq!(s.find_with_scope(x, &site), Some((first, ScopeKind::Local(1))));
    s.pop_level();
    assert_eq!(s.find_with_scope(x, &site), Some((global, ScopeKind::Global)));
}

#[test]
fn test_resolution_order_across_all_tables() {
    let mut s = scopes();
    let interner = s.interner().clone();
    let x = interner.intern("x");
    let buffer = BufferId::new(3);
    let module = ModuleId::new(interner.intern("mod.cr"));
    let function = FunctionId::new(Some(module), interner.intern("f"));
    let site = ResolveSite {
        function: Some(function),
        buffer: Some(buffer),
        module: Some(module),
    };

    let global = int(&mut s, TableRef::Global, "x");
    assert_eq!(s.find_with_scope(x, &site), Some((global, ScopeKind::Global)));

    let in_module = int(&mut s, TableRef::Module(module), "x");
    assert_eq!(s.find_with_scope(x, &site), Some((in_module, ScopeKind::Module)));

    s.push_level();
    let local = int(&mut s, TableRef::Local, "x");
    assert_eq!(s.find_with_scope(x, &site), Some((local, ScopeKind::Local(1))));

    let in_buffer = int(&mut s, TableRef::Buffer(buffer), "x");
    assert_eq!(s.find_with_scope(x, &site), Some((in_buffer, ScopeKind::Buffer)));

    let stat = int(&mut s, TableRef::Static(function), "x");
    assert_eq!(s.find_with_scope(x, &site), Some((stat, ScopeKind::Static)));

    // A site without the function, buffer or module skips those tables.
    assert_eq!(
        s.find_with_scope(x, &ResolveSite::default()),
        Some((local, ScopeKind::Local(1)))
    );
    s.pop_level();
}

#[test]
fn test_local_without_call_is_global() {
    let mut s = scopes();
    let id = int(&mut s, TableRef::Local, "top");
    let name = s.interner().intern("top");
    assert_eq!(s.find_in(TableRef::Global, name), Some(id));
}

// Declarations

#[test]
fn test_redeclare_same_type_keeps_value() {
    let mut s = scopes();
    let first = int(&mut s, TableRef::Global, "n");
    s.assign_int(first, 9).unwrap();
    let second = int(&mut s, TableRef::Global, "n");
    assert_eq!(first, second);
    assert_eq!(s.get_int(second), 9);
}

#[test]
fn test_redeclare_other_type_replaces() {
    let mut s = scopes();
    let name = s.interner().intern("n");
    let first = int(&mut s, TableRef::Global, "n");
    let second = s
        .declare(TableRef::Global, name, VarType::Str, SymFlags::empty())
        .unwrap();
    assert_ne!(first, second);
    assert!(!s.arena().contains(first));
    assert_eq!(s.read(second).as_bytes(), Some(&b""[..]));
}

#[test]
fn test_statics_persist_across_calls() {
    let mut s = scopes();
    let interner = s.interner().clone();
    let function = FunctionId::new(None, interner.intern("counter"));
    let name = interner.intern("hits");

    for expected in 1..=3 {
        s.push_level();
        let id = s
            .declare(TableRef::Static(function), name, VarType::Int, SymFlags::empty())
            .unwrap();
        let next = s.get_int(id) + 1;
        s.assign_int(id, next).unwrap();
        assert_eq!(s.get_int(id), expected);
        s.pop_level();
    }
    assert_eq!(s.forget_statics(function), 1);
}

#[test]
fn test_name_too_long_is_refused() {
    let mut s = scopes();
    let long = "a".repeat(MAX_SYMBOL_NAME + 1);
    let name = s.interner().intern(&long);
    let err = s
        .declare(TableRef::Global, name, VarType::Int, SymFlags::empty())
        .unwrap_err();
    assert_eq!(
        err,
        DeclareError::NameTooLong {
            name: long,
            len: MAX_SYMBOL_NAME + 1,
            max: MAX_SYMBOL_NAME,
        }
    );
}

#[test]
fn test_system_symbol_cannot_be_undeclared_or_redeclared() {
    let mut s = scopes();
    let name = s.interner().intern("version");
    s.declare(TableRef::Global, name, VarType::Int, SymFlags::SYSTEM)
        .unwrap();
    assert!(matches!(
        s.undeclare(TableRef::Global, name),
        Err(DeclareError::Reserved { .. })
    ));
    assert!(matches!(
        s.declare(TableRef::Global, name, VarType::Str, SymFlags::empty()),
        Err(DeclareError::Reserved { .. })
    ));
}

#[test]
fn test_undeclare_destroys_symbol() {
    let mut s = scopes();
    let name = s.interner().intern("tmp");
    let id = int(&mut s, TableRef::Global, "tmp");
    assert_eq!(s.undeclare(TableRef::Global, name), Ok(true));
    assert_eq!(s.undeclare(TableRef::Global, name), Ok(false));
    assert!(!s.arena().contains(id));
}

// Assignment

#[test]
fn test_constant_refuses_assign_but_accepts_initialize() {
    let mut s = scopes();
    let name = s.interner().intern("LIMIT");
    let id = s
        .declare(TableRef::Global, name, VarType::Int, SymFlags::CONSTANT)
        .unwrap();
    s.initialize(id, Value::Int(10)).unwrap();
    assert_eq!(
        s.assign_int(id, 11),
        Err(AssignError::ReadOnly {
            name: "LIMIT".to_owned()
        })
    );
    assert_eq!(s.get_int(id), 10);
}

#[test]
fn test_poly_symbol_follows_assigned_type() {
    let mut s = scopes();
    let name = s.interner().intern("any");
    let id = s
        .declare(TableRef::Global, name, VarType::Int, SymFlags::POLY)
        .unwrap();
    s.assign_str(id, b"text").unwrap();
    assert_eq!(s.type_of(id), VarType::Str);
    s.assign_float(id, 1.5).unwrap();
    assert_eq!(s.type_of(id), VarType::Float);
}

#[test]
#[should_panic(expected = "assigning string to integer symbol 'n'")]
fn test_type_mismatch_is_contract_violation() {
    let mut s = scopes();
    let id = int(&mut s, TableRef::Global, "n");
    let _ = s.assign_str(id, b"oops");
}

#[test]
fn test_null_is_assignable_to_any_symbol() {
    let mut s = scopes();
    let id = int(&mut s, TableRef::Global, "n");
    s.assign_null(id).unwrap();
    assert_eq!(*s.read(id), Value::Null);
    assert_eq!(s.type_of(id), VarType::Int);
}

#[test]
fn test_computed_symbol_reads_getter() {
    let mut s = scopes();
    let name = s.interner().intern("answer");
    let id = s
        .declare_computed(
            TableRef::Global,
            name,
            VarType::Int,
            SymFlags::SYSTEM,
            Box::new(|| Value::Int(42)),
        )
        .unwrap();
    assert_eq!(s.get_int(id), 42);
    assert!(matches!(s.assign_int(id, 1), Err(AssignError::ReadOnly { .. })));
    assert!(matches!(
        s.initialize(id, Value::Int(1)),
        Err(AssignError::ReadOnly { .. })
    ));
}

// Aliases

#[test]
fn test_writes_through_alias_reach_target() {
    let mut s = scopes();
    let interner = s.interner().clone();
    let site = ResolveSite::default();

    s.push_level();
    let target = int(&mut s, TableRef::Local, "count");
    s.push_level();
    let alias = s
        .declare_alias(TableRef::Local, interner.intern("n"), target)
        .unwrap();
    s.assign_int(alias, 7).unwrap();
    assert_eq!(s.resolve(alias), target);
    assert_eq!(s.type_of(alias), VarType::Int);
    assert!(s.symbol(alias).flags().contains(SymFlags::REFERENCE));
    s.pop_level();

    // Popping the alias's level leaves the target alive.
    assert_eq!(s.get_int(target), 7);
    assert_eq!(s.find(interner.intern("n"), &site), None);
    s.pop_level();
}

#[test]
fn test_alias_chain_resolves_to_end() {
    let mut s = scopes();
    let interner = s.interner().clone();
    let a = int(&mut s, TableRef::Global, "a");
    let b = s
        .declare_alias(TableRef::Global, interner.intern("b"), a)
        .unwrap();
    let c = s
        .declare_alias(TableRef::Global, interner.intern("c"), b)
        .unwrap();
    s.assign_int(c, 3).unwrap();
    assert_eq!(s.get_int(a), 3);
    assert_eq!(s.resolve(c), a);
}

#[test]
#[should_panic(expected = "would replace its own target")]
fn test_alias_replacing_its_target_is_contract_violation() {
    let mut s = scopes();
    let interner = s.interner().clone();
    let a = int(&mut s, TableRef::Global, "a");
    let b = s
        .declare_alias(TableRef::Global, interner.intern("b"), a)
        .unwrap();
    let _ = s.declare_alias(TableRef::Global, interner.intern("a"), b);
}

#[test]
#[should_panic(expected = "stale symbol id")]
fn test_alias_outliving_target_is_contract_violation() {
    let mut s = scopes();
    let interner = s.interner().clone();
    s.push_level();
    let local = int(&mut s, TableRef::Local, "short");
    let alias = s
        .declare_alias(TableRef::Global, interner.intern("long"), local)
        .unwrap();
    s.pop_level();
    let _ = s.get_int(alias);
}

// Levels and registers

#[test]
#[should_panic(expected = "nesting limit of 2 levels exceeded")]
fn test_nesting_overflow_is_fatal() {
    let mut s = Scopes::new(
        SharedInterner::new(),
        ScopeLimits {
            max_nesting: 2,
            max_registers: 8,
        },
    );
    s.push_level();
    s.push_level();
    s.push_level();
}

#[test]
#[should_panic(expected = "no active call")]
fn test_pop_without_level_is_contract_violation() {
    scopes().pop_level();
}

#[test]
fn test_registers_belong_to_innermost_level() {
    let mut s = scopes();
    s.push_level();
    let arg = int(&mut s, TableRef::Local, "arg");
    s.associate_register(0, arg);
    assert_eq!(s.register(0), arg);
    s.push_level();
    let inner = int(&mut s, TableRef::Local, "arg");
    s.associate_register(0, inner);
    assert_eq!(s.register(0), inner);
    s.pop_level();
    assert_eq!(s.register(0), arg);
    s.pop_level();
}

// Buffers and modules

#[test]
fn test_detach_buffer_destroys_its_locals() {
    let mut s = scopes();
    let name = s.interner().intern("mode");
    let buffer = BufferId::new(1);
    let site = ResolveSite {
        buffer: Some(buffer),
        ..ResolveSite::default()
    };
    let id = int(&mut s, TableRef::Buffer(buffer), "mode");
    assert!(s.has_buffer(buffer));
    assert_eq!(s.find(name, &site), Some(id));
    assert_eq!(s.detach_buffer(buffer), 1);
    assert_eq!(s.find(name, &site), None);
    assert!(!s.has_buffer(buffer));
}

#[test]
fn test_detach_module_destroys_its_variables() {
    let mut s = scopes();
    let module = ModuleId::new(s.interner().intern("util.cr"));
    int(&mut s, TableRef::Module(module), "a");
    int(&mut s, TableRef::Module(module), "b");
    assert_eq!(s.detach_module(module), 2);
    assert_eq!(s.detach_module(module), 0);
}

#[test]
fn test_symbols_in_lists_sorted() {
    let mut s = scopes();
    let interner = s.interner().clone();
    int(&mut s, TableRef::Global, "zeta");
    s.declare(
        TableRef::Global,
        interner.intern("alpha"),
        VarType::List,
        SymFlags::CONSTANT,
    )
    .unwrap();
    assert_eq!(
        s.symbols_in(TableRef::Global),
        vec![
            SymbolInfo {
                name: "alpha",
                ty: VarType::List,
                flags: SymFlags::CONSTANT,
            },
            SymbolInfo {
                name: "zeta",
                ty: VarType::Int,
                flags: SymFlags::empty(),
            },
        ]
    );
    assert!(s.symbols_in(TableRef::Buffer(BufferId::new(9))).is_empty());
}

// Ownership

#[test]
fn test_shared_value_released_when_level_pops() {
    let before = RefStats::snapshot();
    {
        let mut s = scopes();
        let list = s.interner().intern("items");
        let handle = SharedRef::build_list(&[brisk_shared::Atom::Int(1)]);

        s.push_level();
        let id = s
            .declare(TableRef::Local, list, VarType::List, SymFlags::empty())
            .unwrap();
        s.assign_shared(id, handle.acquire()).unwrap();
        assert_eq!(handle.owners(), 2);
        s.pop_level();
        assert_eq!(handle.owners(), 1);
    }
    assert_eq!(RefStats::snapshot().since(before).outstanding(), 0);
}

#[test]
fn test_buffer_mut_through_alias_copies_shared_string() {
    let mut s = scopes();
    let interner = s.interner().clone();
    let target = s
        .declare(TableRef::Global, interner.intern("s"), VarType::Str, SymFlags::empty())
        .unwrap();
    let alias = s
        .declare_alias(TableRef::Global, interner.intern("r"), target)
        .unwrap();
    let shared = SharedRef::build_str(b"abc");
    s.assign_shared(alias, shared.acquire()).unwrap();

    s.buffer_mut(alias).unwrap()[0] = b'X';
    assert_eq!(s.read(target).as_bytes(), Some(&b"Xbc"[..]));
    assert_eq!(shared.as_bytes(), Some(&b"abc"[..]));
    assert_eq!(shared.owners(), 1);
}

#[test]
fn test_attach_creates_empty_tables_once() {
    let mut s = scopes();
    let buffer = BufferId::new(4);
    let module = ModuleId::new(s.interner().intern("init.cr"));
    assert!(s.attach_buffer(buffer));
    assert!(!s.attach_buffer(buffer));
    assert!(s.has_buffer(buffer));
    assert!(s.attach_module(module));
    assert!(!s.attach_module(module));
    assert_eq!(s.detach_buffer(buffer), 0);
    assert_eq!(s.detach_module(module), 0);
}
