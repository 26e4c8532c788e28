use super::*;
use crate::{buffer_handler, SharedMessageHandler};
use brisk_ir::{BufferId, FunctionId, VarType};
use brisk_value::ValueKind;
use pretty_assertions::assert_eq;

fn runtime() -> (Runtime, SharedMessageHandler) {
    let messages = buffer_handler();
    let rt = Runtime::builder().messages(messages.clone()).build();
    (rt, messages)
}

fn global(rt: &mut Runtime, name: &str, ty: VarType, flags: SymFlags) -> brisk_symtab::SymbolId {
    let name = rt.interner().intern(name);
    match rt.scopes_mut().declare(TableRef::Global, name, ty, flags) {
        Ok(id) => id,
        Err(err) => panic!("{err}"),
    }
}

fn call(rt: &mut Runtime, builtin: &str, args: &ArgVec) {
    match find_builtin(builtin) {
        Some(f) => f(rt, args),
        None => panic!("no built-in {builtin}"),
    }
}

#[test]
fn builtin_table_is_sorted_and_complete() {
    let names: Vec<_> = BUILTINS.iter().map(|(name, _)| *name).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    for name in names {
        assert!(find_builtin(name).is_some(), "{name}");
    }
    assert!(find_builtin("no_such_builtin").is_none());
}

#[test]
fn inq_symbol_reports_existence() {
    let (mut rt, _) = runtime();
    global(&mut rt, "present", VarType::Int, SymFlags::empty());
    call(&mut rt, "inq_symbol", &ArgVec::new().with("present"));
    assert_eq!(rt.acc().get_int(), 1);
    call(&mut rt, "inq_symbol", &ArgVec::new().with("absent"));
    assert_eq!(rt.acc().get_int(), 0);
    assert!(!rt.is_returning());
}

#[test]
fn typeof_symbol_names_declared_type() {
    let (mut rt, _) = runtime();
    global(&mut rt, "items", VarType::List, SymFlags::empty());
    call(&mut rt, "typeof_symbol", &ArgVec::new().with("items"));
    assert_eq!(rt.acc().get_str(), Some(&b"list"[..]));
    call(&mut rt, "typeof_symbol", &ArgVec::new().with("ghost"));
    assert_eq!(rt.acc().get_str(), Some(&b"undefined"[..]));
}

#[test]
fn nesting_level_counts_calls() {
    let (mut rt, _) = runtime();
    let f = FunctionId::new(None, rt.interner().intern("f"));
    rt.enter_call(f);
    rt.enter_call(f);
    call(&mut rt, "nesting_level", &ArgVec::new());
    assert_eq!(rt.acc().get_int(), 2);
    rt.leave_call();
    rt.leave_call();
}

#[test]
fn set_and_get_symbol() {
    let (mut rt, _) = runtime();
    global(&mut rt, "count", VarType::Int, SymFlags::empty());
    call(&mut rt, "set_symbol", &ArgVec::new().with("count").with(12_i64));
    assert_eq!(rt.acc().get_int(), 1);
    rt.acc_mut().assign_null();
    call(&mut rt, "get_symbol", &ArgVec::new().with("count"));
    assert_eq!(rt.acc().get_int(), 12);
}

#[test]
fn set_symbol_refuses_mistyped_value() {
    let (mut rt, messages) = runtime();
    let id = global(&mut rt, "count", VarType::Int, SymFlags::empty());
    call(&mut rt, "set_symbol", &ArgVec::new().with("count").with("twelve"));
    assert_eq!(rt.acc().get_int(), 0);
    assert_eq!(
        messages.last().as_deref(),
        Some("set_symbol: 'count' is integer, value is string")
    );
    assert_eq!(rt.scopes().get_int(id), 0);
}

#[test]
fn set_symbol_refuses_constant() {
    let (mut rt, messages) = runtime();
    global(&mut rt, "LIMIT", VarType::Int, SymFlags::CONSTANT);
    call(&mut rt, "set_symbol", &ArgVec::new().with("LIMIT").with(1_i64));
    assert_eq!(rt.acc().get_int(), 0);
    assert_eq!(
        messages.last().as_deref(),
        Some("set_symbol: cannot assign to read-only symbol 'LIMIT'")
    );
}

#[test]
fn set_symbol_on_poly_changes_type() {
    let (mut rt, _) = runtime();
    let id = global(&mut rt, "any", VarType::Int, SymFlags::POLY);
    call(&mut rt, "set_symbol", &ArgVec::new().with("any").with("now a string"));
    assert_eq!(rt.acc().get_int(), 1);
    assert_eq!(rt.scopes().type_of(id), VarType::Str);
}

#[test]
fn get_symbol_undefined_signals() {
    let (mut rt, messages) = runtime();
    rt.acc_mut().assign_int(5);
    call(&mut rt, "get_symbol", &ArgVec::new().with("missing"));
    assert!(rt.is_returning());
    assert_eq!(rt.acc().get_int(), 5);
    assert_eq!(messages.last().as_deref(), Some("Undefined symbol: missing"));
}

#[test]
fn returns_sets_result_at_call_exit() {
    let (mut rt, _) = runtime();
    let f = FunctionId::new(None, rt.interner().intern("f"));
    rt.enter_call(f);
    call(&mut rt, "returns", &ArgVec::new().with("done"));
    assert!(!rt.is_returning());
    rt.acc_mut().assign_int(0);
    rt.leave_call();
    assert_eq!(rt.acc().get_str(), Some(&b"done"[..]));
}

#[test]
fn return_now_with_and_without_value() {
    let (mut rt, _) = runtime();
    let f = FunctionId::new(None, rt.interner().intern("f"));
    rt.enter_call(f);
    rt.acc_mut().assign_int(3);
    call(&mut rt, "return_now", &ArgVec::new());
    assert!(rt.is_returning());
    assert_eq!(rt.acc().get_int(), 3);
    rt.leave_call();

    rt.enter_call(f);
    call(&mut rt, "return_now", &ArgVec::new().with(9_i64));
    assert_eq!(rt.acc().get_int(), 9);
    rt.leave_call();
}

#[test]
fn ref_parm_aliases_caller_variable() {
    let (mut rt, _) = runtime();
    let caller = FunctionId::new(None, rt.interner().intern("caller"));
    let callee = FunctionId::new(None, rt.interner().intern("callee"));
    let total = rt.interner().intern("total");

    rt.enter_call(caller);
    let target = match rt
        .scopes_mut()
        .declare(TableRef::Local, total, VarType::Int, SymFlags::empty())
    {
        Ok(id) => id,
        Err(err) => panic!("{err}"),
    };
    rt.enter_call(callee);
    rt.scopes_mut().associate_register(0, target);
    call(&mut rt, "ref_parm", &ArgVec::new().with(0_i64).with("out"));
    assert_eq!(rt.acc().get_int(), 1);

    call(&mut rt, "set_symbol", &ArgVec::new().with("out").with(99_i64));
    rt.leave_call();
    assert_eq!(rt.scopes().get_int(target), 99);
    rt.leave_call();
}

#[test]
fn ref_parm_missing_parameter() {
    let (mut rt, messages) = runtime();
    let f = FunctionId::new(None, rt.interner().intern("f"));
    rt.enter_call(f);
    call(&mut rt, "ref_parm", &ArgVec::new().with(1_i64).with("opt").with(1_i64));
    assert_eq!(rt.acc().get_int(), 0);
    assert!(messages.messages().is_empty());

    call(&mut rt, "ref_parm", &ArgVec::new().with(1_i64).with("req"));
    assert_eq!(rt.acc().get_int(), 0);
    assert_eq!(
        messages.last().as_deref(),
        Some("ref_parm: parameter 1 was not passed")
    );
    rt.leave_call();
}

#[test]
fn make_local_variable_copies_into_buffer() {
    let messages = buffer_handler();
    let buffer = BufferId::new(1);
    let mut rt = Runtime::builder()
        .messages(messages.clone())
        .buffer(buffer)
        .build();
    let mode = global(&mut rt, "mode", VarType::Str, SymFlags::empty());
    rt.scopes_mut().assign_str(mode, b"text").unwrap_or_else(|e| panic!("{e}"));

    call(&mut rt, "make_local_variable", &ArgVec::new().with(mode));
    assert_eq!(rt.acc().get_int(), 1);

    // The buffer copy now shadows the global.
    call(&mut rt, "set_symbol", &ArgVec::new().with("mode").with("c"));
    call(&mut rt, "get_symbol", &ArgVec::new().with("mode"));
    assert_eq!(rt.acc().get_str(), Some(&b"c"[..]));
    assert_eq!(rt.scopes().read(mode).as_bytes(), Some(&b"text"[..]));

    // Other buffers still see the global.
    rt.set_buffer(Some(BufferId::new(2)));
    call(&mut rt, "get_symbol", &ArgVec::new().with("mode"));
    assert_eq!(rt.acc().get_str(), Some(&b"text"[..]));
}

#[test]
fn make_local_variable_needs_buffer() {
    let (mut rt, messages) = runtime();
    let id = global(&mut rt, "mode", VarType::Int, SymFlags::empty());
    call(&mut rt, "make_local_variable", &ArgVec::new().with(id));
    assert_eq!(rt.acc().get_int(), 0);
    assert_eq!(
        messages.last().as_deref(),
        Some("make_local_variable: no current buffer")
    );
    assert_eq!(rt.acc().kind(), ValueKind::Int);
}

#[test]
fn lookup_of_unknown_name_does_not_grow_interner() {
    let (mut rt, messages) = runtime();
    let before = rt.interner().len();
    call(&mut rt, "get_symbol", &ArgVec::new().with("never_declared"));
    assert!(rt.is_returning());
    assert_eq!(
        messages.last().as_deref(),
        Some("Undefined symbol: never_declared")
    );
    rt.clear_return();
    call(&mut rt, "set_symbol", &ArgVec::new().with("also_unknown").with(1_i64));
    assert!(rt.is_returning());
    assert_eq!(rt.interner().len(), before);
    assert!(rt.interner().get("never_declared").is_none());
}

#[test]
fn get_symbol_at_top_level_does_not_poison_next_call() {
    let (mut rt, _) = runtime();
    let id = global(&mut rt, "x", VarType::Int, SymFlags::empty());
    rt.scopes_mut()
        .assign_int(id, 4)
        .unwrap_or_else(|e| panic!("{e}"));
    call(&mut rt, "get_symbol", &ArgVec::new().with("nope"));
    assert!(rt.is_returning());

    let f = FunctionId::new(None, rt.interner().intern("f"));
    rt.enter_call(f);
    assert!(!rt.is_returning());
    call(&mut rt, "get_symbol", &ArgVec::new().with("x"));
    assert_eq!(rt.acc().get_int(), 4);
    assert!(!rt.is_returning());
    rt.leave_call();
}
