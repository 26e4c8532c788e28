//! Core symbol built-ins.
//!
//! Each built-in receives the runtime and its evaluated arguments and returns
//! its result through the Accumulator. User-level failures (a mistyped value,
//! a read-only target) are reported through the message handler with a zero
//! result; only misuse by the evaluator is a contract violation.

use brisk_ir::Name;
use brisk_symtab::{SymFlags, SymbolId, TableRef};
use brisk_value::Value;

use crate::{ArgVec, Runtime};

/// Signature shared by every built-in.
pub type Builtin = fn(&mut Runtime, &ArgVec);

/// Built-ins by macro-language name.
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("get_symbol", get_symbol),
    ("inq_symbol", inq_symbol),
    ("make_local_variable", make_local_variable),
    ("nesting_level", nesting_level),
    ("ref_parm", ref_parm),
    ("return_now", return_now),
    ("returns", returns),
    ("set_symbol", set_symbol),
    ("typeof_symbol", typeof_symbol),
];

pub fn find_builtin(name: &str) -> Option<Builtin> {
    BUILTINS
        .binary_search_by(|(candidate, _)| candidate.cmp(&name))
        .ok()
        .map(|index| BUILTINS[index].1)
}

/// Intern the string argument at `index` as a name, for built-ins that
/// declare it.
fn name_arg(rt: &Runtime, args: &ArgVec, index: usize) -> Name {
    rt.interner().intern(&String::from_utf8_lossy(args.str(index)))
}

/// Resolve the variable named by the string argument at `index`, signalling
/// if it is undefined. A name never interned cannot resolve, so it is not
/// interned here.
fn resolve_arg(rt: &mut Runtime, args: &ArgVec, index: usize) -> Option<(Name, SymbolId)> {
    let text = String::from_utf8_lossy(args.str(index));
    match rt.interner().get(&text) {
        Some(name) => rt.lookup_or_signal(name).map(|id| (name, id)),
        None => {
            rt.signal_undefined(&text);
            None
        }
    }
}

fn as_int(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// `inq_symbol(name)`: 1 if `name` resolves to a variable, else 0.
///
/// Never autoloads and never signals.
pub fn inq_symbol(rt: &mut Runtime, args: &ArgVec) {
    let text = String::from_utf8_lossy(args.str(0));
    let found = rt
        .interner()
        .get(&text)
        .is_some_and(|name| rt.scopes().find(name, &rt.site()).is_some());
    rt.acc_mut().assign_int(i64::from(found));
}

/// `typeof_symbol(name)`: the type name of the variable `name` resolves to,
/// or "undefined".
pub fn typeof_symbol(rt: &mut Runtime, args: &ArgVec) {
    let text = String::from_utf8_lossy(args.str(0));
    let ty = rt
        .interner()
        .get(&text)
        .and_then(|name| rt.scopes().find(name, &rt.site()))
        .map(|id| rt.scopes().type_of(id));
    let type_name = ty.map_or("undefined", |ty| ty.as_str());
    rt.acc_mut().assign_literal(type_name);
}

/// `nesting_level()`: number of active macro calls.
pub fn nesting_level(rt: &mut Runtime, _args: &ArgVec) {
    let level = as_int(rt.nesting_level());
    rt.acc_mut().assign_int(level);
}

/// `make_local_variable(var, ...)`: give the current buffer its own copy of
/// each referenced variable, initialised with the variable's current value.
pub fn make_local_variable(rt: &mut Runtime, args: &ArgVec) {
    let Some(buffer) = rt.buffer() else {
        rt.messages().error("make_local_variable: no current buffer");
        rt.acc_mut().assign_int(0);
        return;
    };
    for index in 0..args.len() {
        let id = args.symbol(index);
        let scopes = rt.scopes();
        let source = scopes.resolve(id);
        let name = scopes.symbol(id).name();
        let ty = scopes.type_of(source);
        let flags = scopes.symbol(source).flags() & SymFlags::POLY;
        let value = scopes.read(source).into_owned();

        let declared = rt
            .scopes_mut()
            .declare(TableRef::Buffer(buffer), name, ty, flags);
        let local = match declared {
            Ok(local) => local,
            Err(err) => {
                rt.messages().error(&format!("make_local_variable: {err}"));
                rt.acc_mut().assign_int(0);
                return;
            }
        };
        if local != source {
            if let Err(err) = rt.scopes_mut().initialize(local, value) {
                rt.messages().error(&format!("make_local_variable: {err}"));
                rt.acc_mut().assign_int(0);
                return;
            }
        }
    }
    rt.acc_mut().assign_int(1);
}

/// `returns(value)`: set the current call's result without returning.
pub fn returns(rt: &mut Runtime, args: &ArgVec) {
    let value = rt.value_of(args.get(0));
    rt.set_pending_return(value);
}

/// `return_now([value])`: stop the running macro, optionally with a result.
pub fn return_now(rt: &mut Runtime, args: &ArgVec) {
    let value = (!args.is_null(0)).then(|| rt.value_of(args.get(0)));
    rt.return_now(value);
}

/// `ref_parm(index, name, [optional])`: bind local `name` as a reference to
/// the caller's variable passed in register `index`.
///
/// Result 1 on success. A missing optional parameter yields 0 silently.
pub fn ref_parm(rt: &mut Runtime, args: &ArgVec) {
    let optional = args.opt_int(2).is_some_and(|flag| flag != 0);
    let Ok(index) = usize::try_from(args.int(0)) else {
        rt.messages()
            .error(&format!("ref_parm: invalid parameter index {}", args.int(0)));
        rt.acc_mut().assign_int(0);
        return;
    };
    let name = name_arg(rt, args, 1);
    if !rt.scopes().has_register(index) {
        if !optional {
            rt.messages()
                .error(&format!("ref_parm: parameter {index} was not passed"));
        }
        rt.acc_mut().assign_int(0);
        return;
    }
    let target = rt.scopes().register(index);
    let bound = rt
        .scopes_mut()
        .declare_alias(TableRef::Local, name, target);
    match bound {
        Ok(_) => rt.acc_mut().assign_int(1),
        Err(err) => {
            rt.messages().error(&format!("ref_parm: {err}"));
            rt.acc_mut().assign_int(0);
        }
    }
}

/// `set_symbol(name, value)`: assign to the variable `name` resolves to.
///
/// Result 1 on success, 0 if the variable is read-only or of another type.
pub fn set_symbol(rt: &mut Runtime, args: &ArgVec) {
    let Some((name, id)) = resolve_arg(rt, args, 0) else {
        return;
    };
    let value = rt.value_of(args.get(1));
    let scopes = rt.scopes();
    let ty = scopes.type_of(id);
    let poly = scopes
        .symbol(scopes.resolve(id))
        .flags()
        .contains(SymFlags::POLY);
    if let Some(kind) = value.kind().var_type() {
        if kind != ty && !poly {
            let text = format!(
                "set_symbol: '{}' is {ty}, value is {kind}",
                rt.interner().lookup(name)
            );
            rt.messages().error(&text);
            rt.acc_mut().assign_int(0);
            return;
        }
    }
    match rt.scopes_mut().assign(id, value) {
        Ok(()) => rt.acc_mut().assign_int(1),
        Err(err) => {
            rt.messages().error(&format!("set_symbol: {err}"));
            rt.acc_mut().assign_int(0);
        }
    }
}

/// `get_symbol(name)`: the value of the variable `name` resolves to.
pub fn get_symbol(rt: &mut Runtime, args: &ArgVec) {
    let Some((_, id)) = resolve_arg(rt, args, 0) else {
        return;
    };
    let value: Value = rt.scopes().read(id).into_owned();
    rt.acc_mut().set(value);
}

#[cfg(test)]
mod tests;
