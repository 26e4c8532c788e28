use super::*;
use brisk_ir::{Name, VarType};
use crate::SymFlags;
use pretty_assertions::assert_eq;

fn sym(raw: u32) -> Symbol {
    Symbol::new(Name::from_raw(raw), VarType::Int, SymFlags::empty())
}

#[test]
fn test_insert_get_remove() {
    let mut arena = SymbolArena::new();
    let id = arena.insert(sym(1));
    assert_eq!(arena.live(), 1);
    assert_eq!(arena.get(id).map(Symbol::name), Some(Name::from_raw(1)));
    assert!(arena.remove(id).is_some());
    assert_eq!(arena.live(), 0);
    assert!(arena.get(id).is_none());
}

#[test]
fn test_reused_slot_does_not_resolve_stale_id() {
    let mut arena = SymbolArena::new();
    let old = arena.insert(sym(1));
    arena.remove(old);
    let new = arena.insert(sym(2));
    assert_eq!(old.index(), new.index());
    assert!(arena.get(old).is_none());
    assert!(arena.remove(old).is_none());
    assert_eq!(arena.get(new).map(Symbol::name), Some(Name::from_raw(2)));
}
