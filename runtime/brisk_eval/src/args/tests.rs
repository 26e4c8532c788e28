use super::*;
use brisk_shared::RefStats;
use pretty_assertions::assert_eq;

fn sample() -> ArgVec {
    ArgVec::new()
        .with(7_i64)
        .with(2.5_f64)
        .with("name")
        .with(Arg::Null)
        .with(SharedRef::build_list(&[Atom::Int(1), Atom::Int(2)]))
}

#[test]
fn typed_extractors() {
    let args = sample();
    assert_eq!(args.len(), 5);
    assert_eq!(args.int(0), 7);
    assert_eq!(args.float(1), 2.5);
    assert_eq!(args.str(2), b"name");
    assert_eq!(args.list(4), &[Atom::Int(1), Atom::Int(2)][..]);
}

#[test]
fn numeric_arguments_cross_coerce() {
    let args = sample();
    assert_eq!(args.int(1), 2);
    assert_eq!(args.float(0), 7.0);
}

#[test]
fn optional_arguments() {
    let args = sample();
    assert!(args.is_null(3));
    assert!(args.is_null(99));
    assert!(!args.is_null(0));
    assert_eq!(args.opt_int(3), None);
    assert_eq!(args.opt_int(99), None);
    assert_eq!(args.opt_str(3), None);
    assert_eq!(args.opt_float(0), Some(7.0));
}

#[test]
#[should_panic(expected = "argument 2: expected integer, found string")]
fn wrong_type_is_contract_violation() {
    sample().int(2);
}

#[test]
#[should_panic(expected = "missing symbol argument 3")]
fn missing_required_is_contract_violation() {
    sample().symbol(3);
}

#[test]
fn to_value_acquires_shared_payload() {
    let before = RefStats::snapshot();
    {
        let args = sample();
        let Some(Arg::Str(handle)) = args.get(2) else {
            panic!("expected string argument");
        };
        let value = args.get(2).and_then(Arg::to_value);
        assert_eq!(handle.owners(), 2);
        assert_eq!(value.as_ref().and_then(Value::as_bytes), Some(&b"name"[..]));
    }
    assert_eq!(RefStats::snapshot().since(before).outstanding(), 0);
}

#[test]
fn null_argument_is_null_value() {
    let args: ArgVec = std::iter::once(Arg::Null).collect();
    assert_eq!(args.get(0).and_then(Arg::to_value), Some(Value::Null));
}
