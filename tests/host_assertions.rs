// Drives the comparator the way a host test suite does: through the
// registry and its assertion helpers.

use anyhow::Result;
use strictcmp::comparator::Mismatch;
use strictcmp::kernel::{Handle, Object};
use strictcmp::{Comparator, CompareOptions, ComparisonFailure, Config, FailureStyle, Outcome, Registry, StrictScalarComparator, Value};

fn registry() -> Registry {
    Registry::bootstrap(&Config::default())
}

fn s(v: &str) -> Value {
    Value::from(v)
}

#[test]
fn identical_scalars_pass() -> Result<()> {
    let reg = registry();
    for v in [
        s("foo"),
        Value::Bool(true),
        Value::Bool(false),
        Value::Null,
        Value::Int(12),
        Value::Float(0.0),
        Value::Float(1.234),
        Value::Float(f64::INFINITY),
    ] {
        reg.assert_equals(&v, &v)?;
    }
    reg.assert_equals_ignoring_case(&s("FOO"), &s("foo"))?;
    Ok(())
}

#[test]
fn loosely_equal_scalars_fail() {
    let reg = registry();
    let pairs = [
        (s(""), Value::Null),
        (s("0"), Value::Int(0)),
        (s("1"), Value::Float(1.0)),
        (s("false"), Value::Bool(false)),
        (Value::Null, Value::Bool(false)),
        (Value::Bool(true), Value::Int(1)),
        (Value::Int(0), Value::Float(0.0)),
    ];
    for (e, a) in pairs {
        for (x, y) in [(&e, &a), (&a, &e)] {
            let err = reg.assert_equals_ignoring_case(x, y).unwrap_err();
            assert!(err.downcast_ref::<ComparisonFailure>().is_some(), "{x:?} vs {y:?}");
        }
    }
}

#[test]
fn delta_bounds_are_inclusive() -> Result<()> {
    let reg = registry();
    reg.assert_equals_with_delta(&Value::Int(12), &Value::Int(14), 2.0)?;
    reg.assert_equals_with_delta(&Value::Int(12), &Value::Int(10), 2.0)?;
    assert!(reg.assert_equals_with_delta(&Value::Int(12), &Value::Int(15), 2.0).is_err());
    assert!(reg.assert_equals_with_delta(&Value::Int(12), &Value::Int(9), 2.0).is_err());
    Ok(())
}

#[test]
fn invalid_numeric_results_never_match() {
    let reg = registry();
    let x = Value::Float((8.0f64).acos());
    assert!(reg.assert_equals(&x, &x).is_err());
    assert!(reg.assert_equals_with_delta(&x, &x, 10.0).is_err());
}

#[test]
fn string_failures_carry_rendered_forms() {
    let cmp = StrictScalarComparator::new();
    match cmp.compare(&s("foo"), &s("bar"), &CompareOptions::default()) {
        Outcome::Unequal(Mismatch { expected_rendered, actual_rendered, .. }) => {
            assert_eq!(expected_rendered, "'foo'");
            assert_eq!(actual_rendered, "'bar'");
        }
        Outcome::Equal => panic!("foo and bar compared equal"),
    }
    match cmp.compare(&s("foo"), &Value::Bool(false), &CompareOptions::default()) {
        Outcome::Unequal(m) => {
            assert!(m.expected_rendered.is_empty());
            assert!(m.actual_rendered.is_empty());
        }
        Outcome::Equal => panic!("foo and false compared equal"),
    }
}

#[test]
fn non_scalars_are_not_accepted() {
    let cmp = StrictScalarComparator::new();
    let obj = Value::Object(Object::new("stdClass"));
    let handle = Value::Handle(Handle::new(3, "stream"));
    let list = Value::List(vec![]);
    for v in [&list, &obj, &handle] {
        assert!(!cmp.accepts(v, v));
    }
    assert!(registry().assert_equals(&list, &list).is_err());
}

#[test]
fn legacy_hosts_get_legacy_failures() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join(".strictcmp.toml"), "[failure]\nstyle = \"legacy\"\n")?;
    let cfg = strictcmp::kernel::config::load_files(Some(dir.path()), None);
    assert_eq!(cfg.failure_style, FailureStyle::Legacy);

    let reg = Registry::bootstrap(&cfg);
    let err = reg.assert_equals(&s("foo"), &s("bar")).unwrap_err();
    let failure = err.downcast::<ComparisonFailure>()?;
    assert_eq!(failure.identical, Some(false));
    assert_eq!(failure.diff(), "--- Expected\n+++ Actual\n-'foo'\n+'bar'\n");
    Ok(())
}
