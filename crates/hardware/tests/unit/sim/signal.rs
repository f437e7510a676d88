//! # Signal Table Tests

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use tbsim_core::HarnessError;
use tbsim_core::sim::signal::Signals;

#[test]
fn declare_and_lookup() {
    let mut s = Signals::new();
    let a = s.declare("a", 1, 0).unwrap();
    let b = s.declare("b", 8, 0x5a).unwrap();
    assert_eq!(s.lookup("a"), Some(a));
    assert_eq!(s.require("b").unwrap(), b);
    assert_eq!(s.get(b), 0x5a);
    assert_eq!(s.name(b), "b");
    assert_eq!(s.width(b), 8);
    assert_eq!(s.len(), 2);
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
}

#[test]
fn missing_signal_is_reported_by_name() {
    let s = Signals::new();
    assert!(s.is_empty());
    match s.require("clk_0__io") {
        Err(HarnessError::SignalNotFound(name)) => assert_eq!(name, "clk_0__io"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let mut s = Signals::new();
    let _ = s.declare("x", 4, 0).unwrap();
    assert!(matches!(
        s.declare("x", 4, 0),
        Err(HarnessError::DuplicateSignal(_))
    ));
}

#[rstest]
#[case(0)]
#[case(65)]
fn out_of_range_widths_are_rejected(#[case] width: u32) {
    let mut s = Signals::new();
    assert!(matches!(
        s.declare("w", width, 0),
        Err(HarnessError::InvalidWidth { .. })
    ));
}

#[test]
fn writes_are_deferred_until_commit() {
    let mut s = Signals::new();
    let v = s.declare("v", 1, 0).unwrap();
    s.set_bool(v, true);
    assert!(!s.get_bool(v));
    assert!(s.next_bool(v));
    assert!(s.commit());
    assert!(s.get_bool(v));
    assert!(!s.commit(), "a second commit has nothing to move");
}

#[test]
fn iter_follows_declaration_order() {
    let mut s = Signals::new();
    for name in ["c", "a", "b"] {
        let _ = s.declare(name, 2, 0).unwrap();
    }
    let names: Vec<&str> = s.iter().map(|(_, name, _)| name).collect();
    assert_eq!(names, ["c", "a", "b"]);
}

proptest! {
    #[test]
    fn committed_value_is_truncated_to_width(width in 1u32..=64, value: u64) {
        let mut s = Signals::new();
        let id = s.declare("x", width, 0).unwrap();
        s.set(id, value);
        let _ = s.commit();
        let mask = if width == 64 { u64::MAX } else { (1u64 << width) - 1 };
        prop_assert_eq!(s.get(id), value & mask);
    }
}
