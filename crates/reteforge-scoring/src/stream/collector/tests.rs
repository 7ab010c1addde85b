// Tests for collector module.

use super::*;

#[test]
fn test_count_retract_to_zero() {
    let collector = count::<&str>();
    let mut acc = collector.create_accumulator();
    acc.accumulate(&collector.extract(&"a"));
    acc.retract(&collector.extract(&"a"));
    assert_eq!(acc.finish(), 0);
}

#[test]
fn test_sum_reset() {
    let collector = sum(|x: &i64| *x * 2);
    let mut acc = collector.create_accumulator();
    acc.accumulate(&collector.extract(&5));
    assert_eq!(acc.finish(), 10);
    acc.reset();
    assert_eq!(acc.finish(), 0);
}

#[test]
fn test_sum_retract_is_exact_across_overflow() {
    let collector = sum(|x: &i64| *x);
    let mut acc = collector.create_accumulator();
    acc.accumulate(&i64::MAX);
    acc.accumulate(&1);
    acc.accumulate(&10_000_000_000_000_000);
    acc.retract(&i64::MAX);
    acc.retract(&10_000_000_000_000_000);
    assert_eq!(acc.finish(), 1);
}

#[test]
fn test_max_retracts_current_extremum() {
    let collector = max(|x: &i32| *x);
    let mut acc = collector.create_accumulator();
    for x in [3, 9, 5] {
        acc.accumulate(&collector.extract(&x));
    }
    assert_eq!(acc.finish(), Some(9));

    acc.retract(&9);
    assert_eq!(acc.finish(), Some(5));

    acc.retract(&5);
    acc.retract(&3);
    assert_eq!(acc.finish(), None);
}

#[test]
fn test_min_ignores_unknown_retract() {
    let collector = min(|x: &i32| *x);
    let mut acc = collector.create_accumulator();
    acc.accumulate(&4);
    acc.retract(&7);
    assert_eq!(acc.finish(), Some(4));
}

#[test]
fn test_count_distinct_multiplicity() {
    let collector = count_distinct(|x: &u32| *x % 3);
    let mut acc = collector.create_accumulator();
    for x in [0, 3, 1] {
        acc.accumulate(&collector.extract(&x));
    }
    assert_eq!(acc.finish(), 2);

    acc.retract(&collector.extract(&3));
    assert_eq!(acc.finish(), 2);

    acc.retract(&collector.extract(&0));
    assert_eq!(acc.finish(), 1);
}

#[test]
fn test_to_list_is_sorted() {
    let collector = to_list(|s: &String| s.clone());
    let mut acc = collector.create_accumulator();
    for s in ["pear", "apple", "fig"] {
        acc.accumulate(&collector.extract(&s.to_string()));
    }
    assert_eq!(acc.finish(), vec!["apple", "fig", "pear"]);
}
