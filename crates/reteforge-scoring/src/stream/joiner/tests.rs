//! Tests for joiners.

use super::*;

#[derive(Debug, Clone)]
struct Shift {
    employee: u32,
    start: i64,
    end: i64,
}

fn shift(employee: u32, start: i64, end: i64) -> Shift {
    Shift {
        employee,
        start,
        end,
    }
}

#[test]
fn test_equal_self_join() {
    let joiner = equal(|s: &Shift| s.employee);
    assert!(joiner.matches(&shift(1, 0, 8), &shift(1, 8, 16)));
    assert!(!joiner.matches(&shift(1, 0, 8), &shift(2, 0, 8)));
    assert!(joiner.is_indexable());
}

#[test]
fn test_equal_bi_cross_types() {
    let joiner = equal_bi(|s: &Shift| s.employee, |id: &u32| *id);
    assert!(joiner.matches(&shift(7, 0, 1), &7));
    assert!(!joiner.matches(&shift(7, 0, 1), &8));
}

#[test]
fn test_comparisons() {
    let lt = less_than(|a: &i64| *a, |b: &i64| *b);
    let le = less_than_or_equal(|a: &i64| *a, |b: &i64| *b);
    let gt = greater_than(|a: &i64| *a, |b: &i64| *b);
    let ge = greater_than_or_equal(|a: &i64| *a, |b: &i64| *b);

    assert!(lt.matches(&1, &2) && !lt.matches(&2, &2));
    assert!(le.matches(&2, &2) && !le.matches(&3, &2));
    assert!(gt.matches(&3, &2) && !gt.matches(&2, &2));
    assert!(ge.matches(&2, &2) && !ge.matches(&1, &2));
}

#[test]
fn test_overlapping_half_open() {
    let joiner = overlapping(
        |s: &Shift| s.start,
        |s: &Shift| s.end,
        |s: &Shift| s.start,
        |s: &Shift| s.end,
    );
    assert!(joiner.matches(&shift(1, 0, 10), &shift(2, 9, 12)));
    assert!(!joiner.matches(&shift(1, 0, 10), &shift(2, 10, 12)));
    assert!(!joiner.is_indexable());
}

#[test]
fn test_filtering() {
    let joiner = filtering(|a: &Shift, b: &Shift| a.end <= b.start);
    assert!(joiner.matches(&shift(1, 0, 8), &shift(1, 8, 16)));
    assert!(!joiner.matches(&shift(1, 8, 16), &shift(1, 0, 8)));
    assert!(!joiner.is_indexable());
}

#[test]
fn test_compare_op() {
    use std::cmp::Ordering::*;
    assert!(CompareOp::LessThan.test(Less));
    assert!(!CompareOp::LessThan.test(Equal));
    assert!(CompareOp::LessThanOrEqual.test(Equal));
    assert!(CompareOp::GreaterThanOrEqual.test(Greater));
    assert!(!CompareOp::GreaterThan.test(Less));
}
