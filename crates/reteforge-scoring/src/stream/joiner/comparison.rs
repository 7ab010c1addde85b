//! Comparison joiners for less than / greater than matching.
//!
//! The first comparison joiner of a join is served by a range index; any
//! further ones are scanned.

use std::fmt::Debug;
use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};

use super::{CompareOp, JoinCondition, Joiner};
use crate::graph::tuple::fact_at;
use crate::graph::OrdKey;

fn compare<A, B, T, Fa, Fb>(op: CompareOp, left: Fa, right: Fb) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    T: Ord + Debug + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Send + Sync + 'static,
    Fb: Fn(&B) -> T + Send + Sync + 'static,
{
    Joiner::new(JoinCondition::Compare {
        op,
        left: Arc::new(move |facts: &[FactRef]| OrdKey::new(left(fact_at::<A>(facts, 0)))),
        right: Arc::new(move |facts: &[FactRef]| OrdKey::new(right(fact_at::<B>(facts, 0)))),
        indexed: true,
    })
}

/// Creates a joiner that matches when `left(a) < right(b)`.
///
/// # Example
///
/// ```
/// use reteforge_scoring::stream::joiner::less_than;
///
/// #[derive(Debug, Clone)]
/// struct Task { end: i64, start: i64 }
///
/// // Task A must end before Task B starts
/// let sequential = less_than(|t: &Task| t.end, |t: &Task| t.start);
///
/// assert!(sequential.matches(
///     &Task { end: 10, start: 0 },
///     &Task { end: 20, start: 15 }
/// ));
/// assert!(!sequential.matches(
///     &Task { end: 10, start: 0 },
///     &Task { end: 20, start: 5 }
/// ));
/// ```
pub fn less_than<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    T: Ord + Debug + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Send + Sync + 'static,
    Fb: Fn(&B) -> T + Send + Sync + 'static,
{
    compare(CompareOp::LessThan, left, right)
}

/// Creates a joiner that matches when `left(a) <= right(b)`.
///
/// ```
/// use reteforge_scoring::stream::joiner::less_than_or_equal;
///
/// let joiner = less_than_or_equal(|x: &i32| *x, |y: &i32| *y);
///
/// assert!(joiner.matches(&5, &10));
/// assert!(joiner.matches(&5, &5));
/// assert!(!joiner.matches(&10, &5));
/// ```
pub fn less_than_or_equal<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    T: Ord + Debug + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Send + Sync + 'static,
    Fb: Fn(&B) -> T + Send + Sync + 'static,
{
    compare(CompareOp::LessThanOrEqual, left, right)
}

/// Creates a joiner that matches when `left(a) > right(b)`.
pub fn greater_than<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    T: Ord + Debug + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Send + Sync + 'static,
    Fb: Fn(&B) -> T + Send + Sync + 'static,
{
    compare(CompareOp::GreaterThan, left, right)
}

/// Creates a joiner that matches when `left(a) >= right(b)`.
pub fn greater_than_or_equal<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    T: Ord + Debug + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Send + Sync + 'static,
    Fb: Fn(&B) -> T + Send + Sync + 'static,
{
    compare(CompareOp::GreaterThanOrEqual, left, right)
}
