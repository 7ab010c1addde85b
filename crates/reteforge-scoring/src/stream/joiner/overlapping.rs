//! Overlapping joiner for interval overlap detection.

use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};

use super::{JoinCondition, Joiner};
use crate::graph::tuple::fact_at;

/// Creates a joiner that matches when two intervals overlap.
///
/// Two intervals [start_a, end_a) and [start_b, end_b) overlap if:
/// - start_a < end_b AND start_b < end_a
///
/// This uses half-open intervals: the start is inclusive, the end is exclusive.
///
/// # Example
///
/// ```
/// use reteforge_scoring::stream::joiner::overlapping;
///
/// #[derive(Debug, Clone)]
/// struct Shift { start: i64, end: i64 }
///
/// let overlap = overlapping(
///     |s: &Shift| s.start,
///     |s: &Shift| s.end,
///     |s: &Shift| s.start,
///     |s: &Shift| s.end
/// );
///
/// // [0, 10) and [5, 15) overlap at [5, 10)
/// assert!(overlap.matches(&Shift { start: 0, end: 10 }, &Shift { start: 5, end: 15 }));
///
/// // [0, 10) and [10, 20) touch but don't overlap
/// assert!(!overlap.matches(&Shift { start: 0, end: 10 }, &Shift { start: 10, end: 20 }));
/// ```
pub fn overlapping<A, B, T, Fsa, Fea, Fsb, Feb>(
    start_a: Fsa,
    end_a: Fea,
    start_b: Fsb,
    end_b: Feb,
) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    T: Ord,
    Fsa: Fn(&A) -> T + Send + Sync + 'static,
    Fea: Fn(&A) -> T + Send + Sync + 'static,
    Fsb: Fn(&B) -> T + Send + Sync + 'static,
    Feb: Fn(&B) -> T + Send + Sync + 'static,
{
    Joiner::new(JoinCondition::Predicate(Arc::new(move |left: &[FactRef], right: &[FactRef]| {
        let a = fact_at::<A>(left, 0);
        let b = fact_at::<B>(right, 0);
        start_a(a) < end_b(b) && start_b(b) < end_a(a)
    })))
}
