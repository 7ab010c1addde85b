// Joiners for stream joins.
//
// A joiner is one condition between the left and the right side of a join.
// A join takes a list of joiners that must all hold. Equality and ordering
// joiners are indexable; `overlapping` and `filtering` are evaluated by
// scanning the candidates the index returns.
//
// # Self-joins
//
// Use [`equal()`] with a single extractor when both sides share a type:
//
// ```
// use reteforge_scoring::stream::joiner::equal;
//
// #[derive(Debug, Clone)]
// struct Shift { employee_id: usize, start: i64, end: i64 }
//
// let same_employee = equal(|s: &Shift| s.employee_id);
// assert!(same_employee.matches(
//     &Shift { employee_id: 1, start: 0, end: 8 },
//     &Shift { employee_id: 1, start: 8, end: 16 }
// ));
// ```
//
// # Cross-joins
//
// Use [`equal_bi()`] for joins between different types:
//
// ```
// use reteforge_scoring::stream::joiner::equal_bi;
//
// #[derive(Debug, Clone)]
// struct Employee { id: usize }
// #[derive(Debug, Clone)]
// struct Shift { employee_id: Option<usize> }
//
// let by_id = equal_bi(
//     |shift: &Shift| shift.employee_id,
//     |emp: &Employee| Some(emp.id)
// );
// assert!(by_id.matches(&Shift { employee_id: Some(4) }, &Employee { id: 4 }));
// ```

mod comparison;
mod equal;
mod filtering;
mod overlapping;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};

use crate::graph::{EqKey, OrdKey};

pub use comparison::{greater_than, greater_than_or_equal, less_than, less_than_or_equal};
pub use equal::{equal, equal_bi};
pub use filtering::filtering;
pub use overlapping::overlapping;

pub(crate) type KeyFn<K> = Arc<dyn Fn(&[FactRef]) -> K + Send + Sync>;
pub(crate) type PairPredicate = Arc<dyn Fn(&[FactRef], &[FactRef]) -> bool + Send + Sync>;

// Comparison operator of an ordering joiner, read as `left OP right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl CompareOp {
    // Tests the outcome of `left.cmp(right)`.
    #[inline]
    pub fn test(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::LessThan => ordering == Ordering::Less,
            CompareOp::LessThanOrEqual => ordering != Ordering::Greater,
            CompareOp::GreaterThan => ordering == Ordering::Greater,
            CompareOp::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }
}

// Type-erased join condition over the facts of the left and right tuple.
#[derive(Clone)]
pub(crate) enum JoinCondition {
    Equal {
        left: KeyFn<EqKey>,
        right: KeyFn<EqKey>,
    },
    Compare {
        op: CompareOp,
        left: KeyFn<OrdKey>,
        right: KeyFn<OrdKey>,
        // Unindexed comparisons are always scanned.
        indexed: bool,
    },
    Predicate(PairPredicate),
}

impl JoinCondition {
    pub(crate) fn matches(&self, left: &[FactRef], right: &[FactRef]) -> bool {
        match self {
            JoinCondition::Equal { left: l, right: r } => l(left) == r(right),
            JoinCondition::Compare {
                op, left: l, right: r, ..
            } => op.test(l(left).cmp(&r(right))),
            JoinCondition::Predicate(predicate) => predicate(left, right),
        }
    }
}

// A condition between an `A` on the left and a `B` on the right of a join.
//
// Created by the functions of this module. Joiners of different kinds share
// this one type so a join can take a plain array of them.
pub struct Joiner<A, B> {
    condition: JoinCondition,
    _phantom: PhantomData<fn(&A, &B)>,
}

impl<A, B> Joiner<A, B> {
    pub(crate) fn new(condition: JoinCondition) -> Self {
        Self {
            condition,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn into_condition(self) -> JoinCondition {
        self.condition
    }

    // Returns true if this joiner is served by the join index.
    pub fn is_indexable(&self) -> bool {
        match &self.condition {
            JoinCondition::Equal { .. } => true,
            JoinCondition::Compare { indexed, .. } => *indexed,
            JoinCondition::Predicate(_) => false,
        }
    }
}

impl<A, B> Joiner<A, B>
where
    A: FactValue + Clone,
    B: FactValue + Clone,
{
    // Returns true if the two values should be joined.
    pub fn matches(&self, a: &A, b: &B) -> bool {
        let left: FactRef = Arc::new(a.clone());
        let right: FactRef = Arc::new(b.clone());
        self.condition
            .matches(std::slice::from_ref(&left), std::slice::from_ref(&right))
    }
}

impl<A, B> Clone for Joiner<A, B> {
    fn clone(&self) -> Self {
        Self::new(self.condition.clone())
    }
}

impl<A, B> std::fmt::Debug for Joiner<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.condition {
            JoinCondition::Equal { .. } => "equal",
            JoinCondition::Compare { .. } => "compare",
            JoinCondition::Predicate(_) => "predicate",
        };
        f.debug_struct("Joiner").field("kind", &kind).finish()
    }
}
