// Equal joiner for matching on property equality.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};

use super::{JoinCondition, Joiner};
use crate::graph::tuple::fact_at;
use crate::graph::EqKey;

// Creates a joiner that matches when a property is equal on both sides.
//
// This is the primary joiner for self-joins and unique pairs, where both
// sides are read from the same class.
//
// # Example
//
// ```
// use reteforge_scoring::stream::joiner::equal;
//
// #[derive(Debug, Clone)]
// struct Shift { employee_id: Option<usize>, start: i64 }
//
// let same_employee = equal(|s: &Shift| s.employee_id);
//
// let a = Shift { employee_id: Some(5), start: 0 };
// let b = Shift { employee_id: Some(5), start: 8 };
// let c = Shift { employee_id: Some(3), start: 16 };
//
// assert!(same_employee.matches(&a, &b));
// assert!(!same_employee.matches(&a, &c));
// ```
pub fn equal<A, T, F>(key: F) -> Joiner<A, A>
where
    A: FactValue,
    T: Eq + Hash + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync + 'static,
{
    let key = Arc::new(key);
    let right = Arc::clone(&key);
    Joiner::new(JoinCondition::Equal {
        left: Arc::new(move |facts: &[FactRef]| EqKey::new(key(fact_at::<A>(facts, 0)))),
        right: Arc::new(move |facts: &[FactRef]| EqKey::new(right(fact_at::<A>(facts, 0)))),
    })
}

// Creates a joiner that matches when extracted values are equal.
//
// Use this for cross-joins between different fact types.
//
// # Example
//
// ```
// use reteforge_scoring::stream::joiner::equal_bi;
//
// #[derive(Debug, Clone)]
// struct Employee { id: usize }
// #[derive(Debug, Clone)]
// struct Task { assigned_to: usize }
//
// let by_id = equal_bi(|e: &Employee| e.id, |t: &Task| t.assigned_to);
//
// assert!(by_id.matches(&Employee { id: 5 }, &Task { assigned_to: 5 }));
// assert!(!by_id.matches(&Employee { id: 5 }, &Task { assigned_to: 3 }));
// ```
pub fn equal_bi<A, B, T, Fa, Fb>(left: Fa, right: Fb) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    T: Eq + Hash + Debug + Send + Sync + 'static,
    Fa: Fn(&A) -> T + Send + Sync + 'static,
    Fb: Fn(&B) -> T + Send + Sync + 'static,
{
    Joiner::new(JoinCondition::Equal {
        left: Arc::new(move |facts: &[FactRef]| EqKey::new(left(fact_at::<A>(facts, 0)))),
        right: Arc::new(move |facts: &[FactRef]| EqKey::new(right(fact_at::<B>(facts, 0)))),
    })
}
