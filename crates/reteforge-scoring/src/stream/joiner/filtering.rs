//! Filtering joiner for custom predicate matching.

use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};

use super::{JoinCondition, Joiner};
use crate::graph::tuple::fact_at;

/// Creates a joiner that matches based on a custom predicate.
///
/// Filtering joiners are never indexed.
///
/// # Example
///
/// ```
/// use reteforge_scoring::stream::joiner::filtering;
///
/// #[derive(Debug, Clone)]
/// struct Task { priority: i32, id: i32 }
///
/// let higher_priority = filtering(|a: &Task, b: &Task| a.priority > b.priority);
///
/// assert!(higher_priority.matches(&Task { priority: 10, id: 1 }, &Task { priority: 5, id: 2 }));
/// assert!(!higher_priority.matches(&Task { priority: 5, id: 1 }, &Task { priority: 10, id: 2 }));
/// ```
pub fn filtering<A, B, F>(predicate: F) -> Joiner<A, B>
where
    A: FactValue,
    B: FactValue,
    F: Fn(&A, &B) -> bool + Send + Sync + 'static,
{
    Joiner::new(JoinCondition::Predicate(Arc::new(move |left: &[FactRef], right: &[FactRef]| {
        predicate(fact_at::<A>(left, 0), fact_at::<B>(right, 0))
    })))
}
