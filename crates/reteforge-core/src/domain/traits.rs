//! Core domain traits

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// A value that can flow through the node graph.
///
/// Implemented for every `'static` type that is `Debug + Send + Sync`, so
/// plain domain structs, group keys and collector results all qualify.
pub trait FactValue: Any + Debug + Send + Sync {
    /// Cast to Any for downcasting back to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Returns the concrete type name (for diagnostics and explanations).
    fn value_type_name(&self) -> &'static str;
}

impl<T: Any + Debug + Send + Sync> FactValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shared, type-erased reference to a fact (or a derived value).
pub type FactRef = Arc<dyn FactValue>;

/// Downcasts a fact reference to its concrete type.
///
/// Goes through the trait object explicitly: calling `as_any` on the `Arc`
/// itself would resolve to the blanket impl for `Arc<dyn FactValue>`.
///
/// ```
/// use std::sync::Arc;
/// use reteforge_core::domain::{downcast_fact, FactRef};
///
/// let fact: FactRef = Arc::new(42_i64);
/// assert_eq!(downcast_fact::<i64>(&fact), Some(&42));
/// assert_eq!(downcast_fact::<u8>(&fact), None);
/// ```
#[inline]
pub fn downcast_fact<A: 'static>(fact: &FactRef) -> Option<&A> {
    let value: &dyn FactValue = fact.as_ref();
    value.as_any().downcast_ref::<A>()
}

/// Trait for unique identification of facts.
///
/// The identity of a fact must never change while it is inserted in a
/// session. Ordering over ids is what makes pair enumeration unique.
///
/// ```
/// use reteforge_core::PlanningId;
///
/// struct Task {
///     id: i64,
/// }
///
/// impl PlanningId for Task {
///     type Id = i64;
///     fn planning_id(&self) -> i64 { self.id }
/// }
/// ```
pub trait PlanningId {
    /// The type of the unique identifier.
    type Id: Ord + Hash + Clone + Send + Sync + 'static;

    /// Returns the unique identifier for this object.
    fn planning_id(&self) -> Self::Id;
}
