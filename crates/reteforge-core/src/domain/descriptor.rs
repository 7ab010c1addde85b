//! Fact and solution descriptors.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::traits::PlanningId;
use crate::constraint::ConstraintRef;
use crate::error::{Result, ScoringError};
use crate::score::Score;

/// Describes one fact class to the scoring engine.
///
/// Accessors are stored as shared closures so that every stream reading the
/// class captures the same function value. The engine relies on that pointer
/// identity to share the implicit initialization filter between constraints.
///
/// # Example
///
/// ```
/// use reteforge_core::FactDescriptor;
///
/// #[derive(Debug)]
/// struct Lesson { id: u32, room: Option<u32> }
///
/// let descriptor = FactDescriptor::<Lesson>::new("Lesson")
///     .with_planning_id(|l: &Lesson| l.id)
///     .with_initialized_predicate(|l: &Lesson| l.room.is_some());
///
/// assert!(descriptor.has_planning_id());
/// assert!(descriptor.is_initialized(&Lesson { id: 1, room: Some(3) }));
/// assert!(!descriptor.is_initialized(&Lesson { id: 2, room: None }));
/// ```
pub struct FactDescriptor<A> {
    type_name: &'static str,
    is_initialized: Option<Arc<dyn Fn(&A) -> bool + Send + Sync>>,
    planning_id: Option<Arc<dyn Fn(&A, &A) -> Ordering + Send + Sync>>,
}

impl<A: 'static> FactDescriptor<A> {
    /// Creates a descriptor with no accessors.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            is_initialized: None,
            planning_id: None,
        }
    }

    /// Registers the "fully initialized" predicate of a class with planning
    /// variables. Streams declared with `declare_source` skip instances for
    /// which it returns false.
    pub fn with_initialized_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        self.is_initialized = Some(Arc::new(predicate));
        self
    }

    /// Registers the identity attribute getter.
    pub fn with_planning_id<K, F>(mut self, id: F) -> Self
    where
        K: Ord,
        F: Fn(&A) -> K + Send + Sync + 'static,
    {
        self.planning_id = Some(Arc::new(move |a: &A, b: &A| id(a).cmp(&id(b))));
        self
    }

    /// Registers the identity attribute of a type implementing [`PlanningId`].
    pub fn with_planning_id_of(self) -> Self
    where
        A: PlanningId,
    {
        self.with_planning_id(|a: &A| a.planning_id())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the initialization predicate, if the class has one.
    pub fn initialized_predicate(&self) -> Option<&Arc<dyn Fn(&A) -> bool + Send + Sync>> {
        self.is_initialized.as_ref()
    }

    /// Returns true if the instance is fully initialized (always true for
    /// classes without a predicate).
    pub fn is_initialized(&self, fact: &A) -> bool {
        self.is_initialized.as_ref().map_or(true, |p| p(fact))
    }

    pub fn has_planning_id(&self) -> bool {
        self.planning_id.is_some()
    }

    /// Returns the comparator over identity attributes, if the class has one.
    pub fn planning_id_comparator(&self) -> Option<&Arc<dyn Fn(&A, &A) -> Ordering + Send + Sync>> {
        self.planning_id.as_ref()
    }
}

impl<A> fmt::Debug for FactDescriptor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactDescriptor")
            .field("type_name", &self.type_name)
            .field("has_initialized_predicate", &self.is_initialized.is_some())
            .field("has_planning_id", &self.planning_id.is_some())
            .finish()
    }
}

/// Describes a planning solution at runtime.
///
/// Holds the fact descriptors of every class constraints may read and the
/// rules constraint weights must satisfy.
pub struct SolutionDescriptor {
    /// Name of the solution type.
    pub type_name: &'static str,
    /// Fact descriptors keyed by fact class.
    fact_descriptors: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    /// Names of the registered classes, for diagnostics.
    fact_type_names: HashMap<TypeId, &'static str>,
}

impl SolutionDescriptor {
    /// Creates an empty descriptor.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fact_descriptors: HashMap::new(),
            fact_type_names: HashMap::new(),
        }
    }

    /// Registers the descriptor of one fact class, replacing any earlier one.
    pub fn with_fact<A: Send + Sync + 'static>(mut self, descriptor: FactDescriptor<A>) -> Self {
        let type_id = TypeId::of::<A>();
        self.fact_type_names.insert(type_id, descriptor.type_name());
        self.fact_descriptors.insert(type_id, Arc::new(descriptor));
        self
    }

    /// Finds the descriptor of a fact class.
    pub fn find_fact_descriptor<A: Send + Sync + 'static>(&self) -> Option<Arc<FactDescriptor<A>>> {
        self.fact_descriptors
            .get(&TypeId::of::<A>())
            .cloned()
            .and_then(|d| d.downcast::<FactDescriptor<A>>().ok())
    }

    /// Returns the registered name of a fact class, if any.
    pub fn fact_type_name(&self, type_id: TypeId) -> Option<&'static str> {
        self.fact_type_names.get(&type_id).copied()
    }

    /// Returns the number of registered fact classes.
    pub fn fact_class_count(&self) -> usize {
        self.fact_descriptors.len()
    }

    /// Validates a constraint weight.
    ///
    /// A missing weight or a weight with a negative level is rejected: the
    /// sign of a constraint comes from penalize/reward, never from its weight.
    pub fn validate_constraint_weight<Sc: Score>(
        &self,
        constraint_ref: &ConstraintRef,
        weight: Option<Sc>,
    ) -> Result<Sc> {
        let Some(weight) = weight else {
            return Err(ScoringError::Configuration(format!(
                "The constraint weight of constraint ({}) in solution ({}) must not be missing.",
                constraint_ref, self.type_name
            )));
        };
        if weight.has_negative_level() {
            return Err(ScoringError::Configuration(format!(
                "The constraint weight ({}) of constraint ({}) must not have a negative level.",
                weight, constraint_ref
            )));
        }
        Ok(weight)
    }
}

impl fmt::Debug for SolutionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.fact_type_names.values().collect();
        names.sort();
        f.debug_struct("SolutionDescriptor")
            .field("type_name", &self.type_name)
            .field("facts", &names)
            .finish()
    }
}
