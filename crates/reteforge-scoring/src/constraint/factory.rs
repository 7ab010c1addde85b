// Constraint factory.
//
// The factory is the entry point for declaring constraints. It carries the
// solution descriptor every constraint reads fact classes through, and the
// optional runtime weight overrides.

use std::marker::PhantomData;
use std::sync::Arc;

use reteforge_core::domain::SolutionDescriptor;
use reteforge_core::{ConstraintRef, Score};

use super::Constraint;
use crate::api::weight_overrides::WeightProvider;

/// Factory for constraints over solutions of type `S` scored with `Sc`.
///
/// # Example
///
/// ```
/// use reteforge_core::{HardSoftScore, SolutionDescriptor};
/// use reteforge_scoring::ConstraintFactory;
///
/// struct Timetable { room_conflict_weight: HardSoftScore }
///
/// let factory = ConstraintFactory::<Timetable, HardSoftScore>::new(SolutionDescriptor::new("Timetable"));
/// let constraint = factory.constraint("timetable", "Room conflict", |t: &Timetable| Some(t.room_conflict_weight));
///
/// assert_eq!(constraint.constraint_id(), "timetable/Room conflict");
/// let weight = constraint
///     .extract_constraint_weight(&Timetable { room_conflict_weight: HardSoftScore::ONE_HARD })
///     .unwrap();
/// assert_eq!(weight, HardSoftScore::ONE_HARD);
/// ```
pub struct ConstraintFactory<S, Sc: Score> {
    solution_descriptor: Arc<SolutionDescriptor>,
    weight_overrides: Option<Arc<dyn WeightProvider<Sc>>>,
    _phantom: PhantomData<fn(&S)>,
}

impl<S, Sc: Score> Clone for ConstraintFactory<S, Sc> {
    fn clone(&self) -> Self {
        Self {
            solution_descriptor: Arc::clone(&self.solution_descriptor),
            weight_overrides: self.weight_overrides.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<S, Sc: Score> ConstraintFactory<S, Sc> {
    pub fn new(solution_descriptor: SolutionDescriptor) -> Self {
        Self::from_shared(Arc::new(solution_descriptor))
    }

    /// Creates a factory over a descriptor shared with other factories.
    pub fn from_shared(solution_descriptor: Arc<SolutionDescriptor>) -> Self {
        Self {
            solution_descriptor,
            weight_overrides: None,
            _phantom: PhantomData,
        }
    }

    /// Consults `provider` before each constraint's own weight extractor.
    pub fn with_weight_overrides<P>(mut self, provider: P) -> Self
    where
        P: WeightProvider<Sc> + 'static,
    {
        self.weight_overrides = Some(Arc::new(provider));
        self
    }

    pub fn solution_descriptor(&self) -> &Arc<SolutionDescriptor> {
        &self.solution_descriptor
    }

    /// Creates a constraint with no pipelines yet.
    pub fn constraint<F>(
        &self,
        package: impl Into<String>,
        name: impl Into<String>,
        weight: F,
    ) -> Constraint<S, Sc>
    where
        F: Fn(&S) -> Option<Sc> + Send + Sync + 'static,
    {
        Constraint::new(
            ConstraintRef::new(package, name),
            Arc::new(weight),
            self.weight_overrides.clone(),
            Arc::clone(&self.solution_descriptor),
        )
    }
}
