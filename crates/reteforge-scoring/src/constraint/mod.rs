//! Constraints and the factory that creates them.
//!
//! A [`Constraint`] owns the pipelines that compute one weighted
//! contribution and the function extracting its weight from the working
//! solution. Pipelines are declared against the constraint so that fact
//! classes are read through the solution's fact descriptors.

mod factory;


use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::sync::Arc;

use reteforge_core::domain::{FactDescriptor, FactRef, FactValue, SolutionDescriptor};
use reteforge_core::{ConstraintRef, Result, Score, ScoringError};

use crate::api::weight_overrides::WeightProvider;
use crate::graph::tuple::fact_at;
use crate::graph::BuildPolicy;
use crate::stream::joiner::{JoinCondition, Joiner};
use crate::stream::{BiStream, FnIdentity, PipelineDescriptor, SourceDef, StreamDef, TuplePredicate, UniStream};

pub use factory::ConstraintFactory;

pub(crate) type WeightExtractor<S, Sc> = Arc<dyn Fn(&S) -> Option<Sc> + Send + Sync>;

/// One weighted contribution to the score.
pub struct Constraint<S, Sc: Score> {
    constraint_ref: ConstraintRef,
    weight_extractor: WeightExtractor<S, Sc>,
    weight_overrides: Option<Arc<dyn WeightProvider<Sc>>>,
    solution_descriptor: Arc<SolutionDescriptor>,
    pipelines: Vec<PipelineDescriptor>,
}

impl<S, Sc: Score> Constraint<S, Sc> {
    pub(crate) fn new(
        constraint_ref: ConstraintRef,
        weight_extractor: WeightExtractor<S, Sc>,
        weight_overrides: Option<Arc<dyn WeightProvider<Sc>>>,
        solution_descriptor: Arc<SolutionDescriptor>,
    ) -> Self {
        Self {
            constraint_ref,
            weight_extractor,
            weight_overrides,
            solution_descriptor,
            pipelines: Vec::new(),
        }
    }

    pub fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    /// Returns the `"package/name"` id (just `"name"` for an empty package).
    pub fn constraint_id(&self) -> String {
        self.constraint_ref.constraint_id()
    }

    pub fn pipelines(&self) -> &[PipelineDescriptor] {
        &self.pipelines
    }

    /// Adds a finished pipeline. All pipelines of a constraint feed the same
    /// match total.
    pub fn add_pipeline(&mut self, pipeline: PipelineDescriptor) -> &mut Self {
        self.pipelines.push(pipeline);
        self
    }

    /// Declares a stream over every fully initialized `A`.
    ///
    /// If `A`'s fact descriptor has an initialization predicate, the stream
    /// is filtered by it. Every stream declared this way for one class shares
    /// that filter's node.
    pub fn declare_source<A: FactValue>(&self) -> UniStream<A> {
        let descriptor = self.solution_descriptor.find_fact_descriptor::<A>();
        let stream = Self::source_stream(descriptor.as_ref());
        match descriptor.as_ref().and_then(|d| d.initialized_predicate()) {
            Some(predicate) => {
                let identity = FnIdentity::of(predicate);
                let predicate = Arc::clone(predicate);
                let erased: TuplePredicate =
                    Arc::new(move |facts: &[FactRef]| predicate(fact_at::<A>(facts, 0)));
                stream.filter_erased(erased, identity)
            }
            None => stream,
        }
    }

    /// Declares a stream over every `A`, initialized or not.
    pub fn declare_source_unfiltered<A: FactValue>(&self) -> UniStream<A> {
        let descriptor = self.solution_descriptor.find_fact_descriptor::<A>();
        Self::source_stream(descriptor.as_ref())
    }

    fn source_stream<A: FactValue>(descriptor: Option<&Arc<FactDescriptor<A>>>) -> UniStream<A> {
        let source = SourceDef {
            class: TypeId::of::<A>(),
            class_name: descriptor.map_or_else(std::any::type_name::<A>, |d| d.type_name()),
            descriptor: descriptor.map(|d| Arc::clone(d) as Arc<dyn Any + Send + Sync>),
        };
        UniStream::from_def(Arc::new(StreamDef::Source(source)))
    }

    /// Declares a stream over unique pairs of distinct, initialized `A`s.
    ///
    /// Each unordered pair is produced once, ordered by planning id, so `A`
    /// must have one. The joiners narrow the pairs further; at least one is
    /// required.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` for an empty joiner list, `Configuration` if
    /// `A` has no planning id.
    pub fn declare_unique_pair<A: FactValue>(
        &self,
        joiners: impl IntoIterator<Item = Joiner<A, A>>,
    ) -> Result<BiStream<A, A>> {
        let mut joiners: Vec<_> = joiners.into_iter().collect();
        if joiners.is_empty() {
            return self.declare_unique_pair_unjoined::<A>();
        }
        let descriptor = self.solution_descriptor.find_fact_descriptor::<A>();
        let Some(compare) = descriptor
            .as_ref()
            .and_then(|d| d.planning_id_comparator())
            .cloned()
        else {
            return Err(ScoringError::Configuration(format!(
                "The fact class ({}) used in a unique pair of constraint ({}) has no planning id.",
                std::any::type_name::<A>(),
                self.constraint_ref
            )));
        };
        joiners.push(Joiner::new(JoinCondition::Predicate(Arc::new(
            move |left: &[FactRef], right: &[FactRef]| {
                compare(fact_at::<A>(left, 0), fact_at::<A>(right, 0)) == Ordering::Less
            },
        ))));
        let source = self.declare_source::<A>();
        Ok(source.clone().join(source, joiners))
    }

    /// Always fails: unique pairs without a joiner are not supported.
    pub fn declare_unique_pair_unjoined<A: FactValue>(&self) -> Result<BiStream<A, A>> {
        Err(ScoringError::UnsupportedOperation(format!(
            "Unique pairs of ({}) in constraint ({}) need at least one joiner.",
            std::any::type_name::<A>(),
            self.constraint_ref
        )))
    }

    /// Extracts and validates the constraint weight.
    ///
    /// A runtime override for the constraint id takes precedence over the
    /// extractor. A missing weight or one with a negative level is a
    /// `Configuration` error.
    pub fn extract_constraint_weight(&self, solution: &S) -> Result<Sc> {
        let overridden = self
            .weight_overrides
            .as_ref()
            .and_then(|provider| provider.weight(&self.constraint_id()));
        let weight = overridden.or_else(|| (self.weight_extractor)(solution));
        self.solution_descriptor
            .validate_constraint_weight(&self.constraint_ref, weight)
    }

    /// Instantiates this constraint's pipelines into the graph under
    /// construction. A zero weight registers the constraint without nodes.
    pub fn realize(&self, policy: &mut BuildPolicy<Sc>, weight: Sc) -> Result<()> {
        policy.realize_constraint(self.constraint_ref.clone(), weight, self.pipelines.clone())
    }
}

impl<S, Sc: Score> std::fmt::Debug for Constraint<S, Sc> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint")
            .field("constraint_ref", &self.constraint_ref)
            .field("pipelines", &self.pipelines)
            .finish()
    }
}
