//! The scoring session: one node graph plus the facts propagated through it.
//!
//! A session is built once from the declared constraints. Afterwards every
//! [`insert`](ScoringSession::insert), [`update`](ScoringSession::update) and
//! [`retract`](ScoringSession::retract) is propagated synchronously, so the
//! score read right after a mutation already reflects it.

mod propagation;
mod settings;

#[cfg(test)]
mod tests;

use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::Arc;

use reteforge_core::domain::{downcast_fact, FactRef, FactValue};
use reteforge_core::{Result, Score, ScoringError};
use tracing::{debug, trace, warn};

use crate::api::analysis::{ConstraintAnalysis, ScoreExplanation};
use crate::api::match_total::{ConstraintMatch, ConstraintMatchTotal};
use crate::constraint::Constraint;
use crate::graph::node::NodeKind;
use crate::graph::tuple::TupleIdSequence;
use crate::graph::{BuildPolicy, FactHandle, NodeGraph};
use propagation::Propagator;

pub use settings::{EnvironmentMode, SessionSettings, UpdateMode};

struct FactEntry {
    fact: FactRef,
    class: TypeId,
    class_name: &'static str,
}

fn class_of(fact: &FactRef) -> (TypeId, &'static str) {
    let value: &dyn FactValue = fact.as_ref();
    (value.as_any().type_id(), value.value_type_name())
}

/// Incremental scoring session.
///
/// # Example
///
/// ```
/// use reteforge_core::{SimpleScore, SolutionDescriptor};
/// use reteforge_scoring::{ConstraintFactory, ScoringSession};
///
/// #[derive(Debug)]
/// struct Shift { hours: u32 }
///
/// let factory = ConstraintFactory::<(), SimpleScore>::new(SolutionDescriptor::new("Roster"));
/// let mut long_shift = factory.constraint("roster", "Long shift", |_| Some(SimpleScore::ONE));
/// let pipeline = long_shift
///     .declare_source::<Shift>()
///     .filter(|s: &Shift| s.hours > 8)
///     .penalize_weighted(|s: &Shift| i64::from(s.hours - 8));
/// long_shift.add_pipeline(pipeline);
///
/// let mut session = ScoringSession::new();
/// session.build_graph(&[long_shift], &()).unwrap();
///
/// let shift = session.insert(Shift { hours: 10 }).unwrap();
/// assert_eq!(session.score(), SimpleScore::of(-2));
///
/// session.update(shift, Shift { hours: 7 }).unwrap();
/// assert_eq!(session.score(), SimpleScore::ZERO);
/// ```
pub struct ScoringSession<Sc: Score> {
    settings: SessionSettings,
    graph: Option<NodeGraph<Sc>>,
    totals: Vec<ConstraintMatchTotal<Sc>>,
    facts: BTreeMap<FactHandle, FactEntry>,
    next_handle: u64,
    tuple_ids: TupleIdSequence,
}

impl<Sc: Score> Default for ScoringSession<Sc> {
    fn default() -> Self {
        Self::new()
    }
}

fn initial_totals<Sc: Score>(graph: &NodeGraph<Sc>) -> Vec<ConstraintMatchTotal<Sc>> {
    graph
        .constraints
        .iter()
        .map(|c| ConstraintMatchTotal::new(c.constraint_ref.clone(), c.weight))
        .collect()
}

impl<Sc: Score> ScoringSession<Sc> {
    pub fn new() -> Self {
        Self::with_settings(SessionSettings::default())
    }

    pub fn with_settings(settings: SessionSettings) -> Self {
        Self {
            settings,
            graph: None,
            totals: Vec::new(),
            facts: BTreeMap::new(),
            next_handle: 0,
            tuple_ids: TupleIdSequence::default(),
        }
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn is_built(&self) -> bool {
        self.graph.is_some()
    }

    /// Compiles every constraint into one shared node graph.
    ///
    /// Calling this again on a built session does nothing. On error the
    /// session stays unbuilt.
    pub fn build_graph<S>(&mut self, constraints: &[Constraint<S, Sc>], solution: &S) -> Result<()> {
        if self.graph.is_some() {
            debug!(event = "graph_already_built");
            return Ok(());
        }
        let mut policy = BuildPolicy::new();
        for constraint in constraints {
            let weight = constraint.extract_constraint_weight(solution)?;
            constraint.realize(&mut policy, weight)?;
        }
        let graph = policy.into_graph();
        self.totals = initial_totals(&graph);
        self.graph = Some(graph);
        Ok(())
    }

    pub fn graph(&self) -> Result<&NodeGraph<Sc>> {
        self.graph.as_ref().ok_or(ScoringError::GraphNotBuilt)
    }

    /// Inserts a fact and propagates it.
    pub fn insert<A: FactValue>(&mut self, fact: A) -> Result<FactHandle> {
        self.insert_fact(Arc::new(fact))
    }

    /// Inserts an already shared fact.
    pub fn insert_fact(&mut self, fact: FactRef) -> Result<FactHandle> {
        let graph = self.graph.as_mut().ok_or(ScoringError::GraphNotBuilt)?;
        let handle = FactHandle(self.next_handle);
        self.next_handle += 1;
        let (class, class_name) = class_of(&fact);
        let propagated = Propagator::new(graph, &mut self.totals, &mut self.tuple_ids).insert(
            class,
            handle,
            Arc::clone(&fact),
        );
        trace!(event = "insert", handle = %handle, class = class_name, propagated = propagated);
        self.facts.insert(
            handle,
            FactEntry {
                fact,
                class,
                class_name,
            },
        );
        self.after_mutation()?;
        Ok(handle)
    }

    /// Replaces a fact with a new value of the same class and propagates
    /// the change.
    pub fn update<A: FactValue>(&mut self, handle: FactHandle, fact: A) -> Result<()> {
        self.update_fact(handle, Arc::new(fact))
    }

    pub fn update_fact(&mut self, handle: FactHandle, fact: FactRef) -> Result<()> {
        let graph = self.graph.as_mut().ok_or(ScoringError::GraphNotBuilt)?;
        let entry = self
            .facts
            .get_mut(&handle)
            .ok_or(ScoringError::UnknownFact(handle.id()))?;
        let (class, class_name) = class_of(&fact);
        if class != entry.class {
            return Err(ScoringError::FactClassMismatch {
                handle: handle.id(),
                expected: entry.class_name,
                actual: class_name,
            });
        }
        entry.fact = Arc::clone(&fact);
        let mode = self.settings.update_mode;
        let propagated = Propagator::new(graph, &mut self.totals, &mut self.tuple_ids)
            .update(class, handle, fact, mode);
        trace!(event = "update", handle = %handle, class = class_name, mode = ?mode, propagated = propagated);
        self.after_mutation()
    }

    /// Removes a fact and everything derived from it.
    pub fn retract(&mut self, handle: FactHandle) -> Result<()> {
        let graph = self.graph.as_mut().ok_or(ScoringError::GraphNotBuilt)?;
        let entry = self
            .facts
            .remove(&handle)
            .ok_or(ScoringError::UnknownFact(handle.id()))?;
        let propagated =
            Propagator::new(graph, &mut self.totals, &mut self.tuple_ids).retract(entry.class, handle);
        trace!(event = "retract", handle = %handle, class = entry.class_name, propagated = propagated);
        self.after_mutation()
    }

    fn after_mutation(&self) -> Result<()> {
        if self.settings.environment_mode.is_asserted() {
            self.assert_incremental_matches_rebuild()
        } else {
            Ok(())
        }
    }

    /// Returns the live fact behind a handle.
    pub fn fact<A: 'static>(&self, handle: FactHandle) -> Option<&A> {
        self.facts
            .get(&handle)
            .and_then(|entry| downcast_fact::<A>(&entry.fact))
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Sum of every constraint's match total.
    pub fn score(&self) -> Sc {
        self.totals
            .iter()
            .fold(Sc::zero(), |score, total| score + total.score())
    }

    pub fn constraint_match_totals(&self) -> &[ConstraintMatchTotal<Sc>] {
        &self.totals
    }

    pub fn constraint_match_total(&self, constraint_id: &str) -> Result<&ConstraintMatchTotal<Sc>> {
        self.totals
            .iter()
            .find(|total| total.constraint_id() == constraint_id)
            .ok_or_else(|| ScoringError::UnknownConstraint(constraint_id.to_string()))
    }

    /// Lists the matches currently contributing to one constraint, oldest
    /// tuple first.
    pub fn constraint_matches(&self, constraint_id: &str) -> Result<Vec<ConstraintMatch<Sc>>> {
        let graph = self.graph()?;
        let constraint = graph
            .constraints
            .iter()
            .find(|c| c.constraint_ref.constraint_id() == constraint_id)
            .ok_or_else(|| ScoringError::UnknownConstraint(constraint_id.to_string()))?;
        let mut live = Vec::new();
        for leaf in &constraint.leaves {
            if let NodeKind::Scoring(node) = &graph.nodes[leaf.0].kind {
                live.extend(node.live_matches());
            }
        }
        live.sort_by_key(|(id, _)| **id);
        Ok(live
            .into_iter()
            .map(|(_, m)| ConstraintMatch {
                constraint_ref: constraint.constraint_ref.clone(),
                facts: m.facts.to_vec(),
                score: m.score,
            })
            .collect())
    }

    /// Breaks the score down per constraint and per match.
    pub fn explain(&self) -> Result<ScoreExplanation<Sc>> {
        let mut analyses = Vec::with_capacity(self.totals.len());
        for total in &self.totals {
            let matches = self.constraint_matches(&total.constraint_id())?;
            analyses.push(ConstraintAnalysis::new(
                total.constraint_ref().clone(),
                total.weight(),
                total.score(),
                matches,
            ));
        }
        Ok(ScoreExplanation::new(self.score(), analyses))
    }

    /// Rebuilds the graph from scratch, replays the live facts and compares
    /// every match total with the incremental one.
    ///
    /// # Errors
    ///
    /// `ScoreCorruption` naming the first constraint whose totals differ.
    pub fn assert_incremental_matches_rebuild(&self) -> Result<()> {
        let graph = self.graph()?;
        let mut policy = BuildPolicy::new();
        for constraint in &graph.constraints {
            policy.realize_constraint(
                constraint.constraint_ref.clone(),
                constraint.weight,
                constraint.pipelines.clone(),
            )?;
        }
        let mut rebuilt = policy.into_graph();
        let mut totals = initial_totals(&rebuilt);
        let mut tuple_ids = TupleIdSequence::default();
        for (&handle, entry) in &self.facts {
            Propagator::new(&mut rebuilt, &mut totals, &mut tuple_ids).insert(
                entry.class,
                handle,
                Arc::clone(&entry.fact),
            );
        }
        for (incremental, expected) in self.totals.iter().zip(&totals) {
            if incremental.score() != expected.score()
                || incremental.match_count() != expected.match_count()
            {
                warn!(
                    event = "score_corruption",
                    constraint = %incremental.constraint_ref(),
                    incremental = %incremental.score(),
                    rebuilt = %expected.score(),
                );
                return Err(ScoringError::ScoreCorruption {
                    constraint_id: incremental.constraint_id(),
                    incremental: format!("{} ({} matches)", incremental.score(), incremental.match_count()),
                    rebuilt: format!("{} ({} matches)", expected.score(), expected.match_count()),
                });
            }
        }
        Ok(())
    }
}

impl<Sc: Score> std::fmt::Debug for ScoringSession<Sc> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringSession")
            .field("settings", &self.settings)
            .field("graph", &self.graph)
            .field("facts", &self.facts.len())
            .field("score", &self.score())
            .finish()
    }
}
