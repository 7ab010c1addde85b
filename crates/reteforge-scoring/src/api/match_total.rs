//! Per-constraint match totals and individual matches.

use std::fmt;

use reteforge_core::domain::{downcast_fact, FactRef};
use reteforge_core::{ConstraintRef, Score};

use super::analysis::EntityRef;

/// Running total of one constraint's live matches.
///
/// Maintained incrementally by the scoring leaves of the constraint; it
/// starts at zero when the graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintMatchTotal<Sc: Score> {
    constraint_ref: ConstraintRef,
    weight: Sc,
    score: Sc,
    match_count: usize,
}

impl<Sc: Score> ConstraintMatchTotal<Sc> {
    pub fn new(constraint_ref: ConstraintRef, weight: Sc) -> Self {
        Self {
            constraint_ref,
            weight,
            score: Sc::zero(),
            match_count: 0,
        }
    }

    pub fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    /// Returns the `"package/name"` id of the constraint.
    pub fn constraint_id(&self) -> String {
        self.constraint_ref.constraint_id()
    }

    /// The validated weight the constraint was realized with.
    pub fn weight(&self) -> Sc {
        self.weight
    }

    /// Sum of the scores of all live matches.
    pub fn score(&self) -> Sc {
        self.score
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub(crate) fn add_match(&mut self, score: Sc) {
        self.score = self.score + score;
        self.match_count += 1;
    }

    pub(crate) fn remove_match(&mut self, score: Sc) {
        self.score = self.score - score;
        self.match_count -= 1;
    }
}

impl<Sc: Score> fmt::Display for ConstraintMatchTotal<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({} matches)",
            self.constraint_ref, self.score, self.match_count
        )
    }
}

/// One live match: the facts of the matched tuple and its signed score.
#[derive(Debug, Clone)]
pub struct ConstraintMatch<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    pub facts: Vec<FactRef>,
    pub score: Sc,
}

impl<Sc: Score> ConstraintMatch<Sc> {
    /// Returns the fact at `index` if it has type `A`.
    pub fn fact<A: 'static>(&self, index: usize) -> Option<&A> {
        self.facts.get(index).and_then(downcast_fact::<A>)
    }

    /// Lists the matched facts as entity references.
    pub fn entities(&self) -> Vec<EntityRef> {
        self.facts.iter().map(EntityRef::from_fact).collect()
    }
}
