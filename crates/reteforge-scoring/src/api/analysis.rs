//! Score explanation: the live matches of every constraint, and the same
//! matches regrouped per fact as indictments.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use reteforge_core::domain::{downcast_fact, FactRef, FactValue};
use reteforge_core::score::{Score, ScoreLevel};
use reteforge_core::ConstraintRef;

use super::match_total::ConstraintMatch;

/// A fact as it appears in an explanation.
///
/// Two references are equal when their type and debug rendering agree, so
/// equal values from separate handles are indicted together. The fact itself
/// is shared and outlives its retraction.
#[derive(Clone)]
pub struct EntityRef {
    /// Full type name of the fact.
    pub type_name: String,
    /// Debug rendering of the fact.
    pub display: String,
    entity: FactRef,
}

impl EntityRef {
    /// Wraps a copy of `entity`.
    pub fn new<T: FactValue + Clone>(entity: &T) -> Self {
        let fact: FactRef = Arc::new(entity.clone());
        Self::from_fact(&fact)
    }

    pub fn from_fact(fact: &FactRef) -> Self {
        let value: &dyn FactValue = fact.as_ref();
        Self {
            type_name: value.value_type_name().to_string(),
            display: format!("{:?}", value),
            entity: Arc::clone(fact),
        }
    }

    pub fn as_entity<T: 'static>(&self) -> Option<&T> {
        downcast_fact::<T>(&self.entity)
    }

    /// Type name without its module path.
    pub fn short_type_name(&self) -> &str {
        self.type_name.rsplit("::").next().unwrap_or(&self.type_name)
    }
}

impl Debug for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.display == other.display
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.display.hash(state);
    }
}

/// One constraint's share of a score explanation.
#[derive(Debug, Clone)]
pub struct ConstraintAnalysis<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    /// Weight the constraint was built with.
    pub weight: Sc,
    /// Sum of the match scores.
    pub score: Sc,
    /// Live matches, in match order.
    pub matches: Vec<ConstraintMatch<Sc>>,
    /// True when the weight's leading non-zero level is a hard level.
    pub is_hard: bool,
}

impl<Sc: Score> ConstraintAnalysis<Sc> {
    pub fn new(constraint_ref: ConstraintRef, weight: Sc, score: Sc, matches: Vec<ConstraintMatch<Sc>>) -> Self {
        Self {
            is_hard: weight.leading_level() == Some(ScoreLevel::Hard),
            constraint_ref,
            weight,
            score,
            matches,
        }
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }
}

/// Snapshot of a session's score broken down per constraint.
#[derive(Debug, Clone)]
pub struct ScoreExplanation<Sc: Score> {
    pub score: Sc,
    /// One entry per registered constraint, in registration order.
    pub constraint_analyses: Vec<ConstraintAnalysis<Sc>>,
}

impl<Sc: Score> ScoreExplanation<Sc> {
    pub fn new(score: Sc, constraint_analyses: Vec<ConstraintAnalysis<Sc>>) -> Self {
        Self {
            score,
            constraint_analyses,
        }
    }

    pub fn total_match_count(&self) -> usize {
        self.constraint_analyses.iter().map(ConstraintAnalysis::match_count).sum()
    }

    /// Constraints contributing a non-zero score.
    pub fn non_zero_constraints(&self) -> Vec<&ConstraintAnalysis<Sc>> {
        self.constraint_analyses
            .iter()
            .filter(|a| !a.score.is_zero())
            .collect()
    }

    pub fn all_matches(&self) -> impl Iterator<Item = &ConstraintMatch<Sc>> {
        self.constraint_analyses.iter().flat_map(|a| &a.matches)
    }

    /// Regroups every match under each fact it involves.
    pub fn indictments(&self) -> IndictmentMap<Sc> {
        IndictmentMap::from_matches(self.all_matches())
    }
}

/// Every match one fact takes part in.
#[derive(Debug, Clone)]
pub struct Indictment<Sc: Score> {
    pub entity: EntityRef,
    /// Sum of the scores of the matches below.
    pub score: Sc,
    /// Matches keyed by constraint id.
    pub constraint_matches: BTreeMap<String, Vec<ConstraintMatch<Sc>>>,
}

impl<Sc: Score> Indictment<Sc> {
    fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            score: Sc::zero(),
            constraint_matches: BTreeMap::new(),
        }
    }

    fn add_match(&mut self, constraint_match: &ConstraintMatch<Sc>) {
        self.score = self.score + constraint_match.score;
        self.constraint_matches
            .entry(constraint_match.constraint_ref.constraint_id())
            .or_default()
            .push(constraint_match.clone());
    }

    pub fn match_count(&self) -> usize {
        self.constraint_matches.values().map(Vec::len).sum()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraint_matches.len()
    }
}

/// Indictments of every fact that appears in at least one match.
#[derive(Debug, Clone)]
pub struct IndictmentMap<Sc: Score> {
    indictments: HashMap<EntityRef, Indictment<Sc>>,
}

impl<Sc: Score> IndictmentMap<Sc> {
    pub fn from_matches<'a, I>(matches: I) -> Self
    where
        I: IntoIterator<Item = &'a ConstraintMatch<Sc>>,
    {
        let mut indictments: HashMap<EntityRef, Indictment<Sc>> = HashMap::new();
        for m in matches {
            for entity in m.entities() {
                indictments
                    .entry(entity.clone())
                    .or_insert_with(|| Indictment::new(entity))
                    .add_match(m);
            }
        }
        Self { indictments }
    }

    pub fn get(&self, entity: &EntityRef) -> Option<&Indictment<Sc>> {
        self.indictments.get(entity)
    }

    /// Facts ordered from the most negative score up; ties by rendering.
    pub fn worst_entities(&self) -> Vec<&EntityRef> {
        let mut entities: Vec<_> = self.indictments.values().collect();
        entities.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.entity.display.cmp(&b.entity.display)));
        entities.into_iter().map(|i| &i.entity).collect()
    }

    pub fn len(&self) -> usize {
        self.indictments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indictments.is_empty()
    }
}

impl<Sc: Score> Default for IndictmentMap<Sc> {
    fn default() -> Self {
        Self {
            indictments: HashMap::new(),
        }
    }
}
