// Runtime constraint weight overrides.
//
// Overrides are keyed by constraint id (`"package/name"`) and consulted
// before a constraint's own weight extractor, so weights can be tuned per
// run without touching the constraint declarations.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use reteforge_core::{ConstraintRef, ParseableScore, Score, ScoringError};

// Constraint weights that replace the extracted ones.
#[derive(Clone, PartialEq, Eq)]
pub struct ConstraintWeightOverrides<Sc: Score> {
    weights: BTreeMap<String, Sc>,
}

impl<Sc: Score> Debug for ConstraintWeightOverrides<Sc> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintWeightOverrides")
            .field("count", &self.weights.len())
            .finish()
    }
}

impl<Sc: Score> Default for ConstraintWeightOverrides<Sc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Sc: Score> ConstraintWeightOverrides<Sc> {
    pub fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    // Creates overrides from (constraint id, weight) pairs.
    pub fn from_pairs<I, N>(iter: I) -> Self
    where
        I: IntoIterator<Item = (N, Sc)>,
        N: Into<String>,
    {
        let weights = iter.into_iter().map(|(n, w)| (n.into(), w)).collect();
        Self { weights }
    }

    // Sets the weight of a constraint by id.
    pub fn put<N: Into<String>>(&mut self, constraint_id: N, weight: Sc) {
        self.weights.insert(constraint_id.into(), weight);
    }

    // Sets the weight of a constraint by reference.
    pub fn put_ref(&mut self, constraint_ref: &ConstraintRef, weight: Sc) {
        self.weights.insert(constraint_ref.constraint_id(), weight);
    }

    pub fn remove(&mut self, constraint_id: &str) -> Option<Sc> {
        self.weights.remove(constraint_id)
    }

    pub fn get(&self, constraint_id: &str) -> Option<Sc> {
        self.weights.get(constraint_id).copied()
    }

    pub fn contains(&self, constraint_id: &str) -> bool {
        self.weights.contains_key(constraint_id)
    }

    // Iterates (constraint id, weight) in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Sc)> {
        self.weights.iter().map(|(id, w)| (id.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    // Creates an Arc-wrapped version for sharing between factories.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<Sc: ParseableScore> ConstraintWeightOverrides<Sc> {
    // Parses (constraint id, score text) pairs such as
    // `("people/Same group pair", "0hard/-2soft")`.
    //
    // An unparseable weight is a configuration error naming the constraint.
    pub fn parse_pairs<'a, I>(iter: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut overrides = Self::new();
        for (constraint_id, text) in iter {
            let weight = Sc::parse(text).map_err(|e| {
                ScoringError::Configuration(format!(
                    "The weight override ({}) of constraint ({}) is not a valid score: {}",
                    text, constraint_id, e
                ))
            })?;
            overrides.put(constraint_id, weight);
        }
        Ok(overrides)
    }
}

// Source of runtime weights, consulted by constraint id.
pub trait WeightProvider<Sc: Score>: Send + Sync {
    fn weight(&self, constraint_id: &str) -> Option<Sc>;

    fn weight_or_default(&self, constraint_id: &str, default: Sc) -> Sc {
        self.weight(constraint_id).unwrap_or(default)
    }
}

impl<Sc: Score> WeightProvider<Sc> for ConstraintWeightOverrides<Sc> {
    fn weight(&self, constraint_id: &str) -> Option<Sc> {
        self.get(constraint_id)
    }
}

impl<Sc: Score, P: WeightProvider<Sc> + ?Sized> WeightProvider<Sc> for Arc<P> {
    fn weight(&self, constraint_id: &str) -> Option<Sc> {
        (**self).weight(constraint_id)
    }
}
