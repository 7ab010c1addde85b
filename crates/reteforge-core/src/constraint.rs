//! Constraint identification.
//!
//! A constraint is identified by its package and name. The composed id is
//! what the outer scorer uses to read a constraint's match total.

use std::fmt;

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use reteforge_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("people", "Same group pair");
/// assert_eq!(cr.constraint_id(), "people/Same group pair");
///
/// let bare = ConstraintRef::new("", "Unassigned");
/// assert_eq!(bare.constraint_id(), "Unassigned");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintRef {
    /// Package/module containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    /// Creates a new constraint reference.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Composes the constraint id from package and name.
    pub fn compose_id(package: &str, name: &str) -> String {
        if package.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", package, name)
        }
    }

    /// Returns the fully qualified constraint id (`package/name`).
    pub fn constraint_id(&self) -> String {
        Self::compose_id(&self.package, &self.name)
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint_id())
    }
}

/// Whether a constraint subtracts from or adds to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactType {
    /// Penalize (subtract from score).
    Penalty,
    /// Reward (add to score).
    Reward,
}

impl ImpactType {
    /// Applies the sign of this impact to a non-negative score.
    #[inline]
    pub fn apply<Sc: crate::score::Score>(self, score: Sc) -> Sc {
        match self {
            ImpactType::Penalty => -score,
            ImpactType::Reward => score,
        }
    }
}
