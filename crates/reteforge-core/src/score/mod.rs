//! Score types for representing solution quality
//!
//! The scoring engine only needs the arithmetic of a score: zero, addition,
//! subtraction, negation and scaling by a match weight. Each constraint's
//! match total and the session total are expressed in one of these types.

#[macro_use]
mod macros;
mod hard_medium_soft;
mod hard_soft;
mod simple;
mod traits;

#[cfg(test)]
mod tests;

pub use hard_medium_soft::HardMediumSoftScore;
pub use hard_soft::HardSoftScore;
pub use simple::SimpleScore;
pub use traits::{ParseableScore, Score, ScoreParseError};

/// Score level representing different constraint priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    /// Hard constraints - must be satisfied for feasibility
    Hard,
    /// Medium constraints - secondary priority
    Medium,
    /// Soft constraints - optimization objectives
    Soft,
}
