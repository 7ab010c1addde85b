//! Session-facing result types.
//!
//! This module provides:
//! - Match totals and individual matches read by the outer solver
//! - Analysis types for score explanation and indictments
//! - Runtime weight override configuration

pub mod analysis;
pub mod match_total;
pub mod weight_overrides;

#[cfg(test)]
mod analysis_tests;
#[cfg(test)]
mod tests;

pub use analysis::{ConstraintAnalysis, EntityRef, Indictment, IndictmentMap, ScoreExplanation};
pub use match_total::{ConstraintMatch, ConstraintMatchTotal};
pub use weight_overrides::{ConstraintWeightOverrides, WeightProvider};
