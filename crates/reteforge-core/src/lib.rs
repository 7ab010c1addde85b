//! ReteForge Core - shared types for incremental constraint scoring
//!
//! This crate provides the collaborators the scoring engine consumes:
//! - Score types and their arithmetic
//! - Constraint identification (`ConstraintRef`, `ImpactType`)
//! - Domain descriptors supplying identity and initialization accessors
//! - The error type shared by graph construction and propagation

pub mod constraint;
pub mod domain;
pub mod error;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use domain::{FactDescriptor, FactRef, FactValue, PlanningId, SolutionDescriptor};
pub use error::{Result, ScoringError};
pub use score::{
    HardMediumSoftScore, HardSoftScore, ParseableScore, Score, ScoreLevel, ScoreParseError,
    SimpleScore,
};
