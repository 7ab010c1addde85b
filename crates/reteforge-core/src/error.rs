//! Error types for ReteForge

use thiserror::Error;

/// Errors raised while building a node graph or applying fact mutations.
///
/// Construction errors (`Configuration`, `ConstructionConflict`,
/// `UnsupportedOperation`) abort the whole graph build. The caller fixes the
/// declared constraints and builds again; nothing is retried internally.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Invalid constraint weight or a domain class missing a required accessor.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Two incompatible node definitions were registered for one fact class.
    #[error("Construction conflict for fact class {class}: {message}")]
    ConstructionConflict {
        /// Name of the conflicting fact class.
        class: &'static str,
        /// Description of both definitions.
        message: String,
    },

    /// An operation that is deliberately left unimplemented.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A fact mutation or query was issued before the graph was built.
    #[error("The node graph has not been built yet")]
    GraphNotBuilt,

    /// The fact handle does not refer to a live fact of this session.
    #[error("Unknown fact handle {0}")]
    UnknownFact(u64),

    /// An update tried to replace a fact with a value of another class.
    #[error("Fact {handle} is a {expected}, not a {actual}")]
    FactClassMismatch {
        handle: u64,
        expected: &'static str,
        actual: &'static str,
    },

    /// No constraint with this id was declared.
    #[error("Unknown constraint: {0}")]
    UnknownConstraint(String),

    /// The incremental match total disagrees with a from-scratch rebuild.
    #[error("Score corruption in constraint {constraint_id}: incremental total {incremental}, rebuilt total {rebuilt}")]
    ScoreCorruption {
        constraint_id: String,
        incremental: String,
        rebuilt: String,
    },
}

/// Result type alias for ReteForge operations
pub type Result<T> = std::result::Result<T, ScoringError>;
