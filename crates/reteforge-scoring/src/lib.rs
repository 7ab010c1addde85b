//! Incremental constraint scoring for ReteForge.
//!
//! Constraints are declared as pipelines over domain facts (filter, join,
//! group, then penalize or reward). A [`ScoringSession`] compiles every
//! pipeline into one shared node graph and afterwards only propagates the
//! changes caused by each fact mutation:
//!
//! - [`stream`] - typed stream builders, joiners and collectors
//! - [`constraint`] - constraints and their factory
//! - [`graph`] - build policy, node graph and node state
//! - [`session`] - the propagation runtime and the public session API
//! - [`api`] - match totals, score explanation and weight overrides
//!
//! # Example
//!
//! ```
//! use reteforge_core::{FactDescriptor, SimpleScore, SolutionDescriptor};
//! use reteforge_scoring::stream::joiner::equal;
//! use reteforge_scoring::{ConstraintFactory, ScoringSession};
//!
//! #[derive(Debug)]
//! struct Person { id: u32, group: char }
//!
//! let solution = SolutionDescriptor::new("People")
//!     .with_fact(FactDescriptor::<Person>::new("Person").with_planning_id(|p: &Person| p.id));
//! let factory = ConstraintFactory::<(), SimpleScore>::new(solution);
//!
//! let mut same_group = factory.constraint("people", "Same group pair", |_| Some(SimpleScore::ONE));
//! let pairs = same_group
//!     .declare_unique_pair::<Person>([equal(|p: &Person| p.group)])
//!     .unwrap();
//! same_group.add_pipeline(pairs.penalize());
//!
//! let mut session = ScoringSession::<SimpleScore>::new();
//! session.build_graph(&[same_group], &()).unwrap();
//!
//! session.insert(Person { id: 1, group: 'A' }).unwrap();
//! let p2 = session.insert(Person { id: 2, group: 'A' }).unwrap();
//! session.insert(Person { id: 3, group: 'B' }).unwrap();
//! assert_eq!(session.score(), SimpleScore::of(-1));
//!
//! session.retract(p2).unwrap();
//! assert_eq!(session.score(), SimpleScore::ZERO);
//! ```

// Erased accessors are stored as boxed closures over fact slices
#![allow(clippy::type_complexity)]

pub mod api;
pub mod constraint;
pub mod graph;
pub mod session;
pub mod stream;

pub use api::analysis::{ConstraintAnalysis, EntityRef, Indictment, IndictmentMap, ScoreExplanation};
pub use api::match_total::{ConstraintMatch, ConstraintMatchTotal};
pub use api::weight_overrides::{ConstraintWeightOverrides, WeightProvider};
pub use constraint::{Constraint, ConstraintFactory};
pub use graph::{BuildPolicy, FactHandle, NodeGraph, NodeId, NodeInfo, NodeKindName, Side};
pub use session::{EnvironmentMode, ScoringSession, SessionSettings, UpdateMode};
pub use stream::{BiStream, PipelineDescriptor, UniStream};
