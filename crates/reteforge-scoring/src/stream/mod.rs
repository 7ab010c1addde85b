//! Typed stream builders.
//!
//! Streams describe dataflow; they hold no facts. A pipeline is finished by
//! one of the `penalize*`/`reward*` operations and added to a
//! [`Constraint`](crate::Constraint). Nodes are only created when a session
//! builds its graph.
//!
//! # Example
//!
//! ```
//! use reteforge_core::{SimpleScore, SolutionDescriptor};
//! use reteforge_scoring::stream::collector::count;
//! use reteforge_scoring::ConstraintFactory;
//!
//! #[derive(Debug)]
//! struct Person { group: u8 }
//!
//! let factory = ConstraintFactory::<(), SimpleScore>::new(SolutionDescriptor::new("People"));
//! let mut crowded = factory.constraint("people", "Crowded group", |_| Some(SimpleScore::ONE));
//! let pipeline = crowded
//!     .declare_source::<Person>()
//!     .group_by(|p: &Person| p.group, count())
//!     .filter(|_group: &u8, size: &usize| *size >= 3)
//!     .penalize();
//! crowded.add_pipeline(pipeline);
//! assert_eq!(crowded.pipelines().len(), 1);
//! ```

mod bi_stream;
pub mod collector;
mod definition;
pub(crate) mod group;
pub mod joiner;
mod uni_stream;

pub use bi_stream::BiStream;
pub use definition::PipelineDescriptor;
pub(crate) use definition::{FnIdentity, MatchWeigher, SourceDef, StreamDef, TuplePredicate};
pub use uni_stream::UniStream;
