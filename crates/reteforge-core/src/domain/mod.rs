//! Domain-side collaborators of the scoring engine.
//!
//! The engine never inspects fact types itself. Everything it needs to know
//! about a fact class is captured as closures on a [`FactDescriptor`]:
//! - whether an instance is fully initialized (implicit source filtering)
//! - its identity attribute (pair uniqueness)
//!
//! Fact descriptors are registered on a [`SolutionDescriptor`], which also
//! validates constraint weights.

mod descriptor;
mod traits;


pub use descriptor::{FactDescriptor, SolutionDescriptor};
pub use traits::{downcast_fact, FactRef, FactValue, PlanningId};
