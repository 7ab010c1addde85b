//! People sorted into groups.
//!
//! A person is initialized once a desk is assigned; unassigned people are
//! filtered out of every source declared through [`people_descriptor`].
//!
//! # Example
//!
//! ```
//! use reteforge_test::people::{people_descriptor, Person};
//!
//! let descriptor = people_descriptor();
//! let person = descriptor.find_fact_descriptor::<Person>().unwrap();
//!
//! assert!(person.is_initialized(&Person::new(1, 'A')));
//! assert!(!person.is_initialized(&Person::unassigned(2, 'A')));
//! assert!(person.has_planning_id());
//! ```

use reteforge_core::domain::{FactDescriptor, PlanningId, SolutionDescriptor};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Person {
    pub id: u32,
    pub group: char,
    pub desk: Option<u32>,
}

impl Person {
    /// Creates a person sitting at the desk numbered like their id.
    pub fn new(id: u32, group: char) -> Self {
        Self {
            id,
            group,
            desk: Some(id),
        }
    }

    pub fn unassigned(id: u32, group: char) -> Self {
        Self {
            id,
            group,
            desk: None,
        }
    }

    pub fn with_group(&self, group: char) -> Self {
        Self {
            group,
            ..self.clone()
        }
    }
}

impl PlanningId for Person {
    type Id = u32;

    fn planning_id(&self) -> u32 {
        self.id
    }
}

/// The "People" solution: `Person` with a planning id and an
/// initialization predicate.
pub fn people_descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new("People").with_fact(
        FactDescriptor::<Person>::new("Person")
            .with_planning_id_of()
            .with_initialized_predicate(|p: &Person| p.desk.is_some()),
    )
}
