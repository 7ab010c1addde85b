//! Employees and shifts.
//!
//! Shifts cover the half-open hour range `[start, end)` and may be assigned
//! to an employee. Neither class has an initialization predicate, and only
//! `Shift` has a planning id.
//!
//! # Example
//!
//! ```
//! use reteforge_test::roster::{roster_descriptor, Shift};
//!
//! let shift = Shift::new(1, 8, 16).assigned_to(7);
//! assert_eq!(shift.hours(), 8);
//! assert_eq!(shift.employee, Some(7));
//! assert_eq!(roster_descriptor().fact_class_count(), 2);
//! ```

use reteforge_core::domain::{FactDescriptor, SolutionDescriptor};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Employee {
    pub id: u32,
    pub max_hours: i64,
}

impl Employee {
    pub fn new(id: u32, max_hours: i64) -> Self {
        Self { id, max_hours }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shift {
    pub id: u32,
    pub start: i64,
    pub end: i64,
    pub employee: Option<u32>,
}

impl Shift {
    pub fn new(id: u32, start: i64, end: i64) -> Self {
        Self {
            id,
            start,
            end,
            employee: None,
        }
    }

    pub fn assigned_to(mut self, employee: u32) -> Self {
        self.employee = Some(employee);
        self
    }

    pub fn hours(&self) -> i64 {
        self.end - self.start
    }
}

/// The "Roster" solution: `Shift` identified by id, plain `Employee`.
pub fn roster_descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new("Roster")
        .with_fact(FactDescriptor::<Shift>::new("Shift").with_planning_id(|s: &Shift| s.id))
        .with_fact(FactDescriptor::<Employee>::new("Employee"))
}
