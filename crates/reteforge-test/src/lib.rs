//! Shared test fixtures for ReteForge crates.
//!
//! This crate provides domain types and their descriptors for testing. It
//! depends only on `reteforge-core`, so `reteforge-scoring` can use it as a
//! dev-dependency.
//!
//! - [`people`] - people sorted into groups, with optional desk assignment
//! - [`roster`] - employees and time-ranged shifts
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! reteforge-test = { workspace = true }
//! ```

pub mod people;
pub mod roster;

pub use people::{people_descriptor, Person};
pub use roster::{roster_descriptor, Employee, Shift};
