//! Tuples and the events that carry them between nodes.

use std::fmt;

use reteforge_core::domain::{downcast_fact, FactRef, FactValue};
use smallvec::SmallVec;

/// Opaque identity of a fact inserted into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactHandle(pub(crate) u64);

impl FactHandle {
    /// Returns the raw handle value.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a tuple, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleId(pub(crate) u64);

/// Facts held by a tuple: one for uni tuples, two for bi tuples and group
/// outputs (key, result).
pub type TupleFacts = SmallVec<[FactRef; 4]>;

/// Runtime record flowing along the edges of the node graph.
#[derive(Debug, Clone)]
pub struct Tuple {
    pub id: TupleId,
    pub facts: TupleFacts,
}

impl Tuple {
    pub(crate) fn new(id: TupleId, facts: TupleFacts) -> Self {
        Self { id, facts }
    }
}

/// Allocates tuple ids.
#[derive(Debug, Default)]
pub(crate) struct TupleIdSequence {
    next: u64,
}

impl TupleIdSequence {
    pub(crate) fn next_id(&mut self) -> TupleId {
        let id = TupleId(self.next);
        self.next += 1;
        id
    }
}

/// A change travelling from one node to the next.
#[derive(Debug, Clone)]
pub(crate) enum Event {
    Insert(Tuple),
    Update(Tuple),
    Retract(TupleId),
}

/// Reads the fact at `index` as its concrete type.
///
/// # Panics
/// Panics when the fact has another type. Nodes are typed at declaration,
/// so a mismatch means the graph was wired incorrectly.
pub(crate) fn fact_at<A: FactValue>(facts: &[FactRef], index: usize) -> &A {
    let fact = &facts[index];
    downcast_fact::<A>(fact).unwrap_or_else(|| {
        let value: &dyn FactValue = fact.as_ref();
        panic!(
            "tuple fact {} is a {}, node expects a {}",
            index,
            value.value_type_name(),
            std::any::type_name::<A>()
        )
    })
}
