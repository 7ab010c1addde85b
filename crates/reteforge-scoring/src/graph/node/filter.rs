//! Filter node.

use std::collections::HashSet;

use reteforge_core::Score;

use super::NodeContext;
use crate::graph::tuple::{Event, TupleId};
use crate::stream::TuplePredicate;

/// Forwards the tuples its predicate accepts, unchanged.
///
/// `passed` holds the ids forwarded downstream; only those are ever
/// retracted or updated there.
pub(crate) struct FilterNode {
    predicate: TuplePredicate,
    passed: HashSet<TupleId>,
}

impl FilterNode {
    pub(crate) fn new(predicate: TuplePredicate) -> Self {
        Self {
            predicate,
            passed: HashSet::new(),
        }
    }

    pub(crate) fn process<Sc: Score>(&mut self, event: Event, ctx: &mut NodeContext<'_, Sc>) {
        match event {
            Event::Insert(tuple) => {
                if (self.predicate)(&tuple.facts) {
                    self.passed.insert(tuple.id);
                    ctx.emit(Event::Insert(tuple));
                }
            }
            Event::Update(tuple) => {
                let was = self.passed.contains(&tuple.id);
                let now = (self.predicate)(&tuple.facts);
                match (was, now) {
                    (true, true) => ctx.emit(Event::Update(tuple)),
                    (false, true) => {
                        self.passed.insert(tuple.id);
                        ctx.emit(Event::Insert(tuple));
                    }
                    (true, false) => {
                        self.passed.remove(&tuple.id);
                        ctx.emit(Event::Retract(tuple.id));
                    }
                    (false, false) => {}
                }
            }
            Event::Retract(id) => {
                if self.passed.remove(&id) {
                    ctx.emit(Event::Retract(id));
                }
            }
        }
    }

    pub(crate) fn tuple_count(&self) -> usize {
        self.passed.len()
    }
}
