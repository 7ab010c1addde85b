//! Source node: turns facts of one class into uni tuples.

use std::collections::HashMap;

use reteforge_core::domain::FactRef;
use reteforge_core::Score;
use smallvec::smallvec;

use super::NodeContext;
use crate::graph::tuple::{Event, FactHandle, Tuple};
use crate::session::UpdateMode;

pub(crate) struct SourceNode {
    class_name: &'static str,
    tuples: HashMap<FactHandle, Tuple>,
}

impl SourceNode {
    pub(crate) fn new(class_name: &'static str) -> Self {
        Self {
            class_name,
            tuples: HashMap::new(),
        }
    }

    pub(crate) fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub(crate) fn insert<Sc: Score>(
        &mut self,
        handle: FactHandle,
        fact: FactRef,
        ctx: &mut NodeContext<'_, Sc>,
    ) {
        let tuple = Tuple::new(ctx.next_tuple_id(), smallvec![fact]);
        self.tuples.insert(handle, tuple.clone());
        ctx.emit(Event::Insert(tuple));
    }

    pub(crate) fn update<Sc: Score>(
        &mut self,
        handle: FactHandle,
        fact: FactRef,
        mode: UpdateMode,
        ctx: &mut NodeContext<'_, Sc>,
    ) {
        let Some(tuple) = self.tuples.get_mut(&handle) else {
            self.insert(handle, fact, ctx);
            return;
        };
        match mode {
            UpdateMode::InPlace => {
                tuple.facts[0] = fact;
                ctx.emit(Event::Update(tuple.clone()));
            }
            UpdateMode::RetractInsert => {
                self.retract(handle, ctx);
                self.insert(handle, fact, ctx);
            }
        }
    }

    pub(crate) fn retract<Sc: Score>(&mut self, handle: FactHandle, ctx: &mut NodeContext<'_, Sc>) {
        if let Some(tuple) = self.tuples.remove(&handle) {
            ctx.emit(Event::Retract(tuple.id));
        }
    }

    pub(crate) fn tuple_count(&self) -> usize {
        self.tuples.len()
    }
}
