//! The propagation runtime.
//!
//! A [`Propagator`] lives for one fact mutation. It hands the mutation to the
//! source node of the fact's class and then drains the queue of pending
//! events, always taking the lowest-order node first. Every edge points to a
//! higher order, so a node has seen all of its inputs for the mutation by the
//! time it runs, and nothing is ever queued behind the node being drained.

use std::any::TypeId;
use std::collections::{BTreeMap, VecDeque};

use reteforge_core::domain::FactRef;
use reteforge_core::Score;
use tracing::trace;

use super::UpdateMode;
use crate::api::match_total::ConstraintMatchTotal;
use crate::graph::node::{NodeContext, NodeKind, SourceNode};
use crate::graph::tuple::{Event, TupleIdSequence};
use crate::graph::{FactHandle, NodeGraph, NodeId, Side};

pub(crate) struct Propagator<'a, Sc: Score> {
    graph: &'a mut NodeGraph<Sc>,
    ctx: NodeContext<'a, Sc>,
    queue: BTreeMap<(usize, NodeId), VecDeque<(Side, Event)>>,
}

impl<'a, Sc: Score> Propagator<'a, Sc> {
    pub(crate) fn new(
        graph: &'a mut NodeGraph<Sc>,
        totals: &'a mut [ConstraintMatchTotal<Sc>],
        tuple_ids: &'a mut TupleIdSequence,
    ) -> Self {
        Self {
            graph,
            ctx: NodeContext::new(tuple_ids, totals),
            queue: BTreeMap::new(),
        }
    }

    /// Returns false if no constraint reads the class.
    pub(crate) fn insert(mut self, class: TypeId, handle: FactHandle, fact: FactRef) -> bool {
        let found = self.at_source(class, |source, ctx| source.insert(handle, fact, ctx));
        self.run();
        found
    }

    pub(crate) fn update(
        mut self,
        class: TypeId,
        handle: FactHandle,
        fact: FactRef,
        mode: UpdateMode,
    ) -> bool {
        let found = self.at_source(class, |source, ctx| source.update(handle, fact, mode, ctx));
        self.run();
        found
    }

    pub(crate) fn retract(mut self, class: TypeId, handle: FactHandle) -> bool {
        let found = self.at_source(class, |source, ctx| source.retract(handle, ctx));
        self.run();
        found
    }

    fn at_source<F>(&mut self, class: TypeId, apply: F) -> bool
    where
        F: FnOnce(&mut SourceNode, &mut NodeContext<'a, Sc>),
    {
        let Some(id) = self.graph.source_of_class(class) else {
            return false;
        };
        if let NodeKind::Source(source) = &mut self.graph.nodes[id.0].kind {
            trace!(event = "source_mutation", node = %id, class = source.class_name());
            apply(source, &mut self.ctx);
        }
        self.schedule(id);
        true
    }

    /// Routes the events `from` just emitted to each of its children.
    fn schedule(&mut self, from: NodeId) {
        let emitted = self.ctx.take_emitted();
        if emitted.is_empty() {
            return;
        }
        let nodes = &self.graph.nodes;
        for event in emitted {
            for edge in &nodes[from.0].children {
                let order = nodes[edge.target.0].order;
                self.queue
                    .entry((order, edge.target))
                    .or_default()
                    .push_back((edge.side, event.clone()));
            }
        }
    }

    fn run(&mut self) {
        while let Some(((_, id), events)) = self.queue.pop_first() {
            for (side, event) in events {
                self.graph.nodes[id.0].process(side, event, &mut self.ctx);
                self.schedule(id);
            }
        }
    }
}
