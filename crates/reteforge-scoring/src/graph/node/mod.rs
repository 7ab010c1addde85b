//! Runtime nodes.
//!
//! Node kinds form a closed set dispatched by a single `match` in
//! [`Node::process`]. Each kind keeps plain owned state; nothing here is
//! synchronized because a session propagates on one thread.

mod filter;
mod group;
mod join;
mod scoring;
mod source;

use reteforge_core::Score;

use super::tuple::{Event, TupleId, TupleIdSequence};
use super::{Edge, NodeId, NodeInfo, NodeKindName, Side};
use crate::api::match_total::ConstraintMatchTotal;

pub(crate) use filter::FilterNode;
pub(crate) use group::GroupNode;
pub(crate) use join::JoinNode;
pub(crate) use scoring::ScoringNode;
pub(crate) use source::SourceNode;

pub(crate) struct Node<Sc: Score> {
    pub(crate) order: usize,
    pub(crate) children: Vec<Edge>,
    pub(crate) kind: NodeKind<Sc>,
}

pub(crate) enum NodeKind<Sc: Score> {
    Source(SourceNode),
    Filter(FilterNode),
    Join(JoinNode),
    Group(GroupNode),
    Scoring(ScoringNode<Sc>),
}

/// What a node may touch while it handles one event.
pub(crate) struct NodeContext<'a, Sc: Score> {
    tuple_ids: &'a mut TupleIdSequence,
    pub(crate) totals: &'a mut [ConstraintMatchTotal<Sc>],
    emitted: Vec<Event>,
}

impl<'a, Sc: Score> NodeContext<'a, Sc> {
    pub(crate) fn new(
        tuple_ids: &'a mut TupleIdSequence,
        totals: &'a mut [ConstraintMatchTotal<Sc>],
    ) -> Self {
        Self {
            tuple_ids,
            totals,
            emitted: Vec::new(),
        }
    }

    pub(crate) fn next_tuple_id(&mut self) -> TupleId {
        self.tuple_ids.next_id()
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.emitted.push(event);
    }

    /// Takes the events emitted since the last call.
    pub(crate) fn take_emitted(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.emitted)
    }
}

impl<Sc: Score> Node<Sc> {
    pub(crate) fn new(order: usize, kind: NodeKind<Sc>) -> Self {
        Self {
            order,
            children: Vec::new(),
            kind,
        }
    }

    /// Handles one event arriving on `side`.
    pub(crate) fn process(&mut self, side: Side, event: Event, ctx: &mut NodeContext<'_, Sc>) {
        match &mut self.kind {
            // Sources have no parents; facts enter through the session.
            NodeKind::Source(_) => {}
            NodeKind::Filter(node) => node.process(event, ctx),
            NodeKind::Join(node) => node.process(side, event, ctx),
            NodeKind::Group(node) => node.process(event, ctx),
            NodeKind::Scoring(node) => node.process(event, ctx),
        }
    }

    pub(crate) fn kind_name(&self) -> NodeKindName {
        match &self.kind {
            NodeKind::Source(_) => NodeKindName::Source,
            NodeKind::Filter(_) => NodeKindName::Filter,
            NodeKind::Join(_) => NodeKindName::Join,
            NodeKind::Group(_) => NodeKindName::Group,
            NodeKind::Scoring(_) => NodeKindName::Scoring,
        }
    }

    fn tuple_count(&self) -> usize {
        match &self.kind {
            NodeKind::Source(node) => node.tuple_count(),
            NodeKind::Filter(node) => node.tuple_count(),
            NodeKind::Join(node) => node.tuple_count(),
            NodeKind::Group(node) => node.tuple_count(),
            NodeKind::Scoring(node) => node.tuple_count(),
        }
    }

    pub(crate) fn info(&self, id: NodeId) -> NodeInfo {
        NodeInfo {
            id,
            order: self.order,
            kind: self.kind_name(),
            children: self.children.iter().map(|e| (e.target, e.side)).collect(),
            tuple_count: self.tuple_count(),
        }
    }
}
