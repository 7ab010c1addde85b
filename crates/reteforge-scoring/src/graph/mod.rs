//! The node graph shared by every constraint of a session.
//!
//! Nodes are created by a [`BuildPolicy`], each with an order taken from a
//! strictly increasing counter. A node is always created after its parents,
//! so every edge points from a lower order to a higher one and draining the
//! propagation queue lowest order first visits parents before children.

mod build_policy;
pub(crate) mod key;
pub(crate) mod node;
pub(crate) mod tuple;


use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use reteforge_core::{ConstraintRef, Score};

use crate::stream::PipelineDescriptor;
use node::Node;

pub use build_policy::BuildPolicy;
pub use key::{EqKey, OrdKey};
pub use tuple::{FactHandle, Tuple, TupleId};

/// Position of a node in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Which input of the target node an edge feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The single input of a filter, group or scoring node.
    Only,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Edge {
    pub(crate) target: NodeId,
    pub(crate) side: Side,
}

/// Kind of a node, for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKindName {
    Source,
    Filter,
    Join,
    Group,
    Scoring,
}

/// Snapshot of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub order: usize,
    pub kind: NodeKindName,
    /// Downstream nodes and the input each edge feeds.
    pub children: Vec<(NodeId, Side)>,
    /// Number of tuples, group entries or matches the node currently holds.
    pub tuple_count: usize,
}

/// A constraint as it was realized into the graph.
pub(crate) struct RealizedConstraint<Sc: Score> {
    pub(crate) constraint_ref: ConstraintRef,
    pub(crate) weight: Sc,
    pub(crate) pipelines: Vec<PipelineDescriptor>,
    pub(crate) leaves: Vec<NodeId>,
}

/// The realized node graph of a session.
pub struct NodeGraph<Sc: Score> {
    pub(crate) nodes: Vec<Node<Sc>>,
    pub(crate) sources: HashMap<TypeId, NodeId>,
    pub(crate) constraints: Vec<RealizedConstraint<Sc>>,
}

impl<Sc: Score> NodeGraph<Sc> {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of nodes of one kind.
    pub fn count_of(&self, kind: NodeKindName) -> usize {
        self.nodes.iter().filter(|n| n.kind_name() == kind).count()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeInfo> {
        self.nodes.get(id.0).map(|node| node.info(id))
    }

    /// Returns every node, in order.
    pub fn nodes(&self) -> Vec<NodeInfo> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| node.info(NodeId(i)))
            .collect()
    }

    /// Returns every edge as `(upstream, downstream, side)`.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, Side)> {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(i, node)| {
                node.children
                    .iter()
                    .map(move |edge| (NodeId(i), edge.target, edge.side))
            })
            .collect()
    }

    /// Returns the order of a node.
    pub fn order_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id.0).map(|node| node.order)
    }

    /// Returns the source node of a fact class.
    pub fn source_of<A: 'static>(&self) -> Option<NodeId> {
        self.source_of_class(TypeId::of::<A>())
    }

    pub fn source_of_class(&self, class: TypeId) -> Option<NodeId> {
        self.sources.get(&class).copied()
    }

    /// Returns the scoring leaves of a constraint.
    pub fn leaves_of(&self, constraint_id: &str) -> Vec<NodeId> {
        self.constraints
            .iter()
            .filter(|c| c.constraint_ref.constraint_id() == constraint_id)
            .flat_map(|c| c.leaves.iter().copied())
            .collect()
    }
}

impl<Sc: Score> fmt::Debug for NodeGraph<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeGraph")
            .field("nodes", &self.nodes.len())
            .field("sources", &self.sources.len())
            .field("constraints", &self.constraints.len())
            .finish()
    }
}
