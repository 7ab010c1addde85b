//! Instantiation of pipeline descriptors into a shared node graph.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use reteforge_core::{ConstraintRef, Result, Score, ScoringError};
use tracing::{debug, trace};

use super::node::{FilterNode, GroupNode, JoinNode, Node, NodeKind, ScoringNode, SourceNode};
use super::{Edge, NodeGraph, NodeId, RealizedConstraint, Side};
use crate::stream::{FnIdentity, PipelineDescriptor, SourceDef, StreamDef};

/// Key under which a derived node is shared.
///
/// Two definitions share a node when they have the same parents and were
/// built from the same function value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NodeKey {
    Filter {
        parent: NodeId,
        function: FnIdentity,
    },
    Join {
        left: NodeId,
        right: NodeId,
        function: FnIdentity,
    },
    Group {
        parent: NodeId,
        function: FnIdentity,
    },
}

struct RegisteredSource {
    node: NodeId,
    identity: (TypeId, Option<usize>),
}

/// Builds a [`NodeGraph`] from the pipelines of every constraint.
///
/// Identical upstream definitions collapse into one node. Scoring leaves are
/// never shared: each pipeline gets its own.
pub struct BuildPolicy<Sc: Score> {
    next_order: usize,
    nodes: Vec<Node<Sc>>,
    sources: HashMap<TypeId, RegisteredSource>,
    derived: HashMap<NodeKey, NodeId>,
    constraints: Vec<RealizedConstraint<Sc>>,
    shared: usize,
}

impl<Sc: Score> Default for BuildPolicy<Sc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Sc: Score> BuildPolicy<Sc> {
    pub fn new() -> Self {
        Self {
            next_order: 0,
            nodes: Vec::new(),
            sources: HashMap::new(),
            derived: HashMap::new(),
            constraints: Vec::new(),
            shared: 0,
        }
    }

    /// Reserves the next node order. Orders strictly increase.
    pub fn next_order(&mut self) -> usize {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of lookups answered by an existing node.
    pub fn shared_node_count(&self) -> usize {
        self.shared
    }

    fn add_node(&mut self, parents: &[(NodeId, Side)], kind: NodeKind<Sc>) -> NodeId {
        let order = self.next_order();
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(order, kind));
        for &(parent, side) in parents {
            self.nodes[parent.0].children.push(Edge { target: id, side });
        }
        trace!(event = "node_created", node = %id, order = order, kind = ?self.nodes[id.0].kind_name());
        id
    }

    /// Returns the source node of a class, creating it on first use.
    ///
    /// Every definition for one class must come from the same fact
    /// descriptor; anything else is a `ConstructionConflict`.
    pub(crate) fn get_or_create_source<F>(&mut self, source: &SourceDef, factory: F) -> Result<NodeId>
    where
        F: FnOnce() -> SourceNode,
    {
        let identity = source.identity();
        if let Some(existing) = self.sources.get(&source.class) {
            if existing.identity != identity {
                return Err(ScoringError::ConstructionConflict {
                    class: source.class_name,
                    message: format!(
                        "source node {} was declared through another fact descriptor",
                        existing.node
                    ),
                });
            }
            self.shared += 1;
            return Ok(existing.node);
        }
        let node = self.add_node(&[], NodeKind::Source(factory()));
        self.sources.insert(source.class, RegisteredSource { node, identity });
        Ok(node)
    }

    fn get_or_create_derived<F>(&mut self, key: NodeKey, parents: &[(NodeId, Side)], factory: F) -> NodeId
    where
        F: FnOnce() -> NodeKind<Sc>,
    {
        if let Some(&node) = self.derived.get(&key) {
            self.shared += 1;
            return node;
        }
        let node = self.add_node(parents, factory());
        self.derived.insert(key, node);
        node
    }

    /// Realizes a stream definition, parents first, and returns its node.
    pub(crate) fn realize_stream(&mut self, def: &Arc<StreamDef>) -> Result<NodeId> {
        match def.as_ref() {
            StreamDef::Source(source) => {
                let class_name = source.class_name;
                self.get_or_create_source(source, || SourceNode::new(class_name))
            }
            StreamDef::Filter {
                parent,
                predicate,
                identity,
            } => {
                let parent = self.realize_stream(parent)?;
                let key = NodeKey::Filter {
                    parent,
                    function: *identity,
                };
                Ok(self.get_or_create_derived(key, &[(parent, Side::Only)], || {
                    NodeKind::Filter(FilterNode::new(Arc::clone(predicate)))
                }))
            }
            StreamDef::Join {
                left,
                right,
                conditions,
            } => {
                let left = self.realize_stream(left)?;
                let right = self.realize_stream(right)?;
                let key = NodeKey::Join {
                    left,
                    right,
                    function: FnIdentity::of(conditions),
                };
                Ok(self.get_or_create_derived(key, &[(left, Side::Left), (right, Side::Right)], || {
                    NodeKind::Join(JoinNode::new(conditions))
                }))
            }
            StreamDef::Group { parent, spec } => {
                let parent = self.realize_stream(parent)?;
                let key = NodeKey::Group {
                    parent,
                    function: FnIdentity::of(spec),
                };
                Ok(self.get_or_create_derived(key, &[(parent, Side::Only)], || {
                    NodeKind::Group(GroupNode::new(Arc::clone(spec)))
                }))
            }
        }
    }

    /// Registers a constraint and, unless its weight is zero, realizes each
    /// pipeline ending in a fresh scoring leaf.
    pub(crate) fn realize_constraint(
        &mut self,
        constraint_ref: ConstraintRef,
        weight: Sc,
        pipelines: Vec<PipelineDescriptor>,
    ) -> Result<()> {
        if self
            .constraints
            .iter()
            .any(|c| c.constraint_ref == constraint_ref)
        {
            return Err(ScoringError::Configuration(format!(
                "The constraint ({}) is declared more than once.",
                constraint_ref
            )));
        }
        let index = self.constraints.len();
        let mut leaves = Vec::with_capacity(pipelines.len());
        if weight.is_zero() {
            debug!(event = "constraint_disabled", constraint = %constraint_ref);
        } else {
            for pipeline in &pipelines {
                let parent = self.realize_stream(&pipeline.stream)?;
                let leaf = ScoringNode::new(index, pipeline.impact, weight, pipeline.weigher.clone());
                leaves.push(self.add_node(&[(parent, Side::Only)], NodeKind::Scoring(leaf)));
            }
        }
        self.constraints.push(RealizedConstraint {
            constraint_ref,
            weight,
            pipelines,
            leaves,
        });
        Ok(())
    }

    pub fn into_graph(self) -> NodeGraph<Sc> {
        debug!(
            event = "graph_built",
            nodes = self.nodes.len(),
            shared = self.shared,
            sources = self.sources.len(),
            constraints = self.constraints.len(),
        );
        NodeGraph {
            nodes: self.nodes,
            sources: self
                .sources
                .into_iter()
                .map(|(class, source)| (class, source.node))
                .collect(),
            constraints: self.constraints,
        }
    }
}
