//! Immutable stream definitions.
//!
//! A typed stream handle is a thin wrapper around an `Arc<StreamDef>`. Every
//! operation returns a new definition pointing at its parent, so a pipeline
//! is a chain of shared, immutable nodes that the build policy walks from the
//! scoring leaf back to the sources.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use reteforge_core::domain::FactRef;
use reteforge_core::ImpactType;

use super::group::GroupSpec;
use super::joiner::JoinCondition;
use crate::graph::NodeKindName;

pub(crate) type TuplePredicate = Arc<dyn Fn(&[FactRef]) -> bool + Send + Sync>;
pub(crate) type MatchWeigher = Arc<dyn Fn(&[FactRef]) -> i64 + Send + Sync>;

/// Pointer identity of a user function.
///
/// Two definitions built from the same function value get the same identity,
/// which is what lets the build policy share their nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FnIdentity(usize);

impl FnIdentity {
    pub(crate) fn of<T: ?Sized>(function: &Arc<T>) -> Self {
        Self(Arc::as_ptr(function) as *const () as usize)
    }
}

/// Where a pipeline reads its facts from.
pub(crate) struct SourceDef {
    pub(crate) class: TypeId,
    pub(crate) class_name: &'static str,
    /// The fact descriptor the stream was declared with, if the class has one.
    pub(crate) descriptor: Option<Arc<dyn Any + Send + Sync>>,
}

impl SourceDef {
    /// Identity of the source definition; equal identities may share a node.
    pub(crate) fn identity(&self) -> (TypeId, Option<usize>) {
        let descriptor = self
            .descriptor
            .as_ref()
            .map(|d| Arc::as_ptr(d) as *const () as usize);
        (self.class, descriptor)
    }
}

pub(crate) enum StreamDef {
    Source(SourceDef),
    Filter {
        parent: Arc<StreamDef>,
        predicate: TuplePredicate,
        identity: FnIdentity,
    },
    Join {
        left: Arc<StreamDef>,
        right: Arc<StreamDef>,
        conditions: Arc<[JoinCondition]>,
    },
    Group {
        parent: Arc<StreamDef>,
        spec: Arc<dyn GroupSpec>,
    },
}

impl StreamDef {
    pub(crate) fn kind(&self) -> NodeKindName {
        match self {
            StreamDef::Source(_) => NodeKindName::Source,
            StreamDef::Filter { .. } => NodeKindName::Filter,
            StreamDef::Join { .. } => NodeKindName::Join,
            StreamDef::Group { .. } => NodeKindName::Group,
        }
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamDef::Source(source) => write!(f, "Source({})", source.class_name),
            StreamDef::Filter { parent, .. } | StreamDef::Group { parent, .. } => {
                parent.describe(f)?;
                write!(f, " -> {:?}", self.kind())
            }
            StreamDef::Join { left, right, .. } => {
                write!(f, "Join[")?;
                left.describe(f)?;
                write!(f, " x ")?;
                right.describe(f)?;
                write!(f, "]")
            }
        }
    }
}

/// The complete dataflow of one constraint contribution: a stream ending in
/// a scoring leaf.
///
/// Created by the `penalize*`/`reward*` operations of the typed streams and
/// registered with [`Constraint::add_pipeline`](crate::Constraint::add_pipeline).
#[derive(Clone)]
pub struct PipelineDescriptor {
    pub(crate) stream: Arc<StreamDef>,
    pub(crate) impact: ImpactType,
    pub(crate) weigher: Option<MatchWeigher>,
}

impl PipelineDescriptor {
    pub(crate) fn new(stream: Arc<StreamDef>, impact: ImpactType, weigher: Option<MatchWeigher>) -> Self {
        Self {
            stream,
            impact,
            weigher,
        }
    }

    pub fn impact_type(&self) -> ImpactType {
        self.impact
    }

    /// Returns true if matches are weighted by a per-match multiplier.
    pub fn is_weighted(&self) -> bool {
        self.weigher.is_some()
    }
}

impl fmt::Debug for PipelineDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.stream.describe(f)?;
        write!(f, " -> Scoring({:?})", self.impact)
    }
}
