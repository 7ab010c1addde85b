//! Streams of fact pairs: join results and group outputs.

use std::marker::PhantomData;
use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};
use reteforge_core::ImpactType;

use super::definition::{FnIdentity, MatchWeigher, PipelineDescriptor, StreamDef, TuplePredicate};
use crate::graph::tuple::fact_at;

/// A stream of `(A, B)` pairs.
pub struct BiStream<A, B> {
    pub(crate) def: Arc<StreamDef>,
    _phantom: PhantomData<fn() -> (A, B)>,
}

impl<A, B> Clone for BiStream<A, B> {
    fn clone(&self) -> Self {
        Self::from_def(Arc::clone(&self.def))
    }
}

impl<A, B> BiStream<A, B> {
    pub(crate) fn from_def(def: Arc<StreamDef>) -> Self {
        Self {
            def,
            _phantom: PhantomData,
        }
    }
}

impl<A: FactValue, B: FactValue> BiStream<A, B> {
    /// Keeps the pairs for which the predicate holds.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&A, &B) -> bool + Send + Sync + 'static,
    {
        let predicate: TuplePredicate = Arc::new(move |facts: &[FactRef]| {
            predicate(fact_at::<A>(facts, 0), fact_at::<B>(facts, 1))
        });
        let identity = FnIdentity::of(&predicate);
        Self::from_def(Arc::new(StreamDef::Filter {
            parent: self.def,
            predicate,
            identity,
        }))
    }

    /// Subtracts the constraint weight once per pair.
    pub fn penalize(self) -> PipelineDescriptor {
        PipelineDescriptor::new(self.def, ImpactType::Penalty, None)
    }

    /// Adds the constraint weight once per pair.
    pub fn reward(self) -> PipelineDescriptor {
        PipelineDescriptor::new(self.def, ImpactType::Reward, None)
    }

    /// Subtracts the constraint weight times the per-pair multiplier.
    pub fn penalize_weighted<W>(self, weigher: W) -> PipelineDescriptor
    where
        W: Fn(&A, &B) -> i64 + Send + Sync + 'static,
    {
        PipelineDescriptor::new(self.def, ImpactType::Penalty, Some(Self::weigher(weigher)))
    }

    /// Adds the constraint weight times the per-pair multiplier.
    pub fn reward_weighted<W>(self, weigher: W) -> PipelineDescriptor
    where
        W: Fn(&A, &B) -> i64 + Send + Sync + 'static,
    {
        PipelineDescriptor::new(self.def, ImpactType::Reward, Some(Self::weigher(weigher)))
    }

    fn weigher<W>(weigher: W) -> MatchWeigher
    where
        W: Fn(&A, &B) -> i64 + Send + Sync + 'static,
    {
        Arc::new(move |facts: &[FactRef]| weigher(fact_at::<A>(facts, 0), fact_at::<B>(facts, 1)))
    }
}

impl<A, B> std::fmt::Debug for BiStream<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiStream")
            .field("kind", &self.def.kind())
            .finish()
    }
}
