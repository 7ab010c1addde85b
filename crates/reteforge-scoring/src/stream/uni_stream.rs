//! Streams of single facts.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};
use reteforge_core::ImpactType;

use super::bi_stream::BiStream;
use super::collector::UniCollector;
use super::definition::{FnIdentity, MatchWeigher, PipelineDescriptor, StreamDef, TuplePredicate};
use super::group::TypedGroup;
use super::joiner::Joiner;
use crate::graph::tuple::fact_at;

/// A stream of `A` facts.
///
/// Handles are cheap to clone. A cloned handle refers to the same
/// definition, so pipelines built from it share their nodes in the graph.
pub struct UniStream<A> {
    pub(crate) def: Arc<StreamDef>,
    _phantom: PhantomData<fn() -> A>,
}

impl<A> Clone for UniStream<A> {
    fn clone(&self) -> Self {
        Self::from_def(Arc::clone(&self.def))
    }
}

impl<A> UniStream<A> {
    pub(crate) fn from_def(def: Arc<StreamDef>) -> Self {
        Self {
            def,
            _phantom: PhantomData,
        }
    }
}

impl<A: FactValue> UniStream<A> {
    /// Keeps the facts for which the predicate holds.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        let predicate: TuplePredicate =
            Arc::new(move |facts: &[FactRef]| predicate(fact_at::<A>(facts, 0)));
        let identity = FnIdentity::of(&predicate);
        self.filter_erased(predicate, identity)
    }

    /// Adds a filter whose identity is some function other than the erased
    /// wrapper (the implicit initialization filter uses the descriptor's
    /// predicate).
    pub(crate) fn filter_erased(self, predicate: TuplePredicate, identity: FnIdentity) -> Self {
        Self::from_def(Arc::new(StreamDef::Filter {
            parent: self.def,
            predicate,
            identity,
        }))
    }

    /// Joins with another stream. Every joiner must hold for a pair to match.
    ///
    /// Joining a stream with a clone of itself is a self-join over one
    /// upstream node.
    pub fn join<B, I>(self, other: UniStream<B>, joiners: I) -> BiStream<A, B>
    where
        B: FactValue,
        I: IntoIterator<Item = Joiner<A, B>>,
    {
        let conditions: Arc<[_]> = joiners.into_iter().map(Joiner::into_condition).collect();
        BiStream::from_def(Arc::new(StreamDef::Join {
            left: self.def,
            right: other.def,
            conditions,
        }))
    }

    /// Groups facts by key and folds each group with the collector.
    ///
    /// The result is a stream of `(key, aggregate)` pairs, one per non-empty
    /// group.
    pub fn group_by<K, F, C>(self, key: F, collector: C) -> BiStream<K, C::Result>
    where
        K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
        F: Fn(&A) -> K + Send + Sync + 'static,
        C: UniCollector<A> + 'static,
    {
        BiStream::from_def(Arc::new(StreamDef::Group {
            parent: self.def,
            spec: Arc::new(TypedGroup::new(key, collector)),
        }))
    }

    /// Subtracts the constraint weight once per fact.
    pub fn penalize(self) -> PipelineDescriptor {
        PipelineDescriptor::new(self.def, ImpactType::Penalty, None)
    }

    /// Adds the constraint weight once per fact.
    pub fn reward(self) -> PipelineDescriptor {
        PipelineDescriptor::new(self.def, ImpactType::Reward, None)
    }

    /// Subtracts the constraint weight times the per-fact multiplier.
    pub fn penalize_weighted<W>(self, weigher: W) -> PipelineDescriptor
    where
        W: Fn(&A) -> i64 + Send + Sync + 'static,
    {
        PipelineDescriptor::new(self.def, ImpactType::Penalty, Some(Self::weigher(weigher)))
    }

    /// Adds the constraint weight times the per-fact multiplier.
    pub fn reward_weighted<W>(self, weigher: W) -> PipelineDescriptor
    where
        W: Fn(&A) -> i64 + Send + Sync + 'static,
    {
        PipelineDescriptor::new(self.def, ImpactType::Reward, Some(Self::weigher(weigher)))
    }

    fn weigher<W>(weigher: W) -> MatchWeigher
    where
        W: Fn(&A) -> i64 + Send + Sync + 'static,
    {
        Arc::new(move |facts: &[FactRef]| weigher(fact_at::<A>(facts, 0)))
    }
}

impl<A> Debug for UniStream<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniStream")
            .field("kind", &self.def.kind())
            .finish()
    }
}
