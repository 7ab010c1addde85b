//! Type erasure of group-by operations.

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use reteforge_core::domain::{FactRef, FactValue};

use super::collector::{Accumulator, UniCollector};
use crate::graph::tuple::fact_at;
use crate::graph::EqKey;

pub(crate) type GroupValue = Box<dyn Any + Send + Sync>;

/// Grouping key function plus collector, erased over the fact type.
pub(crate) trait GroupSpec: Send + Sync {
    /// Returns the group key as an index key and as the output fact.
    fn key(&self, facts: &[FactRef]) -> (EqKey, FactRef);

    /// Extracts the value the collector accumulates.
    fn extract(&self, facts: &[FactRef]) -> GroupValue;

    fn create_accumulator(&self) -> Box<dyn ErasedAccumulator>;
}

pub(crate) trait ErasedAccumulator: Send + Sync {
    fn accumulate(&mut self, value: &(dyn Any + Send + Sync));
    fn retract(&mut self, value: &(dyn Any + Send + Sync));
    fn result(&self) -> FactRef;
}

pub(crate) struct TypedGroup<A, K, F, C> {
    key: F,
    collector: C,
    _phantom: PhantomData<fn(&A) -> K>,
}

impl<A, K, F, C> TypedGroup<A, K, F, C> {
    pub(crate) fn new(key: F, collector: C) -> Self {
        Self {
            key,
            collector,
            _phantom: PhantomData,
        }
    }
}

impl<A, K, F, C> GroupSpec for TypedGroup<A, K, F, C>
where
    A: FactValue,
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> K + Send + Sync,
    C: UniCollector<A>,
{
    fn key(&self, facts: &[FactRef]) -> (EqKey, FactRef) {
        let key = (self.key)(fact_at::<A>(facts, 0));
        (EqKey::new(key.clone()), Arc::new(key))
    }

    fn extract(&self, facts: &[FactRef]) -> GroupValue {
        Box::new(self.collector.extract(fact_at::<A>(facts, 0)))
    }

    fn create_accumulator(&self) -> Box<dyn ErasedAccumulator> {
        Box::new(TypedAccumulator {
            inner: self.collector.create_accumulator(),
            _phantom: PhantomData::<fn(&C::Value) -> C::Result>,
        })
    }
}

struct TypedAccumulator<Acc, V, R> {
    inner: Acc,
    _phantom: PhantomData<fn(&V) -> R>,
}

fn value_as<V: 'static>(value: &(dyn Any + Send + Sync)) -> &V {
    value.downcast_ref::<V>().unwrap_or_else(|| {
        panic!(
            "group value is not a {}; accumulator wired to the wrong collector",
            std::any::type_name::<V>()
        )
    })
}

impl<Acc, V, R> ErasedAccumulator for TypedAccumulator<Acc, V, R>
where
    Acc: Accumulator<V, R>,
    V: 'static,
    R: FactValue,
{
    fn accumulate(&mut self, value: &(dyn Any + Send + Sync)) {
        self.inner.accumulate(value_as::<V>(value));
    }

    fn retract(&mut self, value: &(dyn Any + Send + Sync)) {
        self.inner.retract(value_as::<V>(value));
    }

    fn result(&self) -> FactRef {
        Arc::new(self.inner.finish())
    }
}
