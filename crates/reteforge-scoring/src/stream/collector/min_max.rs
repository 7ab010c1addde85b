//! Min and max collectors.
//!
//! Both keep a multiset of the accumulated values, so retracting the
//! current extremum exposes the next one without a rescan.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Creates a collector returning the smallest extracted value.
///
/// ```
/// use reteforge_scoring::stream::collector::{min, UniCollector, Accumulator};
///
/// let collector = min(|x: &i32| *x);
/// let mut acc = collector.create_accumulator();
/// acc.accumulate(&4);
/// acc.accumulate(&2);
/// acc.accumulate(&2);
/// acc.retract(&2);
/// assert_eq!(acc.finish(), Some(2));
/// acc.retract(&2);
/// assert_eq!(acc.finish(), Some(4));
/// ```
pub fn min<A, T, F>(mapper: F) -> ExtremumCollector<A, T, F>
where
    T: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync,
{
    ExtremumCollector {
        mapper,
        largest: false,
        _phantom: PhantomData,
    }
}

/// Creates a collector returning the largest extracted value.
pub fn max<A, T, F>(mapper: F) -> ExtremumCollector<A, T, F>
where
    T: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync,
{
    ExtremumCollector {
        mapper,
        largest: true,
        _phantom: PhantomData,
    }
}

/// Collector created by [`min()`] and [`max()`].
pub struct ExtremumCollector<A, T, F> {
    mapper: F,
    largest: bool,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F> UniCollector<A> for ExtremumCollector<A, T, F>
where
    T: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync,
{
    type Value = T;
    type Result = Option<T>;
    type Accumulator = ExtremumAccumulator<T>;

    #[inline]
    fn extract(&self, entity: &A) -> T {
        (self.mapper)(entity)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        ExtremumAccumulator {
            values: BTreeMap::new(),
            largest: self.largest,
        }
    }
}

/// Multiset accumulator answering min or max.
pub struct ExtremumAccumulator<T> {
    values: BTreeMap<T, usize>,
    largest: bool,
}

impl<T> Accumulator<T, Option<T>> for ExtremumAccumulator<T>
where
    T: Ord + Clone + Send + Sync,
{
    fn accumulate(&mut self, value: &T) {
        *self.values.entry(value.clone()).or_insert(0) += 1;
    }

    fn retract(&mut self, value: &T) {
        if let Some(count) = self.values.get_mut(value) {
            *count -= 1;
            if *count == 0 {
                self.values.remove(value);
            }
        }
    }

    fn finish(&self) -> Option<T> {
        let entry = if self.largest {
            self.values.last_key_value()
        } else {
            self.values.first_key_value()
        };
        entry.map(|(value, _)| value.clone())
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}
