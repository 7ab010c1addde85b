//! Count-distinct collector.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Creates a collector counting distinct extracted values.
///
/// ```
/// use reteforge_scoring::stream::collector::{count_distinct, UniCollector, Accumulator};
///
/// let collector = count_distinct(|s: &&str| s.len());
/// let mut acc = collector.create_accumulator();
/// for word in ["a", "bb", "cc"] {
///     acc.accumulate(&collector.extract(&word));
/// }
/// assert_eq!(acc.finish(), 2);
/// acc.retract(&2);
/// assert_eq!(acc.finish(), 2);
/// acc.retract(&2);
/// assert_eq!(acc.finish(), 1);
/// ```
pub fn count_distinct<A, T, F>(mapper: F) -> CountDistinctCollector<A, T, F>
where
    T: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync,
{
    CountDistinctCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Collector created by [`count_distinct()`].
pub struct CountDistinctCollector<A, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F> UniCollector<A> for CountDistinctCollector<A, T, F>
where
    T: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync,
{
    type Value = T;
    type Result = usize;
    type Accumulator = CountDistinctAccumulator<T>;

    #[inline]
    fn extract(&self, entity: &A) -> T {
        (self.mapper)(entity)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        CountDistinctAccumulator {
            counts: HashMap::new(),
        }
    }
}

/// Accumulator keeping the multiplicity of each value.
pub struct CountDistinctAccumulator<T> {
    counts: HashMap<T, usize>,
}

impl<T> Accumulator<T, usize> for CountDistinctAccumulator<T>
where
    T: Eq + Hash + Clone + Send + Sync,
{
    fn accumulate(&mut self, value: &T) {
        *self.counts.entry(value.clone()).or_insert(0) += 1;
    }

    fn retract(&mut self, value: &T) {
        if let Some(count) = self.counts.get_mut(value) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(value);
            }
        }
    }

    fn finish(&self) -> usize {
        self.counts.len()
    }

    fn reset(&mut self) {
        self.counts.clear();
    }
}
