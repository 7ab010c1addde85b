//! List collector.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// Creates a collector gathering the extracted values into a list, in
/// ascending order.
///
/// ```
/// use reteforge_scoring::stream::collector::{to_list, UniCollector, Accumulator};
///
/// let collector = to_list(|x: &u8| *x);
/// let mut acc = collector.create_accumulator();
/// for x in [3, 1, 3] {
///     acc.accumulate(&collector.extract(&x));
/// }
/// assert_eq!(acc.finish(), vec![1, 3, 3]);
/// acc.retract(&3);
/// assert_eq!(acc.finish(), vec![1, 3]);
/// ```
pub fn to_list<A, T, F>(mapper: F) -> ToListCollector<A, T, F>
where
    T: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync,
{
    ToListCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Collector created by [`to_list()`].
pub struct ToListCollector<A, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F> UniCollector<A> for ToListCollector<A, T, F>
where
    T: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&A) -> T + Send + Sync,
{
    type Value = T;
    type Result = Vec<T>;
    type Accumulator = ToListAccumulator<T>;

    #[inline]
    fn extract(&self, entity: &A) -> T {
        (self.mapper)(entity)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        ToListAccumulator {
            values: BTreeMap::new(),
        }
    }
}

/// Accumulator keeping values with their multiplicity.
pub struct ToListAccumulator<T> {
    values: BTreeMap<T, usize>,
}

impl<T> Accumulator<T, Vec<T>> for ToListAccumulator<T>
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

    fn finish(&self) -> Vec<T> {
        self.values
            .iter()
            .flat_map(|(value, &count)| std::iter::repeat(value.clone()).take(count))
            .collect()
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}
