// Sum collector for summing extracted values.

use std::fmt::Debug;
use std::marker::PhantomData;

use super::{Accumulator, UniCollector};

/// A value type whose sum can be retracted exactly.
///
/// Implemented for the primitive integers only: subtracting a float does not
/// undo adding it. Sum fixed-point values (cents, minutes) instead of floats.
/// Arithmetic wraps, so retraction stays exact across overflow.
pub trait Summable: Default + Copy + Debug + Send + Sync + 'static {
    fn sum_add(self, other: Self) -> Self;

    fn sum_sub(self, other: Self) -> Self;
}

macro_rules! impl_summable {
    ($($t:ty),* $(,)?) => {
        $(
            impl Summable for $t {
                #[inline]
                fn sum_add(self, other: Self) -> Self {
                    self.wrapping_add(other)
                }

                #[inline]
                fn sum_sub(self, other: Self) -> Self {
                    self.wrapping_sub(other)
                }
            }
        )*
    };
}

impl_summable!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// Creates a collector that sums values extracted from facts.
//
// # Example
//
// ```
// use reteforge_scoring::stream::collector::{sum, UniCollector, Accumulator};
//
// struct Item { value: i64 }
//
// let collector = sum(|item: &Item| item.value);
// let mut acc = collector.create_accumulator();
//
// acc.accumulate(&collector.extract(&Item { value: 5 }));
// acc.accumulate(&collector.extract(&Item { value: 3 }));
// acc.accumulate(&collector.extract(&Item { value: 7 }));
// assert_eq!(acc.finish(), 15);
//
// acc.retract(&collector.extract(&Item { value: 3 }));
// assert_eq!(acc.finish(), 12);
// ```
pub fn sum<A, T, F>(mapper: F) -> SumCollector<A, T, F>
where
    T: Summable,
    F: Fn(&A) -> T + Send + Sync,
{
    SumCollector {
        mapper,
        _phantom: PhantomData,
    }
}

// Collector that sums values extracted from facts.
//
// The mapper is stored once in the collector, not cloned into accumulators.
pub struct SumCollector<A, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&A) -> T>,
}

impl<A, T, F> UniCollector<A> for SumCollector<A, T, F>
where
    T: Summable,
    F: Fn(&A) -> T + Send + Sync,
{
    type Value = T;
    type Result = T;
    type Accumulator = SumAccumulator<T>;

    #[inline]
    fn extract(&self, entity: &A) -> T {
        (self.mapper)(entity)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        SumAccumulator { sum: T::default() }
    }
}

// Accumulator for summing values.
pub struct SumAccumulator<T> {
    sum: T,
}

impl<T: Summable> Accumulator<T, T> for SumAccumulator<T> {
    #[inline]
    fn accumulate(&mut self, value: &T) {
        self.sum = self.sum.sum_add(*value);
    }

    #[inline]
    fn retract(&mut self, value: &T) {
        self.sum = self.sum.sum_sub(*value);
    }

    #[inline]
    fn finish(&self) -> T {
        self.sum
    }

    #[inline]
    fn reset(&mut self) {
        self.sum = T::default();
    }
}
