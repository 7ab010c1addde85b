// Collectors for grouping and aggregating facts.
//
// Every accumulator supports exact retraction: removing a value undoes its
// accumulation without recomputing the group from scratch.

mod count;
mod distinct;
mod min_max;
mod sum;
mod to_list;
mod uni;

#[cfg(test)]
mod tests;

pub use count::{count, CountAccumulator, CountCollector};
pub use distinct::{count_distinct, CountDistinctAccumulator, CountDistinctCollector};
pub use min_max::{max, min, ExtremumAccumulator, ExtremumCollector};
pub use sum::{sum, SumAccumulator, SumCollector, Summable};
pub use to_list::{to_list, ToListAccumulator, ToListCollector};
pub use uni::{Accumulator, UniCollector};
