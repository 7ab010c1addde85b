//! Collector and accumulator traits.

use reteforge_core::domain::FactValue;

/// Folds the values of a group into one result.
///
/// The collector itself is stateless and shared by every group; each group
/// gets its own [`Accumulator`] from [`create_accumulator`](Self::create_accumulator).
pub trait UniCollector<A>: Send + Sync {
    /// The value extracted from each fact and fed to the accumulator.
    type Value: Send + Sync + 'static;

    /// The aggregate produced by the accumulator.
    type Result: FactValue;

    /// The per-group accumulator.
    type Accumulator: Accumulator<Self::Value, Self::Result> + 'static;

    /// Extracts the value to accumulate from a fact.
    fn extract(&self, entity: &A) -> Self::Value;

    /// Creates an empty accumulator.
    fn create_accumulator(&self) -> Self::Accumulator;
}

/// Running aggregate of one group.
pub trait Accumulator<V, R>: Send + Sync {
    /// Folds a value in.
    fn accumulate(&mut self, value: &V);

    /// Folds a previously accumulated value out.
    fn retract(&mut self, value: &V);

    /// Returns the current aggregate.
    fn finish(&self) -> R;

    /// Resets to the empty state.
    fn reset(&mut self);
}
