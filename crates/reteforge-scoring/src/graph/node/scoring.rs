//! Scoring leaf: the end of every pipeline.

use std::collections::HashMap;

use reteforge_core::domain::FactRef;
use reteforge_core::{ImpactType, Score};

use super::NodeContext;
use crate::graph::tuple::{Event, Tuple, TupleFacts, TupleId};
use crate::stream::MatchWeigher;

pub(crate) struct LiveMatch<Sc> {
    pub(crate) facts: TupleFacts,
    pub(crate) score: Sc,
}

/// Records one weighted match per live tuple and keeps the match total of
/// its constraint in step.
pub(crate) struct ScoringNode<Sc: Score> {
    constraint_index: usize,
    impact: ImpactType,
    weight: Sc,
    weigher: Option<MatchWeigher>,
    matches: HashMap<TupleId, LiveMatch<Sc>>,
}

impl<Sc: Score> ScoringNode<Sc> {
    pub(crate) fn new(
        constraint_index: usize,
        impact: ImpactType,
        weight: Sc,
        weigher: Option<MatchWeigher>,
    ) -> Self {
        Self {
            constraint_index,
            impact,
            weight,
            weigher,
            matches: HashMap::new(),
        }
    }

    fn contribution(&self, facts: &[FactRef]) -> Sc {
        let magnitude = match &self.weigher {
            Some(weigher) => self.weight.multiply(weigher(facts) as f64),
            None => self.weight,
        };
        self.impact.apply(magnitude)
    }

    pub(crate) fn process(&mut self, event: Event, ctx: &mut NodeContext<'_, Sc>) {
        match event {
            Event::Insert(tuple) | Event::Update(tuple) => {
                self.remove(tuple.id, ctx);
                self.record(tuple, ctx);
            }
            Event::Retract(id) => self.remove(id, ctx),
        }
    }

    fn record(&mut self, tuple: Tuple, ctx: &mut NodeContext<'_, Sc>) {
        let score = self.contribution(&tuple.facts);
        ctx.totals[self.constraint_index].add_match(score);
        self.matches.insert(
            tuple.id,
            LiveMatch {
                facts: tuple.facts,
                score,
            },
        );
    }

    fn remove(&mut self, id: TupleId, ctx: &mut NodeContext<'_, Sc>) {
        if let Some(live) = self.matches.remove(&id) {
            ctx.totals[self.constraint_index].remove_match(live.score);
        }
    }

    pub(crate) fn live_matches(&self) -> impl Iterator<Item = (&TupleId, &LiveMatch<Sc>)> {
        self.matches.iter()
    }

    pub(crate) fn tuple_count(&self) -> usize {
        self.matches.len()
    }
}
