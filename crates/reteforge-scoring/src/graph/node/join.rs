//! Join node.
//!
//! Each side keeps its tuples in an index keyed by the values of the
//! indexable joiners: a hash map over the equality keys, then an ordered map
//! over the key of the first comparison joiner. A tuple arriving on one side
//! probes the other side's index with its own key; candidates are then
//! checked against the scanned joiners.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use reteforge_core::domain::FactRef;
use reteforge_core::Score;
use smallvec::SmallVec;

use super::NodeContext;
use crate::graph::key::{EqKey, OrdKey};
use crate::graph::tuple::{Event, Tuple, TupleFacts, TupleId};
use crate::graph::Side;
use crate::stream::joiner::{CompareOp, JoinCondition, KeyFn};

type EqKeys = SmallVec<[EqKey; 2]>;

struct IndexKey {
    eq: EqKeys,
    ord: OrdKey,
}

/// The joiners of a join, split by how they are evaluated.
struct JoinPlan {
    equal: Vec<(KeyFn<EqKey>, KeyFn<EqKey>)>,
    ordered: Option<(CompareOp, KeyFn<OrdKey>, KeyFn<OrdKey>)>,
    scanned: Vec<JoinCondition>,
}

impl JoinPlan {
    fn new(conditions: &[JoinCondition]) -> Self {
        let mut plan = Self {
            equal: Vec::new(),
            ordered: None,
            scanned: Vec::new(),
        };
        for condition in conditions {
            match condition {
                JoinCondition::Equal { left, right } => {
                    plan.equal.push((left.clone(), right.clone()));
                }
                JoinCondition::Compare {
                    op,
                    left,
                    right,
                    indexed: true,
                } if plan.ordered.is_none() => {
                    plan.ordered = Some((*op, left.clone(), right.clone()));
                }
                other => plan.scanned.push(other.clone()),
            }
        }
        plan
    }

    fn index_key(&self, side: Side, facts: &[FactRef]) -> IndexKey {
        let pick = |left: &KeyFn<EqKey>, right: &KeyFn<EqKey>| {
            if side == Side::Right {
                right(facts)
            } else {
                left(facts)
            }
        };
        let eq = self.equal.iter().map(|(l, r)| pick(l, r)).collect();
        let ord = match &self.ordered {
            Some((_, left, _)) if side != Side::Right => left(facts),
            Some((_, _, right)) => right(facts),
            None => OrdKey::unit(),
        };
        IndexKey { eq, ord }
    }

    /// Range of the other side's ordered keys that satisfy the indexed
    /// comparison against `value`, read as `left OP right`.
    fn probe_range<'k>(&self, side: Side, value: &'k OrdKey) -> Option<(Bound<&'k OrdKey>, Bound<&'k OrdKey>)> {
        use Bound::{Excluded, Included, Unbounded};
        let (op, _, _) = self.ordered.as_ref()?;
        let probing_left = side != Side::Right;
        Some(match (op, probing_left) {
            // value < k
            (CompareOp::LessThan, true) => (Excluded(value), Unbounded),
            (CompareOp::LessThanOrEqual, true) => (Included(value), Unbounded),
            (CompareOp::GreaterThan, true) => (Unbounded, Excluded(value)),
            (CompareOp::GreaterThanOrEqual, true) => (Unbounded, Included(value)),
            // k < value
            (CompareOp::LessThan, false) => (Unbounded, Excluded(value)),
            (CompareOp::LessThanOrEqual, false) => (Unbounded, Included(value)),
            (CompareOp::GreaterThan, false) => (Excluded(value), Unbounded),
            (CompareOp::GreaterThanOrEqual, false) => (Included(value), Unbounded),
        })
    }

    fn scan(&self, left: &[FactRef], right: &[FactRef]) -> bool {
        self.scanned.iter().all(|c| c.matches(left, right))
    }
}

#[derive(Default)]
struct JoinSide {
    tuples: HashMap<TupleId, (Tuple, IndexKey)>,
    index: HashMap<EqKeys, BTreeMap<OrdKey, BTreeSet<TupleId>>>,
}

impl JoinSide {
    fn add(&mut self, tuple: Tuple, key: IndexKey) {
        self.index
            .entry(key.eq.clone())
            .or_default()
            .entry(key.ord.clone())
            .or_default()
            .insert(tuple.id);
        self.tuples.insert(tuple.id, (tuple, key));
    }

    fn remove(&mut self, id: TupleId) -> Option<Tuple> {
        let (tuple, key) = self.tuples.remove(&id)?;
        if let Some(bucket) = self.index.get_mut(&key.eq) {
            if let Some(ids) = bucket.get_mut(&key.ord) {
                ids.remove(&id);
                if ids.is_empty() {
                    bucket.remove(&key.ord);
                }
            }
            if bucket.is_empty() {
                self.index.remove(&key.eq);
            }
        }
        Some(tuple)
    }

    fn probe(&self, eq: &EqKeys, range: Option<(Bound<&OrdKey>, Bound<&OrdKey>)>) -> Vec<TupleId> {
        let Some(bucket) = self.index.get(eq) else {
            return Vec::new();
        };
        match range {
            None => bucket.values().flatten().copied().collect(),
            Some(range) => bucket
                .range::<OrdKey, _>(range)
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect(),
        }
    }

    fn facts(&self, id: &TupleId) -> &[FactRef] {
        &self.tuples[id].0.facts
    }
}

pub(crate) struct JoinNode {
    plan: JoinPlan,
    left: JoinSide,
    right: JoinSide,
    /// (left, right) -> output tuple.
    combos: HashMap<(TupleId, TupleId), TupleId>,
    /// left -> rights it is joined with.
    left_combos: HashMap<TupleId, BTreeSet<TupleId>>,
    /// right -> lefts it is joined with.
    right_combos: HashMap<TupleId, BTreeSet<TupleId>>,
}

fn opposite(side: Side) -> Side {
    if side == Side::Right {
        Side::Left
    } else {
        Side::Right
    }
}

/// Orders a (this side, other side) pair as (left, right).
fn pair<T>(side: Side, this: T, other: T) -> (T, T) {
    if side == Side::Right {
        (other, this)
    } else {
        (this, other)
    }
}

fn concat(left: &[FactRef], right: &[FactRef]) -> TupleFacts {
    left.iter().chain(right).cloned().collect()
}

impl JoinNode {
    pub(crate) fn new(conditions: &[JoinCondition]) -> Self {
        Self {
            plan: JoinPlan::new(conditions),
            left: JoinSide::default(),
            right: JoinSide::default(),
            combos: HashMap::new(),
            left_combos: HashMap::new(),
            right_combos: HashMap::new(),
        }
    }

    pub(crate) fn process<Sc: Score>(&mut self, side: Side, event: Event, ctx: &mut NodeContext<'_, Sc>) {
        match event {
            Event::Insert(tuple) => self.insert(side, tuple, ctx),
            Event::Update(tuple) => self.update(side, tuple, ctx),
            Event::Retract(id) => self.retract(side, id, ctx),
        }
    }

    fn side(&self, side: Side) -> &JoinSide {
        if side == Side::Right {
            &self.right
        } else {
            &self.left
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut JoinSide {
        if side == Side::Right {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    fn combos_of_mut(&mut self, side: Side) -> &mut HashMap<TupleId, BTreeSet<TupleId>> {
        if side == Side::Right {
            &mut self.right_combos
        } else {
            &mut self.left_combos
        }
    }

    /// Ids of the other side's tuples that join with `tuple`.
    fn matching(&self, side: Side, tuple: &Tuple, key: &IndexKey) -> Vec<TupleId> {
        let other = self.side(opposite(side));
        other
            .probe(&key.eq, self.plan.probe_range(side, &key.ord))
            .into_iter()
            .filter(|id| {
                let (left, right) = pair(side, &tuple.facts[..], other.facts(id));
                self.plan.scan(left, right)
            })
            .collect()
    }

    fn insert<Sc: Score>(&mut self, side: Side, tuple: Tuple, ctx: &mut NodeContext<'_, Sc>) {
        let key = self.plan.index_key(side, &tuple.facts);
        let matches = self.matching(side, &tuple, &key);
        let id = tuple.id;
        self.side_mut(side).add(tuple, key);
        for other in matches {
            self.create_combo(side, id, other, ctx);
        }
    }

    fn update<Sc: Score>(&mut self, side: Side, tuple: Tuple, ctx: &mut NodeContext<'_, Sc>) {
        let id = tuple.id;
        if self.side_mut(side).remove(id).is_none() {
            self.insert(side, tuple, ctx);
            return;
        }
        let key = self.plan.index_key(side, &tuple.facts);
        let now: BTreeSet<TupleId> = self.matching(side, &tuple, &key).into_iter().collect();
        self.side_mut(side).add(tuple, key);

        let before = self
            .combos_of_mut(side)
            .get(&id)
            .cloned()
            .unwrap_or_default();
        for &other in before.difference(&now) {
            self.retract_combo(pair(side, id, other), ctx);
        }
        for &other in before.intersection(&now) {
            let (left, right) = pair(side, id, other);
            if let Some(&out) = self.combos.get(&(left, right)) {
                let facts = concat(self.left.facts(&left), self.right.facts(&right));
                ctx.emit(Event::Update(Tuple::new(out, facts)));
            }
        }
        for &other in now.difference(&before) {
            self.create_combo(side, id, other, ctx);
        }
    }

    fn retract<Sc: Score>(&mut self, side: Side, id: TupleId, ctx: &mut NodeContext<'_, Sc>) {
        if self.side_mut(side).remove(id).is_none() {
            return;
        }
        let partners = self.combos_of_mut(side).remove(&id).unwrap_or_default();
        for other in partners {
            self.retract_combo(pair(side, id, other), ctx);
        }
    }

    fn create_combo<Sc: Score>(&mut self, side: Side, id: TupleId, other: TupleId, ctx: &mut NodeContext<'_, Sc>) {
        let (left, right) = pair(side, id, other);
        let facts = concat(self.left.facts(&left), self.right.facts(&right));
        let out = Tuple::new(ctx.next_tuple_id(), facts);
        self.combos.insert((left, right), out.id);
        self.left_combos.entry(left).or_default().insert(right);
        self.right_combos.entry(right).or_default().insert(left);
        ctx.emit(Event::Insert(out));
    }

    fn retract_combo<Sc: Score>(&mut self, (left, right): (TupleId, TupleId), ctx: &mut NodeContext<'_, Sc>) {
        let Some(out) = self.combos.remove(&(left, right)) else {
            return;
        };
        if let Some(rights) = self.left_combos.get_mut(&left) {
            rights.remove(&right);
            if rights.is_empty() {
                self.left_combos.remove(&left);
            }
        }
        if let Some(lefts) = self.right_combos.get_mut(&right) {
            lefts.remove(&left);
            if lefts.is_empty() {
                self.right_combos.remove(&right);
            }
        }
        ctx.emit(Event::Retract(out));
    }

    pub(crate) fn tuple_count(&self) -> usize {
        self.left.tuples.len() + self.right.tuples.len() + self.combos.len()
    }
}
