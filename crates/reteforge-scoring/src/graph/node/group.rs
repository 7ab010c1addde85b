//! Group node.

use std::collections::HashMap;
use std::sync::Arc;

use reteforge_core::domain::FactRef;
use reteforge_core::Score;
use smallvec::smallvec;

use super::NodeContext;
use crate::graph::key::EqKey;
use crate::graph::tuple::{Event, Tuple, TupleId};
use crate::stream::group::{ErasedAccumulator, GroupSpec, GroupValue};

struct Group {
    key: FactRef,
    accumulator: Box<dyn ErasedAccumulator>,
    count: usize,
    out: TupleId,
}

/// Folds incoming tuples into one `(key, aggregate)` tuple per group.
///
/// Every member remembers its key and extracted value, so a retract folds
/// out exactly what the insert folded in.
pub(crate) struct GroupNode {
    spec: Arc<dyn GroupSpec>,
    groups: HashMap<EqKey, Group>,
    members: HashMap<TupleId, (EqKey, GroupValue)>,
}

impl GroupNode {
    pub(crate) fn new(spec: Arc<dyn GroupSpec>) -> Self {
        Self {
            spec,
            groups: HashMap::new(),
            members: HashMap::new(),
        }
    }

    pub(crate) fn process<Sc: Score>(&mut self, event: Event, ctx: &mut NodeContext<'_, Sc>) {
        match event {
            Event::Insert(tuple) => self.insert(tuple, ctx),
            Event::Update(tuple) => self.update(tuple, ctx),
            Event::Retract(id) => {
                if let Some((key, value)) = self.members.remove(&id) {
                    self.fold_out(&key, &value, ctx);
                }
            }
        }
    }

    fn insert<Sc: Score>(&mut self, tuple: Tuple, ctx: &mut NodeContext<'_, Sc>) {
        let (key, key_fact) = self.spec.key(&tuple.facts);
        let value = self.spec.extract(&tuple.facts);
        self.fold_in(key.clone(), key_fact, &value, ctx);
        self.members.insert(tuple.id, (key, value));
    }

    fn update<Sc: Score>(&mut self, tuple: Tuple, ctx: &mut NodeContext<'_, Sc>) {
        let Some((old_key, old_value)) = self.members.remove(&tuple.id) else {
            self.insert(tuple, ctx);
            return;
        };
        let (key, key_fact) = self.spec.key(&tuple.facts);
        let value = self.spec.extract(&tuple.facts);
        if key == old_key {
            if let Some(group) = self.groups.get_mut(&key) {
                group.accumulator.retract(&*old_value);
                group.accumulator.accumulate(&*value);
                let out = Self::output(group);
                ctx.emit(Event::Update(out));
            }
        } else {
            self.fold_out(&old_key, &old_value, ctx);
            self.fold_in(key.clone(), key_fact, &value, ctx);
        }
        self.members.insert(tuple.id, (key, value));
    }

    fn fold_in<Sc: Score>(&mut self, key: EqKey, key_fact: FactRef, value: &GroupValue, ctx: &mut NodeContext<'_, Sc>) {
        match self.groups.get_mut(&key) {
            Some(group) => {
                group.accumulator.accumulate(&**value);
                group.count += 1;
                ctx.emit(Event::Update(Self::output(group)));
            }
            None => {
                let mut accumulator = self.spec.create_accumulator();
                accumulator.accumulate(&**value);
                let group = Group {
                    key: key_fact,
                    accumulator,
                    count: 1,
                    out: ctx.next_tuple_id(),
                };
                ctx.emit(Event::Insert(Self::output(&group)));
                self.groups.insert(key, group);
            }
        }
    }

    fn fold_out<Sc: Score>(&mut self, key: &EqKey, value: &GroupValue, ctx: &mut NodeContext<'_, Sc>) {
        let Some(group) = self.groups.get_mut(key) else {
            return;
        };
        group.count -= 1;
        if group.count == 0 {
            let out = group.out;
            self.groups.remove(key);
            ctx.emit(Event::Retract(out));
        } else {
            group.accumulator.retract(&**value);
            ctx.emit(Event::Update(Self::output(group)));
        }
    }

    fn output(group: &Group) -> Tuple {
        Tuple::new(group.out, smallvec![Arc::clone(&group.key), group.accumulator.result()])
    }

    pub(crate) fn tuple_count(&self) -> usize {
        self.groups.len() + self.members.len()
    }
}
