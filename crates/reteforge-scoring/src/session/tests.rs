use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reteforge_core::{HardSoftScore, ScoringError, SimpleScore, SolutionDescriptor};
use reteforge_test::people::{people_descriptor, Person};
use reteforge_test::roster::{roster_descriptor, Employee, Shift};

use super::{EnvironmentMode, ScoringSession, SessionSettings, UpdateMode};
use crate::api::weight_overrides::ConstraintWeightOverrides;
use crate::graph::FactHandle;
use crate::stream::collector::{count, count_distinct, max, min, sum, to_list};
use crate::stream::joiner::{equal, equal_bi, greater_than, greater_than_or_equal, less_than, overlapping};
use crate::{Constraint, ConstraintFactory, NodeKindName};

type People = ConstraintFactory<(), SimpleScore>;

fn same_group_pair(factory: &People) -> Constraint<(), SimpleScore> {
    let mut constraint = factory.constraint("people", "Same group pair", |_| Some(SimpleScore::ONE));
    let pairs = constraint
        .declare_unique_pair::<Person>([equal(|p: &Person| p.group)])
        .unwrap();
    constraint.add_pipeline(pairs.penalize());
    constraint
}

fn crowded_group(factory: &People) -> Constraint<(), SimpleScore> {
    let mut constraint = factory.constraint("people", "Crowded group", |_| Some(SimpleScore::of(10)));
    let pipeline = constraint
        .declare_source::<Person>()
        .group_by(|p: &Person| p.group, count())
        .filter(|_: &char, n: &usize| *n >= 3)
        .penalize();
    constraint.add_pipeline(pipeline);
    constraint
}

fn unassigned(factory: &People) -> Constraint<(), SimpleScore> {
    let mut constraint = factory.constraint("people", "Unassigned", |_| Some(SimpleScore::of(100)));
    let pipeline = constraint
        .declare_source_unfiltered::<Person>()
        .filter(|p: &Person| p.desk.is_none())
        .penalize();
    constraint.add_pipeline(pipeline);
    constraint
}

fn people_session(settings: SessionSettings) -> ScoringSession<SimpleScore> {
    let factory = People::new(people_descriptor());
    let constraints = [
        same_group_pair(&factory),
        crowded_group(&factory),
        unassigned(&factory),
    ];
    let mut session = ScoringSession::with_settings(settings);
    session.build_graph(&constraints, &()).unwrap();
    session
}

/// Score of the people constraints computed directly from the facts.
fn people_score(people: &BTreeMap<FactHandle, Person>) -> SimpleScore {
    let seated: Vec<_> = people.values().filter(|p| p.desk.is_some()).collect();
    let mut pairs = 0;
    for (i, a) in seated.iter().enumerate() {
        pairs += seated[i + 1..].iter().filter(|b| b.group == a.group).count();
    }
    let mut groups: BTreeMap<char, usize> = BTreeMap::new();
    for person in &seated {
        *groups.entry(person.group).or_default() += 1;
    }
    let crowded = groups.values().filter(|n| **n >= 3).count();
    let unassigned = people.values().filter(|p| p.desk.is_none()).count();
    SimpleScore::of(-(pairs as i64) - 10 * crowded as i64 - 100 * unassigned as i64)
}

fn random_person(rng: &mut ChaCha8Rng, id: u32) -> Person {
    let group = ['A', 'B', 'C'][rng.random_range(0..3)];
    if rng.random_bool(0.2) {
        Person::unassigned(id, group)
    } else {
        Person::new(id, group)
    }
}

fn run_random_people(seed: u64, settings: SessionSettings) -> Vec<SimpleScore> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut session = people_session(settings);
    let mut model = BTreeMap::new();
    let mut scores = Vec::new();
    let mut next_id = 0;

    for _ in 0..200 {
        let handles: Vec<_> = model.keys().copied().collect();
        let op = if handles.is_empty() { 0 } else { rng.random_range(0..3) };
        match op {
            0 => {
                let person = random_person(&mut rng, next_id);
                next_id += 1;
                let handle = session.insert(person.clone()).unwrap();
                model.insert(handle, person);
            }
            1 => {
                let handle = handles[rng.random_range(0..handles.len())];
                let id = model[&handle].id;
                let person = random_person(&mut rng, id);
                session.update(handle, person.clone()).unwrap();
                model.insert(handle, person);
            }
            _ => {
                let handle = handles[rng.random_range(0..handles.len())];
                session.retract(handle).unwrap();
                model.remove(&handle);
            }
        }
        assert_eq!(session.score(), people_score(&model));
        scores.push(session.score());
    }
    session.assert_incremental_matches_rebuild().unwrap();
    scores
}

#[test]
fn test_same_group_pair_scenario() {
    let factory = People::new(people_descriptor());
    let mut session = ScoringSession::new();
    session.build_graph(&[same_group_pair(&factory)], &()).unwrap();

    let p1 = session.insert(Person::new(1, 'A')).unwrap();
    assert_eq!(session.score(), SimpleScore::ZERO);

    session.insert(Person::new(2, 'A')).unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));
    let total = session.constraint_match_total("people/Same group pair").unwrap();
    assert_eq!(total.match_count(), 1);

    session.insert(Person::new(3, 'B')).unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));

    session.retract(p1).unwrap();
    assert_eq!(session.score(), SimpleScore::ZERO);
    assert!(session
        .constraint_matches("people/Same group pair")
        .unwrap()
        .is_empty());
}

#[test]
fn test_unique_pairs_are_counted_once() {
    let factory = People::new(people_descriptor());
    let mut session = ScoringSession::new();
    session.build_graph(&[same_group_pair(&factory)], &()).unwrap();

    for id in 0..5 {
        session.insert(Person::new(id, 'A')).unwrap();
    }

    let matches = session.constraint_matches("people/Same group pair").unwrap();
    assert_eq!(matches.len(), 10);
    for m in &matches {
        let left = m.fact::<Person>(0).unwrap();
        let right = m.fact::<Person>(1).unwrap();
        assert!(left.id < right.id);
    }
    assert_eq!(session.score(), SimpleScore::of(-10));
}

#[test]
fn test_crowded_group_scenario() {
    let factory = People::new(people_descriptor());
    let mut session = ScoringSession::new();
    session.build_graph(&[crowded_group(&factory)], &()).unwrap();

    let first = session.insert(Person::new(1, 'A')).unwrap();
    let second = session.insert(Person::new(2, 'A')).unwrap();
    session.insert(Person::new(3, 'B')).unwrap();
    assert_eq!(session.score(), SimpleScore::ZERO);

    let third = session.insert(Person::new(4, 'A')).unwrap();
    assert_eq!(session.score(), SimpleScore::of(-10));

    let matches = session.constraint_matches("people/Crowded group").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].fact::<char>(0), Some(&'A'));
    assert_eq!(matches[0].fact::<usize>(1), Some(&3));

    let mut members = [first, second, third];
    for (i, member) in members.iter_mut().enumerate() {
        session.retract(*member).unwrap();
        assert_eq!(session.score(), SimpleScore::ZERO);
        assert!(session
            .constraint_matches("people/Crowded group")
            .unwrap()
            .is_empty());

        *member = session.insert(Person::new(10 + i as u32, 'A')).unwrap();
        assert_eq!(session.score(), SimpleScore::of(-10));
    }
}

#[test]
fn test_uninitialized_facts_are_filtered() {
    let factory = People::new(people_descriptor());
    let mut session = ScoringSession::new();
    session.build_graph(&[same_group_pair(&factory)], &()).unwrap();

    session.insert(Person::new(1, 'A')).unwrap();
    let standing = session.insert(Person::unassigned(2, 'A')).unwrap();
    assert_eq!(session.score(), SimpleScore::ZERO);

    session.update(standing, Person::new(2, 'A')).unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));
}

#[test]
fn test_retract_restores_every_node() {
    let mut session = people_session(SessionSettings::default());
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let handles: Vec<_> = (0..30)
        .map(|id| session.insert(random_person(&mut rng, id)).unwrap())
        .collect();
    assert_ne!(session.score(), SimpleScore::ZERO);

    for handle in handles {
        session.retract(handle).unwrap();
    }

    assert_eq!(session.score(), SimpleScore::ZERO);
    assert_eq!(session.fact_count(), 0);
    for total in session.constraint_match_totals() {
        assert_eq!(total.match_count(), 0);
    }
    for node in session.graph().unwrap().nodes() {
        assert_eq!(node.tuple_count, 0, "{:?} still holds tuples", node.kind);
    }
}

#[test]
fn test_insert_then_retract_restores_snapshot() {
    let mut session = people_session(SessionSettings::default());
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    for id in 0..20 {
        session.insert(random_person(&mut rng, id)).unwrap();
    }
    let nodes = session.graph().unwrap().nodes();
    let totals = session.constraint_match_totals().to_vec();

    for person in [Person::new(100, 'A'), Person::unassigned(101, 'B'), Person::new(102, 'C')] {
        let handle = session.insert(person).unwrap();
        session.retract(handle).unwrap();

        assert_eq!(session.graph().unwrap().nodes(), nodes);
        assert_eq!(session.constraint_match_totals(), totals.as_slice());
    }
}

#[test]
fn test_incremental_equals_batch() {
    for seed in [1, 7, 42] {
        run_random_people(seed, SessionSettings::default());
    }
}

#[test]
fn test_update_modes_agree() {
    for seed in [5, 11] {
        let retract_insert = run_random_people(
            seed,
            SessionSettings::new(EnvironmentMode::Reproducible, UpdateMode::RetractInsert),
        );
        let in_place = run_random_people(
            seed,
            SessionSettings::new(EnvironmentMode::Reproducible, UpdateMode::InPlace),
        );
        assert_eq!(retract_insert, in_place);
    }
}

#[test]
fn test_full_assert_checks_every_mutation() {
    let settings = SessionSettings::new(EnvironmentMode::FullAssert, UpdateMode::InPlace);
    run_random_people(9, settings);
}

fn roster_session(update_mode: UpdateMode) -> ScoringSession<HardSoftScore> {
    let factory = ConstraintFactory::<(), HardSoftScore>::new(roster_descriptor());

    let mut overlap = factory.constraint("roster", "Overlapping shifts", |_| Some(HardSoftScore::ONE_HARD));
    let pipeline = overlap
        .declare_unique_pair::<Shift>([
            equal(|s: &Shift| s.employee),
            overlapping(|s: &Shift| s.start, |s: &Shift| s.end, |s: &Shift| s.start, |s: &Shift| s.end),
        ])
        .unwrap()
        .filter(|a: &Shift, _: &Shift| a.employee.is_some())
        .penalize_weighted(|a: &Shift, b: &Shift| a.end.min(b.end) - a.start.max(b.start));
    overlap.add_pipeline(pipeline);

    let mut overtime = factory.constraint("roster", "Overtime", |_| Some(HardSoftScore::ONE_SOFT));
    let pipeline = overtime
        .declare_source::<Shift>()
        .filter(|s: &Shift| s.employee.is_some())
        .group_by(|s: &Shift| s.employee, sum(|s: &Shift| s.hours()))
        .filter(|_: &Option<u32>, hours: &i64| *hours > 16)
        .penalize_weighted(|_: &Option<u32>, hours: &i64| hours - 16);
    overtime.add_pipeline(pipeline);

    let mut session = ScoringSession::with_settings(SessionSettings::new(
        EnvironmentMode::NonReproducible,
        update_mode,
    ));
    session.build_graph(&[overlap, overtime], &()).unwrap();
    session
}

fn roster_score(shifts: &BTreeMap<FactHandle, Shift>) -> HardSoftScore {
    let assigned: Vec<_> = shifts.values().filter(|s| s.employee.is_some()).collect();
    let mut overlap = 0;
    for a in &assigned {
        for b in &assigned {
            if a.id < b.id && a.employee == b.employee && a.start < b.end && b.start < a.end {
                overlap += a.end.min(b.end) - a.start.max(b.start);
            }
        }
    }
    let mut hours: BTreeMap<u32, i64> = BTreeMap::new();
    for shift in &assigned {
        if let Some(employee) = shift.employee {
            *hours.entry(employee).or_default() += shift.hours();
        }
    }
    let overtime: i64 = hours.values().map(|h| (h - 16).max(0)).sum();
    HardSoftScore::of(-overlap, -overtime)
}

fn random_shift(rng: &mut ChaCha8Rng, id: u32) -> Shift {
    let start = rng.random_range(0..24);
    let shift = Shift::new(id, start, start + rng.random_range(1..10));
    if rng.random_bool(0.8) {
        shift.assigned_to(rng.random_range(0..3))
    } else {
        shift
    }
}

#[test]
fn test_joined_and_grouped_roster_equals_batch() {
    for update_mode in [UpdateMode::RetractInsert, UpdateMode::InPlace] {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut session = roster_session(update_mode);
        let mut model = BTreeMap::new();

        for id in 0..150 {
            let handles: Vec<_> = model.keys().copied().collect();
            if handles.is_empty() || rng.random_bool(0.5) {
                let shift = random_shift(&mut rng, id);
                let handle = session.insert(shift.clone()).unwrap();
                model.insert(handle, shift);
            } else if rng.random_bool(0.6) {
                let handle = handles[rng.random_range(0..handles.len())];
                let shift = random_shift(&mut rng, model[&handle].id);
                session.update(handle, shift.clone()).unwrap();
                model.insert(handle, shift);
            } else {
                let handle = handles[rng.random_range(0..handles.len())];
                session.retract(handle).unwrap();
                model.remove(&handle);
            }
            assert_eq!(session.score(), roster_score(&model));
        }
        session.assert_incremental_matches_rebuild().unwrap();
    }
}

/// Applies random shift and employee mutations to `session`, checking the
/// score against `expected` after each one.
fn run_random_roster<F>(session: &mut ScoringSession<SimpleScore>, seed: u64, expected: F)
where
    F: Fn(&BTreeMap<FactHandle, Shift>, &BTreeMap<FactHandle, Employee>) -> SimpleScore,
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut employees = BTreeMap::new();
    for id in 0..3 {
        let employee = Employee::new(id, rng.random_range(10..40));
        employees.insert(session.insert(employee.clone()).unwrap(), employee);
    }
    let mut shifts = BTreeMap::new();

    for id in 0..150 {
        let handles: Vec<_> = shifts.keys().copied().collect();
        if rng.random_bool(0.1) {
            let (&handle, employee) = employees.iter().nth(rng.random_range(0..3)).unwrap();
            let employee = Employee::new(employee.id, rng.random_range(10..40));
            session.update(handle, employee.clone()).unwrap();
            employees.insert(handle, employee);
        } else if handles.is_empty() || rng.random_bool(0.5) {
            let shift = random_shift(&mut rng, id);
            shifts.insert(session.insert(shift.clone()).unwrap(), shift);
        } else if rng.random_bool(0.6) {
            let handle = handles[rng.random_range(0..handles.len())];
            let shift = random_shift(&mut rng, shifts[&handle].id);
            session.update(handle, shift.clone()).unwrap();
            shifts.insert(handle, shift);
        } else {
            let handle = handles[rng.random_range(0..handles.len())];
            session.retract(handle).unwrap();
            shifts.remove(&handle);
        }
        assert_eq!(session.score(), expected(&shifts, &employees));
    }
    session.assert_incremental_matches_rebuild().unwrap();
}

fn ordered_join_session(update_mode: UpdateMode) -> ScoringSession<SimpleScore> {
    let factory = ConstraintFactory::<(), SimpleScore>::new(roster_descriptor());

    // Equality index narrowed by an ordered range.
    let mut long = factory.constraint("roster", "Long shift", |_| Some(SimpleScore::ONE));
    let pipeline = long
        .declare_source::<Shift>()
        .join(
            long.declare_source::<Employee>(),
            [
                equal_bi(|s: &Shift| s.employee, |e: &Employee| Some(e.id)),
                greater_than(|s: &Shift| s.hours() * 4, |e: &Employee| e.max_hours),
            ],
        )
        .penalize();
    long.add_pipeline(pipeline);

    // Ordered range only, looked up from both sides of a self-join.
    let mut handover = factory.constraint("roster", "Handover", |_| Some(SimpleScore::ONE));
    let shifts = handover.declare_source::<Shift>();
    let pipeline = shifts
        .clone()
        .join(shifts, [greater_than_or_equal(|a: &Shift| a.start, |b: &Shift| b.end)])
        .penalize();
    handover.add_pipeline(pipeline);

    // Ordered range only, across two classes.
    let mut reach = factory.constraint("roster", "Out of reach", |_| Some(SimpleScore::ONE));
    let pipeline = reach
        .declare_source::<Employee>()
        .join(
            reach.declare_source::<Shift>(),
            [less_than(|e: &Employee| e.max_hours, |s: &Shift| s.end)],
        )
        .filter(|_: &Employee, s: &Shift| s.employee.is_some())
        .penalize();
    reach.add_pipeline(pipeline);

    let mut session = ScoringSession::with_settings(SessionSettings::new(
        EnvironmentMode::NonReproducible,
        update_mode,
    ));
    session.build_graph(&[long, handover, reach], &()).unwrap();
    session
}

fn ordered_join_score(
    shifts: &BTreeMap<FactHandle, Shift>,
    employees: &BTreeMap<FactHandle, Employee>,
) -> SimpleScore {
    let mut matches = 0;
    for shift in shifts.values() {
        for employee in employees.values() {
            if shift.employee == Some(employee.id) && shift.hours() * 4 > employee.max_hours {
                matches += 1;
            }
            if employee.max_hours < shift.end && shift.employee.is_some() {
                matches += 1;
            }
        }
        matches += shifts.values().filter(|other| shift.start >= other.end).count();
    }
    SimpleScore::of(-(matches as i64))
}

#[test]
fn test_ordered_join_equals_batch() {
    for update_mode in [UpdateMode::RetractInsert, UpdateMode::InPlace] {
        let mut session = ordered_join_session(update_mode);
        run_random_roster(&mut session, 23, ordered_join_score);
    }
}

fn workload_session(update_mode: UpdateMode) -> ScoringSession<SimpleScore> {
    let factory = ConstraintFactory::<(), SimpleScore>::new(roster_descriptor());

    let mut early = factory.constraint("roster", "Early start", |_| Some(SimpleScore::ONE));
    let pipeline = early
        .declare_source::<Shift>()
        .group_by(|s: &Shift| s.employee, min(|s: &Shift| s.start))
        .filter(|_: &Option<u32>, start: &Option<i64>| start.is_some_and(|start| start < 6))
        .penalize_weighted(|_: &Option<u32>, start: &Option<i64>| 6 - start.unwrap_or(6));
    early.add_pipeline(pipeline);

    let mut late = factory.constraint("roster", "Late end", |_| Some(SimpleScore::ONE));
    let pipeline = late
        .declare_source::<Shift>()
        .group_by(|s: &Shift| s.employee, max(|s: &Shift| s.end))
        .filter(|_: &Option<u32>, end: &Option<i64>| end.is_some_and(|end| end > 24))
        .penalize_weighted(|_: &Option<u32>, end: &Option<i64>| end.unwrap_or(24) - 24);
    late.add_pipeline(pipeline);

    let mut mixed = factory.constraint("roster", "Mixed periods", |_| Some(SimpleScore::ONE));
    let pipeline = mixed
        .declare_source::<Shift>()
        .group_by(|s: &Shift| s.employee, count_distinct(|s: &Shift| s.start / 8))
        .filter(|_: &Option<u32>, periods: &usize| *periods > 1)
        .penalize_weighted(|_: &Option<u32>, periods: &usize| *periods as i64 - 1);
    mixed.add_pipeline(pipeline);

    let mut busy = factory.constraint("roster", "Busy employee", |_| Some(SimpleScore::ONE));
    let pipeline = busy
        .declare_source::<Shift>()
        .group_by(|s: &Shift| s.employee, to_list(|s: &Shift| s.id))
        .filter(|_: &Option<u32>, ids: &Vec<u32>| ids.len() > 2)
        .penalize_weighted(|_: &Option<u32>, ids: &Vec<u32>| ids[2..].iter().map(|id| *id as i64 % 3 + 1).sum());
    busy.add_pipeline(pipeline);

    let mut session = ScoringSession::with_settings(SessionSettings::new(
        EnvironmentMode::NonReproducible,
        update_mode,
    ));
    session.build_graph(&[early, late, mixed, busy], &()).unwrap();
    session
}

fn workload_score(
    shifts: &BTreeMap<FactHandle, Shift>,
    _: &BTreeMap<FactHandle, Employee>,
) -> SimpleScore {
    let mut groups: BTreeMap<Option<u32>, Vec<&Shift>> = BTreeMap::new();
    for shift in shifts.values() {
        groups.entry(shift.employee).or_default().push(shift);
    }
    let mut penalty = 0;
    for members in groups.values() {
        let start = members.iter().map(|s| s.start).min().unwrap_or(6);
        penalty += (6 - start).max(0);
        let end = members.iter().map(|s| s.end).max().unwrap_or(24);
        penalty += (end - 24).max(0);
        let periods: std::collections::BTreeSet<_> = members.iter().map(|s| s.start / 8).collect();
        penalty += periods.len().saturating_sub(1) as i64;
        let mut ids: Vec<_> = members.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        penalty += ids.iter().skip(2).map(|id| *id as i64 % 3 + 1).sum::<i64>();
    }
    SimpleScore::of(-penalty)
}

#[test]
fn test_multiset_collectors_equal_batch() {
    for update_mode in [UpdateMode::RetractInsert, UpdateMode::InPlace] {
        let mut session = workload_session(update_mode);
        run_random_roster(&mut session, 29, workload_score);
    }
}

#[test]
fn test_sum_survives_retracting_a_large_value() {
    let factory = ConstraintFactory::<(), SimpleScore>::new(roster_descriptor());
    let mut heavy = factory.constraint("roster", "Heavy", |_| Some(SimpleScore::ONE));
    let pipeline = heavy
        .declare_source::<Shift>()
        .group_by(|s: &Shift| s.employee, sum(|s: &Shift| s.end))
        .filter(|_: &Option<u32>, total: &i64| *total > 0)
        .penalize();
    heavy.add_pipeline(pipeline);

    let mut session = ScoringSession::with_settings(SessionSettings::new(
        EnvironmentMode::FullAssert,
        UpdateMode::RetractInsert,
    ));
    session.build_graph(&[heavy], &()).unwrap();
    let large = session.insert(Shift::new(1, 0, 10_000_000_000_000_000)).unwrap();
    session.insert(Shift::new(2, 0, 1)).unwrap();
    session.retract(large).unwrap();

    assert_eq!(session.score(), SimpleScore::of(-1));
}

#[test]
fn test_facts_without_source_are_tracked() {
    let mut session = people_session(SessionSettings::default());

    let handle = session.insert(Employee::new(1, 40)).unwrap();

    assert_eq!(session.score(), SimpleScore::ZERO);
    assert_eq!(session.fact_count(), 1);
    assert_eq!(session.fact::<Employee>(handle).map(|e| e.max_hours), Some(40));
    session.update(handle, Employee::new(1, 30)).unwrap();
    session.retract(handle).unwrap();
    assert_eq!(session.fact_count(), 0);
}

#[test]
fn test_mutations_require_a_built_graph() {
    let mut session = ScoringSession::<SimpleScore>::new();

    assert!(matches!(
        session.insert(Person::new(1, 'A')),
        Err(ScoringError::GraphNotBuilt)
    ));
    assert!(matches!(session.graph(), Err(ScoringError::GraphNotBuilt)));
    assert!(!session.is_built());
}

#[test]
fn test_session_usage_errors() {
    let mut session = people_session(SessionSettings::default());
    let handle = session.insert(Person::new(1, 'A')).unwrap();

    let err = session.update(handle, Employee::new(1, 40)).unwrap_err();
    assert!(matches!(err, ScoringError::FactClassMismatch { .. }));
    // The rejected update left the fact untouched.
    assert_eq!(session.fact::<Person>(handle).map(|p| p.id), Some(1));

    session.retract(handle).unwrap();
    assert!(matches!(
        session.retract(handle),
        Err(ScoringError::UnknownFact(_))
    ));
    assert!(matches!(
        session.update(handle, Person::new(1, 'B')),
        Err(ScoringError::UnknownFact(_))
    ));
    assert!(matches!(
        session.constraint_match_total("people/Nope"),
        Err(ScoringError::UnknownConstraint(_))
    ));
    assert!(matches!(
        session.constraint_matches("people/Nope"),
        Err(ScoringError::UnknownConstraint(_))
    ));
}

#[test]
fn test_failed_build_leaves_session_unbuilt() {
    let factory = People::new(people_descriptor());
    let mut broken = factory.constraint("people", "No weight", |_| None);
    let pipeline = broken.declare_source::<Person>().penalize();
    broken.add_pipeline(pipeline);

    let mut session = ScoringSession::new();
    let err = session.build_graph(&[broken], &()).unwrap_err();

    assert!(matches!(err, ScoringError::Configuration(_)));
    assert!(!session.is_built());
}

#[test]
fn test_build_graph_is_idempotent() {
    let factory = People::new(people_descriptor());
    let mut session = ScoringSession::new();
    session.build_graph(&[same_group_pair(&factory)], &()).unwrap();
    session.insert(Person::new(1, 'A')).unwrap();
    session.insert(Person::new(2, 'A')).unwrap();
    let nodes = session.graph().unwrap().node_count();

    session
        .build_graph(&[same_group_pair(&factory), unassigned(&factory)], &())
        .unwrap();

    assert_eq!(session.graph().unwrap().node_count(), nodes);
    assert_eq!(session.score(), SimpleScore::of(-1));
}

#[test]
fn test_zero_weight_constraint_reports_empty_total() {
    let factory = People::new(people_descriptor());
    let mut disabled = factory.constraint("people", "Disabled", |_| Some(SimpleScore::ZERO));
    let pipeline = disabled.declare_source::<Person>().penalize();
    disabled.add_pipeline(pipeline);

    let mut session = ScoringSession::new();
    session.build_graph(&[disabled], &()).unwrap();
    session.insert(Person::new(1, 'A')).unwrap();

    let total = session.constraint_match_total("people/Disabled").unwrap();
    assert_eq!(total.match_count(), 0);
    assert_eq!(total.score(), SimpleScore::ZERO);
    assert_eq!(session.graph().unwrap().count_of(NodeKindName::Scoring), 0);
}

#[test]
fn test_weight_override_applies_at_build() {
    let mut overrides = ConstraintWeightOverrides::new();
    overrides.put("people/Same group pair", SimpleScore::of(5));
    let factory = People::new(people_descriptor()).with_weight_overrides(overrides);

    let mut session = ScoringSession::new();
    session.build_graph(&[same_group_pair(&factory)], &()).unwrap();
    session.insert(Person::new(1, 'A')).unwrap();
    session.insert(Person::new(2, 'A')).unwrap();

    assert_eq!(session.score(), SimpleScore::of(-5));
}

#[test]
fn test_explain_lists_matches_and_indictments() {
    let mut session = people_session(SessionSettings::default());
    session.insert(Person::new(1, 'A')).unwrap();
    session.insert(Person::new(2, 'A')).unwrap();
    session.insert(Person::new(3, 'B')).unwrap();
    session.insert(Person::unassigned(4, 'B')).unwrap();

    let explanation = session.explain().unwrap();

    assert_eq!(explanation.score, SimpleScore::of(-101));
    assert_eq!(explanation.constraint_analyses.len(), 3);
    assert_eq!(explanation.non_zero_constraints().len(), 2);
    assert_eq!(explanation.total_match_count(), 2);

    let indictments = explanation.indictments();
    assert_eq!(indictments.len(), 3);
    let worst = indictments.worst_entities()[0];
    assert_eq!(worst.as_entity::<Person>().map(|p| p.id), Some(4));
}

#[test]
fn test_source_without_descriptor_keeps_every_fact() {
    let factory = People::new(SolutionDescriptor::new("Plain"));
    let mut everyone = factory.constraint("people", "Everyone", |_| Some(SimpleScore::ONE));
    let pipeline = everyone.declare_source::<Person>().reward();
    everyone.add_pipeline(pipeline);

    let mut session = ScoringSession::new();
    session.build_graph(&[everyone], &()).unwrap();
    session.insert(Person::unassigned(1, 'A')).unwrap();

    assert_eq!(session.score(), SimpleScore::ONE);
}

#[test]
fn test_session_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<ScoringSession<SimpleScore>>();
    assert_send::<ScoringSession<HardSoftScore>>();
}
