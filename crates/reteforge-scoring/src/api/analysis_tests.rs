//! Tests for score analysis types.

use std::sync::Arc;

use reteforge_core::domain::FactRef;
use reteforge_core::{ConstraintRef, HardSoftScore, SimpleScore};

use super::analysis::*;
use super::match_total::ConstraintMatch;

#[derive(Clone, Debug, PartialEq)]
struct Desk {
    id: i32,
    room: String,
}

fn desk(id: i32, room: &str) -> FactRef {
    Arc::new(Desk {
        id,
        room: room.to_string(),
    })
}

fn matched(name: &str, score: i64, facts: &[&FactRef]) -> ConstraintMatch<SimpleScore> {
    ConstraintMatch {
        constraint_ref: ConstraintRef::new("office", name),
        facts: facts.iter().map(|f| Arc::clone(f)).collect(),
        score: SimpleScore::of(score),
    }
}

#[test]
fn test_entity_ref_creation() {
    let entity_ref = EntityRef::new(&Desk {
        id: 1,
        room: "North".to_string(),
    });

    assert!(entity_ref.type_name.contains("Desk"));
    assert_eq!(entity_ref.short_type_name(), "Desk");
    assert!(entity_ref.display.contains("North"));
}

#[test]
fn test_entity_ref_from_shared_fact() {
    let fact = desk(42, "South");
    let entity_ref = EntityRef::from_fact(&fact);

    assert_eq!(entity_ref.as_entity::<Desk>().map(|d| d.id), Some(42));
    assert!(entity_ref.as_entity::<String>().is_none());
    // Equal values from separate facts are the same entity.
    assert_eq!(entity_ref, EntityRef::from_fact(&desk(42, "South")));
    assert_ne!(entity_ref, EntityRef::from_fact(&desk(43, "South")));
}

#[test]
fn test_constraint_analysis_detects_hard_weight() {
    let hard = ConstraintAnalysis::new(
        ConstraintRef::new("office", "Double booked"),
        HardSoftScore::ONE_HARD,
        HardSoftScore::of(-2, 0),
        Vec::new(),
    );
    let soft = ConstraintAnalysis::new(
        ConstraintRef::new("office", "Far from window"),
        HardSoftScore::of(0, 3),
        HardSoftScore::ZERO,
        Vec::new(),
    );

    assert!(hard.is_hard);
    assert!(!soft.is_hard);
    assert_eq!(hard.name(), "Double booked");
}

#[test]
fn test_score_explanation_totals() {
    let north = desk(1, "North");
    let analyses = vec![
        ConstraintAnalysis::new(
            ConstraintRef::new("office", "Shared desk"),
            SimpleScore::ONE,
            SimpleScore::of(-2),
            vec![
                matched("Shared desk", -1, &[&north]),
                matched("Shared desk", -1, &[&north]),
            ],
        ),
        ConstraintAnalysis::new(
            ConstraintRef::new("office", "Empty"),
            SimpleScore::ONE,
            SimpleScore::ZERO,
            Vec::new(),
        ),
    ];
    let explanation = ScoreExplanation::new(SimpleScore::of(-2), analyses);

    assert_eq!(explanation.total_match_count(), 2);
    assert_eq!(explanation.non_zero_constraints().len(), 1);
    assert_eq!(explanation.all_matches().count(), 2);
}

#[test]
fn test_indictments_group_matches_by_entity() {
    let north = desk(1, "North");
    let south = desk(2, "South");
    let matches = [
        matched("Shared desk", -1, &[&north, &south]),
        matched("Noisy", -3, &[&south]),
    ];

    let indictments = IndictmentMap::from_matches(&matches);

    let north = EntityRef::from_fact(&north);
    let south = EntityRef::from_fact(&south);
    assert_eq!(indictments.len(), 2);
    let south_indictment = indictments.get(&south).unwrap();
    assert_eq!(south_indictment.score, SimpleScore::of(-4));
    assert_eq!(south_indictment.match_count(), 2);
    assert_eq!(south_indictment.constraint_count(), 2);
    assert!(south_indictment.constraint_matches.contains_key("office/Noisy"));
    assert_eq!(indictments.get(&north).unwrap().score, SimpleScore::of(-1));
    assert_eq!(indictments.worst_entities(), vec![&south, &north]);
}

#[test]
fn test_empty_indictment_map() {
    let indictments = IndictmentMap::<SimpleScore>::default();
    assert!(indictments.is_empty());
    assert!(indictments.worst_entities().is_empty());
}
