//! Tests for the score types.

use super::*;

#[test]
fn test_simple_arithmetic() {
    let s1 = SimpleScore::of(10);
    let s2 = SimpleScore::of(3);

    assert_eq!(s1 + s2, SimpleScore::of(13));
    assert_eq!(s1 - s2, SimpleScore::of(7));
    assert_eq!(-s1, SimpleScore::of(-10));
    assert_eq!(s2.multiply(4.0), SimpleScore::of(12));
}

#[test]
fn test_simple_parse() {
    assert_eq!(SimpleScore::parse("42").unwrap(), SimpleScore::of(42));
    assert_eq!(SimpleScore::parse(" -10 ").unwrap(), SimpleScore::of(-10));
    assert!(SimpleScore::parse("ten").is_err());
}

#[test]
fn test_hard_soft_ordering() {
    assert!(HardSoftScore::of(0, -100) > HardSoftScore::of(-1, 0));
    assert!(HardSoftScore::of(0, -50) > HardSoftScore::of(0, -100));
    assert!(HardSoftScore::of(-1, 0) < HardSoftScore::ZERO);
}

#[test]
fn test_hard_soft_parse_round_trip() {
    let score = HardSoftScore::parse("-2hard/15soft").unwrap();
    assert_eq!(score, HardSoftScore::of(-2, 15));
    assert_eq!(score.to_string(), "-2hard/15soft");
    assert_eq!(HardSoftScore::parse(&score.to_string()).unwrap(), score);
}

#[test]
fn test_hard_soft_parse_rejects_wrong_shape() {
    let err = HardSoftScore::parse("1hard").unwrap_err();
    assert!(err.message.contains("expected 2 parts"));

    let err = HardSoftScore::parse("1hard/2medium").unwrap_err();
    assert!(err.message.contains("must end with 'soft'"));
}

#[test]
fn test_hard_medium_soft_levels() {
    let score = HardMediumSoftScore::of(-1, 2, -3);
    assert_eq!(score.to_level_numbers(), vec![-1, 2, -3]);
    assert_eq!(HardMediumSoftScore::LEVELS[1], ScoreLevel::Medium);
    assert_eq!(score.leading_level(), Some(ScoreLevel::Hard));
    assert_eq!(HardMediumSoftScore::ONE_SOFT.leading_level(), Some(ScoreLevel::Soft));
    assert_eq!(HardMediumSoftScore::ZERO.leading_level(), None);
    assert!(score.has_negative_level());
    assert!(!HardMediumSoftScore::ONE_MEDIUM.has_negative_level());
}

#[test]
fn test_multiply_scales_every_level() {
    assert_eq!(HardSoftScore::of(1, 2).multiply(3.0), HardSoftScore::of(3, 6));
    assert_eq!(
        HardMediumSoftScore::of(1, 0, -2).multiply(-2.0),
        HardMediumSoftScore::of(-2, 0, 4)
    );
}

#[test]
fn test_is_zero() {
    assert!(SimpleScore::ZERO.is_zero());
    assert!(!HardSoftScore::ONE_SOFT.is_zero());
}
