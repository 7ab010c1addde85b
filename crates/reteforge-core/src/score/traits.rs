//! Core Score trait definition

use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

use super::ScoreLevel;

/// Arithmetic the scoring engine needs from a score type.
///
/// Scores are immutable values: every operation returns a new instance.
/// Levels are ordered from highest priority to lowest, and comparison looks at
/// higher levels first.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Meaning of each level, highest priority first.
    const LEVELS: &'static [ScoreLevel];

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the level values, in the order of [`Score::LEVELS`].
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Multiplies every level by a scalar, rounding to the nearest integer.
    fn multiply(&self, multiplicand: f64) -> Self;

    /// Returns true if this score is the zero score.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Returns true if any level is negative.
    fn has_negative_level(&self) -> bool {
        self.to_level_numbers().iter().any(|&level| level < 0)
    }

    /// Returns the level kind of the highest non-zero level, if any.
    fn leading_level(&self) -> Option<ScoreLevel> {
        self.to_level_numbers()
            .iter()
            .position(|&level| level != 0)
            .map(|index| Self::LEVELS[index])
    }
}

/// A score that can be read back from its `Display` form.
///
/// Used for weights given as text, e.g. in configuration files:
/// `"42"`, `"0hard/-100soft"`, `"0hard/0medium/-100soft"`.
pub trait ParseableScore: Score {
    fn parse(s: &str) -> Result<Self, ScoreParseError>;
}

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl std::fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score parse error: {}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}
