//! Set model - weight plus reps, bilateral or split per arm
//!
//! Form input arrives as text; empty or unparsable fields count as 0 so a
//! half-filled set can always be saved.

use serde::{Deserialize, Serialize};

/// Repetitions performed in one set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reps {
    /// Both arms together (regular exercise)
    Both(i32),
    /// Single-arm exercise: each side has its own count under a shared weight
    Split { left: i32, right: i32 },
}

impl Reps {
    /// Zero reps shaped for the given laterality
    pub fn zero(single_arm: bool) -> Self {
        if single_arm {
            Reps::Split { left: 0, right: 0 }
        } else {
            Reps::Both(0)
        }
    }

    pub fn is_single_arm(&self) -> bool {
        matches!(self, Reps::Split { .. })
    }

    /// Build from the nullable `reps`, `reps_left`, `reps_right` columns.
    /// The parent exercise log decides which shape is read.
    pub(crate) fn from_columns(
        single_arm: bool,
        reps: Option<i32>,
        reps_left: Option<i32>,
        reps_right: Option<i32>,
    ) -> Self {
        if single_arm {
            Reps::Split {
                left: reps_left.unwrap_or(0),
                right: reps_right.unwrap_or(0),
            }
        } else {
            Reps::Both(reps.unwrap_or(0))
        }
    }

    /// Column values as `(reps, reps_left, reps_right)`
    pub(crate) fn columns(&self) -> (Option<i32>, Option<i32>, Option<i32>) {
        match *self {
            Reps::Both(reps) => (Some(reps), None, None),
            Reps::Split { left, right } => (None, Some(left), Some(right)),
        }
    }
}

/// One performed (or planned) set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoggedSet {
    pub weight: f64,
    pub reps: Reps,
}

impl LoggedSet {
    pub fn new(weight: f64, reps: i32) -> Self {
        Self {
            weight,
            reps: Reps::Both(reps),
        }
    }

    pub fn split(weight: f64, left: i32, right: i32) -> Self {
        Self {
            weight,
            reps: Reps::Split { left, right },
        }
    }

    /// Empty set (weight 0, reps 0) for the given laterality
    pub fn zero(single_arm: bool) -> Self {
        Self {
            weight: 0.0,
            reps: Reps::zero(single_arm),
        }
    }

    /// Parse a regular set from form fields
    pub fn from_fields(weight: &str, reps: &str) -> Self {
        Self::new(parse_weight(weight), parse_reps(reps))
    }

    /// Parse a single-arm set from form fields
    pub fn from_split_fields(weight: &str, left: &str, right: &str) -> Self {
        Self::split(parse_weight(weight), parse_reps(left), parse_reps(right))
    }
}

/// Parse a weight field, 0 on empty or invalid input.
/// Accepts a decimal comma ("62,5").
pub fn parse_weight(input: &str) -> f64 {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .unwrap_or(0.0)
}

/// Parse a reps field, 0 on empty or invalid input.
/// A fractional value is truncated ("8.0" -> 8).
pub fn parse_reps(input: &str) -> i32 {
    let trimmed = input.trim();
    if let Ok(reps) = trimmed.parse::<i32>() {
        return reps;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && r.abs() <= i32::MAX as f64)
        .map(|r| r.trunc() as i32)
        .unwrap_or(0)
}
