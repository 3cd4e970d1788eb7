//! Set-by-set progression against the previous session

use serde::{Deserialize, Serialize};

use crate::db::SetRecord;
use crate::sets::{LoggedSet, Reps};

/// How a set compares with the same set last time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Progression {
    /// More weight, or same weight with more reps
    Improved,
    /// Same weight, same reps
    Maintained,
    /// Same weight, exactly one rep short
    SlightRegression,
    Regression,
    /// Nothing to compare yet
    NoData,
}

impl Progression {
    pub fn label(&self) -> &'static str {
        match self {
            Progression::Improved => "improved",
            Progression::Maintained => "maintained",
            Progression::SlightRegression => "slight regression",
            Progression::Regression => "regression",
            Progression::NoData => "no data",
        }
    }

    /// Indicator colour used by the workout screens
    pub fn color(&self) -> &'static str {
        match self {
            Progression::Improved => "rgba(0, 122, 255, 0.5)",
            Progression::Maintained => "rgba(52, 199, 89, 0.5)",
            Progression::SlightRegression => "rgba(255, 204, 0, 0.5)",
            Progression::Regression => "rgba(255, 59, 48, 0.5)",
            Progression::NoData => "transparent",
        }
    }
}

/// Result for one set; single-arm sets get one verdict per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetProgression {
    Bilateral(Progression),
    Unilateral { left: Progression, right: Progression },
}

impl SetProgression {
    fn no_data(reps: &Reps) -> Self {
        match reps {
            Reps::Both(_) => SetProgression::Bilateral(Progression::NoData),
            Reps::Split { .. } => SetProgression::Unilateral {
                left: Progression::NoData,
                right: Progression::NoData,
            },
        }
    }

    /// `(left, right)` indicator colours; both halves match for bilateral sets
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            SetProgression::Bilateral(p) => (p.color(), p.color()),
            SetProgression::Unilateral { left, right } => (left.color(), right.color()),
        }
    }
}

fn compare(weight: f64, reps: i32, previous_weight: f64, previous_reps: i32) -> Progression {
    if weight > previous_weight {
        return Progression::Improved;
    }
    if weight != previous_weight {
        return Progression::Regression;
    }
    if reps > previous_reps {
        Progression::Improved
    } else if reps == previous_reps {
        Progression::Maintained
    } else if previous_reps - reps == 1 {
        Progression::SlightRegression
    } else {
        Progression::Regression
    }
}

/// Classify `current` against `previous`.
///
/// A zero weight or a zero rep count means the set has not been filled in
/// yet and yields `NoData`, as does a missing previous set or one of the
/// other laterality.
pub fn classify(current: &LoggedSet, previous: Option<&LoggedSet>) -> SetProgression {
    let no_data = SetProgression::no_data(&current.reps);
    let Some(previous) = previous else {
        return no_data;
    };
    if current.weight == 0.0 {
        return no_data;
    }

    match (current.reps, previous.reps) {
        (Reps::Both(reps), Reps::Both(previous_reps)) if reps != 0 => {
            SetProgression::Bilateral(compare(current.weight, reps, previous.weight, previous_reps))
        }
        (
            Reps::Split { left, right },
            Reps::Split {
                left: previous_left,
                right: previous_right,
            },
        ) if left != 0 && right != 0 => SetProgression::Unilateral {
            left: compare(current.weight, left, previous.weight, previous_left),
            right: compare(current.weight, right, previous.weight, previous_right),
        },
        _ => no_data,
    }
}

/// Classify every set of an exercise against the set in the same position
/// of the previous session.
pub fn classify_exercise(current: &[LoggedSet], previous: &[SetRecord]) -> Vec<SetProgression> {
    current
        .iter()
        .enumerate()
        .map(|(index, set)| {
            let previous = previous.get(index).map(LoggedSet::from);
            classify(set, previous.as_ref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Progression::*;

    fn both(weight: f64, reps: i32, prev_weight: f64, prev_reps: i32) -> SetProgression {
        classify(
            &LoggedSet::new(weight, reps),
            Some(&LoggedSet::new(prev_weight, prev_reps)),
        )
    }

    #[test]
    fn test_bilateral_examples() {
        assert_eq!(both(100.0, 8, 100.0, 8), SetProgression::Bilateral(Maintained));
        assert_eq!(both(100.0, 9, 100.0, 8), SetProgression::Bilateral(Improved));
        assert_eq!(both(100.0, 7, 100.0, 8), SetProgression::Bilateral(SlightRegression));
        assert_eq!(both(100.0, 6, 100.0, 8), SetProgression::Bilateral(Regression));
        assert_eq!(both(105.0, 6, 100.0, 8), SetProgression::Bilateral(Improved));
    }

    #[test]
    fn test_less_weight_is_regression() {
        assert_eq!(both(95.0, 12, 100.0, 8), SetProgression::Bilateral(Regression));
        assert_eq!(both(97.5, 8, 100.0, 8), SetProgression::Bilateral(Regression));
    }

    #[test]
    fn test_no_previous() {
        assert_eq!(
            classify(&LoggedSet::new(100.0, 8), None),
            SetProgression::Bilateral(NoData)
        );
        assert_eq!(
            classify(&LoggedSet::split(20.0, 8, 8), None),
            SetProgression::Unilateral { left: NoData, right: NoData }
        );
    }

    #[test]
    fn test_unfilled_current_is_no_data() {
        assert_eq!(both(0.0, 8, 100.0, 8), SetProgression::Bilateral(NoData));
        assert_eq!(both(100.0, 0, 100.0, 8), SetProgression::Bilateral(NoData));
        // Previous values do not matter
        assert_eq!(both(0.0, 0, 0.0, 0), SetProgression::Bilateral(NoData));

        let previous = LoggedSet::split(20.0, 10, 10);
        for current in [
            LoggedSet::split(20.0, 0, 10),
            LoggedSet::split(20.0, 10, 0),
            LoggedSet::split(0.0, 10, 10),
        ] {
            assert_eq!(
                classify(&current, Some(&previous)),
                SetProgression::Unilateral { left: NoData, right: NoData }
            );
        }
    }

    #[test]
    fn test_unilateral_sides_independent() {
        let previous = LoggedSet::split(20.0, 10, 10);
        assert_eq!(
            classify(&LoggedSet::split(20.0, 11, 9), Some(&previous)),
            SetProgression::Unilateral { left: Improved, right: SlightRegression }
        );
        assert_eq!(
            classify(&LoggedSet::split(20.0, 10, 7), Some(&previous)),
            SetProgression::Unilateral { left: Maintained, right: Regression }
        );
        // Shared weight increase lifts both sides
        assert_eq!(
            classify(&LoggedSet::split(22.5, 6, 5), Some(&previous)),
            SetProgression::Unilateral { left: Improved, right: Improved }
        );
    }

    #[test]
    fn test_previous_of_other_shape_is_no_data() {
        assert_eq!(
            classify(&LoggedSet::new(20.0, 10), Some(&LoggedSet::split(20.0, 10, 10))),
            SetProgression::Bilateral(NoData)
        );
        assert_eq!(
            classify(&LoggedSet::split(20.0, 10, 10), Some(&LoggedSet::new(20.0, 10))),
            SetProgression::Unilateral { left: NoData, right: NoData }
        );
    }

    #[test]
    fn test_filled_sets_never_no_data() {
        let weights = [2.5, 50.0, 100.0, 102.5];
        let reps = [1, 5, 8, 9, 12];
        for &w in &weights {
            for &r in &reps {
                for &pw in &weights {
                    for &pr in &reps {
                        let result = both(w, r, pw, pr);
                        assert_ne!(result, SetProgression::Bilateral(NoData), "{w}x{r} vs {pw}x{pr}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_classify_from_form_fields() {
        let current = LoggedSet::from_fields("100", "9");
        let previous = LoggedSet::from_fields("100", "8");
        assert_eq!(classify(&current, Some(&previous)), SetProgression::Bilateral(Improved));

        let empty = LoggedSet::from_fields("", "");
        assert_eq!(classify(&empty, Some(&previous)), SetProgression::Bilateral(NoData));
    }

    #[test]
    fn test_classify_exercise_by_position() {
        let previous = vec![
            SetRecord { set_number: 1, weight: 100.0, reps: Reps::Both(8) },
            SetRecord { set_number: 2, weight: 100.0, reps: Reps::Both(8) },
        ];
        let current = vec![
            LoggedSet::new(100.0, 8),
            LoggedSet::new(100.0, 7),
            LoggedSet::new(100.0, 6),
        ];
        assert_eq!(
            classify_exercise(&current, &previous),
            vec![
                SetProgression::Bilateral(Maintained),
                SetProgression::Bilateral(SlightRegression),
                SetProgression::Bilateral(NoData),
            ]
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(NoData.color(), "transparent");
        assert_eq!(
            SetProgression::Unilateral { left: Improved, right: Regression }.colors(),
            ("rgba(0, 122, 255, 0.5)", "rgba(255, 59, 48, 0.5)")
        );
        assert_eq!(SlightRegression.label(), "slight regression");
    }
}
