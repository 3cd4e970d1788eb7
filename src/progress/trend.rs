//! Heaviest set per session for one exercise, for progress charts

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::{Database, Result, format_timestamp, timestamp_column};

/// Time window of a trend chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrendRange {
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TrendRange {
    /// Earliest date included when looking back from `now`
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TrendRange::Week => Some(now - Duration::days(7)),
            TrendRange::Month => Some(now - Duration::days(30)),
            TrendRange::Year => Some(now - Duration::days(365)),
            TrendRange::All => None,
        }
    }
}

impl FromStr for TrendRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" | "w" => Ok(TrendRange::Week),
            "month" | "m" => Ok(TrendRange::Month),
            "year" | "y" => Ok(TrendRange::Year),
            "all" | "a" => Ok(TrendRange::All),
            other => Err(format!("unknown range '{}', expected week, month, year or all", other)),
        }
    }
}

impl fmt::Display for TrendRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendRange::Week => "week",
            TrendRange::Month => "month",
            TrendRange::Year => "year",
            TrendRange::All => "all",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub log_id: i64,
    pub date: DateTime<Utc>,
    pub max_weight: f64,
}

impl Database {
    /// Heaviest weight per session for an exercise within `range`, oldest first.
    /// Sessions where the exercise was done without weight are skipped.
    pub fn exercise_trend(&self, exercise_id: i64, range: TrendRange) -> Result<Vec<TrendPoint>> {
        self.exercise_trend_at(exercise_id, range, Utc::now())
    }

    pub fn exercise_trend_at(
        &self,
        exercise_id: i64,
        range: TrendRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendPoint>> {
        let since = range.since(now).map(|d| format_timestamp(&d));
        let mut stmt = self.conn.prepare(
            "SELECT wl.id, wl.date, MAX(sl.weight) AS max_weight
             FROM WorkoutLogs wl
             JOIN ExerciseLogs el ON el.workout_log_id = wl.id
             JOIN SetLogs sl ON sl.exercise_log_id = el.id
             WHERE el.exercise_id = ?1 AND (?2 IS NULL OR wl.date >= ?2)
             GROUP BY wl.id
             HAVING max_weight > 0
             ORDER BY wl.date, wl.id",
        )?;
        let points = stmt
            .query_map(params![exercise_id, since], |row| {
                Ok(TrendPoint {
                    log_id: row.get(0)?,
                    date: timestamp_column(row, 1)?,
                    max_weight: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ExerciseEntry;
    use crate::db::test_support::{at, db};
    use crate::sets::LoggedSet;

    fn squats(weights: &[f64]) -> Vec<ExerciseEntry> {
        vec![ExerciseEntry {
            exercise_id: 2,
            single_arm: false,
            sets: weights.iter().map(|w| LoggedSet::new(*w, 5)).collect(),
        }]
    }

    #[test]
    fn test_trend_oldest_first_with_max_weight() {
        let mut db = db();
        let late = db.save_session_at(0, "Q", at(20, 9), &squats(&[100.0, 110.0]), at(20, 10)).unwrap();
        let early = db.save_session_at(0, "Q", at(10, 9), &squats(&[90.0, 95.0, 92.5]), at(10, 10)).unwrap();
        db.save_session_at(0, "Q", at(15, 9), &squats(&[0.0]), at(15, 10)).unwrap();

        let points = db.exercise_trend_at(2, TrendRange::All, at(30, 0)).unwrap();
        assert_eq!(
            points.iter().map(|p| (p.log_id, p.max_weight)).collect::<Vec<_>>(),
            vec![(early, 95.0), (late, 110.0)]
        );
    }

    #[test]
    fn test_trend_range_filter() {
        let mut db = db();
        db.save_session_at(0, "Q", at(1, 9), &squats(&[80.0]), at(1, 10)).unwrap();
        let recent = db.save_session_at(0, "Q", at(27, 9), &squats(&[85.0]), at(27, 10)).unwrap();

        let week = db.exercise_trend_at(2, TrendRange::Week, at(30, 0)).unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].log_id, recent);

        let month = db.exercise_trend_at(2, TrendRange::Month, at(30, 0)).unwrap();
        assert_eq!(month.len(), 2);
    }

    #[test]
    fn test_trend_range_parse() {
        assert_eq!("Week".parse::<TrendRange>().unwrap(), TrendRange::Week);
        assert_eq!("y".parse::<TrendRange>().unwrap(), TrendRange::Year);
        assert!("decade".parse::<TrendRange>().is_err());
        assert_eq!(TrendRange::default().to_string(), "all");
    }
}
