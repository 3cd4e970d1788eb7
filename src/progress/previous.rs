//! Previous-performance lookup used to seed comparisons

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::sessions::set_from_row;
use crate::db::{Database, QUICK_WORKOUT_ID, Result, SetRecord, format_timestamp, timestamp_column};
use crate::sets::Reps;

/// Placeholder sets per exercise when a template has never been logged
pub const PLACEHOLDER_SETS: i32 = 3;

/// Previous sets keyed by exercise id
pub type PreviousSets = BTreeMap<i64, Vec<SetRecord>>;

/// One historical set of a single exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistoryEntry {
    pub log_id: i64,
    pub date: DateTime<Utc>,
    pub set_number: i32,
    pub weight: f64,
    pub reps: Reps,
}

impl Database {
    /// Sets to compare a new session of `workout_id` against.
    ///
    /// Uses the latest session of the same workout before `before`. With no
    /// such session, a quick workout falls back to each exercise's latest
    /// sets from any session, and a template falls back to zeroed placeholder
    /// sets for its exercises.
    pub fn previous_for_workout(&self, workout_id: i64, before: DateTime<Utc>) -> Result<PreviousSets> {
        let before = format_timestamp(&before);

        let last_log: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM WorkoutLogs
                 WHERE workout_id = ?1 AND date < ?2
                 ORDER BY date DESC, id DESC
                 LIMIT 1",
                params![workout_id, before],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(log_id) = last_log {
            debug!("Comparing workout {} against log {}", workout_id, log_id);
            return self.sets_of_log(log_id);
        }

        if workout_id == QUICK_WORKOUT_ID {
            debug!("No earlier quick workout, using latest sets per exercise");
            return self.latest_sets_per_exercise(&before);
        }

        warn!("Workout {} has no history, using placeholder sets", workout_id);
        self.placeholder_sets(workout_id)
    }

    /// Every set of one exercise before `before`, most recent session first
    pub fn previous_for_exercise(
        &self,
        exercise_id: i64,
        before: DateTime<Utc>,
    ) -> Result<Vec<ExerciseHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT wl.id, wl.date, el.single_arm,
                    sl.set_number, sl.weight, sl.reps, sl.reps_left, sl.reps_right
             FROM SetLogs sl
             JOIN ExerciseLogs el ON el.id = sl.exercise_log_id
             JOIN WorkoutLogs wl ON wl.id = el.workout_log_id
             WHERE el.exercise_id = ?1 AND wl.date < ?2
             ORDER BY wl.date DESC, wl.id DESC, el.id, sl.set_number",
        )?;
        let history = stmt
            .query_map(params![exercise_id, format_timestamp(&before)], |row| {
                let set = set_from_row(row, 3, row.get(2)?)?;
                Ok(ExerciseHistoryEntry {
                    log_id: row.get(0)?,
                    date: timestamp_column(row, 1)?,
                    set_number: set.set_number,
                    weight: set.weight,
                    reps: set.reps,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(history)
    }

    /// Sets of one log grouped by exercise. If an exercise was logged twice
    /// in the session, its first entry wins.
    fn sets_of_log(&self, log_id: i64) -> Result<PreviousSets> {
        let mut stmt = self.conn.prepare(
            "SELECT el.exercise_id, el.id, el.single_arm,
                    sl.set_number, sl.weight, sl.reps, sl.reps_left, sl.reps_right
             FROM SetLogs sl
             JOIN ExerciseLogs el ON el.id = sl.exercise_log_id
             WHERE el.workout_log_id = ?1
             ORDER BY el.id, sl.set_number",
        )?;
        let rows = stmt
            .query_map([log_id], |row| {
                let exercise_id: i64 = row.get(0)?;
                let exercise_log_id: i64 = row.get(1)?;
                Ok((exercise_id, exercise_log_id, set_from_row(row, 3, row.get(2)?)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut owner: BTreeMap<i64, i64> = BTreeMap::new();
        let mut grouped = PreviousSets::new();
        for (exercise_id, exercise_log_id, set) in rows {
            if *owner.entry(exercise_id).or_insert(exercise_log_id) == exercise_log_id {
                grouped.entry(exercise_id).or_default().push(set);
            }
        }
        Ok(grouped)
    }

    /// For every exercise, the sets of its most recent log before `before`
    fn latest_sets_per_exercise(&self, before: &str) -> Result<PreviousSets> {
        let mut stmt = self.conn.prepare(
            "SELECT el.exercise_id, el.single_arm,
                    sl.set_number, sl.weight, sl.reps, sl.reps_left, sl.reps_right
             FROM SetLogs sl
             JOIN ExerciseLogs el ON el.id = sl.exercise_log_id
             WHERE el.id = (
                 SELECT el2.id
                 FROM ExerciseLogs el2
                 JOIN WorkoutLogs wl2 ON wl2.id = el2.workout_log_id
                 WHERE el2.exercise_id = el.exercise_id AND wl2.date < ?1
                 ORDER BY wl2.date DESC, wl2.id DESC, el2.id
                 LIMIT 1
             )
             ORDER BY el.exercise_id, sl.set_number",
        )?;
        let rows = stmt
            .query_map([before], |row| {
                let exercise_id: i64 = row.get(0)?;
                Ok((exercise_id, set_from_row(row, 2, row.get(1)?)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut grouped = PreviousSets::new();
        for (exercise_id, set) in rows {
            grouped.entry(exercise_id).or_default().push(set);
        }
        Ok(grouped)
    }

    /// Zeroed sets shaped like each templated exercise
    fn placeholder_sets(&self, template_id: i64) -> Result<PreviousSets> {
        let mut stmt = self.conn.prepare(
            "SELECT exercise_id, single_arm FROM TemplateExercises
             WHERE template_id = ?1 ORDER BY id",
        )?;
        let exercises = stmt
            .query_map([template_id], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut grouped = PreviousSets::new();
        for (exercise_id, single_arm) in exercises {
            grouped.entry(exercise_id).or_insert_with(|| {
                (1..=PLACEHOLDER_SETS)
                    .map(|set_number| SetRecord {
                        set_number,
                        weight: 0.0,
                        reps: Reps::zero(single_arm),
                    })
                    .collect()
            });
        }
        Ok(grouped)
    }
}
