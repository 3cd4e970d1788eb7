//! Session log store - completed workouts with their exercises and sets
//!
//! Every write replaces the children of a session wholesale inside one
//! transaction; set numbers are re-derived from input order each time.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Database, DbError, Result, clean_name, format_timestamp, timestamp_column};
use crate::sets::{LoggedSet, Reps};

/// `workout_id` of a quick workout that is not based on a template
pub const QUICK_WORKOUT_ID: i64 = 0;

/// One exercise as entered on the workout screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub exercise_id: i64,
    pub single_arm: bool,
    pub sets: Vec<LoggedSet>,
}

/// Stored set with its 1-based position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub set_number: i32,
    pub weight: f64,
    pub reps: Reps,
}

impl From<&SetRecord> for LoggedSet {
    fn from(record: &SetRecord) -> Self {
        LoggedSet {
            weight: record.weight,
            reps: record.reps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub log_id: i64,
    pub date: DateTime<Utc>,
    pub workout_id: i64,
    /// Name at completion time, unaffected by later template renames
    pub workout_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SessionSummary {
    pub fn is_quick(&self) -> bool {
        self.workout_id == QUICK_WORKOUT_ID
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedExercise {
    pub exercise_log_id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub single_arm: bool,
    pub sets: Vec<SetRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub exercises: Vec<LoggedExercise>,
}

const SUMMARY_COLUMNS: &str = "id, date, workout_id, workout_name, start_time, end_time";

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<SessionSummary> {
    Ok(SessionSummary {
        log_id: row.get(0)?,
        date: timestamp_column(row, 1)?,
        workout_id: row.get(2)?,
        workout_name: row.get(3)?,
        start_time: timestamp_column(row, 4)?,
        end_time: timestamp_column(row, 5)?,
    })
}

/// Read `set_number, weight, reps, reps_left, reps_right` starting at `offset`
pub(crate) fn set_from_row(
    row: &Row<'_>,
    offset: usize,
    single_arm: bool,
) -> rusqlite::Result<SetRecord> {
    Ok(SetRecord {
        set_number: row.get(offset)?,
        weight: row.get(offset + 1)?,
        reps: Reps::from_columns(
            single_arm,
            row.get(offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
        ),
    })
}

/// Reject sets whose reps shape disagrees with the exercise's laterality
fn check_shapes(exercises: &[ExerciseEntry]) -> Result<()> {
    for exercise in exercises {
        for (index, set) in exercise.sets.iter().enumerate() {
            if set.reps.is_single_arm() != exercise.single_arm {
                return Err(DbError::SetShapeMismatch {
                    exercise_id: exercise.exercise_id,
                    set_number: index as i32 + 1,
                });
            }
        }
    }
    Ok(())
}

fn insert_exercises(conn: &Connection, log_id: i64, exercises: &[ExerciseEntry]) -> Result<()> {
    let mut insert_exercise = conn.prepare_cached(
        "INSERT INTO ExerciseLogs (workout_log_id, exercise_id, single_arm) VALUES (?1, ?2, ?3)",
    )?;
    let mut insert_set = conn.prepare_cached(
        "INSERT INTO SetLogs (exercise_log_id, set_number, weight, reps, reps_left, reps_right)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for exercise in exercises {
        let exercise_log_id = insert_exercise.insert(params![
            log_id,
            exercise.exercise_id,
            exercise.single_arm
        ])?;
        for (index, set) in exercise.sets.iter().enumerate() {
            let (reps, reps_left, reps_right) = set.reps.columns();
            insert_set.execute(params![
                exercise_log_id,
                index as i32 + 1,
                set.weight,
                reps,
                reps_left,
                reps_right
            ])?;
        }
    }
    Ok(())
}

fn delete_children(conn: &Connection, log_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM SetLogs WHERE exercise_log_id IN
            (SELECT id FROM ExerciseLogs WHERE workout_log_id = ?1)",
        [log_id],
    )?;
    conn.execute("DELETE FROM ExerciseLogs WHERE workout_log_id = ?1", [log_id])?;
    Ok(())
}

fn session_exists(conn: &Connection, log_id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM WorkoutLogs WHERE id = ?1", [log_id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn not_found(log_id: i64) -> DbError {
    DbError::NotFound {
        entity: "workout log",
        id: log_id,
    }
}

impl Database {
    /// Save a finished workout, stamped with the current time
    pub fn save_session(
        &mut self,
        workout_id: i64,
        workout_name: &str,
        start_time: DateTime<Utc>,
        exercises: &[ExerciseEntry],
    ) -> Result<i64> {
        self.save_session_at(workout_id, workout_name, start_time, exercises, Utc::now())
    }

    /// Save a finished workout that ended at `finished_at`.
    /// `finished_at` becomes both the log date and its end time.
    /// Times are stored to the millisecond; finer precision is dropped.
    pub fn save_session_at(
        &mut self,
        workout_id: i64,
        workout_name: &str,
        start_time: DateTime<Utc>,
        exercises: &[ExerciseEntry],
        finished_at: DateTime<Utc>,
    ) -> Result<i64> {
        let workout_name = clean_name(workout_name)?;
        check_shapes(exercises)?;

        let start_time = start_time.trunc_subsecs(3);
        let finished = format_timestamp(&finished_at.trunc_subsecs(3));
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO WorkoutLogs (workout_id, workout_name, date, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                workout_id,
                workout_name,
                finished,
                format_timestamp(&start_time),
                finished
            ],
        )?;
        let log_id = tx.last_insert_rowid();
        insert_exercises(&tx, log_id, exercises)?;
        tx.commit()?;

        info!(
            "Saved workout '{}' (log id: {}, {} exercises)",
            workout_name,
            log_id,
            exercises.len()
        );
        Ok(log_id)
    }

    /// All sessions, most recent first
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM WorkoutLogs ORDER BY date DESC, id DESC"
        ))?;
        let sessions = stmt
            .query_map([], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Full session with exercises in logged order and sets by set number
    pub fn get_session_detail(&self, log_id: i64) -> Result<SessionDetail> {
        let summary = self
            .conn
            .query_row(
                &format!("SELECT {SUMMARY_COLUMNS} FROM WorkoutLogs WHERE id = ?1"),
                [log_id],
                summary_from_row,
            )
            .optional()?
            .ok_or_else(|| not_found(log_id))?;

        let mut exercise_stmt = self.conn.prepare(
            "SELECT el.id, el.exercise_id, e.exercise_name, el.single_arm
             FROM ExerciseLogs el
             JOIN Exercises e ON e.id = el.exercise_id
             WHERE el.workout_log_id = ?1
             ORDER BY el.id",
        )?;
        let mut exercises = exercise_stmt
            .query_map([log_id], |row| {
                Ok(LoggedExercise {
                    exercise_log_id: row.get(0)?,
                    exercise_id: row.get(1)?,
                    exercise_name: row.get(2)?,
                    single_arm: row.get(3)?,
                    sets: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut set_stmt = self.conn.prepare_cached(
            "SELECT set_number, weight, reps, reps_left, reps_right
             FROM SetLogs WHERE exercise_log_id = ?1
             ORDER BY set_number",
        )?;
        for exercise in &mut exercises {
            let single_arm = exercise.single_arm;
            exercise.sets = set_stmt
                .query_map([exercise.exercise_log_id], |row| set_from_row(row, 0, single_arm))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
        }

        Ok(SessionDetail { summary, exercises })
    }

    /// Rename a session and replace all of its exercises and sets.
    /// Date, start and end time stay as originally logged.
    pub fn update_session(
        &mut self,
        log_id: i64,
        new_name: &str,
        exercises: &[ExerciseEntry],
    ) -> Result<()> {
        let new_name = clean_name(new_name)?;
        check_shapes(exercises)?;

        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE WorkoutLogs SET workout_name = ?1 WHERE id = ?2",
            params![new_name, log_id],
        )?;
        if updated == 0 {
            return Err(not_found(log_id));
        }
        delete_children(&tx, log_id)?;
        insert_exercises(&tx, log_id, exercises)?;
        tx.commit()?;

        info!("Updated workout log {} ({} exercises)", log_id, exercises.len());
        Ok(())
    }

    /// Delete a session: sets, then exercises, then the log itself
    pub fn delete_session(&mut self, log_id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        if !session_exists(&tx, log_id)? {
            return Err(not_found(log_id));
        }
        delete_children(&tx, log_id)?;
        tx.execute("DELETE FROM WorkoutLogs WHERE id = ?1", [log_id])?;
        tx.commit()?;

        debug!("Deleted workout log {}", log_id);
        Ok(())
    }
}
