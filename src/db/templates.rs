//! Workout template store
//!
//! A template is a named routine. Its exercises (set count and laterality
//! per exercise) live in `TemplateExercises`, keyed by template id, in the
//! order they were added.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Database, DbError, Result, clean_name};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub name: String,
}

/// Template row joined with its exercise name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub sets_per_exercise: i32,
    pub single_arm: bool,
}

/// One exercise as configured in the template editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateExerciseInput {
    pub exercise_id: i64,
    pub sets: i32,
    pub single_arm: bool,
}

fn template_exists(conn: &Connection, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM WorkoutTemplates WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn insert_template_exercises(
    conn: &Connection,
    template_id: i64,
    exercises: &[TemplateExerciseInput],
) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO TemplateExercises (template_id, exercise_id, sets_per_exercise, single_arm)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for exercise in exercises {
        stmt.execute(params![
            template_id,
            exercise.exercise_id,
            exercise.sets,
            exercise.single_arm
        ])?;
    }
    Ok(())
}

impl Database {
    /// Create a template with no exercises yet
    pub fn create_template(&self, name: &str) -> Result<i64> {
        let name = clean_name(name)?;
        self.conn
            .execute("INSERT INTO WorkoutTemplates (workout_name) VALUES (?1)", [name])?;
        let id = self.conn.last_insert_rowid();
        info!("Created template '{}' (id: {})", name, id);
        Ok(id)
    }

    /// Create a template and its full exercise list in one transaction
    pub fn create_template_with_exercises(
        &mut self,
        name: &str,
        exercises: &[TemplateExerciseInput],
    ) -> Result<i64> {
        let name = clean_name(name)?;
        let tx = self.conn.transaction()?;
        tx.execute("INSERT INTO WorkoutTemplates (workout_name) VALUES (?1)", [name])?;
        let id = tx.last_insert_rowid();
        insert_template_exercises(&tx, id, exercises)?;
        tx.commit()?;
        info!("Created template '{}' with {} exercises (id: {})", name, exercises.len(), id);
        Ok(id)
    }

    /// Append one exercise to a template.
    /// Duplicates are not rejected; the editor keeps each exercise once.
    pub fn add_exercise_to_template(
        &self,
        template_id: i64,
        exercise_id: i64,
        sets: i32,
        single_arm: bool,
    ) -> Result<()> {
        if !template_exists(&self.conn, template_id)? {
            return Err(DbError::NotFound {
                entity: "template",
                id: template_id,
            });
        }
        insert_template_exercises(
            &self.conn,
            template_id,
            &[TemplateExerciseInput {
                exercise_id,
                sets,
                single_arm,
            }],
        )
    }

    pub fn list_templates(&self) -> Result<Vec<Template>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, workout_name FROM WorkoutTemplates ORDER BY id")?;
        let templates = stmt
            .query_map([], |row| {
                Ok(Template {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(templates)
    }

    pub fn get_template(&self, id: i64) -> Result<Template> {
        self.conn
            .query_row(
                "SELECT id, workout_name FROM WorkoutTemplates WHERE id = ?1",
                [id],
                |row| {
                    Ok(Template {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or(DbError::NotFound {
                entity: "template",
                id,
            })
    }

    /// Exercises of a template in the order they were added
    pub fn list_template_exercises(&self, template_id: i64) -> Result<Vec<TemplateExercise>> {
        let mut stmt = self.conn.prepare(
            "SELECT te.exercise_id, e.exercise_name, te.sets_per_exercise, te.single_arm
             FROM TemplateExercises te
             JOIN Exercises e ON e.id = te.exercise_id
             WHERE te.template_id = ?1
             ORDER BY te.id",
        )?;
        let exercises = stmt
            .query_map([template_id], |row| {
                Ok(TemplateExercise {
                    exercise_id: row.get(0)?,
                    exercise_name: row.get(1)?,
                    sets_per_exercise: row.get(2)?,
                    single_arm: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(exercises)
    }

    /// Rename a template and replace its whole exercise list.
    ///
    /// All old rows are removed before the new list is inserted, so calling
    /// this twice with the same input leaves the same result.
    pub fn rename_and_reconfigure(
        &mut self,
        id: i64,
        new_name: &str,
        exercises: &[TemplateExerciseInput],
    ) -> Result<()> {
        let new_name = clean_name(new_name)?;
        let tx = self.conn.transaction()?;

        let current: Option<String> = tx
            .query_row(
                "SELECT workout_name FROM WorkoutTemplates WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Err(DbError::NotFound {
                entity: "template",
                id,
            });
        };

        if current != new_name {
            tx.execute(
                "UPDATE WorkoutTemplates SET workout_name = ?1 WHERE id = ?2",
                params![new_name, id],
            )?;
            info!("Renamed template {} '{}' -> '{}'", id, current, new_name);
        }

        let removed = tx.execute("DELETE FROM TemplateExercises WHERE template_id = ?1", [id])?;
        insert_template_exercises(&tx, id, exercises)?;
        tx.commit()?;

        debug!(
            "Reconfigured template {}: {} rows replaced by {}",
            id,
            removed,
            exercises.len()
        );
        Ok(())
    }

    /// Delete a template and its exercise list.
    /// Logged sessions keep their own copy of the template name.
    pub fn delete_template(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        if !template_exists(&tx, id)? {
            return Err(DbError::NotFound {
                entity: "template",
                id,
            });
        }
        tx.execute("DELETE FROM TemplateExercises WHERE template_id = ?1", [id])?;
        tx.execute("DELETE FROM WorkoutTemplates WHERE id = ?1", [id])?;
        tx.commit()?;
        info!("Deleted template {}", id);
        Ok(())
    }
}
