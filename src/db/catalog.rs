//! Catalog store - exercises, muscles and which muscles an exercise works

use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Database, Result, clean_name};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Muscle {
    pub id: i64,
    pub name: String,
}

impl Database {
    /// Add exercise; a duplicate name fails with `DbError::Constraint`
    pub fn add_exercise(&self, name: &str) -> Result<i64> {
        let name = clean_name(name)?;
        self.conn
            .execute("INSERT INTO Exercises (exercise_name) VALUES (?1)", [name])?;
        let id = self.conn.last_insert_rowid();
        debug!("Added exercise '{}' (id: {})", name, id);
        Ok(id)
    }

    /// Add an exercise together with its muscle links in one transaction.
    /// An unknown muscle id leaves neither the exercise nor any link behind.
    pub fn add_exercise_with_muscles(&mut self, name: &str, muscle_ids: &[i64]) -> Result<i64> {
        let name = clean_name(name)?;
        let tx = self.conn.transaction()?;
        tx.execute("INSERT INTO Exercises (exercise_name) VALUES (?1)", [name])?;
        let id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO Exercise_Muscles (exercise_id, muscle_id) VALUES (?1, ?2)",
            )?;
            for muscle_id in muscle_ids {
                stmt.execute(params![id, muscle_id])?;
            }
        }
        tx.commit()?;
        debug!("Added exercise '{}' (id: {}) with {} muscles", name, id, muscle_ids.len());
        Ok(id)
    }

    /// Add muscle; a duplicate name fails with `DbError::Constraint`
    pub fn add_muscle(&self, name: &str) -> Result<i64> {
        let name = clean_name(name)?;
        self.conn
            .execute("INSERT INTO Muscles (muscle_name) VALUES (?1)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, exercise_name FROM Exercises ORDER BY id")?;
        let exercises = stmt
            .query_map([], |row| {
                Ok(Exercise {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(exercises)
    }

    /// All muscles sorted by name
    pub fn list_muscles(&self) -> Result<Vec<Muscle>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, muscle_name FROM Muscles ORDER BY muscle_name")?;
        let muscles = stmt
            .query_map([], |row| {
                Ok(Muscle {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(muscles)
    }

    pub fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>> {
        let exercise = self
            .conn
            .query_row(
                "SELECT id, exercise_name FROM Exercises WHERE exercise_name = ?1",
                [name.trim()],
                |row| {
                    Ok(Exercise {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(exercise)
    }

    /// Link an exercise to the muscles it works.
    ///
    /// Links that already exist are skipped, so re-linking never duplicates
    /// rows. Unknown ids fail the whole call. Returns the number of new links.
    pub fn link_exercise(&mut self, exercise_id: i64, muscle_ids: &[i64]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut added = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO Exercise_Muscles (exercise_id, muscle_id) VALUES (?1, ?2)",
            )?;
            for muscle_id in muscle_ids {
                added += stmt.execute(params![exercise_id, muscle_id])?;
            }
        }
        tx.commit()?;
        debug!("Linked exercise {} to {} new muscles", exercise_id, added);
        Ok(added)
    }

    /// Muscles linked to an exercise, sorted by name
    pub fn muscles_for_exercise(&self, exercise_id: i64) -> Result<Vec<Muscle>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.muscle_name
             FROM Exercise_Muscles em
             JOIN Muscles m ON m.id = em.muscle_id
             WHERE em.exercise_id = ?1
             ORDER BY m.muscle_name",
        )?;
        let muscles = stmt
            .query_map([exercise_id], |row| {
                Ok(Muscle {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(muscles)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::DbError;
    use crate::db::test_support::db;

    #[test]
    fn test_add_and_find_exercise() {
        let db = db();
        let id = db.add_exercise("  Hip Thrust ").unwrap();
        let found = db.find_exercise_by_name("Hip Thrust").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.name, "Hip Thrust");
        assert_eq!(db.list_exercises().unwrap().last().unwrap().id, id);
    }

    #[test]
    fn test_duplicate_exercise_is_constraint_error() {
        let db = db();
        let err = db.add_exercise("Squat").unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)), "got {:?}", err);
    }

    #[test]
    fn test_blank_name_rejected() {
        let db = db();
        assert!(matches!(db.add_exercise(" "), Err(DbError::InvalidName(_))));
        assert!(matches!(db.add_muscle(""), Err(DbError::InvalidName(_))));
    }

    #[test]
    fn test_muscles_sorted_by_name() {
        let db = db();
        db.add_muscle("Neck").unwrap();
        let names: Vec<String> = db.list_muscles().unwrap().into_iter().map(|m| m.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"Neck".to_string()));
    }

    #[test]
    fn test_link_is_idempotent() {
        let mut db = db();
        let exercise = db.add_exercise("Face Pull").unwrap();
        let rear = db.add_muscle("Rotator Cuff").unwrap();
        let upper = db
            .list_muscles()
            .unwrap()
            .into_iter()
            .find(|m| m.name == "Upper Back")
            .unwrap();

        assert_eq!(db.link_exercise(exercise, &[rear, upper.id]).unwrap(), 2);
        assert_eq!(db.link_exercise(exercise, &[rear, upper.id]).unwrap(), 0);
        assert_eq!(db.muscles_for_exercise(exercise).unwrap().len(), 2);
    }

    #[test]
    fn test_link_unknown_muscle_rolls_back() {
        let mut db = db();
        let exercise = db.add_exercise("Face Pull").unwrap();
        let neck = db.add_muscle("Neck").unwrap();

        let err = db.link_exercise(exercise, &[neck, 9999]).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)), "got {:?}", err);
        assert!(db.muscles_for_exercise(exercise).unwrap().is_empty());
    }

    #[test]
    fn test_add_exercise_with_muscles() {
        let mut db = db();
        let neck = db.add_muscle("Neck").unwrap();
        let id = db.add_exercise_with_muscles("Neck Curl", &[neck, neck]).unwrap();

        let muscles = db.muscles_for_exercise(id).unwrap();
        assert_eq!(muscles.len(), 1);
        assert_eq!(muscles[0].id, neck);
    }

    #[test]
    fn test_add_exercise_with_unknown_muscle_leaves_nothing() {
        let mut db = db();
        let before = db.list_exercises().unwrap().len();

        let err = db.add_exercise_with_muscles("Hip Thrust", &[9999]).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)), "got {:?}", err);
        assert!(db.find_exercise_by_name("Hip Thrust").unwrap().is_none());
        assert_eq!(db.list_exercises().unwrap().len(), before);

        // Retrying with valid muscles succeeds instead of hitting the unique name
        let glutes = db
            .list_muscles()
            .unwrap()
            .into_iter()
            .find(|m| m.name == "Glutes")
            .unwrap();
        let id = db.add_exercise_with_muscles("Hip Thrust", &[glutes.id]).unwrap();
        assert_eq!(db.muscles_for_exercise(id).unwrap().len(), 1);
    }
}
