//! Schema creation, legacy migration and preset loading

use rusqlite::{Connection, params};
use tracing::{debug, info};

use super::Result;
use crate::exercises::{MuscleGroup, get_preset_exercises};

const CREATE_TABLES: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS Exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        exercise_name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS Muscles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        muscle_name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS Exercise_Muscles (
        exercise_id INTEGER NOT NULL,
        muscle_id INTEGER NOT NULL,
        PRIMARY KEY (exercise_id, muscle_id),
        FOREIGN KEY (exercise_id) REFERENCES Exercises(id),
        FOREIGN KEY (muscle_id) REFERENCES Muscles(id)
    );

    CREATE TABLE IF NOT EXISTS WorkoutTemplates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        workout_name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS TemplateExercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        template_id INTEGER NOT NULL,
        exercise_id INTEGER NOT NULL,
        sets_per_exercise INTEGER NOT NULL,
        single_arm INTEGER NOT NULL,
        FOREIGN KEY (template_id) REFERENCES WorkoutTemplates(id),
        FOREIGN KEY (exercise_id) REFERENCES Exercises(id)
    );

    CREATE TABLE IF NOT EXISTS WorkoutLogs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        workout_id INTEGER NOT NULL,
        workout_name TEXT NOT NULL,
        date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS ExerciseLogs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        workout_log_id INTEGER NOT NULL,
        exercise_id INTEGER NOT NULL,
        single_arm INTEGER NOT NULL,
        FOREIGN KEY (workout_log_id) REFERENCES WorkoutLogs(id),
        FOREIGN KEY (exercise_id) REFERENCES Exercises(id)
    );

    CREATE TABLE IF NOT EXISTS SetLogs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        exercise_log_id INTEGER NOT NULL,
        set_number INTEGER NOT NULL,
        weight REAL NOT NULL,
        reps INTEGER,
        reps_left INTEGER,
        reps_right INTEGER,
        FOREIGN KEY (exercise_log_id) REFERENCES ExerciseLogs(id)
    );

    CREATE INDEX IF NOT EXISTS idx_template_exercises_template
        ON TemplateExercises(template_id);
    CREATE INDEX IF NOT EXISTS idx_workout_logs_workout_date
        ON WorkoutLogs(workout_id, date);
    CREATE INDEX IF NOT EXISTS idx_exercise_logs_workout_log
        ON ExerciseLogs(workout_log_id);
    CREATE INDEX IF NOT EXISTS idx_exercise_logs_exercise
        ON ExerciseLogs(exercise_id);
    CREATE INDEX IF NOT EXISTS idx_set_logs_exercise_log
        ON SetLogs(exercise_log_id);
";

/// Create all tables (idempotent) and turn on foreign-key enforcement
pub(crate) fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    debug!("Schema ready");
    Ok(())
}

/// Name of the per-template table older installs kept a template's
/// exercises in: `Workout_` plus the name with whitespace runs turned into `_`.
pub fn legacy_table_name(template_name: &str) -> String {
    let mut name = String::from("Workout_");
    let mut in_whitespace = false;
    for c in template_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
        } else {
            name.push(c);
            in_whitespace = false;
        }
    }
    name
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Move data from the old layout (a `Workouts` table plus one
/// `Workout_<name>` table per template) into `WorkoutTemplates` and
/// `TemplateExercises`, dropping the old tables. Runs in one transaction.
pub(crate) fn import_legacy_templates(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;

    // Migration: old template header table
    if table_exists(&tx, "Workouts")? {
        let copied = tx.execute(
            "INSERT OR IGNORE INTO WorkoutTemplates (id, workout_name)
             SELECT id, workout_name FROM Workouts",
            [],
        )?;
        tx.execute("DROP TABLE Workouts", [])?;
        info!("Imported {} templates from legacy Workouts table", copied);
    }

    let templates: Vec<(i64, String)> = {
        let mut stmt = tx.prepare("SELECT id, workout_name FROM WorkoutTemplates ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    // Migration: per-template exercise tables
    for (template_id, template_name) in templates {
        let table = legacy_table_name(&template_name);
        if !table_exists(&tx, &table)? {
            continue;
        }
        let quoted = quote_identifier(&table);
        let copied = tx.execute(
            &format!(
                "INSERT INTO TemplateExercises (template_id, exercise_id, sets_per_exercise, single_arm)
                 SELECT ?1, exercise_id, sets_per_exercise, single_arm FROM {quoted}
                 WHERE exercise_id IN (SELECT id FROM Exercises)
                 ORDER BY rowid"
            ),
            params![template_id],
        )?;
        tx.execute(&format!("DROP TABLE {quoted}"), [])?;
        info!("Imported {} exercises for template '{}' from {}", copied, template_name, table);
    }

    tx.commit()?;
    Ok(())
}

/// Load the preset catalog when no exercises exist yet
pub(crate) fn seed_presets(conn: &mut Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM Exercises", [], |row| row.get(0))?;
    if count > 0 {
        debug!("Catalog has {} exercises, skipping presets", count);
        return Ok(());
    }

    let tx = conn.transaction()?;
    {
        let mut insert_muscle =
            tx.prepare("INSERT OR IGNORE INTO Muscles (muscle_name) VALUES (?1)")?;
        for muscle in MuscleGroup::all() {
            insert_muscle.execute([muscle.name()])?;
        }

        let mut insert_exercise = tx.prepare("INSERT INTO Exercises (exercise_name) VALUES (?1)")?;
        let mut link = tx.prepare(
            "INSERT OR IGNORE INTO Exercise_Muscles (exercise_id, muscle_id)
             SELECT ?1, id FROM Muscles WHERE muscle_name = ?2",
        )?;
        for exercise in get_preset_exercises() {
            let exercise_id = insert_exercise.insert([exercise.name])?;
            for muscle in exercise.muscle_groups {
                link.execute(params![exercise_id, muscle.name()])?;
            }
        }
    }
    tx.commit()?;

    info!(
        "Loaded {} preset exercises and {} muscles",
        get_preset_exercises().len(),
        MuscleGroup::all().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::exercises::PRESET_EXERCISES;

    #[test]
    fn test_legacy_table_name() {
        assert_eq!(legacy_table_name("Push Day"), "Workout_Push_Day");
        assert_eq!(legacy_table_name("Leg  \t Day"), "Workout_Leg_Day");
        assert_eq!(legacy_table_name("Arms"), "Workout_Arms");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("Workout_A"), "\"Workout_A\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_preset_links_created() {
        let db = Database::open_in_memory().unwrap();
        let bench = db.find_exercise_by_name("Bench Press").unwrap().unwrap();
        let muscles: Vec<String> = db
            .muscles_for_exercise(bench.id)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(muscles, vec!["Chest", "Front Delts", "Triceps"]);
    }

    #[test]
    fn test_seed_skipped_when_catalog_not_empty() {
        let mut conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute("INSERT INTO Exercises (exercise_name) VALUES ('Dip')", [])
            .unwrap();

        seed_presets(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Exercises", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_import_legacy_layout() {
        let mut conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        seed_presets(&mut conn).unwrap();
        conn.execute_batch(
            "CREATE TABLE Workouts (id INTEGER PRIMARY KEY AUTOINCREMENT, workout_name TEXT NOT NULL);
             INSERT INTO Workouts (workout_name) VALUES ('Push Day');
             CREATE TABLE Workout_Push_Day (
                 exercise_id INTEGER,
                 sets_per_exercise INTEGER NOT NULL,
                 single_arm BOOLEAN NOT NULL
             );
             INSERT INTO Workout_Push_Day VALUES (1, 4, 0);
             INSERT INTO Workout_Push_Day VALUES (8, 3, 1);
             INSERT INTO Workout_Push_Day VALUES (9999, 3, 0);",
        )
        .unwrap();

        import_legacy_templates(&mut conn).unwrap();

        assert!(!table_exists(&conn, "Workouts").unwrap());
        assert!(!table_exists(&conn, "Workout_Push_Day").unwrap());

        let rows: Vec<(i64, i64, i32, bool)> = conn
            .prepare(
                "SELECT template_id, exercise_id, sets_per_exercise, single_arm
                 FROM TemplateExercises ORDER BY id",
            )
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(rows, vec![(1, 1, 4, false), (1, 8, 3, true)]);

        // Second run finds nothing left to import
        import_legacy_templates(&mut conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM TemplateExercises", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_presets_loaded_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        seed_presets(&mut conn).unwrap();
        seed_presets(&mut conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Exercises", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count as usize, PRESET_EXERCISES.len());
    }
}
