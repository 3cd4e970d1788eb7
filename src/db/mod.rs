//! Database module - SQLite storage for the catalog, templates and workout logs

pub mod catalog;
pub mod schema;
pub mod sessions;
pub mod templates;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub use catalog::{Exercise, Muscle};
pub use sessions::{
    ExerciseEntry, LoggedExercise, QUICK_WORKOUT_ID, SessionDetail, SessionSummary, SetRecord,
};
pub use templates::{Template, TemplateExercise, TemplateExerciseInput};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// Unique or foreign-key constraint rejected the write
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// Reps shape of a set disagrees with its exercise's single_arm flag
    #[error("Set {set_number} of exercise {exercise_id} does not match its laterality")]
    SetShapeMismatch { exercise_id: i64, set_number: i32 },
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, msg) = &err {
            if e.code == ErrorCode::ConstraintViolation {
                return DbError::Constraint(msg.clone().unwrap_or_else(|| e.to_string()));
            }
        }
        DbError::Sqlite(err)
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Store handle for callers sharing one connection across async tasks
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Database wrapper
///
/// Owns the single connection. Reads borrow `&self`; multi-statement writes
/// borrow `&mut self` because they run inside a transaction.
pub struct Database {
    pub(crate) conn: Connection,
    initialized: bool,
}

impl Database {
    /// Open or create database file and initialize it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let mut db = Self {
            conn,
            initialized: false,
        };
        db.initialize()?;
        Ok(db)
    }

    /// Create tables, import legacy template tables and load presets.
    ///
    /// Safe to call repeatedly; only the first successful call does work.
    /// A failed call leaves the handle uninitialized so it can be retried.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            debug!("Database already initialized");
            return Ok(());
        }

        schema::create_tables(&self.conn)?;
        schema::import_legacy_templates(&mut self.conn)?;
        schema::seed_presets(&mut self.conn)?;

        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Wrap the handle for sharing between tasks
    pub fn into_shared(self) -> SharedDatabase {
        Arc::new(Mutex::new(self))
    }
}

/// Trimmed name, rejecting blank input
pub(crate) fn clean_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DbError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Timestamps are stored with fixed millisecond precision so that text
/// comparison in SQL matches chronological order.
pub(crate) fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
