//! ironlog - Personal workout tracker
//!
//! Workout templates, logged sessions and set-by-set progression,
//! stored in a local SQLite database.

pub mod db;
pub mod exercises;
pub mod progress;
pub mod sets;

pub use db::{Database, DbError};
pub use sets::{LoggedSet, Reps};
