//! Progression module - comparisons with earlier sessions
//!
//! Features:
//! - Previous-session lookup per workout or per exercise
//! - Set classification (improved / maintained / slight regression / regression)
//! - Per-session max weight trend for charts

pub mod classify;
pub mod previous;
pub mod trend;

pub use classify::{Progression, SetProgression, classify, classify_exercise};
pub use previous::{ExerciseHistoryEntry, PLACEHOLDER_SETS, PreviousSets};
pub use trend::{TrendPoint, TrendRange};
