//! Unified application error type.
//! The storage layer and the grader keep their own narrow error enums so
//! callers can tell a failed lookup apart from an absent row; everything
//! converges into `AppError` at the CLI boundary.

use std::io;
use thiserror::Error;

/// Failure reported by a `ScoreStore` implementation.
///
/// "Not found" is never represented here: lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to {op}: {source}")]
    Query {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query cancelled or deadline exceeded")]
    Cancelled,

    #[error("migration {name} failed: {reason}")]
    Migration { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store lock poisoned by a panicking writer")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of one of the three lookups behind `Grader::score_for_student`.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("failed to check score override: {0}")]
    Override(#[source] StoreError),

    #[error("failed to get finish event: {0}")]
    FinishEvent(#[source] StoreError),

    #[error("failed to get lab score: {0}")]
    LabScore(#[source] StoreError),
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage / scoring
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Scoring error: {0}")]
    Score(#[from] ScoreError),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export / serialization
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
