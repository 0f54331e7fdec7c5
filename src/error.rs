//! Error types for the set-list builder library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the set-list builder library
///
/// Only whole-operation failures are represented here. Per-item problems
/// (a missing chart, a TOC link that could not be built, a bad import row)
/// are reported as warnings and never abort an operation.
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Date parsing error
    #[error("Invalid date expression: {0}")]
    InvalidDateExpression(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Title or TOC page could not be produced, or the merged output
    /// could not be serialized
    #[error("Assembly failed: {0}")]
    Assembly(String),

    /// TOC link annotations could not be planned or committed
    #[error("Could not add TOC links: {0}")]
    Annotation(String),

    /// Chart directory pattern could not be built
    #[error("Invalid chart pattern: {0}")]
    InvalidGlob(#[from] glob::PatternError),

    /// The set-list text contained no 3-digit codes
    #[error("No valid indices found in the set-list text")]
    NoIndicesResolved,

    /// A catalog import produced no usable rows
    #[error("No valid song data found in import")]
    NoValidRows,

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog table could not be parsed
    #[error("Invalid catalog table: {0}")]
    Table(#[from] csv::Error),

    /// Catalog store could not be written
    #[error("Failed to save catalog to {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },
}
