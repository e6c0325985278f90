use thiserror::Error;

/// Errors surfaced by the single-record and batch entry points.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("Course '{course}' has invalid credit {credit}; credit must be at least 1")]
    InvalidCourseCredit { course: String, credit: i64 },

    #[error("Batch input is empty; a header row is required")]
    MissingHeader,

    #[error("Failed to read batch header: {0}")]
    Csv(#[from] csv::Error),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),
}

/// Why a single batch row was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("Missing student name")]
    MissingName,

    #[error("Expected score/credit pairs after the name, found {fields} field(s)")]
    OddFieldCount { fields: usize },

    #[error("Course {course}: invalid score '{value}'")]
    InvalidScore { course: usize, value: String },

    #[error("Course {course}: invalid credit '{value}'")]
    InvalidCredit { course: usize, value: String },

    #[error("Row is not valid UTF-8")]
    Encoding,

    #[error("Unreadable row: {0}")]
    Unreadable(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Rejections raised while validating a grading scale.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("Grading scale table '{table}' has no bands")]
    EmptyTable { table: &'static str },

    #[error("Grading scale table '{table}' has a non-finite bound {bound}")]
    NonFiniteBound { table: &'static str, bound: f64 },

    #[error("Grading scale table '{table}' repeats the bound {bound}")]
    DuplicateBound { table: &'static str, bound: f64 },
}
