//! GPA computation and degree classification.
//!
//! [`GradeEngine`] applies a [`GradingScale`] to a [`StudentSubmission`]. The
//! scale is plain data, so alternative bandings load from JSON without code
//! changes.

pub mod engine;
pub mod scale;
pub mod types;

pub use engine::GradeEngine;
pub use scale::{Band, GradingScale, ThresholdTable};
pub use types::{Classification, CourseRecord, GradeResult, StudentSubmission};
