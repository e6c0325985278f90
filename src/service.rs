//! Entry points behind the `calculate`, `report` and `bulk-upload` commands.
//!
//! The single-record path is strict: any invalid credit rejects the whole
//! submission before anything is stored. Reports and batches are computed
//! without touching the store.

use serde::Serialize;
use std::io::Read;
use tracing::{debug, info};

use crate::batch::{BatchIngester, RowFailure};
use crate::error::GradeError;
use crate::grading::{Classification, GradeEngine, GradeResult, StudentSubmission};
use crate::report::{Report, render_report};
use crate::store::{NewResult, ResultStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResponse {
    pub gpa: f64,
    pub class_of_degree: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub gpa: f64,
    pub class_of_degree: Classification,
}

impl From<GradeResult> for BatchEntry {
    fn from(result: GradeResult) -> Self {
        Self {
            name: result.name,
            gpa: result.gpa,
            class_of_degree: result.classification,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchEntry>,
    pub failures: Vec<RowFailure>,
}

/// Rejects the submission if any course carries a credit below 1.
pub fn validate_submission(submission: &StudentSubmission) -> Result<(), GradeError> {
    match submission.courses.iter().find(|c| c.credit < 1) {
        Some(course) => Err(GradeError::InvalidCourseCredit {
            course: course.name.clone(),
            credit: course.credit,
        }),
        None => Ok(()),
    }
}

pub struct GradeService<S> {
    engine: GradeEngine,
    store: S,
}

impl<S: ResultStore> GradeService<S> {
    pub fn new(engine: GradeEngine, store: S) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &GradeEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates, grades and persists one submission.
    #[tracing::instrument(
        skip_all,
        fields(student = %submission.name, courses = submission.courses.len())
    )]
    pub fn calculate(
        &mut self,
        submission: &StudentSubmission,
    ) -> Result<CalculationResponse, GradeError> {
        validate_submission(submission)?;

        let result = self.engine.compute(submission);
        let id = self.store.append(NewResult {
            student_name: result.name.clone(),
            gpa: result.gpa,
        })?;

        info!(id, gpa = result.gpa, class = %result.classification, "Result stored");

        Ok(CalculationResponse {
            gpa: result.gpa,
            class_of_degree: result.classification,
        })
    }
}

/// Grades a submission and lays it out as a report. Nothing is stored.
#[tracing::instrument(skip_all, fields(student = %submission.name))]
pub fn report(
    engine: &GradeEngine,
    submission: &StudentSubmission,
) -> Result<Report, GradeError> {
    validate_submission(submission)?;

    let result = engine.compute(submission);
    let report = render_report(&result, &submission.courses);
    debug!(lines = report.lines.len(), "Report rendered");

    Ok(report)
}

/// Grades every data row of a CSV table. Nothing is stored.
pub fn bulk_upload<R: Read>(
    engine: &GradeEngine,
    input: R,
) -> Result<BatchResponse, GradeError> {
    let outcome = BatchIngester::new(engine.clone()).ingest(input)?;

    Ok(BatchResponse {
        results: outcome.results.into_iter().map(BatchEntry::from).collect(),
        failures: outcome.failures,
    })
}
