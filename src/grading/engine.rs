use crate::grading::scale::GradingScale;
use crate::grading::types::{Classification, CourseRecord, GradeResult, StudentSubmission};

/// Computes credit-weighted GPAs and degree classifications.
///
/// The engine performs no I/O and never fails: credit validation belongs to
/// the caller.
#[derive(Debug, Clone, Default)]
pub struct GradeEngine {
    scale: GradingScale,
}

impl GradeEngine {
    pub fn new(scale: GradingScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> &GradingScale {
        &self.scale
    }

    pub fn grade_point(&self, score: f64) -> u32 {
        *self.scale.grade_points.lookup(score)
    }

    /// `Σ(grade_point * credit) / Σ(credit)`, or 0.0 when total credit is zero.
    ///
    /// Sums are accumulated as `f64` so arbitrarily large credits cannot overflow.
    /// The result is neither rounded nor clamped.
    pub fn gpa(&self, courses: &[CourseRecord]) -> f64 {
        let mut total_points = 0.0;
        let mut total_credits = 0.0;

        for course in courses {
            let credit = course.credit as f64;
            total_points += self.grade_point(course.score) as f64 * credit;
            total_credits += credit;
        }

        if total_credits == 0.0 {
            0.0
        } else {
            total_points / total_credits
        }
    }

    pub fn classify(&self, gpa: f64) -> Classification {
        *self.scale.classifications.lookup(gpa)
    }

    pub fn compute(&self, submission: &StudentSubmission) -> GradeResult {
        let gpa = self.gpa(&submission.courses);
        GradeResult {
            name: submission.name.clone(),
            gpa,
            classification: self.classify(gpa),
        }
    }
}
