//! Text rendering of a graded submission.
//!
//! The report is a list of positioned lines laid out top to bottom on a
//! letter-sized page: student, GPA, class, then one line per course.

use serde::Serialize;
use std::fmt;

use crate::grading::{CourseRecord, GradeResult};

const LEFT_MARGIN: i32 = 100;
const FIRST_LINE_Y: i32 = 750;
const LINE_SPACING: i32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub lines: Vec<ReportLine>,
}

impl Report {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line.text)?;
        }
        Ok(())
    }
}

pub fn render_report(result: &GradeResult, courses: &[CourseRecord]) -> Report {
    let header = [
        format!("Student: {}", result.name),
        format!("GPA: {}", format_real(result.gpa)),
        format!("Class: {}", result.classification),
    ];
    let course_lines = courses.iter().map(|c| {
        format!(
            "{}: Score {}, Credit {}",
            c.name,
            format_real(c.score),
            c.credit
        )
    });

    let lines = header
        .into_iter()
        .chain(course_lines)
        .zip(0..)
        .map(|(text, i)| ReportLine {
            x: LEFT_MARGIN,
            y: FIRST_LINE_Y - i * LINE_SPACING,
            text,
        })
        .collect();

    Report { lines }
}

/// Formats a real the shortest way that round-trips.
///
/// Whole values keep one fractional digit (`70.0`). Magnitudes below `1e-4`
/// or from `1e16` up switch to an exponent with a sign and at least two
/// digits (`1e-05`, `1.5e+16`).
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        };
    }

    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
