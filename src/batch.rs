//! Batch ingestion of student rows from CSV.
//!
//! Each data row becomes one [`StudentSubmission`] graded by the
//! [`GradeEngine`]. Rows that cannot be parsed are reported as
//! [`RowFailure`]s and the rest of the batch carries on.

use csv::{ReaderBuilder, StringRecord};
use serde::{Serialize, Serializer};
use std::io::Read;
use tracing::{debug, info, warn};

use crate::error::{GradeError, RowError};
use crate::grading::{CourseRecord, GradeEngine, GradeResult, StudentSubmission};

/// Turns one CSV record into a submission.
pub trait RowFormat {
    fn parse_row(&self, record: &StringRecord) -> Result<StudentSubmission, RowError>;
}

/// `name, score_1, credit_1, score_2, credit_2, ...`
///
/// Courses are named `Course {k}` by their 1-based pair position.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalPairs;

impl RowFormat for PositionalPairs {
    fn parse_row(&self, record: &StringRecord) -> Result<StudentSubmission, RowError> {
        let name = record.get(0).unwrap_or_default();
        if name.trim().is_empty() {
            return Err(RowError::MissingName);
        }

        let fields = record.len().saturating_sub(1);
        if fields % 2 != 0 {
            return Err(RowError::OddFieldCount { fields });
        }

        let courses = (1..record.len())
            .step_by(2)
            .enumerate()
            .map(|(k, i)| parse_pair(k + 1, &record[i], &record[i + 1]))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StudentSubmission::new(name, courses))
    }
}

fn parse_pair(course: usize, score: &str, credit: &str) -> Result<CourseRecord, RowError> {
    let score_value = score
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(|| RowError::InvalidScore {
            course,
            value: score.to_string(),
        })?;

    let credit_value = credit
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|c| *c >= 1)
        .ok_or_else(|| RowError::InvalidCredit {
            course,
            value: credit.to_string(),
        })?;

    Ok(CourseRecord::new(
        format!("Course {course}"),
        score_value,
        credit_value,
    ))
}

/// A rejected data row. `row` is the 1-based data row number, header excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: RowError,
}

fn serialize_reason<S: Serializer>(reason: &RowError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Graded rows in input order alongside the rows that were rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<GradeResult>,
    pub failures: Vec<RowFailure>,
}

pub struct BatchIngester<F = PositionalPairs> {
    engine: GradeEngine,
    format: F,
}

impl BatchIngester {
    pub fn new(engine: GradeEngine) -> Self {
        Self::with_format(engine, PositionalPairs)
    }
}

impl<F: RowFormat> BatchIngester<F> {
    pub fn with_format(engine: GradeEngine, format: F) -> Self {
        Self { engine, format }
    }

    /// Skips the header row, then grades every data row.
    ///
    /// # Errors
    ///
    /// Returns [`GradeError::MissingHeader`] if the input holds no rows at all.
    /// Malformed data rows never fail the call.
    #[tracing::instrument(skip_all)]
    pub fn ingest<R: Read>(&self, input: R) -> Result<BatchOutcome, GradeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        let mut records = reader.byte_records();

        match records.next() {
            None => return Err(GradeError::MissingHeader),
            Some(header) => {
                let header = header?;
                debug!(fields = header.len(), "Header row skipped");
            }
        }

        let mut outcome = BatchOutcome::default();

        for (index, record) in records.enumerate() {
            let row = index + 1;
            let parsed = record
                .map_err(|e| RowError::Unreadable(e.to_string()))
                .and_then(|r| StringRecord::from_byte_record(r).map_err(|_| RowError::Encoding))
                .and_then(|r| self.format.parse_row(&r));

            match parsed {
                Ok(submission) => {
                    let result = self.engine.compute(&submission);
                    debug!(row, name = %result.name, gpa = result.gpa, "Row graded");
                    outcome.results.push(result);
                }
                Err(reason) => {
                    warn!(row, reason = %reason, "Skipping malformed row");
                    outcome.failures.push(RowFailure { row, reason });
                }
            }
        }

        info!(
            results = outcome.results.len(),
            failures = outcome.failures.len(),
            "Batch ingested"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::Classification;

    fn ingest(input: &str) -> Result<BatchOutcome, GradeError> {
        BatchIngester::new(GradeEngine::default()).ingest(input.as_bytes())
    }

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_two_students() {
        let outcome = ingest("name,s1,c1,s2,c2\nAlice,70,3,50,2\nBob,30,2\n").unwrap();

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].name, "Alice");
        assert_eq!(outcome.results[0].gpa, 4.2);
        assert_eq!(outcome.results[0].classification, Classification::SecondClassUpper);
        assert_eq!(outcome.results[1].name, "Bob");
        assert_eq!(outcome.results[1].gpa, 0.0);
        assert_eq!(outcome.results[1].classification, Classification::Pass);
    }

    #[test]
    fn test_empty_input_is_missing_header() {
        assert!(matches!(ingest(""), Err(GradeError::MissingHeader)));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let outcome = ingest("name,score,credit\n").unwrap();
        assert_eq!(outcome, BatchOutcome::default());
    }

    #[test]
    fn test_header_is_skipped_even_if_numeric() {
        let outcome = ingest("Zed,70,3\nAmy,60,1\n").unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].name, "Amy");
    }

    #[test]
    fn test_odd_field_count_is_isolated() {
        let outcome = ingest("h\nAlice,70,3\nBroken,70,3,50\nCara,45,2\n").unwrap();

        let names: Vec<&str> = outcome.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Cara"]);
        assert_eq!(
            outcome.failures,
            vec![RowFailure {
                row: 2,
                reason: RowError::OddFieldCount { fields: 3 },
            }]
        );
    }

    #[test]
    fn test_non_numeric_fields_are_isolated() {
        let outcome = ingest("h\nA,abc,3\nB,70,three\nC,70,2.5\nD,65,1\n").unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].name, "D");
        let rows: Vec<usize> = outcome.failures.iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![1, 2, 3]);
        assert_eq!(
            outcome.failures[0].reason,
            RowError::InvalidScore { course: 1, value: "abc".into() }
        );
        assert_eq!(
            outcome.failures[1].reason,
            RowError::InvalidCredit { course: 1, value: "three".into() }
        );
    }

    #[test]
    fn test_failures_keep_result_order() {
        let outcome = ingest("h\nA,70,1\n,70,1\nB,60,1\nC,x,1\nD,50,1\n").unwrap();

        let names: Vec<&str> = outcome.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "D"]);
        assert_eq!(outcome.failures[0].reason, RowError::MissingName);
        assert_eq!(outcome.failures[0].row, 2);
        assert_eq!(outcome.failures[1].row, 4);
    }

    #[test]
    fn test_invalid_utf8_row_is_isolated() {
        let mut input = b"h\nA,70,1\n".to_vec();
        input.extend_from_slice(b"\xff\xfe,70,1\n");
        input.extend_from_slice(b"B,60,1\n");

        let outcome = BatchIngester::new(GradeEngine::default())
            .ingest(input.as_slice())
            .unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.failures, vec![RowFailure { row: 2, reason: RowError::Encoding }]);
    }

    #[test]
    fn test_positional_pairs_names_courses() {
        let submission = PositionalPairs
            .parse_row(&record(&["Ada", " 71.5 ", " 3", "40", "2"]))
            .unwrap();

        assert_eq!(submission.name, "Ada");
        assert_eq!(
            submission.courses,
            vec![
                CourseRecord::new("Course 1", 71.5, 3),
                CourseRecord::new("Course 2", 40.0, 2),
            ]
        );
    }

    #[test]
    fn test_positional_pairs_name_only_has_no_courses() {
        let submission = PositionalPairs.parse_row(&record(&["Solo"])).unwrap();
        assert!(submission.courses.is_empty());
    }

    #[test]
    fn test_positional_pairs_rejects_blank_name() {
        let err = PositionalPairs.parse_row(&record(&["  ", "70", "3"])).unwrap_err();
        assert_eq!(err, RowError::MissingName);
    }

    #[test]
    fn test_positional_pairs_rejects_non_positive_credit() {
        let err = PositionalPairs
            .parse_row(&record(&["Ada", "70", "3", "55", "0"]))
            .unwrap_err();
        assert_eq!(err, RowError::InvalidCredit { course: 2, value: "0".into() });
    }

    #[test]
    fn test_positional_pairs_rejects_non_finite_score() {
        let err = PositionalPairs.parse_row(&record(&["Ada", "NaN", "3"])).unwrap_err();
        assert_eq!(err, RowError::InvalidScore { course: 1, value: "NaN".into() });
    }

    #[test]
    fn test_max_credit_row_grades_without_overflow() {
        let outcome = ingest("h\nA,70,9223372036854775807,70,9223372036854775807\n").unwrap();

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.results[0].gpa, 5.0);
        assert_eq!(outcome.results[0].classification, Classification::FirstClass);
    }

    #[test]
    fn test_credit_beyond_i64_is_invalid() {
        let outcome = ingest("h\nA,70,9223372036854775808\n").unwrap();

        assert!(outcome.results.is_empty());
        assert_eq!(
            outcome.failures[0].reason,
            RowError::InvalidCredit {
                course: 1,
                value: "9223372036854775808".into(),
            }
        );
    }

    #[test]
    fn test_custom_row_format() {
        struct NameOnly;
        impl RowFormat for NameOnly {
            fn parse_row(&self, record: &StringRecord) -> Result<StudentSubmission, RowError> {
                Ok(StudentSubmission::new(record.get(0).unwrap_or_default(), vec![]))
            }
        }

        let outcome = BatchIngester::with_format(GradeEngine::default(), NameOnly)
            .ingest("h\nA,junk,junk,junk\n".as_bytes())
            .unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_failure_serializes_reason_as_text() {
        let failure = RowFailure { row: 4, reason: RowError::MissingName };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json, serde_json::json!({"row": 4, "reason": "Missing student name"}));
    }
}
