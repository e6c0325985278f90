//! Data types shared by the grading engine, the batch ingester and the report sink.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// A single course taken by a student.
///
/// `credit` must be at least 1. It is kept signed so that submissions carrying
/// zero or negative credits can be represented and rejected by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub score: f64,
    pub credit: i64,
}

impl CourseRecord {
    pub fn new(name: impl Into<String>, score: f64, credit: i64) -> Self {
        Self {
            name: name.into(),
            score,
            credit,
        }
    }
}

/// One student's courses, in the order they were submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSubmission {
    pub name: String,
    pub courses: Vec<CourseRecord>,
}

impl StudentSubmission {
    pub fn new(name: impl Into<String>, courses: Vec<CourseRecord>) -> Self {
        Self {
            name: name.into(),
            courses,
        }
    }
}

/// Degree classification derived from a GPA.
///
/// Serialized as its [`label`](Classification::label), which is also what
/// [`FromStr`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    FirstClass,
    SecondClassUpper,
    SecondClassLower,
    ThirdClass,
    Pass,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::FirstClass,
        Classification::SecondClassUpper,
        Classification::SecondClassLower,
        Classification::ThirdClass,
        Classification::Pass,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Classification::FirstClass => "First Class",
            Classification::SecondClassUpper => "Second Class Upper",
            Classification::SecondClassLower => "Second Class Lower",
            Classification::ThirdClass => "Third Class",
            Classification::Pass => "Pass",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .into_iter()
            .find(|class| class.label() == s)
            .ok_or_else(|| format!("unknown classification '{s}'"))
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}

/// The computed outcome for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeResult {
    pub name: String,
    pub gpa: f64,
    pub classification: Classification,
}
