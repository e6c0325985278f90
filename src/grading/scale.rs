//! Threshold tables that turn scores into grade points and GPAs into classes.
//!
//! Both mappings are data: an ordered list of inclusive lower bounds evaluated
//! highest-first, plus a floor value for anything below the lowest bound.
//!
//! Default 5.0 scale:
//!
//! | Score     | Point |   | GPA       | Class              |
//! |-----------|-------|---|-----------|--------------------|
//! | >= 70     | 5     |   | >= 4.5    | First Class        |
//! | >= 60     | 4     |   | >= 3.5    | Second Class Upper |
//! | >= 50     | 3     |   | >= 2.4    | Second Class Lower |
//! | >= 45     | 2     |   | >= 1.5    | Third Class        |
//! | >= 40     | 1     |   | < 1.5     | Pass               |
//! | < 40      | 0     |   |           |                    |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::ScaleError;
use crate::grading::types::Classification;

/// A single band: any value `>= lower_bound` maps to `value`, unless a higher band matched first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band<T> {
    pub lower_bound: f64,
    pub value: T,
}

impl<T> Band<T> {
    pub fn new(lower_bound: f64, value: T) -> Self {
        Self { lower_bound, value }
    }
}

/// Bands kept in descending order of `lower_bound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable<T> {
    bands: Vec<Band<T>>,
    floor: T,
}

impl<T> ThresholdTable<T> {
    /// Builds a table from bands in any order.
    pub fn new(bands: Vec<Band<T>>, floor: T) -> Self {
        let mut table = Self { bands, floor };
        table.sort_descending();
        table
    }

    /// Returns the value of the highest band whose lower bound is `<= value`.
    ///
    /// NaN never satisfies a bound and falls through to the floor.
    pub fn lookup(&self, value: f64) -> &T {
        self.bands
            .iter()
            .find(|band| value >= band.lower_bound)
            .map(|band| &band.value)
            .unwrap_or(&self.floor)
    }

    pub fn bands(&self) -> &[Band<T>] {
        &self.bands
    }

    pub fn floor(&self) -> &T {
        &self.floor
    }

    fn sort_descending(&mut self) {
        self.bands.sort_by(|a, b| b.lower_bound.total_cmp(&a.lower_bound));
    }

    fn normalize(&mut self, table: &'static str) -> Result<(), ScaleError> {
        if self.bands.is_empty() {
            return Err(ScaleError::EmptyTable { table });
        }
        if let Some(band) = self.bands.iter().find(|b| !b.lower_bound.is_finite()) {
            return Err(ScaleError::NonFiniteBound {
                table,
                bound: band.lower_bound,
            });
        }

        self.sort_descending();

        if let Some(pair) = self
            .bands
            .windows(2)
            .find(|pair| pair[0].lower_bound == pair[1].lower_bound)
        {
            return Err(ScaleError::DuplicateBound {
                table,
                bound: pair[0].lower_bound,
            });
        }

        Ok(())
    }
}

/// The score and classification tables used by the grade engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingScale {
    pub grade_points: ThresholdTable<u32>,
    pub classifications: ThresholdTable<Classification>,
}

impl Default for GradingScale {
    fn default() -> Self {
        Self {
            grade_points: ThresholdTable::new(
                vec![
                    Band::new(70.0, 5),
                    Band::new(60.0, 4),
                    Band::new(50.0, 3),
                    Band::new(45.0, 2),
                    Band::new(40.0, 1),
                ],
                0,
            ),
            classifications: ThresholdTable::new(
                vec![
                    Band::new(4.5, Classification::FirstClass),
                    Band::new(3.5, Classification::SecondClassUpper),
                    Band::new(2.4, Classification::SecondClassLower),
                    Band::new(1.5, Classification::ThirdClass),
                ],
                Classification::Pass,
            ),
        }
    }
}

impl GradingScale {
    /// Loads and validates a scale from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grading scale: {}", path.display()))?;
        let scale = Self::from_json(&content)
            .with_context(|| format!("Invalid grading scale: {}", path.display()))?;

        debug!(
            path = %path.display(),
            grade_bands = scale.grade_points.bands().len(),
            class_bands = scale.classifications.bands().len(),
            "Grading scale loaded"
        );

        Ok(scale)
    }

    /// Parses a scale from JSON. Bands may appear in any order.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut scale: GradingScale = serde_json::from_str(content)?;
        scale.grade_points.normalize("grade_points")?;
        scale.classifications.normalize("classifications")?;
        Ok(scale)
    }
}
