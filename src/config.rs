//! Runtime settings read from the environment (and `.env`, loaded by the binary).
//!
//! | Variable           | Default                |
//! |--------------------|------------------------|
//! | `GPA_RESULTS_PATH` | `results.csv`          |
//! | `GPA_SCALE_PATH`   | built-in 5.0 scale     |
//! | `LOG_FILE_PATH`    | `logs/gpa_grader.log`  |

use anyhow::Result;
use std::path::PathBuf;

use crate::grading::GradingScale;

pub const DEFAULT_RESULTS_PATH: &str = "results.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/gpa_grader.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub results_path: PathBuf,
    pub scale_path: Option<PathBuf>,
    pub log_file_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
            scale_path: None,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        let defaults = Self::default();

        Self {
            results_path: get("GPA_RESULTS_PATH").unwrap_or(defaults.results_path),
            scale_path: get("GPA_SCALE_PATH"),
            log_file_path: get("LOG_FILE_PATH").unwrap_or(defaults.log_file_path),
        }
    }

    /// Loads the configured grading scale, or the built-in one when none is set.
    pub fn grading_scale(&self) -> Result<GradingScale> {
        match &self.scale_path {
            Some(path) => GradingScale::load(path),
            None => Ok(GradingScale::default()),
        }
    }
}
