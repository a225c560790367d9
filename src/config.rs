//! Runtime configuration for an evaluation run.

use std::path::PathBuf;

use crate::constants::{ARTIFACT_DIR, DEFAULT_PAD_CHAR, DEFAULT_START_CHAR};

/// Settings shared by vocabulary construction, encoding and result dumps.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    /// Character appended to sequences shorter than `max_len`
    pub pad_char: char,
    /// Character reserved for code 0
    pub start_char: char,
    /// Fixed length of encoded sequences
    pub max_len: usize,
    /// Directory that decoded batches are written to
    pub artifact_dir: PathBuf,
    /// Prefix for artifact names
    pub exp_name: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pad_char: DEFAULT_PAD_CHAR,
            start_char: DEFAULT_START_CHAR,
            max_len: 100,
            artifact_dir: PathBuf::from(ARTIFACT_DIR),
            exp_name: None,
        }
    }
}

impl EvalConfig {
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    pub fn with_exp_name(mut self, name: impl Into<String>) -> Self {
        self.exp_name = Some(name.into());
        self
    }
}
