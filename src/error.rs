//! Errors raised at the sequence load/save boundary.
//!
//! Editing operations never fail; they either apply or leave the sequence
//! untouched. Only reading a sequence from the outside world can be rejected.

use std::path::PathBuf;

use thiserror::Error;

use crate::steps::StepId;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("failed to access sequence file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON sequence: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML sequence: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported sequence file extension: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("step id {0} appears more than once")]
    DuplicateId(StepId),

    #[error("step {0} has empty text")]
    EmptyText(StepId),

    #[error("active step {0} is not part of the sequence")]
    UnknownActive(StepId),

    #[error("step id {0} leaves no room for new step ids")]
    IdSpaceExhausted(StepId),
}

impl SequenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error is about sequence content rather than the file itself
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            SequenceError::DuplicateId(_)
                | SequenceError::EmptyText(_)
                | SequenceError::UnknownActive(_)
                | SequenceError::IdSpaceExhausted(_)
        )
    }
}
