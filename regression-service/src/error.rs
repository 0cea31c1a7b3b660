// Regression Errors
// The single failure kind that halts a nightly run, plus setup errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a regression run
#[derive(Debug, Error)]
pub enum RegressionError {
    /// A case exited non-zero or was killed by a signal
    #[error("case {index} failed (exit code: {}): {command}", exit_label(.exit_code))]
    CaseFailed {
        index: u64,
        command: String,
        exit_code: Option<i32>,
    },

    /// A case could not be started at all
    #[error("case {index} could not be launched ({reason}): {command}")]
    LaunchFailed {
        index: u64,
        command: String,
        reason: String,
    },

    #[error("working directory {path} is not usable: {source}")]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RegressionError {
    /// The command that failed, if the error came from a case
    pub fn command(&self) -> Option<&str> {
        match self {
            RegressionError::CaseFailed { command, .. }
            | RegressionError::LaunchFailed { command, .. } => Some(command),
            RegressionError::WorkingDir { .. } => None,
        }
    }

    /// Position of the failing case in the run
    pub fn case_index(&self) -> Option<u64> {
        match self {
            RegressionError::CaseFailed { index, .. }
            | RegressionError::LaunchFailed { index, .. } => Some(*index),
            RegressionError::WorkingDir { .. } => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

pub type RegressionResult<T> = Result<T, RegressionError>;
