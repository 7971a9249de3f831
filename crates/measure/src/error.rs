//! Measurement errors.

use gridbench_sweep::DimensionKind;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {stderr_tail}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr_tail: String,
    },

    #[error("`{command}` did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("unrecognized profiler report: {reason}")]
    UnrecognizedReport { reason: String },

    #[error(
        "results file {path} holds {found} values, expected {expected}: \
         missing from dimension {dimension}, pair {index} (position {position})"
    )]
    ShortResults {
        path: PathBuf,
        expected: usize,
        found: usize,
        /// First pair without a result.
        dimension: DimensionKind,
        index: usize,
        position: usize,
    },

    #[error("dimension {dimension}, pair {index} (position {position}): {source}")]
    Pair {
        dimension: DimensionKind,
        index: usize,
        position: usize,
        #[source]
        source: Box<MeasureError>,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl MeasureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unrecognized(reason: impl Into<String>) -> Self {
        Self::UnrecognizedReport {
            reason: reason.into(),
        }
    }
}
