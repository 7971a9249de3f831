//! Aggregation and charting errors.

use gridbench_sweep::DimensionKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(
        "{path}: results end inside dimension {dimension}: {found} values, expected {expected}"
    )]
    Truncated {
        path: PathBuf,
        dimension: DimensionKind,
        expected: usize,
        found: usize,
    },

    #[error("{path}: {found} values but the plan only accounts for {expected}")]
    Surplus {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("{path}:{line}: result keyed {found} where pair {expected} was expected")]
    KeyMismatch {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path}:{line}: malformed result {text:?}")]
    Malformed {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("invalid series for {dimension}: {reason}")]
    InvalidSeries {
        dimension: DimensionKind,
        reason: String,
    },

    #[error("failed to render {path}: {reason}")]
    Chart { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed report {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
