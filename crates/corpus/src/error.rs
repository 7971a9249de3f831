//! Corpus generation errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(
        "cannot draw {requested} unique words of length 1..={max_word_length}: \
         only {available} distinct strings exist over a {alphabet_size}-letter alphabet"
    )]
    Exhausted {
        requested: usize,
        max_word_length: usize,
        alphabet_size: usize,
        available: u128,
    },

    #[error("invalid corpus shape: {0}")]
    InvalidShape(String),

    #[error("failed to write corpus file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
