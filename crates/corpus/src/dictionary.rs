//! Random dictionary generation.

use crate::alphabet::Alphabet;
use crate::error::CorpusError;
use crate::layout::create_parent;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionarySpec {
    pub word_count: usize,
    pub max_word_length: usize,
    pub alphabet: Alphabet,
    pub sorted: bool,
}

impl DictionarySpec {
    pub fn new(word_count: usize, max_word_length: usize) -> Self {
        Self {
            word_count,
            max_word_length,
            alphabet: Alphabet::default(),
            sorted: false,
        }
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Reject requests that rejection sampling could never satisfy.
    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.max_word_length == 0 && self.word_count > 0 {
            return Err(CorpusError::InvalidShape(
                "max word length must be at least 1".into(),
            ));
        }
        let available = self.alphabet.distinct_strings(self.max_word_length);
        if self.word_count as u128 > available {
            return Err(CorpusError::Exhausted {
                requested: self.word_count,
                max_word_length: self.max_word_length,
                alphabet_size: self.alphabet.size(),
                available,
            });
        }
        Ok(())
    }
}

/// Draw `word_count` unique words.
///
/// Each candidate gets a length uniform in `1..=max_word_length` and
/// uniform letters; a candidate already in the set is discarded and
/// redrawn. Words keep their draw order unless the spec asks for sorting.
pub fn random_dictionary(
    spec: &DictionarySpec,
    rng: &mut fastrand::Rng,
) -> Result<Vec<String>, CorpusError> {
    spec.validate()?;

    let mut seen = HashSet::with_capacity(spec.word_count);
    let mut words = Vec::with_capacity(spec.word_count);
    let mut rejected = 0usize;

    while words.len() < spec.word_count {
        let len = rng.usize(1..=spec.max_word_length);
        let candidate = spec.alphabet.random_word(rng, len);
        if seen.insert(candidate.clone()) {
            words.push(candidate);
        } else {
            rejected += 1;
        }
    }

    if spec.sorted {
        words.sort_unstable();
    }

    debug!(
        words = words.len(),
        rejected,
        max_word_length = spec.max_word_length,
        "dictionary drawn"
    );
    Ok(words)
}

/// Generate a dictionary and write it one word per line, overwriting `path`.
pub fn generate_dictionary(
    path: &Path,
    spec: &DictionarySpec,
    rng: &mut fastrand::Rng,
) -> Result<usize, CorpusError> {
    let words = random_dictionary(spec, rng)?;
    create_parent(path)?;

    let file = File::create(path).map_err(|e| CorpusError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for word in &words {
        writeln!(out, "{word}").map_err(|e| CorpusError::io(path, e))?;
    }
    out.flush().map_err(|e| CorpusError::io(path, e))?;

    Ok(words.len())
}
