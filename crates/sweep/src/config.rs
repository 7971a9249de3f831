//! Sweep configuration.
//!
//! The defaults reproduce the reference benchmark: a 500×500 grid of
//! single-letter cells against a 50 000-word dictionary of words up to ten
//! letters, with each axis swept while the others stay at these values.

use crate::dimension::DimensionKind;
use crate::error::SweepError;
use gridbench_corpus::Alphabet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One point in corpus-parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusParams {
    pub dictionary_size: usize,
    pub grid_size: usize,
    pub word_length: usize,
    pub grid_word_length: usize,
    pub blank_probability: f64,
}

impl Default for CorpusParams {
    fn default() -> Self {
        Self {
            dictionary_size: 50_000,
            grid_size: 500,
            word_length: 10,
            grid_word_length: 1,
            blank_probability: 0.0,
        }
    }
}

impl CorpusParams {
    /// Copy of `self` with `kind`'s parameter set to `value`.
    pub fn with(&self, kind: DimensionKind, value: f64) -> Self {
        let mut params = *self;
        match kind {
            DimensionKind::DictionarySize => params.dictionary_size = value as usize,
            DimensionKind::GridSize => params.grid_size = value as usize,
            DimensionKind::WordLength => params.word_length = value as usize,
            DimensionKind::GridWordLength => params.grid_word_length = value as usize,
            DimensionKind::BlankProbability => params.blank_probability = value,
        }
        params
    }

    /// Blank probability rounded to whole percent, as used in file names.
    pub fn blank_percent(&self) -> u32 {
        (self.blank_probability * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub defaults: CorpusParams,
    pub dictionary_sizes: Vec<usize>,
    pub grid_sizes: Vec<usize>,
    pub word_lengths: Vec<usize>,
    pub grid_word_lengths: Vec<usize>,
    pub blank_probabilities: Vec<f64>,
    pub alphabet: Alphabet,
    pub seed: u64,
    /// Also generate sorted copies of the dictionary-size dictionaries.
    pub sorted_variants: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            defaults: CorpusParams::default(),
            dictionary_sizes: (1..=10).map(|x| 10_000 * x).collect(),
            grid_sizes: (1..=10).map(|x| 100 * x).collect(),
            word_lengths: (1..=10).map(|x| 5 * x).collect(),
            grid_word_lengths: (1..=10).collect(),
            blank_probabilities: (0..=20).map(|x| 0.05 * x as f64).collect(),
            alphabet: Alphabet::default(),
            seed: 0x5EED,
            sorted_variants: true,
        }
    }
}

impl SweepConfig {
    /// A tiny sweep that runs in seconds, for smoke tests.
    pub fn smoke() -> Self {
        Self {
            defaults: CorpusParams {
                dictionary_size: 200,
                grid_size: 20,
                word_length: 6,
                grid_word_length: 1,
                blank_probability: 0.0,
            },
            dictionary_sizes: vec![100, 200, 300],
            grid_sizes: vec![10, 20],
            word_lengths: vec![3, 6],
            grid_word_lengths: vec![1, 2],
            blank_probabilities: vec![0.0, 0.5, 1.0],
            sorted_variants: false,
            ..Self::default()
        }
    }

    /// Parameter values swept along `kind`, as chart x values.
    pub fn values(&self, kind: DimensionKind) -> Vec<f64> {
        let counts = |v: &[usize]| v.iter().map(|&x| x as f64).collect();
        match kind {
            DimensionKind::DictionarySize => counts(&self.dictionary_sizes),
            DimensionKind::GridSize => counts(&self.grid_sizes),
            DimensionKind::WordLength => counts(&self.word_lengths),
            DimensionKind::GridWordLength => counts(&self.grid_word_lengths),
            DimensionKind::BlankProbability => self.blank_probabilities.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        let bad = |msg: String| Err(SweepError::InvalidConfig(msg));
        let d = &self.defaults;
        if d.dictionary_size == 0 || d.grid_size == 0 || d.word_length == 0 || d.grid_word_length == 0
        {
            return bad(format!("default sizes and lengths must be > 0: {d:?}"));
        }
        if !(0.0..=1.0).contains(&d.blank_probability) {
            return bad(format!(
                "default blank probability {} outside [0, 1]",
                d.blank_probability
            ));
        }

        for kind in DimensionKind::ALL {
            let values = self.values(kind);
            if values.is_empty() {
                return bad(format!("dimension {kind} has no values"));
            }
            if kind != DimensionKind::BlankProbability && values.iter().any(|&v| v == 0.0) {
                return bad(format!("dimension {kind} contains a zero value"));
            }
        }

        let mut percents: HashMap<u32, f64> = HashMap::new();
        for &p in &self.blank_probabilities {
            if !(0.0..=1.0).contains(&p) {
                return bad(format!("blank probability {p} outside [0, 1]"));
            }
            let percent = (p * 100.0).round() as u32;
            if let Some(&other) = percents.get(&percent) {
                if other != p {
                    return bad(format!(
                        "blank probabilities {other} and {p} both round to {percent}%"
                    ));
                }
            }
            percents.insert(percent, p);
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SweepError> {
        let json = std::fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
        serde_json::from_str(&json).map_err(|source| SweepError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
