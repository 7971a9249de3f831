//! Sweep planning: parameter sweeps to corpus jobs and benchmark pairs.

use crate::config::{CorpusParams, SweepConfig};
use crate::dimension::DimensionKind;
use crate::error::SweepError;
use gridbench_corpus::{Alphabet, DictionarySpec, GridSpec, OutputLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One corpus file to generate. Paths are relative to the session root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusJob {
    Dictionary { path: PathBuf, spec: DictionarySpec },
    Grid { path: PathBuf, spec: GridSpec },
}

impl CorpusJob {
    fn dictionary(params: &CorpusParams, alphabet: Alphabet, sorted: bool) -> Self {
        let prefix = if sorted { "sorted_" } else { "" };
        let name = format!(
            "{prefix}dic_{}_w{}.txt",
            params.dictionary_size, params.word_length
        );
        CorpusJob::Dictionary {
            path: Path::new(OutputLayout::DICTIONARIES).join(name),
            spec: DictionarySpec::new(params.dictionary_size, params.word_length)
                .with_alphabet(alphabet)
                .sorted(sorted),
        }
    }

    fn grid(params: &CorpusParams, alphabet: Alphabet) -> Self {
        let name = format!(
            "grid_{}_c{}_b{}.txt",
            params.grid_size,
            params.grid_word_length,
            params.blank_percent()
        );
        let mut spec =
            GridSpec::new(params.grid_size, params.grid_word_length).with_alphabet(alphabet);
        if params.blank_probability > 0.0 {
            spec = spec.with_blanks(params.blank_probability);
        }
        CorpusJob::Grid {
            path: Path::new(OutputLayout::GRIDS).join(name),
            spec,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            CorpusJob::Dictionary { path, .. } | CorpusJob::Grid { path, .. } => path,
        }
    }

    /// Per-file seed: stable across runs and independent of which other
    /// files the plan contains.
    pub fn seed(&self, base: u64) -> u64 {
        base ^ fnv1a(self.path().to_string_lossy().as_bytes())
    }
}

/// 64-bit FNV-1a. Must stay fixed across releases: corpus seeds, and with
/// them every generated file, are derived from it. `DefaultHasher` makes no
/// such promise.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(PRIME))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchPair {
    pub grid: PathBuf,
    pub dictionary: PathBuf,
}

/// Everything needed to benchmark one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionPlan {
    pub kind: DimensionKind,
    pub x_values: Vec<f64>,
    pub jobs: Vec<CorpusJob>,
    pub pairs: Vec<BenchPair>,
}

/// A manifest line together with where it sits in the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Global position in the manifest.
    pub index: usize,
    pub dimension: DimensionKind,
    /// Position within `dimension`.
    pub position: usize,
    pub pair: BenchPair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub seed: u64,
    pub dimensions: Vec<DimensionPlan>,
    /// Every corpus file of the plan, each once, in first-use order.
    pub jobs: Vec<CorpusJob>,
}

/// Expand a configuration into per-dimension jobs and pairs.
///
/// Dimensions appear in [`DimensionKind::ALL`] order; the manifest is their
/// pair lists concatenated in that order.
pub fn plan_sweeps(config: &SweepConfig) -> Result<SweepPlan, SweepError> {
    config.validate()?;

    let mut dimensions = Vec::with_capacity(DimensionKind::ALL.len());
    for kind in DimensionKind::ALL {
        let x_values = config.values(kind);
        let mut jobs = Vec::with_capacity(x_values.len() * 2);
        let mut pairs = Vec::with_capacity(x_values.len());

        for &value in &x_values {
            let params = config.defaults.with(kind, value);
            let grid = CorpusJob::grid(&params, config.alphabet);
            let dictionary = CorpusJob::dictionary(&params, config.alphabet, false);

            pairs.push(BenchPair {
                grid: grid.path().to_path_buf(),
                dictionary: dictionary.path().to_path_buf(),
            });
            jobs.push(grid);
            jobs.push(dictionary);

            if config.sorted_variants && kind == DimensionKind::DictionarySize {
                jobs.push(CorpusJob::dictionary(&params, config.alphabet, true));
            }
        }

        debug!(dimension = %kind, pairs = pairs.len(), "dimension planned");
        dimensions.push(DimensionPlan {
            kind,
            x_values,
            jobs,
            pairs,
        });
    }

    let jobs = dedup_jobs(&dimensions)?;
    Ok(SweepPlan {
        seed: config.seed,
        dimensions,
        jobs,
    })
}

fn dedup_jobs(dimensions: &[DimensionPlan]) -> Result<Vec<CorpusJob>, SweepError> {
    let mut seen: HashMap<&Path, &CorpusJob> = HashMap::new();
    let mut jobs = Vec::new();
    for job in dimensions.iter().flat_map(|d| d.jobs.iter()) {
        match seen.get(job.path()) {
            Some(existing) if *existing != job => {
                return Err(SweepError::InvalidConfig(format!(
                    "two different corpora map to {}",
                    job.path().display()
                )));
            }
            Some(_) => {}
            None => {
                seen.insert(job.path(), job);
                jobs.push(job.clone());
            }
        }
    }
    Ok(jobs)
}

impl SweepPlan {
    pub fn dimension(&self, kind: DimensionKind) -> Option<&DimensionPlan> {
        self.dimensions.iter().find(|d| d.kind == kind)
    }

    /// Pair count per dimension, in manifest order.
    pub fn dimension_lengths(&self) -> Vec<(DimensionKind, usize)> {
        self.dimensions
            .iter()
            .map(|d| (d.kind, d.pairs.len()))
            .collect()
    }

    pub fn total_pairs(&self) -> usize {
        self.dimensions.iter().map(|d| d.pairs.len()).sum()
    }

    pub fn manifest(&self) -> Vec<ManifestEntry> {
        let mut entries = Vec::with_capacity(self.total_pairs());
        for dimension in &self.dimensions {
            for (position, pair) in dimension.pairs.iter().enumerate() {
                entries.push(ManifestEntry {
                    index: entries.len(),
                    dimension: dimension.kind,
                    position,
                    pair: pair.clone(),
                });
            }
        }
        entries
    }

    pub fn save(&self, path: &Path) -> Result<(), SweepError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SweepError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| SweepError::io(path, e))
    }

    pub fn load(path: &Path) -> Result<Self, SweepError> {
        let json = std::fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
        serde_json::from_str(&json).map_err(|source| SweepError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
