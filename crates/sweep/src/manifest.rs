//! Benchmark manifest: the ordered (grid, dictionary) pair list.
//!
//! Line grammar:
//!
//! ```text
//! plain  := <grid-path> WS <dictionary-path>
//! keyed  := <index> WS <grid-path> WS <dictionary-path>
//! ```
//!
//! Paths cannot contain whitespace. Order is load-bearing: results come back
//! one line per manifest line, in manifest order.

use crate::error::SweepError;
use crate::planner::{BenchPair, ManifestEntry};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestFormat {
    /// Two path tokens per line, what the external timing driver reads.
    #[default]
    Plain,
    /// Global pair index before the two paths.
    Keyed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub index: usize,
    pub pair: BenchPair,
}

fn token(path: &Path) -> Result<String, SweepError> {
    let text = path.to_string_lossy();
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        return Err(SweepError::UnrepresentablePath(path.to_path_buf()));
    }
    Ok(text.into_owned())
}

/// Write `entries` one per line, in the given order. No reordering, no
/// deduplication.
pub fn write_manifest(
    path: &Path,
    entries: &[ManifestEntry],
    format: ManifestFormat,
) -> Result<(), SweepError> {
    let file = File::create(path).map_err(|e| SweepError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for entry in entries {
        let grid = token(&entry.pair.grid)?;
        let dictionary = token(&entry.pair.dictionary)?;
        let line = match format {
            ManifestFormat::Plain => format!("{grid} {dictionary}"),
            ManifestFormat::Keyed => format!("{} {grid} {dictionary}", entry.index),
        };
        writeln!(out, "{line}").map_err(|e| SweepError::io(path, e))?;
    }
    out.flush().map_err(|e| SweepError::io(path, e))
}

/// Parse a manifest in either format. Keyed indices must count up from 0.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRecord>, SweepError> {
    let text = fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
    let malformed = |line: usize, reason: String| SweepError::Manifest {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut records = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let expected = records.len();
        let (index, grid, dictionary) = match tokens.as_slice() {
            [] => continue,
            [grid, dictionary] => (expected, *grid, *dictionary),
            [index, grid, dictionary] => {
                let index: usize = index
                    .parse()
                    .map_err(|_| malformed(line_no, format!("bad pair index {index:?}")))?;
                if index != expected {
                    return Err(malformed(
                        line_no,
                        format!("pair index {index} out of sequence, expected {expected}"),
                    ));
                }
                (index, *grid, *dictionary)
            }
            other => {
                return Err(malformed(
                    line_no,
                    format!("expected 2 or 3 tokens, found {}", other.len()),
                ))
            }
        };
        records.push(ManifestRecord {
            index,
            pair: BenchPair {
                grid: PathBuf::from(grid),
                dictionary: PathBuf::from(dictionary),
            },
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use crate::planner::plan_sweeps;

    fn round_trip(format: ManifestFormat) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toTest.txt");
        let entries = plan_sweeps(&SweepConfig::smoke()).unwrap().manifest();

        write_manifest(&path, &entries, format).unwrap();
        let records = read_manifest(&path).unwrap();

        let written: Vec<_> = entries.iter().map(|e| (e.index, &e.pair)).collect();
        let read: Vec<_> = records.iter().map(|r| (r.index, &r.pair)).collect();
        assert_eq!(written, read);
    }

    #[test]
    fn plain_manifest_round_trips() {
        round_trip(ManifestFormat::Plain);
    }

    #[test]
    fn keyed_manifest_round_trips() {
        round_trip(ManifestFormat::Keyed);
    }

    #[test]
    fn plain_lines_have_two_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toTest.txt");
        let entries = plan_sweeps(&SweepConfig::smoke()).unwrap().manifest();
        write_manifest(&path, &entries, ManifestFormat::Plain).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "grids/grid_20_c1_b0.txt dics/dic_100_w6.txt");
        assert_eq!(text.lines().count(), entries.len());
    }

    #[test]
    fn rejects_out_of_sequence_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toTest.txt");
        fs::write(&path, "0 g0 d0\n2 g1 d1\n").unwrap();
        match read_manifest(&path) {
            Err(SweepError::Manifest { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected manifest error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_token_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toTest.txt");
        fs::write(&path, "only-one-token\n").unwrap();
        assert!(read_manifest(&path).is_err());
    }

    #[test]
    fn refuses_paths_with_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toTest.txt");
        let entries = vec![ManifestEntry {
            index: 0,
            dimension: crate::DimensionKind::GridSize,
            position: 0,
            pair: BenchPair {
                grid: PathBuf::from("my grids/g.txt"),
                dictionary: PathBuf::from("d.txt"),
            },
        }];
        assert!(matches!(
            write_manifest(&path, &entries, ManifestFormat::Plain),
            Err(SweepError::UnrepresentablePath(_))
        ));
    }
}
