//! Reading results files and cutting them into per-dimension segments.
//!
//! A results line is either `<value>` or `<index> <value>`. When the index
//! is present it must equal the line's position in the manifest; plain
//! lines are trusted positionally.

use crate::error::ReportError;
use gridbench_sweep::DimensionKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRecord {
    /// 1-based line in the source file.
    pub line: usize,
    pub index: Option<usize>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub dimension: DimensionKind,
    pub values: Vec<f64>,
}

/// Parse every non-blank line of a results file.
pub fn read_results(path: &Path) -> Result<Vec<ResultRecord>, ReportError> {
    let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;

    let mut records = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let malformed = || ReportError::Malformed {
            path: path.to_path_buf(),
            line: line_idx + 1,
            text: trimmed.to_string(),
        };
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let (index, value) = match tokens.as_slice() {
            [value] => (None, *value),
            [index, value] => (Some(index.parse::<usize>().map_err(|_| malformed())?), *value),
            _ => return Err(malformed()),
        };
        let value: f64 = value.parse().map_err(|_| malformed())?;
        if !value.is_finite() {
            return Err(malformed());
        }
        records.push(ResultRecord {
            line: line_idx + 1,
            index,
            value,
        });
    }
    Ok(records)
}

/// Cut `records` into segments of `lengths`, checking keys against
/// `first_index` onwards. Fewer or more records than the lengths sum to is
/// an error.
fn segment(
    path: &Path,
    records: &[ResultRecord],
    lengths: &[(DimensionKind, usize)],
    first_index: usize,
) -> Result<Vec<Segment>, ReportError> {
    let expected_total: usize = lengths.iter().map(|(_, len)| len).sum();

    for (offset, record) in records.iter().enumerate().take(expected_total) {
        let expected = first_index + offset;
        if let Some(found) = record.index {
            if found != expected {
                return Err(ReportError::KeyMismatch {
                    path: path.to_path_buf(),
                    line: record.line,
                    expected,
                    found,
                });
            }
        }
    }

    let mut segments = Vec::with_capacity(lengths.len());
    let mut cursor = 0;
    for &(dimension, len) in lengths {
        let end = cursor + len;
        if end > records.len() {
            return Err(ReportError::Truncated {
                path: path.to_path_buf(),
                dimension,
                expected: len,
                found: records.len().saturating_sub(cursor),
            });
        }
        segments.push(Segment {
            dimension,
            values: records[cursor..end].iter().map(|r| r.value).collect(),
        });
        cursor = end;
    }

    if records.len() > expected_total {
        return Err(ReportError::Surplus {
            path: path.to_path_buf(),
            expected: expected_total,
            found: records.len(),
        });
    }
    Ok(segments)
}

/// Re-segment one flat results file, consuming exactly `lengths[i].1`
/// values for dimension `i`, in order.
pub fn aggregate(
    path: &Path,
    lengths: &[(DimensionKind, usize)],
) -> Result<Vec<Segment>, ReportError> {
    let records = read_results(path)?;
    debug!(path = %path.display(), records = records.len(), "aggregating results");
    segment(path, &records, lengths, 0)
}

/// Aggregate one results file per dimension. Keys are global manifest
/// indices, so each file's first key is the sum of the lengths before it.
pub fn aggregate_per_dimension<F>(
    lengths: &[(DimensionKind, usize)],
    path_of: F,
) -> Result<Vec<Segment>, ReportError>
where
    F: Fn(DimensionKind) -> PathBuf,
{
    let mut segments = Vec::with_capacity(lengths.len());
    let mut first_index = 0;
    for &(dimension, len) in lengths {
        let path = path_of(dimension);
        let records = read_results(&path)?;
        segments.extend(segment(&path, &records, &[(dimension, len)], first_index)?);
        first_index += len;
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_lines(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
        let path = dir.join(name);
        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(&path, body).unwrap();
        path
    }

    fn plain(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}.5", i)).collect()
    }

    #[test]
    fn ten_lines_one_dimension_of_ten() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_lines(dir.path(), "results.txt", &plain(10));
        let segments = aggregate(&path, &[(DimensionKind::GridSize, 10)]).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].values.len(), 10);
        assert_eq!(segments[0].values[9], 9.5);
    }

    #[test]
    fn ten_lines_against_eleven_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_lines(dir.path(), "results.txt", &plain(10));
        let lengths = [
            (DimensionKind::DictionarySize, 6),
            (DimensionKind::BlankProbability, 5),
        ];
        match aggregate(&path, &lengths) {
            Err(ReportError::Truncated {
                dimension,
                expected,
                found,
                ..
            }) => {
                assert_eq!(dimension, DimensionKind::BlankProbability);
                assert_eq!(expected, 5);
                assert_eq!(found, 4);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn extra_lines_are_surplus() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_lines(dir.path(), "results.txt", &plain(4));
        assert!(matches!(
            aggregate(&path, &[(DimensionKind::WordLength, 3)]),
            Err(ReportError::Surplus {
                expected: 3,
                found: 4,
                ..
            })
        ));
    }

    #[test]
    fn segments_follow_declared_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_lines(dir.path(), "results.txt", &plain(5));
        let lengths = [(DimensionKind::DictionarySize, 2), (DimensionKind::GridSize, 3)];
        let segments = aggregate(&path, &lengths).unwrap();
        assert_eq!(segments[0].values, vec![0.5, 1.5]);
        assert_eq!(segments[1].dimension, DimensionKind::GridSize);
        assert_eq!(segments[1].values, vec![2.5, 3.5, 4.5]);
    }

    #[test]
    fn keyed_lines_must_match_position() {
        let dir = tempfile::tempdir().unwrap();
        let lines = vec!["0 1.0".to_string(), "2 2.0".to_string()];
        let path = write_lines(dir.path(), "results.txt", &lines);
        match aggregate(&path, &[(DimensionKind::GridSize, 2)]) {
            Err(ReportError::KeyMismatch {
                line,
                expected,
                found,
                ..
            }) => assert_eq!((line, expected, found), (2, 1, 2)),
            other => panic!("expected key mismatch, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_lines(dir.path(), "results.txt", &["1.0".into(), "oops".into()]);
        assert!(matches!(
            read_results(&path),
            Err(ReportError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn per_dimension_files_use_global_keys() {
        let dir = tempfile::tempdir().unwrap();
        write_lines(dir.path(), "a.txt", &["0 100".into(), "1 200".into()]);
        write_lines(dir.path(), "b.txt", &["2 300".into()]);
        let lengths = [(DimensionKind::DictionarySize, 2), (DimensionKind::GridSize, 1)];
        let root = dir.path().to_path_buf();
        let segments = aggregate_per_dimension(&lengths, |kind| match kind {
            DimensionKind::DictionarySize => root.join("a.txt"),
            _ => root.join("b.txt"),
        })
        .unwrap();
        assert_eq!(segments[0].values, vec![100.0, 200.0]);
        assert_eq!(segments[1].values, vec![300.0]);
    }
}
