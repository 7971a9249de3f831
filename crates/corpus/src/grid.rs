//! Random letter-grid generation.

use crate::alphabet::Alphabet;
use crate::error::CorpusError;
use crate::layout::create_parent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Marker for a cell that holds no letters.
pub const BLANK_SENTINEL: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub size: usize,
    pub cell_word_length: usize,
    pub blank_enabled: bool,
    pub blank_probability: f64,
    pub alphabet: Alphabet,
}

impl GridSpec {
    pub fn new(size: usize, cell_word_length: usize) -> Self {
        Self {
            size,
            cell_word_length,
            blank_enabled: false,
            blank_probability: 0.0,
            alphabet: Alphabet::default(),
        }
    }

    pub fn with_blanks(mut self, probability: f64) -> Self {
        self.blank_enabled = true;
        self.blank_probability = probability;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.size == 0 {
            return Err(CorpusError::InvalidShape("grid size must be > 0".into()));
        }
        if self.cell_word_length == 0 {
            return Err(CorpusError::InvalidShape(
                "grid cell length must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.blank_probability) {
            return Err(CorpusError::InvalidShape(format!(
                "blank probability {} outside [0, 1]",
                self.blank_probability
            )));
        }
        Ok(())
    }
}

/// Square matrix of cell tokens, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<String>,
}

impl Grid {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.cells[row * self.size + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.size)
    }

    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(String::as_str)
    }

    pub fn blank_count(&self) -> usize {
        self.cells().filter(|cell| *cell == BLANK_SENTINEL).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

pub fn random_grid(spec: &GridSpec, rng: &mut fastrand::Rng) -> Result<Grid, CorpusError> {
    spec.validate()?;

    let total = spec.size * spec.size;
    let mut cells = Vec::with_capacity(total);
    for _ in 0..total {
        // f64() is in [0, 1), so probability 1.0 blanks every cell.
        if spec.blank_enabled && rng.f64() < spec.blank_probability {
            cells.push(BLANK_SENTINEL.to_string());
        } else {
            cells.push(spec.alphabet.random_word(rng, spec.cell_word_length));
        }
    }

    Ok(Grid {
        size: spec.size,
        cells,
    })
}

/// Generate a grid and write it as `size` rows of space-separated cells.
pub fn generate_grid(
    path: &Path,
    spec: &GridSpec,
    rng: &mut fastrand::Rng,
) -> Result<Grid, CorpusError> {
    let grid = random_grid(spec, rng)?;
    create_parent(path)?;

    let file = File::create(path).map_err(|e| CorpusError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write!(out, "{grid}").map_err(|e| CorpusError::io(path, e))?;
    out.flush().map_err(|e| CorpusError::io(path, e))?;

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn full_blank_probability_blanks_every_cell() {
        let spec = GridSpec::new(3, 2).with_blanks(1.0);
        let grid = random_grid(&spec, &mut fastrand::Rng::with_seed(1)).unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.blank_count(), 9);
        assert!(grid.cells().all(|c| c == BLANK_SENTINEL));
    }

    #[test]
    fn cells_have_exact_length_or_are_blank() {
        let spec = GridSpec::new(40, 3).with_blanks(0.25);
        let grid = random_grid(&spec, &mut fastrand::Rng::with_seed(2)).unwrap();
        for cell in grid.cells() {
            assert!(cell == BLANK_SENTINEL || cell.len() == 3, "bad cell {cell}");
        }
    }

    #[test]
    fn blanks_disabled_ignores_probability() {
        let mut spec = GridSpec::new(20, 1);
        spec.blank_probability = 1.0;
        let grid = random_grid(&spec, &mut fastrand::Rng::with_seed(3)).unwrap();
        assert_eq!(grid.blank_count(), 0);
    }

    #[test]
    fn blank_fraction_converges_to_probability() {
        let size = 200;
        let p = 0.3;
        let spec = GridSpec::new(size, 1).with_blanks(p);
        let grid = random_grid(&spec, &mut fastrand::Rng::with_seed(4)).unwrap();

        let n = (size * size) as f64;
        let expected = n * p;
        let sigma = (n * p * (1.0 - p)).sqrt();
        let observed = grid.blank_count() as f64;
        assert!(
            (observed - expected).abs() <= 3.0 * sigma,
            "observed {observed}, expected {expected} ± {}",
            3.0 * sigma
        );
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut rng = fastrand::Rng::with_seed(5);
        assert!(random_grid(&GridSpec::new(0, 1), &mut rng).is_err());
        assert!(random_grid(&GridSpec::new(4, 0), &mut rng).is_err());
        assert!(random_grid(&GridSpec::new(4, 1).with_blanks(1.5), &mut rng).is_err());
    }

    #[test]
    fn writes_space_separated_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        let spec = GridSpec::new(5, 2).with_alphabet(Alphabet::Uppercase);
        let grid = generate_grid(&path, &spec, &mut fastrand::Rng::with_seed(6)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 5);
        for (row_idx, row) in rows.iter().enumerate() {
            let tokens: Vec<&str> = row.split(' ').collect();
            assert_eq!(tokens.len(), 5);
            assert_eq!(tokens[0], grid.cell(row_idx, 0));
        }
    }
}
