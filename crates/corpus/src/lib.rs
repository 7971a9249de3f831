//! Randomized input corpora for the word-search benchmark.
//!
//! Dictionaries are sets of unique random words, grids are square matrices
//! of fixed-length random cells with an optional blank sentinel. Every
//! generator takes an explicit [`fastrand::Rng`] so a corpus can be
//! reproduced from its seed.

pub mod alphabet;
pub mod dictionary;
pub mod error;
pub mod grid;
pub mod layout;

pub use alphabet::Alphabet;
pub use dictionary::{generate_dictionary, random_dictionary, DictionarySpec};
pub use error::CorpusError;
pub use grid::{generate_grid, random_grid, Grid, GridSpec, BLANK_SENTINEL};
pub use layout::{ensure_dir, DirStatus, OutputLayout};
