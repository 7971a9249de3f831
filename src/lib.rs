//! gridbench: parameter-sweep benchmarks for an external word-search solver.
//!
//! Re-exports the workspace crates under one roof.

pub use gridbench_corpus as corpus;
pub use gridbench_harness as harness;
pub use gridbench_measure as measure;
pub use gridbench_report as report;
pub use gridbench_sweep as sweep;
