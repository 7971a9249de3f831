//! Sweep planning and the benchmark manifest.
//!
//! A [`SweepConfig`] names one default corpus configuration and five value
//! lists. [`plan_sweeps`] turns it into a [`SweepPlan`]: the corpus files to
//! generate and the ordered (grid, dictionary) pairs to benchmark. The plan
//! is the only source of dimension order and lengths; the manifest, the
//! orchestrator and the aggregator all read them from it.
//!
//! ```text
//! SweepConfig ──▶ plan_sweeps ──▶ SweepPlan ──┬──▶ corpus jobs
//!                                              ├──▶ manifest (write order)
//!                                              └──▶ dimension lengths (read order)
//! ```

pub mod config;
pub mod dimension;
pub mod error;
pub mod manifest;
pub mod planner;

pub use config::{CorpusParams, SweepConfig};
pub use dimension::DimensionKind;
pub use error::SweepError;
pub use manifest::{read_manifest, write_manifest, ManifestFormat, ManifestRecord};
pub use planner::{
    plan_sweeps, BenchPair, CorpusJob, DimensionPlan, ManifestEntry, SweepPlan,
};
