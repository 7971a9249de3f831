//! Drives the external solver and memory profiler over a benchmark plan.
//!
//! Timing mode hands the whole manifest to an external driver that writes
//! one seconds value per pair. Memory mode runs the solver under a profiler
//! once per pair and scrapes the profiler's heap summary.

pub mod error;
pub mod heap;
pub mod orchestrator;
pub mod process;
pub mod tools;

pub use error::MeasureError;
pub use heap::{parse_heap_summary, HeapSummary};
pub use orchestrator::{MemoryResults, Orchestrator};
pub use process::{CommandRunner, Invocation, ProcessOutput, SystemRunner};
pub use tools::{memory_results_file, CommandSpec, ToolConfig};
