//! Measurement orchestration over a sweep plan.

use crate::error::MeasureError;
use crate::heap::{parse_heap_summary, HeapSummary};
use crate::process::CommandRunner;
use crate::tools::{memory_results_file, ToolConfig};
use gridbench_sweep::{DimensionKind, ManifestEntry, SweepPlan};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Memory-mode output of one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryResults {
    pub dimension: DimensionKind,
    /// Root-relative results file, one `<index> <bytes>` line per pair.
    pub path: PathBuf,
    pub bytes: Vec<u64>,
}

pub struct Orchestrator<R: CommandRunner> {
    runner: R,
    tools: ToolConfig,
    root: PathBuf,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(runner: R, tools: ToolConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            tools,
            root: root.into(),
        }
    }

    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }

    /// Run the configured build step, if any.
    pub fn build(&self) -> Result<(), MeasureError> {
        let Some(build) = &self.tools.build else {
            return Ok(());
        };
        let invocation = build.invocation(&self.root);
        info!(command = %invocation, "building solver");
        self.runner.run(&invocation)?.check()?;
        Ok(())
    }

    /// Timing mode: hand the manifest to the external driver.
    ///
    /// Succeeds only if the driver exits cleanly and leaves at least one
    /// value per manifest pair in the results file. A short file is
    /// reported against the first pair that has no value. Returns the
    /// absolute results path.
    pub fn run_timing(&self, plan: &SweepPlan) -> Result<PathBuf, MeasureError> {
        let manifest = plan.manifest();
        let expected_pairs = manifest.len();
        let results = self.root.join(&self.tools.results_file);
        if results.exists() {
            fs::remove_file(&results).map_err(|e| MeasureError::io(&results, e))?;
        }

        let invocation = self.tools.driver.invocation(&self.root);
        info!(command = %invocation, pairs = expected_pairs, "running timing driver");
        let output = self.runner.run(&invocation)?.check()?;
        info!(elapsed_s = output.elapsed.as_secs_f64(), "timing driver finished");

        let found = count_values(&results)?;
        if let Some(missing) = manifest.get(found) {
            return Err(MeasureError::ShortResults {
                path: results,
                expected: expected_pairs,
                found,
                dimension: missing.dimension,
                index: missing.index,
                position: missing.position,
            });
        }
        Ok(results)
    }

    /// Profile one manifest pair.
    pub fn profile_pair(&self, entry: &ManifestEntry) -> Result<HeapSummary, MeasureError> {
        let invocation = self.tools.profiled_invocation(&self.root, &entry.pair);
        let attempt = || -> Result<HeapSummary, MeasureError> {
            let output = self.runner.run(&invocation)?.check()?;
            parse_heap_summary(&output.combined())
        };
        attempt().map_err(|source| MeasureError::Pair {
            dimension: entry.dimension,
            index: entry.index,
            position: entry.position,
            source: Box::new(source),
        })
    }

    /// Memory mode: profile every pair in manifest order, writing one
    /// results file per dimension. Stops at the first failing pair.
    pub fn run_memory(&self, plan: &SweepPlan) -> Result<Vec<MemoryResults>, MeasureError> {
        let manifest = plan.manifest();
        let mut all = Vec::with_capacity(plan.dimensions.len());

        for (kind, len) in plan.dimension_lengths() {
            let relative = memory_results_file(kind);
            let path = self.root.join(&relative);
            let file = File::create(&path).map_err(|e| MeasureError::io(&path, e))?;
            let mut out = BufWriter::new(file);
            let mut bytes = Vec::with_capacity(len);

            for entry in manifest.iter().filter(|e| e.dimension == kind) {
                let summary = self.profile_pair(entry)?;
                info!(
                    dimension = %kind,
                    index = entry.index,
                    bytes = summary.bytes_allocated,
                    allocs = summary.allocs,
                    "profiled pair"
                );
                writeln!(out, "{} {}", entry.index, summary.bytes_allocated)
                    .map_err(|e| MeasureError::io(&path, e))?;
                bytes.push(summary.bytes_allocated);
            }
            out.flush().map_err(|e| MeasureError::io(&path, e))?;

            all.push(MemoryResults {
                dimension: kind,
                path: relative,
                bytes,
            });
        }
        Ok(all)
    }
}

fn count_values(path: &Path) -> Result<usize, MeasureError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().filter(|l| !l.trim().is_empty()).count()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(MeasureError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{Invocation, ProcessOutput};
    use gridbench_sweep::{plan_sweeps, SweepConfig};
    use std::cell::RefCell;
    use std::time::Duration;

    /// Reports a byte count derived from the dictionary path length, and
    /// can be told to crash on a given call.
    struct FakeProfiler {
        calls: RefCell<Vec<Invocation>>,
        crash_on: Option<usize>,
    }

    impl FakeProfiler {
        fn new(crash_on: Option<usize>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                crash_on,
            }
        }
    }

    impl CommandRunner for FakeProfiler {
        fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, MeasureError> {
            let call = self.calls.borrow().len();
            self.calls.borrow_mut().push(invocation.clone());
            let stderr = if self.crash_on == Some(call) {
                "==9== Process terminating with default action of signal 11\n".to_string()
            } else {
                format!(
                    "==9== total heap usage: 10 allocs, 10 frees, 1,{:03} bytes allocated\n",
                    call
                )
            };
            Ok(ProcessOutput {
                command: invocation.to_string(),
                code: Some(0),
                stdout: String::new(),
                stderr,
                elapsed: Duration::ZERO,
            })
        }
    }

    #[test]
    fn memory_mode_writes_keyed_lines_per_dimension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("plots")).unwrap();
        let plan = plan_sweeps(&SweepConfig::smoke()).unwrap();
        let orchestrator = Orchestrator::new(FakeProfiler::new(None), ToolConfig::default(), dir.path());

        let results = orchestrator.run_memory(&plan).unwrap();
        assert_eq!(results.len(), 5);
        for (result, (kind, len)) in results.iter().zip(plan.dimension_lengths()) {
            assert_eq!(result.dimension, kind);
            assert_eq!(result.bytes.len(), len);
        }

        // Calls happen in manifest order, so call i reports 1000 + i bytes.
        let blank = &results[4];
        let text = fs::read_to_string(dir.path().join(&blank.path)).unwrap();
        assert_eq!(text, "9 1009\n10 1010\n11 1011\n");
        assert_eq!(orchestrator.runner.calls.borrow().len(), plan.total_pairs());
    }

    #[test]
    fn unparseable_report_names_dimension_and_pair() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("plots")).unwrap();
        let plan = plan_sweeps(&SweepConfig::smoke()).unwrap();
        let orchestrator = Orchestrator::new(FakeProfiler::new(Some(4)), ToolConfig::default(), dir.path());

        match orchestrator.run_memory(&plan) {
            Err(MeasureError::Pair {
                dimension,
                index,
                position,
                source,
            }) => {
                assert_eq!(dimension, DimensionKind::GridSize);
                assert_eq!(index, 4);
                assert_eq!(position, 1);
                assert!(matches!(*source, MeasureError::UnrecognizedReport { .. }));
            }
            other => panic!("expected pair failure, got {other:?}"),
        }
        // Nothing past the failing pair was attempted.
        assert_eq!(orchestrator.runner.calls.borrow().len(), 5);
    }

    struct FakeDriver {
        lines: usize,
        code: i32,
    }

    impl CommandRunner for FakeDriver {
        fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, MeasureError> {
            let results = invocation.current_dir.join("plots/results.txt");
            let body: String = (0..self.lines).map(|i| format!("0.{i:06}\n")).collect();
            fs::write(&results, body).map_err(|e| MeasureError::io(&results, e))?;
            Ok(ProcessOutput {
                command: invocation.to_string(),
                code: Some(self.code),
                stdout: String::new(),
                stderr: "driver stderr".into(),
                elapsed: Duration::ZERO,
            })
        }
    }

    #[test]
    fn timing_mode_accepts_complete_results() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("plots")).unwrap();
        let plan = plan_sweeps(&SweepConfig::smoke()).unwrap();
        let orchestrator = Orchestrator::new(FakeDriver { lines: 12, code: 0 }, ToolConfig::default(), dir.path());
        let path = orchestrator.run_timing(&plan).unwrap();
        assert!(path.ends_with("plots/results.txt"));
    }

    #[test]
    fn timing_mode_rejects_short_results() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("plots")).unwrap();
        let plan = plan_sweeps(&SweepConfig::smoke()).unwrap();
        let orchestrator = Orchestrator::new(FakeDriver { lines: 7, code: 0 }, ToolConfig::default(), dir.path());
        // Values 0..7 cover dictionary size, grid size and word length; the
        // first missing one is grid word length's first pair.
        match orchestrator.run_timing(&plan) {
            Err(MeasureError::ShortResults {
                expected,
                found,
                dimension,
                index,
                position,
                ..
            }) => {
                assert_eq!((expected, found), (12, 7));
                assert_eq!(dimension, DimensionKind::GridWordLength);
                assert_eq!((index, position), (7, 0));
            }
            other => panic!("expected short results, got {other:?}"),
        }
    }

    #[test]
    fn timing_mode_rejects_failed_driver() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("plots")).unwrap();
        let plan = plan_sweeps(&SweepConfig::smoke()).unwrap();
        let orchestrator = Orchestrator::new(FakeDriver { lines: 12, code: 2 }, ToolConfig::default(), dir.path());
        assert!(matches!(
            orchestrator.run_timing(&plan),
            Err(MeasureError::Failed { code: Some(2), .. })
        ));
    }
}
