//! External collaborator configuration.

use crate::process::Invocation;
use gridbench_sweep::{BenchPair, DimensionKind, ManifestFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A program plus argument template.
///
/// `{grid}` and `{dictionary}` in an argument are replaced with the pair's
/// root-relative paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Programs given as relative paths (`./timer`) resolve against the
    /// session root, not the harness's own working directory.
    fn program_in(&self, current_dir: &Path) -> String {
        let program = Path::new(&self.program);
        if program.is_relative() && program.components().count() > 1 {
            current_dir.join(program).to_string_lossy().into_owned()
        } else {
            self.program.clone()
        }
    }

    pub fn invocation(&self, current_dir: &Path) -> Invocation {
        Invocation {
            program: self.program_in(current_dir),
            args: self.args.clone(),
            current_dir: current_dir.to_path_buf(),
        }
    }

    pub fn invocation_for(&self, current_dir: &Path, pair: &BenchPair) -> Invocation {
        let grid = pair.grid.to_string_lossy();
        let dictionary = pair.dictionary.to_string_lossy();
        Invocation {
            program: self.program_in(current_dir),
            args: self
                .args
                .iter()
                .map(|arg| {
                    arg.replace("{grid}", &grid)
                        .replace("{dictionary}", &dictionary)
                })
                .collect(),
            current_dir: current_dir.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Single-pair solver, profiled in memory mode.
    pub solver: CommandSpec,
    /// Batch driver that reads the manifest and writes timing results.
    pub driver: CommandSpec,
    /// Optional step that produces the driver and solver binaries.
    pub build: Option<CommandSpec>,
    /// Wrapper prepended to the solver invocation in memory mode.
    pub profiler: CommandSpec,
    /// Per-invocation limit; 0 disables it.
    pub timeout_secs: u64,
    /// Manifest location the driver reads, relative to the session root.
    pub manifest_file: PathBuf,
    pub manifest_format: ManifestFormat,
    /// Results location the driver writes, relative to the session root.
    pub results_file: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            solver: CommandSpec::new("./solver", &["{dictionary}", "{grid}"]),
            driver: CommandSpec::new("./timer", &[]),
            build: None,
            profiler: CommandSpec::new("valgrind", &["--tool=memcheck"]),
            timeout_secs: 600,
            manifest_file: PathBuf::from("plots/toTest.txt"),
            manifest_format: ManifestFormat::Plain,
            results_file: PathBuf::from("plots/results.txt"),
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// The solver for `pair`, wrapped by the profiler.
    pub fn profiled_invocation(&self, current_dir: &Path, pair: &BenchPair) -> Invocation {
        let solver = self.solver.invocation_for(current_dir, pair);
        let mut args = self.profiler.args.clone();
        // The profiler runs in `current_dir` too, so the solver path is
        // passed through as configured.
        args.push(self.solver.program.clone());
        args.extend(solver.args);
        Invocation {
            program: self.profiler.program_in(current_dir),
            args,
            current_dir: current_dir.to_path_buf(),
        }
    }
}

/// Root-relative memory-mode results file of one dimension.
pub fn memory_results_file(kind: DimensionKind) -> PathBuf {
    Path::new("plots").join(format!("memory_{}.txt", kind.slug()))
}
