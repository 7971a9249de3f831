//! Benchmark session: one root directory, one configuration, one plan.
//!
//! Steps run strictly one after another. Each run overwrites the corpora,
//! manifest, results and charts left by the previous one.

use crate::config::HarnessConfig;
use anyhow::{bail, Context, Result};
use gridbench_corpus::{generate_dictionary, generate_grid, DirStatus, OutputLayout};
use gridbench_measure::{memory_results_file, CommandRunner, Orchestrator, SystemRunner};
use gridbench_report::{aggregate, aggregate_per_dimension, plot, ChartStyle, Measurement, RunReport};
use gridbench_sweep::{plan_sweeps, write_manifest, CorpusJob, SweepPlan};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const PLAN_FILE: &str = "plots/plan.json";

pub struct BenchSession {
    layout: OutputLayout,
    config: HarnessConfig,
}

impl BenchSession {
    pub fn new(root: impl Into<PathBuf>, config: HarnessConfig) -> Result<Self> {
        config.sweep.validate()?;
        Ok(Self {
            layout: OutputLayout::new(root),
            config,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn plan_path(&self) -> PathBuf {
        self.layout.resolve(PLAN_FILE)
    }

    pub fn report_path(&self, measurement: Measurement) -> PathBuf {
        self.layout
            .plots()
            .join(format!("{}_report.json", measurement.slug()))
    }

    /// Create directories, generate every planned corpus file, then write
    /// the manifest and the plan.
    pub fn generate(&self) -> Result<SweepPlan> {
        for (dir, status) in self.layout.bootstrap()? {
            match status {
                DirStatus::Created => info!(dir = %dir.display(), "created directory"),
                DirStatus::AlreadyExists => debug!(dir = %dir.display(), "directory exists"),
            }
        }

        let plan = plan_sweeps(&self.config.sweep)?;
        info!(
            files = plan.jobs.len(),
            pairs = plan.total_pairs(),
            seed = plan.seed,
            "sweep planned"
        );

        {
            let mut done: HashSet<&Path> = HashSet::new();
            for dimension in &plan.dimensions {
                info!(dimension = %dimension.kind, values = dimension.x_values.len(), "generating corpora");
                for job in &dimension.jobs {
                    if !done.insert(job.path()) {
                        continue;
                    }
                    self.generate_job(job, plan.seed).with_context(|| {
                        format!(
                            "generating {} for dimension {}",
                            job.path().display(),
                            dimension.kind
                        )
                    })?;
                }
            }
        }

        let manifest_path = self.layout.resolve(&self.config.tools.manifest_file);
        write_manifest(
            &manifest_path,
            &plan.manifest(),
            self.config.tools.manifest_format,
        )?;
        plan.save(&self.plan_path())?;
        info!(manifest = %manifest_path.display(), pairs = plan.total_pairs(), "manifest written");

        Ok(plan)
    }

    fn generate_job(&self, job: &CorpusJob, base_seed: u64) -> Result<()> {
        let mut rng = fastrand::Rng::with_seed(job.seed(base_seed));
        let path = self.layout.resolve(job.path());
        match job {
            CorpusJob::Dictionary { spec, .. } => {
                let words = generate_dictionary(&path, spec, &mut rng)?;
                debug!(path = %path.display(), words, "dictionary written");
            }
            CorpusJob::Grid { spec, .. } => {
                let grid = generate_grid(&path, spec, &mut rng)?;
                debug!(path = %path.display(), size = grid.size(), blanks = grid.blank_count(), "grid written");
            }
        }
        Ok(())
    }

    /// The plan written by the last [`generate`](Self::generate).
    pub fn load_plan(&self) -> Result<SweepPlan> {
        let path = self.plan_path();
        if !path.exists() {
            bail!(
                "no sweep plan at {}; run `gridbench generate` first",
                path.display()
            );
        }
        Ok(SweepPlan::load(&path)?)
    }

    pub fn orchestrator<R: CommandRunner>(&self, runner: R) -> Orchestrator<R> {
        Orchestrator::new(runner, self.config.tools.clone(), self.root())
    }

    fn system_runner(&self) -> SystemRunner {
        SystemRunner::new(self.config.tools.timeout())
    }

    pub fn time(&self) -> Result<RunReport> {
        self.time_with(self.system_runner())
    }

    /// Timing mode: build, run the driver over the manifest, then report.
    pub fn time_with<R: CommandRunner>(&self, runner: R) -> Result<RunReport> {
        let plan = self.load_plan()?;
        let orchestrator = self.orchestrator(runner);
        orchestrator.build().context("build step failed")?;
        orchestrator
            .run_timing(&plan)
            .context("timing driver failed")?;
        self.report(Measurement::Timing, &plan)
    }

    pub fn memory(&self) -> Result<RunReport> {
        self.memory_with(self.system_runner())
    }

    /// Memory mode: profile every pair, then report.
    pub fn memory_with<R: CommandRunner>(&self, runner: R) -> Result<RunReport> {
        let plan = self.load_plan()?;
        let orchestrator = self.orchestrator(runner);
        orchestrator.build().context("build step failed")?;
        orchestrator
            .run_memory(&plan)
            .context("memory profiling failed")?;
        self.report(Measurement::Memory, &plan)
    }

    /// Aggregate existing results for `measurement`, chart them and write
    /// the JSON report.
    pub fn report(&self, measurement: Measurement, plan: &SweepPlan) -> Result<RunReport> {
        let lengths = plan.dimension_lengths();
        let segments = match measurement {
            Measurement::Timing => {
                let path = self.layout.resolve(&self.config.tools.results_file);
                aggregate(&path, &lengths)?
            }
            Measurement::Memory => {
                aggregate_per_dimension(&lengths, |kind| {
                    self.layout.resolve(memory_results_file(kind))
                })?
            }
        };

        let report = RunReport::from_segments(measurement, plan, segments)?;
        self.render_charts(&report)?;
        report.save(&self.report_path(measurement))?;
        Ok(report)
    }

    fn render_charts(&self, report: &RunReport) -> Result<()> {
        let Some(extension) = self.config.charts.extension() else {
            debug!("chart rendering disabled");
            return Ok(());
        };
        let style = ChartStyle::default();
        for series in &report.series {
            let output = self.layout.plots().join(format!(
                "{}_{}.{extension}",
                report.measurement.slug(),
                series.dimension.slug()
            ));
            plot(
                series.dimension,
                report.measurement,
                &series.x_values,
                &series.values,
                &output,
                &style,
            )
            .with_context(|| format!("charting dimension {}", series.dimension))?;
        }
        Ok(())
    }
}
