//! CLI wiring for gridbench.

use crate::config::{ChartFormat, HarnessConfig};
use crate::session::BenchSession;
use anyhow::Result;
use clap::{Parser, Subcommand};
use gridbench_report::{Measurement, RunReport};
use gridbench_sweep::SweepConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "gridbench",
    about = "Parameter-sweep benchmarks for an external word-search solver"
)]
pub struct Cli {
    /// Session directory; corpora, manifest, results and charts live here.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// JSON configuration file (sweep, tools, charts).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use the tiny smoke-test sweep instead of the configured one.
    #[arg(long, default_value_t = false)]
    pub smoke: bool,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-invocation timeout in seconds (0 disables it).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum)]
    pub charts: Option<ChartArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ChartArg {
    Png,
    Svg,
    Off,
}

impl From<ChartArg> for ChartFormat {
    fn from(value: ChartArg) -> ChartFormat {
        match value {
            ChartArg::Png => ChartFormat::Png,
            ChartArg::Svg => ChartFormat::Svg,
            ChartArg::Off => ChartFormat::Off,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    Timing,
    Memory,
}

impl From<ModeArg> for Measurement {
    fn from(value: ModeArg) -> Measurement {
        match value {
            ModeArg::Timing => Measurement::Timing,
            ModeArg::Memory => Measurement::Memory,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration as JSON.
    Config,
    /// Generate corpora, the manifest and the sweep plan.
    Generate,
    /// Run the timing driver over the manifest, then chart the results.
    Time {
        #[arg(long)]
        baseline: Option<PathBuf>,
    },
    /// Profile every manifest pair's heap usage, then chart the results.
    Memory {
        #[arg(long)]
        baseline: Option<PathBuf>,
    },
    /// Chart results already on disk.
    Plot {
        #[arg(long, value_enum, default_value = "timing")]
        mode: ModeArg,
        #[arg(long)]
        baseline: Option<PathBuf>,
    },
    /// Generate, then run timing mode.
    All {
        #[arg(long)]
        baseline: Option<PathBuf>,
    },
}

fn effective_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if cli.smoke {
        config.sweep = SweepConfig {
            seed: config.sweep.seed,
            ..SweepConfig::smoke()
        };
    }
    if let Some(seed) = cli.seed {
        config.sweep.seed = seed;
    }
    if let Some(timeout) = cli.timeout_secs {
        config.tools.timeout_secs = timeout;
    }
    if let Some(charts) = cli.charts {
        config.charts = charts.into();
    }
    Ok(config)
}

pub fn run_cli(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = effective_config(&cli)?;
    let Cli { root, command, .. } = cli;

    let session = BenchSession::new(root, config)?;
    match command {
        Command::Config => {
            println!("{}", session.config().to_json()?);
        }
        Command::Generate => {
            let plan = session.generate()?;
            println!(
                "generated {} corpus files, {} pairs",
                plan.jobs.len(),
                plan.total_pairs()
            );
            for (kind, len) in plan.dimension_lengths() {
                println!("- {kind}: {len} pairs");
            }
        }
        Command::Time { baseline } => {
            let report = session.time()?;
            print_report(&report, baseline)?;
        }
        Command::Memory { baseline } => {
            let report = session.memory()?;
            print_report(&report, baseline)?;
        }
        Command::Plot { mode, baseline } => {
            let plan = session.load_plan()?;
            let report = session.report(mode.into(), &plan)?;
            print_report(&report, baseline)?;
        }
        Command::All { baseline } => {
            session.generate()?;
            let report = session.time()?;
            print_report(&report, baseline)?;
        }
    }
    Ok(())
}

fn print_report(report: &RunReport, baseline: Option<PathBuf>) -> Result<()> {
    println!(
        "measurement={}, dimensions={}, generated_at={}",
        report.measurement.slug(),
        report.series.len(),
        report.generated_at_unix_ms
    );
    for series in &report.series {
        let points: Vec<String> = series
            .x_values
            .iter()
            .zip(&series.values)
            .map(|(x, y)| format!("{x}:{y}"))
            .collect();
        println!("- {}: {}", series.dimension, points.join(" "));
    }

    if let Some(path) = baseline {
        if path.exists() {
            let baseline_report = RunReport::load(&path)?;
            for delta in report.diff(&baseline_report) {
                println!(
                    "Δ {} @ {}: {:+.6} ({} -> {})",
                    delta.dimension, delta.x, delta.delta, delta.baseline, delta.current
                );
            }
        } else {
            info!(path = %path.display(), "baseline report not found; skipping diff");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "gridbench",
            "--smoke",
            "--seed",
            "17",
            "--charts",
            "off",
            "--timeout-secs",
            "3",
            "generate",
        ]);
        let config = effective_config(&cli).unwrap();
        assert_eq!(config.sweep.seed, 17);
        assert_eq!(config.sweep.grid_sizes, SweepConfig::smoke().grid_sizes);
        assert_eq!(config.charts, ChartFormat::Off);
        assert_eq!(config.tools.timeout_secs, 3);
    }

    #[test]
    fn plot_defaults_to_timing() {
        let cli = Cli::parse_from(["gridbench", "plot"]);
        match cli.command {
            Command::Plot { mode, .. } => {
                assert_eq!(Measurement::from(mode), Measurement::Timing)
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
