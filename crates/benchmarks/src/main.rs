//! Benchmark harness executable for gridbench.

use anyhow::Result;
use clap::Parser;
use gridbench_harness::cli::{run_cli, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run_cli(cli)
}
