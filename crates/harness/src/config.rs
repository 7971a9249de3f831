//! Harness configuration: sweep, external tools, chart output.

use anyhow::{Context, Result};
use gridbench_measure::ToolConfig;
use gridbench_sweep::SweepConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartFormat {
    #[default]
    Png,
    Svg,
    /// Skip rendering; reports are still written.
    Off,
}

impl ChartFormat {
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ChartFormat::Png => Some("png"),
            ChartFormat::Svg => Some("svg"),
            ChartFormat::Off => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub sweep: SweepConfig,
    pub tools: ToolConfig,
    pub charts: ChartFormat,
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
