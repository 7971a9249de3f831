//! JSON run reports and baseline comparison.

use crate::error::ReportError;
use crate::results::Segment;
use gridbench_sweep::{DimensionKind, SweepPlan};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Timing,
    Memory,
}

impl Measurement {
    pub fn slug(&self) -> &'static str {
        match self {
            Measurement::Timing => "timing",
            Measurement::Memory => "memory",
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self {
            Measurement::Timing => "Time (sec)",
            Measurement::Memory => "Heap allocated (bytes)",
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            Measurement::Timing => "computation time",
            Measurement::Memory => "allocated memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSeries {
    pub dimension: DimensionKind,
    pub x_values: Vec<f64>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub measurement: Measurement,
    pub generated_at_unix_ms: u128,
    pub series: Vec<DimensionSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDelta {
    pub dimension: DimensionKind,
    pub x: f64,
    pub current: f64,
    pub baseline: f64,
    pub delta: f64,
}

impl RunReport {
    /// Pair each segment with its dimension's x values from the plan.
    pub fn from_segments(
        measurement: Measurement,
        plan: &SweepPlan,
        segments: Vec<Segment>,
    ) -> Result<Self, ReportError> {
        let series = segments
            .into_iter()
            .map(|segment| {
                let dimension = plan.dimension(segment.dimension).ok_or_else(|| {
                    ReportError::InvalidSeries {
                        dimension: segment.dimension,
                        reason: "dimension is not in the plan".into(),
                    }
                })?;
                if dimension.x_values.len() != segment.values.len() {
                    return Err(ReportError::InvalidSeries {
                        dimension: segment.dimension,
                        reason: format!(
                            "{} x values for {} measurements",
                            dimension.x_values.len(),
                            segment.values.len()
                        ),
                    });
                }
                Ok(DimensionSeries {
                    dimension: segment.dimension,
                    x_values: dimension.x_values.clone(),
                    values: segment.values,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let generated_at_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0))
            .as_millis();

        Ok(Self {
            measurement,
            generated_at_unix_ms,
            series,
        })
    }

    pub fn series(&self, dimension: DimensionKind) -> Option<&DimensionSeries> {
        self.series.iter().find(|s| s.dimension == dimension)
    }

    /// Per-point differences against `baseline` where both runs measured
    /// the same dimension at the same x value.
    pub fn diff(&self, baseline: &RunReport) -> Vec<SeriesDelta> {
        let mut deltas = Vec::new();
        for current in &self.series {
            let Some(previous) = baseline.series(current.dimension) else {
                continue;
            };
            for (&x, &value) in current.x_values.iter().zip(&current.values) {
                let matching = previous
                    .x_values
                    .iter()
                    .position(|&px| px == x)
                    .and_then(|i| previous.values.get(i));
                if let Some(&old) = matching {
                    deltas.push(SeriesDelta {
                        dimension: current.dimension,
                        x,
                        current: value,
                        baseline: old,
                        delta: value - old,
                    });
                }
            }
        }
        deltas
    }

    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ReportError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| ReportError::io(path, e))
    }

    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        serde_json::from_str(&json).map_err(|source| ReportError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
