//! Line charts of one measurement against one swept parameter.

use crate::error::ReportError;
use crate::summary::Measurement;
use gridbench_sweep::DimensionKind;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub caption_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 640,
            caption_size: 22,
        }
    }
}

/// Points to draw: `(x, y)` pairs, with a leading `(0, 0)` for axes
/// anchored at the origin.
pub fn chart_points(
    dimension: DimensionKind,
    x_values: &[f64],
    y_values: &[f64],
) -> Result<Vec<(f64, f64)>, ReportError> {
    if x_values.is_empty() {
        return Err(ReportError::InvalidSeries {
            dimension,
            reason: "no points".into(),
        });
    }
    if x_values.len() != y_values.len() {
        return Err(ReportError::InvalidSeries {
            dimension,
            reason: format!("{} x values for {} y values", x_values.len(), y_values.len()),
        });
    }

    let mut points = Vec::with_capacity(x_values.len() + 1);
    if dimension.anchored_at_origin() {
        points.push((0.0, 0.0));
    }
    points.extend(x_values.iter().copied().zip(y_values.iter().copied()));
    Ok(points)
}

pub fn chart_title(dimension: DimensionKind, measurement: Measurement) -> String {
    format!(
        "Evolution of {} with {}",
        measurement.noun(),
        dimension.axis_label().to_lowercase()
    )
}

fn padded_range(lo: f64, hi: f64) -> std::ops::Range<f64> {
    if hi > lo {
        lo..hi
    } else {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        (lo - pad)..(hi + pad)
    }
}

fn render<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    dimension: DimensionKind,
    measurement: Measurement,
    points: &[(f64, f64)],
    style: &ChartStyle,
) -> Result<(), String> {
    let (x_lo, x_hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
            (lo.min(x), hi.max(x))
        });
    let y_hi = points.iter().fold(0.0_f64, |hi, &(_, y)| hi.max(y));

    root.fill(&WHITE).map_err(|e| e.to_string())?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            chart_title(dimension, measurement),
            ("sans-serif", style.caption_size),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(padded_range(x_lo, x_hi), padded_range(0.0, y_hi * 1.05))
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_desc(dimension.axis_label())
        .y_desc(measurement.unit_label())
        .draw()
        .map_err(|e| e.to_string())?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(|e| e.to_string())?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 3, BLUE.filled())))
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())
}

/// Render one chart to `output`: SVG when the extension is `svg`, PNG
/// otherwise. Overwrites an existing file.
pub fn plot(
    dimension: DimensionKind,
    measurement: Measurement,
    x_values: &[f64],
    y_values: &[f64],
    output: &Path,
    style: &ChartStyle,
) -> Result<(), ReportError> {
    let points = chart_points(dimension, x_values, y_values)?;
    let size = (style.width, style.height);

    let is_svg = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    let rendered = if is_svg {
        render(
            SVGBackend::new(output, size).into_drawing_area(),
            dimension,
            measurement,
            &points,
            style,
        )
    } else {
        render(
            BitMapBackend::new(output, size).into_drawing_area(),
            dimension,
            measurement,
            &points,
            style,
        )
    };
    rendered.map_err(|reason| ReportError::Chart {
        path: output.to_path_buf(),
        reason,
    })?;

    info!(dimension = %dimension, path = %output.display(), points = points.len(), "chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_axes_gain_an_origin_point() {
        let points = chart_points(DimensionKind::DictionarySize, &[10.0, 20.0], &[1.0, 2.0]).unwrap();
        assert_eq!(points, vec![(0.0, 0.0), (10.0, 1.0), (20.0, 2.0)]);
    }

    #[test]
    fn other_axes_are_drawn_as_measured() {
        let points = chart_points(DimensionKind::BlankProbability, &[0.0, 0.5], &[3.0, 1.0]).unwrap();
        assert_eq!(points, vec![(0.0, 3.0), (0.5, 1.0)]);
    }

    #[test]
    fn mismatched_series_are_rejected() {
        assert!(chart_points(DimensionKind::GridSize, &[1.0, 2.0], &[1.0]).is_err());
        assert!(chart_points(DimensionKind::GridSize, &[], &[]).is_err());
    }

    #[test]
    fn titles_name_measurement_and_axis() {
        assert_eq!(
            chart_title(DimensionKind::GridWordLength, Measurement::Timing),
            "Evolution of computation time with grid word length"
        );
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        let r = padded_range(5.0, 5.0);
        assert!(r.start < 5.0 && r.end > 5.0);
        let r = padded_range(0.0, 0.0);
        assert_eq!(r, -1.0..1.0);
    }

    #[test]
    fn renders_svg_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid_size.svg");
        plot(
            DimensionKind::GridSize,
            Measurement::Timing,
            &[100.0, 200.0, 300.0],
            &[0.1, 0.4, 0.9],
            &path,
            &ChartStyle::default(),
        )
        .unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn renders_png_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary_size.png");
        plot(
            DimensionKind::DictionarySize,
            Measurement::Memory,
            &[100.0, 200.0],
            &[4096.0, 8192.0],
            &path,
            &ChartStyle::default(),
        )
        .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}
