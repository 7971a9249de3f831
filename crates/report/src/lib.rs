//! Result aggregation and charting.
//!
//! Results come back as flat value lists in manifest order. They are cut
//! into one segment per dimension using the lengths recorded in the sweep
//! plan, then charted one image per dimension.

pub mod error;
pub mod plot;
pub mod results;
pub mod summary;

pub use error::ReportError;
pub use plot::{chart_points, plot, ChartStyle};
pub use results::{aggregate, aggregate_per_dimension, read_results, ResultRecord, Segment};
pub use summary::{DimensionSeries, Measurement, RunReport, SeriesDelta};
