use std::ops::Range;

use crate::{
    plotting::{PlottingElement, Role},
    value::Value,
};

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plotters;

mod recording;
pub use recording::{Recorded, RecordedChart, RecordingBackend, RecordingError, SeriesKind};

/// Title, labels and ranges of a chart, known before any series is added
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    /// Caption for the chart
    pub title: String,

    /// X-axis label
    pub x_label: String,

    /// Y-axis label
    pub y_label: String,

    /// Visible x range
    pub x_range: Range<f64>,

    /// Visible y range; series are clipped to it
    pub y_range: Range<f64>,

    /// Whether to draw the legend
    pub show_legend: bool,
}

/// Trait for plot backends
///
/// A chart is drawn with one call to [`PlotBackend::begin`], any number of series,
/// then [`PlotBackend::finish`]. A backend may be reused for the next chart after `finish`.
pub trait PlotBackend {
    /// Error type for the plot backend
    type Error: std::error::Error;

    /// Start a new chart
    ///
    /// # Errors
    /// Returns an error if the chart cannot be created.
    fn begin(&mut self, axes: &Axes) -> Result<(), Self::Error>;

    /// Add a set of markers to the chart
    ///
    /// # Errors
    /// Returns an error if the chart cannot be modified.
    fn add_scatter<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), Self::Error>;

    /// Add a line to the chart
    ///
    /// # Errors
    /// Returns an error if the chart cannot be modified.
    fn add_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), Self::Error>;

    /// Finalize the chart
    ///
    /// # Errors
    /// Returns an error if the chart cannot be drawn or written.
    fn finish(&mut self) -> Result<(), Self::Error>;

    /// Add a plotting element to the chart
    ///
    /// # Errors
    /// Returns an error if the chart cannot be modified.
    fn add_element<T: Value>(&mut self, element: &PlottingElement<T>) -> Result<(), Self::Error> {
        match element {
            PlottingElement::Scatter(data, label, role) => self.add_scatter(data, label, *role),
            PlottingElement::Line(data, label, role) => self.add_line(data, label, *role),
        }
    }
}
