//! Drawing the regime plot and the error-vs-degree chart
//!
//! [`render`] turns a dataset and a fitted regime into a chart: every point as a scatter,
//! the selected partitions highlighted, and the model's prediction as a line. The drawing
//! itself goes through a [`PlotBackend`]:
//! - [`backend::plotters::Backend`] writes PNG files (`plotting` feature).
//! - [`RecordingBackend`] keeps the series in memory, which is what the tests use.
//!
//! ```rust
//! # use biasvar::{dataset::{Dataset, DatasetConfig}, model::{fit_regime, BasisKind}, regime::Regime};
//! # use biasvar::plotting::{render, PlotConfig, RecordingBackend, Role, ViewState};
//! let data = Dataset::generate(&DatasetConfig::default()).unwrap();
//! let fit = fit_regime(&data, Regime::Overfitting, BasisKind::Chebyshev).unwrap();
//!
//! let mut backend = RecordingBackend::new();
//! render(&mut backend, &data, &fit, &ViewState::default(), &PlotConfig::default()).unwrap();
//!
//! let chart = backend.last().unwrap();
//! assert!(chart.axes.title.contains("Overfitting"));
//! assert!(chart.has(Role::Prediction));
//! ```
use std::{ops::Range, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    dataset::Dataset,
    model::{ErrorCurve, RegimeFit},
    value::CoordExt,
};

pub mod backend;
pub use backend::{
    Axes, PlotBackend, Recorded, RecordedChart, RecordingBackend, RecordingError, SeriesKind,
};

mod element;
pub use element::*;

/// Options for plotting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Where the regime plot is written
    pub output: PathBuf,

    /// Where the error-vs-degree chart is written
    pub sweep_output: PathBuf,

    /// Size of the output image in pixels
    pub size: (u32, u32),

    /// X-axis label
    pub x_label: String,

    /// Y-axis label
    pub y_label: String,

    /// Number of evenly spaced points the prediction line is drawn through.
    ///
    /// `None` draws it through the model's predictions at the dataset inputs only.
    pub curve_resolution: Option<usize>,

    /// Whether to show the legend
    pub show_legend: bool,

    /// Fraction of the data's y-span added above and below it
    pub y_padding: f64,
}
impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("biasvar.png"),
            sweep_output: PathBuf::from("biasvar-sweep.png"),
            size: (800, 600),
            x_label: "x".into(),
            y_label: "y".into(),
            curve_resolution: Some(200),
            show_legend: true,
            y_padding: 0.15,
        }
    }
}

/// Which partitions are highlighted on top of the full scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Highlight the training partition
    pub show_train: bool,

    /// Highlight the held-out partition
    pub show_test: bool,
}
impl Default for ViewState {
    fn default() -> Self {
        Self {
            show_train: true,
            show_test: true,
        }
    }
}

/// Builds the series of a regime plot, in drawing order
///
/// The [`Role::Prediction`] line always passes through the model's predictions, one per input.
/// When [`PlotConfig::curve_resolution`] is set, a dense [`Role::Curve`] line is drawn under it.
#[must_use]
pub fn regime_elements(
    data: &Dataset,
    fit: &RegimeFit,
    view: &ViewState,
    config: &PlotConfig,
) -> Vec<PlottingElement<f64>> {
    let mut elements = vec![PlottingElement::scatter(
        data.points().iter().copied(),
        format!("All data ({})", data.len()),
        Role::AllData,
    )];

    if view.show_train {
        elements.push(PlottingElement::scatter(
            data.train().iter().copied(),
            format!("Training set ({})", data.train().len()),
            Role::Train,
        ));
    }

    if view.show_test {
        elements.push(PlottingElement::scatter(
            data.test().iter().copied(),
            format!("Test set ({})", data.test().len()),
            Role::Test,
        ));
    }

    if let Some(n) = config.curve_resolution.filter(|&n| n >= 2) {
        elements.push(PlottingElement::line(
            fit.dense_curve(n),
            format!("Degree {} curve", fit.degree()),
            Role::Curve,
        ));
    }

    elements.push(PlottingElement::line(
        fit.predictions().iter().copied(),
        format!("Degree {} prediction", fit.degree()),
        Role::Prediction,
    ));

    elements
}

/// The chart title for a regime plot
#[must_use]
pub fn title(fit: &RegimeFit) -> String {
    format!(
        "{}: polynomial of degree {}",
        fit.regime().label(),
        fit.degree()
    )
}

/// Draws one regime plot: all points, the highlighted partitions, and the prediction
///
/// The y-axis covers the data and the predictions at the inputs; a dense curve that swings
/// further is clipped by the backend.
///
/// # Errors
/// Returns the backend's error if any part of the chart cannot be drawn.
pub fn render<B: PlotBackend>(
    backend: &mut B,
    data: &Dataset,
    fit: &RegimeFit,
    view: &ViewState,
    config: &PlotConfig,
) -> Result<(), B::Error> {
    let y_range = padded(
        data.points().iter().chain(fit.predictions()).map(|(_, y)| *y),
        config.y_padding,
    );
    let domain = data.domain();

    let axes = Axes {
        title: title(fit),
        x_label: config.x_label.clone(),
        y_label: config.y_label.clone(),
        x_range: *domain.start()..*domain.end(),
        y_range,
        show_legend: config.show_legend,
    };

    log::debug!(
        "drawing {} (train {}, test {})",
        fit.regime(),
        on_off(view.show_train),
        on_off(view.show_test)
    );

    backend.begin(&axes)?;
    for element in regime_elements(data, fit, view, config) {
        backend.add_element(&element)?;
    }
    backend.finish()
}

/// Draws the averaged train and test error against polynomial degree
///
/// Errors far above the smallest test error are clipped so the minimum stays readable.
///
/// # Errors
/// Returns the backend's error if any part of the chart cannot be drawn.
pub fn render_error_curve<B: PlotBackend>(
    backend: &mut B,
    curve: &ErrorCurve,
    config: &PlotConfig,
) -> Result<(), B::Error> {
    let train = curve.train_curve();
    let test = curve.test_curve();

    let floor = test.y_iter().fold(f64::INFINITY, f64::min);
    let ceiling = train
        .y_iter()
        .chain(test.y_iter())
        .filter(|mse| floor.is_finite() && *mse <= floor * 5.0)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_range = padded([0.0, ceiling].into_iter(), config.y_padding);

    let x_range = match train.x_range() {
        Some(range) if range.start() < range.end() => *range.start()..*range.end(),
        Some(range) => (*range.start() - 1.0)..(*range.end() + 1.0),
        None => 0.0..1.0,
    };

    let axes = Axes {
        title: format!(
            "Mean error by degree over {} datasets ({} basis)",
            curve.seeds(),
            curve.basis()
        ),
        x_label: "polynomial degree".into(),
        y_label: "mean squared error".into(),
        x_range,
        y_range,
        show_legend: config.show_legend,
    };

    backend.begin(&axes)?;
    backend.add_element(&PlottingElement::line(
        train,
        "Training MSE",
        Role::TrainError,
    ))?;
    backend.add_element(&PlottingElement::line(test, "Test MSE", Role::TestError))?;
    backend.finish()
}

/// Span of the values, widened by `padding` of its width on each side
fn padded(values: impl Iterator<Item = f64>, padding: f64) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0..1.0;
    }

    let pad = ((max - min) * padding).max(0.5);
    (min - pad)..(max + pad)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::DatasetConfig,
        model::{fit_regime, sweep, BasisKind},
        regime::Regime,
    };

    fn setup(regime: Regime) -> (Dataset, RegimeFit) {
        let data = Dataset::generate(&DatasetConfig::default()).unwrap();
        let fit = fit_regime(&data, regime, BasisKind::Chebyshev).unwrap();
        (data, fit)
    }

    fn draw(
        data: &Dataset,
        fit: &RegimeFit,
        view: ViewState,
        config: &PlotConfig,
    ) -> RecordedChart {
        let mut backend = RecordingBackend::new();
        render(&mut backend, data, fit, &view, config).unwrap();
        backend.last().unwrap().clone()
    }

    #[test]
    fn test_title_names_regime() {
        for regime in Regime::ALL {
            let (data, fit) = setup(regime);
            let chart = draw(&data, &fit, ViewState::default(), &PlotConfig::default());
            assert!(chart.axes.title.contains(regime.label()));
            assert!(chart.axes.title.contains(&regime.degree().to_string()));
        }
    }

    #[test]
    fn test_axes_and_legend() {
        let (data, fit) = setup(Regime::Balanced);
        let config = PlotConfig::default();
        let chart = draw(&data, &fit, ViewState::default(), &config);

        assert_eq!(chart.axes.x_label, "x");
        assert_eq!(chart.axes.y_label, "y");
        assert!(chart.axes.show_legend);
        assert_eq!(chart.axes.x_range, 0.0..10.0);
        for (_, y) in data.points() {
            assert!(chart.axes.y_range.contains(y));
        }
    }

    #[test]
    fn test_series_order_and_content() {
        let (data, fit) = setup(Regime::Balanced);
        let chart = draw(&data, &fit, ViewState::default(), &PlotConfig::default());

        let roles: Vec<Role> = chart.series.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::AllData,
                Role::Train,
                Role::Test,
                Role::Curve,
                Role::Prediction
            ]
        );

        let all = chart.series(Role::AllData).unwrap();
        assert_eq!(all.kind, SeriesKind::Scatter);
        assert_eq!(all.points, data.points());
        assert_eq!(chart.series(Role::Train).unwrap().points, data.train());
        assert_eq!(chart.series(Role::Test).unwrap().points, data.test());

        let dense = chart.series(Role::Curve).unwrap();
        assert_eq!(dense.kind, SeriesKind::Line);
        assert_eq!(dense.points.len(), 200);

        let line = chart.series(Role::Prediction).unwrap();
        assert_eq!(line.kind, SeriesKind::Line);
        assert_eq!(line.points, fit.predictions());
    }

    #[test]
    fn test_default_prediction_spans_every_input() {
        for regime in Regime::ALL {
            let (data, fit) = setup(regime);
            let chart = draw(&data, &fit, ViewState::default(), &PlotConfig::default());

            let line = chart.series(Role::Prediction).unwrap();
            assert_eq!(line.points.len(), data.len(), "{regime}");
            let xs: Vec<f64> = line.points.iter().map(|(x, _)| *x).collect();
            assert_eq!(xs, data.inputs());
        }
    }

    #[test]
    fn test_toggles_control_highlights() {
        let (data, fit) = setup(Regime::Underfitting);
        let config = PlotConfig::default();

        let cases = [(true, true), (true, false), (false, true), (false, false)];
        for (show_train, show_test) in cases {
            let view = ViewState {
                show_train,
                show_test,
            };
            let chart = draw(&data, &fit, view, &config);
            assert_eq!(chart.has(Role::Train), show_train);
            assert_eq!(chart.has(Role::Test), show_test);
            assert!(chart.has(Role::AllData));
            assert!(chart.has(Role::Prediction));
        }
    }

    #[test]
    fn test_sparse_curve_matches_predictions() {
        let (data, fit) = setup(Regime::Overfitting);
        let config = PlotConfig {
            curve_resolution: None,
            ..PlotConfig::default()
        };
        let chart = draw(&data, &fit, ViewState::default(), &config);

        assert!(!chart.has(Role::Curve));
        let line = chart.series(Role::Prediction).unwrap();
        assert_eq!(line.points.len(), data.len());
        assert_eq!(line.points, fit.predictions());
    }

    #[test]
    fn test_error_curve_chart() {
        let config = DatasetConfig::default();
        let curve = sweep(&config, 6, &[1, 2, 3], BasisKind::Chebyshev).unwrap();

        let mut backend = RecordingBackend::new();
        render_error_curve(&mut backend, &curve, &PlotConfig::default()).unwrap();
        let chart = backend.last().unwrap();

        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series(Role::TrainError).unwrap().points.len(), 6);
        assert_eq!(chart.series(Role::TestError).unwrap().points.len(), 6);
        assert_eq!(chart.axes.x_range, 1.0..6.0);
        assert!(chart.axes.y_range.start < 0.0);
    }

    #[test]
    fn test_padded() {
        let range = padded([1.0, 3.0, f64::NAN].into_iter(), 0.5);
        assert_eq!(range, 0.0..4.0);
        assert_eq!(padded(std::iter::empty(), 0.1), 0.0..1.0);
        assert_eq!(padded([2.0].into_iter(), 0.1), 1.5..2.5);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: PlotConfig =
            serde_json::from_str(r#"{ "size": [320, 240], "curve_resolution": null }"#).unwrap();
        assert_eq!(config.size, (320, 240));
        assert_eq!(config.curve_resolution, None);
        assert_eq!(config.x_label, "x");
    }
}
