//! Plotting backend using the `plotters` crate
//!
//! Everything is coerced to `f64` for plotting purposes.
//!
//! Uses the bitmap backend to create PNG files. Series are collected as they are added,
//! and the whole chart is drawn in [`PlotBackend::finish`].
//!
//! Text is rendered with a TrueType font loaded at runtime: the file named by
//! `BIASVAR_FONT` if set, otherwise the first of a few common system fonts. Without one,
//! the chart is still drawn, but without a title, tick labels or legend.
use std::{
    ops::Range,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use plotters::prelude::*;

use crate::{
    plotting::{Axes, PlotBackend, Role},
    value::{CoordExt, Value},
};

/// Environment variable naming a `.ttf` file to use for chart text
pub const FONT_ENV: &str = "BIASVAR_FONT";

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const MAX_LBL_WIDTH: usize = 60;
const MARKER_SIZE: u32 = 4;

/// Register a sans-serif font with plotters, once per process
///
/// Returns `false` if no usable font was found.
pub fn register_font() -> bool {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    *REGISTERED.get_or_init(|| {
        let from_env = std::env::var(FONT_ENV).ok().map(PathBuf::from);
        let candidates = from_env
            .into_iter()
            .chain(FONT_CANDIDATES.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };

            // plotters keeps a reference for the life of the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if plotters::style::register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                log::debug!("Using font {}", path.display());
                return true;
            }
        }

        log::warn!("No usable font found (set {FONT_ENV}); plots are drawn without text");
        false
    })
}

/// Plotters backend writing one PNG file per chart
///
/// Each call to [`PlotBackend::finish`] overwrites the file.
#[derive(Debug, Clone)]
pub struct Backend {
    path: PathBuf,
    size: (u32, u32),

    axes: Option<Axes>,
    series: Vec<Series>,
}

#[derive(Debug, Clone)]
struct Series {
    line: bool,
    label: String,
    role: Role,
    points: Vec<(f64, f64)>,
}

impl Backend {
    /// Create a backend that draws to the PNG at `path`, with the given size in pixels
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            size,
            axes: None,
            series: Vec::new(),
        }
    }

    /// The file this backend writes
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn push<T: Value>(
        &mut self,
        line: bool,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), Error> {
        let Some(axes) = &self.axes else {
            return Err(Error::NotStarted);
        };

        let points = data.as_f64().map_err(|_| Error::Cast)?;
        let points = clip_y(points, &axes.y_range);

        self.series.push(Series {
            line,
            label: shorten(label),
            role,
            points,
        });
        Ok(())
    }

    fn draw(&self, axes: &Axes) -> Result<(), Error> {
        let with_text = register_font();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if with_text {
            builder
                .caption(&axes.title, (FontFamily::SansSerif, 20).into_font())
                .x_label_area_size(40)
                .y_label_area_size(60);
        }

        let mut chart = builder.build_cartesian_2d(axes.x_range.clone(), axes.y_range.clone())?;

        //
        // Mesh and axes
        let mut mesh = chart.configure_mesh();
        if with_text {
            mesh.label_style((FontFamily::SansSerif, 12))
                .x_desc(&axes.x_label)
                .y_desc(&axes.y_label)
                .x_label_formatter(&format_tick)
                .y_label_formatter(&format_tick);
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw()?;

        for series in &self.series {
            let color = role_color(series.role);
            if series.line {
                let width = if series.role == Role::Curve { 1 } else { 2 };
                let style = color.stroke_width(width);
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        series.points.clone(),
                        style,
                    )))?
                    .label(&series.label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            } else {
                // Highlights are drawn larger, so they ring the base scatter underneath
                let (size, style) = match series.role {
                    Role::Train | Role::Test => (MARKER_SIZE + 2, color.stroke_width(2)),
                    _ => (MARKER_SIZE, color.filled()),
                };
                chart
                    .draw_series(
                        series
                            .points
                            .iter()
                            .map(|&point| Circle::new(point, size, style)),
                    )?
                    .label(&series.label)
                    .legend(move |(x, y)| Circle::new((x + 10, y), size, style));
            }
        }

        if with_text && axes.show_legend {
            //
            // Legend
            chart
                .configure_series_labels()
                .label_font((FontFamily::SansSerif, 12))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperLeft)
                .draw()?;
        }

        root.present()?;
        log::info!("Wrote plot to {}", self.path.display());
        Ok(())
    }
}

impl PlotBackend for Backend {
    type Error = Error;

    fn begin(&mut self, axes: &Axes) -> Result<(), Self::Error> {
        if axes.x_range.start >= axes.x_range.end || axes.y_range.start >= axes.y_range.end {
            return Err(Error::EmptyRange);
        }

        self.axes = Some(axes.clone());
        self.series.clear();
        Ok(())
    }

    fn add_scatter<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), Self::Error> {
        self.push(false, data, label, role)
    }

    fn add_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), Self::Error> {
        self.push(true, data, label, role)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        let axes = self.axes.take().ok_or(Error::NotStarted)?;
        let result = self.draw(&axes);
        self.series.clear();
        result
    }
}

fn role_color(role: Role) -> RGBColor {
    match role {
        Role::AllData => RGBColor(150, 150, 150),
        Role::Train => BLUE,
        Role::Test => RGBColor(255, 140, 0), // Orange
        Role::Curve => RGBColor(240, 128, 128), // Light red
        Role::Prediction => RED,
        Role::TrainError => RGBColor(0, 128, 0),
        Role::TestError => RGBColor(128, 0, 128), // Purple
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn format_tick(v: &f64) -> String {
    if *v == 0.0 || (1e-3..1e3).contains(&v.abs()) {
        format!("{v:.2}")
    } else {
        format!("{v:.2e}")
    }
}

/// Shorten label and add [...] if too long
fn shorten(label: &str) -> String {
    if label.chars().count() > MAX_LBL_WIDTH {
        let mut s: String = label.chars().take(MAX_LBL_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

fn clip_y(points: Vec<(f64, f64)>, y_range: &Range<f64>) -> Vec<(f64, f64)> {
    points
        .into_iter()
        .map(|(x, y)| (x, y.clamp(y_range.start, y_range.end)))
        .collect()
}

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(#[from] DrawingAreaErrorKind<<BitMapBackend<'static> as DrawingBackend>::ErrorType>),

    /// Error creating the output directory
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A series was added before the chart was started
    #[error("No chart in progress; call begin first")]
    NotStarted,

    /// An axis range was empty or inverted
    #[error("Cannot draw a chart over an empty axis range")]
    EmptyRange,

    /// Error casting a value
    #[error("A value could not be represented as f64")]
    Cast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("short"), "short");
        let long = "x".repeat(100);
        let short = shorten(&long);
        assert_eq!(short.chars().count(), MAX_LBL_WIDTH);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_clip_y() {
        let clipped = clip_y(vec![(0.0, -50.0), (1.0, 0.5), (2.0, 50.0)], &(0.0..1.0));
        assert_eq!(clipped, vec![(0.0, 0.0), (1.0, 0.5), (2.0, 1.0)]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(&2.5), "2.50");
        assert_eq!(format_tick(&0.0), "0.00");
        assert_eq!(format_tick(&12345.0), "1.23e4");
    }

    #[test]
    fn test_requires_begin() {
        let mut backend = Backend::new("unused.png", (100, 100));
        assert!(matches!(
            backend.add_line(&[(0.0, 1.0)], "a", Role::Prediction),
            Err(Error::NotStarted)
        ));
        assert!(matches!(backend.finish(), Err(Error::NotStarted)));
    }
}
