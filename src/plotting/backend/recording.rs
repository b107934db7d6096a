//! A backend that draws nothing and remembers every call
//!
//! Useful for tests, and anywhere the frame content matters more than the pixels.
use crate::{
    plotting::{Axes, PlotBackend, Role},
    value::{CoordExt, Value},
};

/// Errors from [`RecordingBackend`]
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    /// A series was added outside of `begin`/`finish`
    #[error("No chart in progress; call begin first")]
    NotStarted,

    /// `begin` was called while a chart was in progress
    #[error("A chart is already in progress")]
    AlreadyStarted,

    /// A value could not be converted to `f64`
    #[error("Failed to cast value to f64")]
    Cast,
}

/// How a recorded series was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Markers
    Scatter,

    /// A connected line
    Line,
}

/// One series added to a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    /// Markers or line
    pub kind: SeriesKind,

    /// Legend label
    pub label: String,

    /// What the series shows
    pub role: Role,

    /// The points, as given
    pub points: Vec<(f64, f64)>,
}

/// A finished chart: its axes and series, in drawing order
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedChart {
    /// Title, labels and ranges
    pub axes: Axes,

    /// Every series, in the order it was added
    pub series: Vec<Recorded>,
}
impl RecordedChart {
    /// The first series with the given role
    #[must_use]
    pub fn series(&self, role: Role) -> Option<&Recorded> {
        self.series.iter().find(|s| s.role == role)
    }

    /// Whether any series has the given role
    #[must_use]
    pub fn has(&self, role: Role) -> bool {
        self.series(role).is_some()
    }
}

/// Backend that records charts instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingBackend {
    current: Option<RecordedChart>,
    charts: Vec<RecordedChart>,
}
impl RecordingBackend {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every finished chart, oldest first
    #[must_use]
    pub fn charts(&self) -> &[RecordedChart] {
        &self.charts
    }

    /// The most recently finished chart
    #[must_use]
    pub fn last(&self) -> Option<&RecordedChart> {
        self.charts.last()
    }

    fn push<T: Value>(
        &mut self,
        kind: SeriesKind,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), RecordingError> {
        let chart = self.current.as_mut().ok_or(RecordingError::NotStarted)?;
        let points = data.as_f64().map_err(|_| RecordingError::Cast)?;
        chart.series.push(Recorded {
            kind,
            label: label.to_string(),
            role,
            points,
        });
        Ok(())
    }
}
impl PlotBackend for RecordingBackend {
    type Error = RecordingError;

    fn begin(&mut self, axes: &Axes) -> Result<(), Self::Error> {
        if self.current.is_some() {
            return Err(RecordingError::AlreadyStarted);
        }

        self.current = Some(RecordedChart {
            axes: axes.clone(),
            series: Vec::new(),
        });
        Ok(())
    }

    fn add_scatter<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), Self::Error> {
        self.push(SeriesKind::Scatter, data, label, role)
    }

    fn add_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        role: Role,
    ) -> Result<(), Self::Error> {
        self.push(SeriesKind::Line, data, label, role)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        let chart = self.current.take().ok_or(RecordingError::NotStarted)?;
        self.charts.push(chart);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes() -> Axes {
        Axes {
            title: "t".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            x_range: 0.0..1.0,
            y_range: 0.0..1.0,
            show_legend: true,
        }
    }

    #[test]
    fn test_records_in_order() {
        let mut backend = RecordingBackend::new();
        backend.begin(&axes()).unwrap();
        backend
            .add_scatter(&[(0.0, 1.0)], "a", Role::AllData)
            .unwrap();
        backend
            .add_line(&[(0.0, 1.0), (1.0, 0.0)], "b", Role::Prediction)
            .unwrap();
        backend.finish().unwrap();

        let chart = backend.last().unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].kind, SeriesKind::Scatter);
        assert_eq!(chart.series(Role::Prediction).unwrap().points.len(), 2);
        assert!(!chart.has(Role::Test));
    }

    #[test]
    fn test_requires_begin() {
        let mut backend = RecordingBackend::new();
        assert!(matches!(
            backend.add_line(&[(0.0, 1.0)], "b", Role::Prediction),
            Err(RecordingError::NotStarted)
        ));
        assert!(matches!(backend.finish(), Err(RecordingError::NotStarted)));

        backend.begin(&axes()).unwrap();
        assert!(matches!(
            backend.begin(&axes()),
            Err(RecordingError::AlreadyStarted)
        ));
    }
}
