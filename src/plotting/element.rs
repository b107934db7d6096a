use std::ops::Range;

use crate::value::{CoordExt, Value};

/// What a series shows, which decides how a backend colors it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Every generated point
    AllData,

    /// The training partition, drawn over [`Role::AllData`]
    Train,

    /// The held-out partition, drawn over [`Role::AllData`]
    Test,

    /// The model evaluated densely across the domain, drawn under [`Role::Prediction`]
    Curve,

    /// The model's predictions, one per input of the dataset
    Prediction,

    /// Mean training error per degree
    TrainError,

    /// Mean held-out error per degree
    TestError,
}

/// Elements that can be plotted
#[derive(Debug, Clone, PartialEq)]
pub enum PlottingElement<T: Value> {
    /// Individual points, drawn as markers
    Scatter(Vec<(T, T)>, String, Role),

    /// A connected line through the points, in order
    Line(Vec<(T, T)>, String, Role),
}
impl<T: Value> PlottingElement<T> {
    /// Creates a scatter element from a set of points
    pub fn scatter(
        data: impl IntoIterator<Item = (T, T)>,
        label: impl Into<String>,
        role: Role,
    ) -> Self {
        Self::Scatter(data.into_iter().collect(), label.into(), role)
    }

    /// Creates a line element from a set of points
    pub fn line(
        data: impl IntoIterator<Item = (T, T)>,
        label: impl Into<String>,
        role: Role,
    ) -> Self {
        Self::Line(data.into_iter().collect(), label.into(), role)
    }

    /// The points of this element
    #[must_use]
    pub fn data(&self) -> &[(T, T)] {
        match self {
            Self::Scatter(data, _, _) | Self::Line(data, _, _) => data,
        }
    }

    /// The legend label of this element
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Scatter(_, label, _) | Self::Line(_, label, _) => label,
        }
    }

    /// The role of this element
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Scatter(_, _, role) | Self::Line(_, _, role) => *role,
        }
    }

    /// Returns the x-axis range for this element, or `None` if it has no points
    #[must_use]
    pub fn x_range(&self) -> Option<Range<T>> {
        let range = self.data().x_range()?;
        Some(*range.start()..*range.end())
    }

    /// Returns the y-axis range for this element, or `None` if it has no points
    #[must_use]
    pub fn y_range(&self) -> Option<Range<T>> {
        self.data().y_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let element = PlottingElement::scatter(
            vec![(3.0, -1.0), (0.0, 2.0), (1.0, 5.0)],
            "pts",
            Role::AllData,
        );
        assert_eq!(element.x_range(), Some(0.0..3.0));
        assert_eq!(element.y_range(), Some(-1.0..5.0));
        assert_eq!(element.label(), "pts");
        assert_eq!(element.role(), Role::AllData);
    }

    #[test]
    fn test_empty_ranges() {
        let element = PlottingElement::<f64>::line(vec![], "nothing", Role::Prediction);
        assert_eq!(element.x_range(), None);
        assert_eq!(element.y_range(), None);
    }
}
