//! Statistical helpers used to judge the regime fits.
//!
//! The bias-variance story is told with two numbers per model: the error on the
//! points it was trained on, and the error on the points it never saw.
//! - [`mean_squared_error`] and [`root_mean_squared_error`] measure that error.
//! - [`r_squared`] expresses how much of the data's variation the model explains.
//! - [`residual_variance`] is the unbiased noise estimate for a model with `k` parameters.
//!
//! [`DomainNormalizer`] maps x-values between ranges; orthogonal bases use it to work on `[-1, 1]`.
use crate::value::Value;

/// Computes the arithmetic mean of a sequence of values.
///
/// Returns NaN if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = biasvar::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut sum = T::zero();
    let mut count = T::zero();
    for value in data {
        sum += value;
        count += T::one();
    }
    sum / count
}

/// Computes the population standard deviation of a sequence of values, along with its mean.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// σ = sqrt( (Σ (x_i - Mean)²) / N )
/// ```
/// </div>
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let (s, m) = biasvar::statistics::stddev_and_mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// assert_eq!(s, 0.816496580927726); // sqrt(2/3)
/// ```
pub fn stddev_and_mean<T: Value>(data: impl Iterator<Item = T>) -> (T, T) {
    let data: Vec<_> = data.collect();
    let mean = mean(data.iter().copied());
    let mut sum_sq_diff = T::zero();
    let mut count = T::zero();
    for value in data {
        sum_sq_diff += Value::powi(value - mean, 2);
        count += T::one();
    }
    let dev = (sum_sq_diff / count).sqrt();

    (dev, mean)
}

/// Unbiased estimate of the noise variance left over by a model with `k` parameters.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// s² = Σ (y_i - y_fit_i)² / (N - k)
/// ```
/// Returns zero when `N == k`, i.e. the model interpolates the data exactly.
/// </div>
///
/// # Example
/// ```rust
/// # use biasvar::statistics::residual_variance;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![0.9, 2.1, 2.95];
/// let variance = residual_variance(y.into_iter(), y_fit.into_iter(), 2.0);
/// ```
pub fn residual_variance<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
    k: T,
) -> T {
    let mut ss_total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        ss_total += Value::powi(y - y_fit, 2);
        n += T::one();
    }

    if n == k {
        return T::zero();
    }
    ss_total / (n - k)
}

/// Calculate the R-squared value for a set of data.
///
/// R-squared tells you how well the model explains the data:
/// - `1` means the model explains all the variation.
/// - `0` means it does no better than predicting the mean.
/// - Negative values mean it does worse than the mean, which happens to overfit models on unseen data.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - (SS_res / SS_tot)
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
/// </div>
///
/// # Example
/// ```rust
/// # use biasvar::statistics::r_squared;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let r2 = r_squared(y.into_iter(), y_fit.into_iter());
/// ```
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let y: Vec<T> = y.collect();
    let y_mean = mean(y.iter().copied());

    let mut ss_total = T::zero();
    let mut ss_residual = T::zero();
    for (y, y_fit) in y.into_iter().zip(y_fit) {
        ss_total += Value::powi(y - y_mean, 2);
        ss_residual += Value::powi(y - y_fit, 2);
    }

    T::one() - (ss_residual / ss_total)
}

/// Computes the sum of squared errors between observed and predicted values.
///
/// ```math
/// SSE = Σ (y_i - y_fit_i)²
/// ```
pub fn sum_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    y.zip(y_fit)
        .fold(T::zero(), |acc, (y, y_fit)| acc + Value::powi(y - y_fit, 2))
}

/// Computes the mean squared error (MSE) between two sets of values.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MSE = (Σ (y_i - y_fit_i)²) / N
/// ```
/// </div>
///
/// Returns NaN for empty input.
///
/// # Example
/// ```
/// # use biasvar::statistics::mean_squared_error;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let mse = mean_squared_error(y.into_iter(), y_fit.into_iter());
/// ```
pub fn mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let mut total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        total += Value::powi(y - y_fit, 2);
        n += T::one();
    }
    total / n
}

/// Computes the root mean squared error (RMSE) between two sets of values.
///
/// Same units as `y`, which makes it easier to read against the noise level.
pub fn root_mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean_squared_error(y, y_fit).sqrt()
}

/// Maps values linearly from a source range onto a destination range.
///
/// Unlike a clamp, values outside the source range are extrapolated, so a basis
/// built on one range can still be evaluated a little beyond it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainNormalizer<T: Value> {
    src_range: (T, T),
    dst_range: (T, T),
}
impl<T: Value> DomainNormalizer<T> {
    /// Creates a new `DomainNormalizer` for the given source and destination ranges.
    pub fn new(src_range: (T, T), dst_range: (T, T)) -> Self {
        Self {
            src_range,
            dst_range,
        }
    }

    /// Creates a new `DomainNormalizer` from an inclusive source range.
    pub fn from_range(src_range: std::ops::RangeInclusive<T>, dst_range: (T, T)) -> Self {
        let (min, max) = src_range.into_inner();
        Self::new((min, max), dst_range)
    }

    /// Normalizes a value from the source range to the destination range.
    ///
    /// A zero-width source range maps everything onto the destination midpoint.
    pub fn normalize(&self, x: T) -> T {
        let (src_min, src_max) = self.src_range;
        let (dst_min, dst_max) = self.dst_range;

        let width = src_max - src_min;
        if width == T::zero() {
            return (dst_min + dst_max) / T::two();
        }

        dst_min + (x - src_min) * (dst_max - dst_min) / width
    }
}
impl<T: Value> std::fmt::Display for DomainNormalizer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (src_min, src_max) = self.src_range;
        let (dst_min, dst_max) = self.dst_range;
        write!(f, "T[ {src_min}..{src_max} -> {dst_min}..{dst_max} ]")
    }
}
