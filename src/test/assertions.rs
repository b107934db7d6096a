/// Asserts that two floating-point values are approximately equal.
///
/// # Syntax
///
/// `assert_close!(<a>, <b> [, tol = <tolerance>] [, msg = <custom message>])`
///
/// - `tol`: *(optional)* Largest allowed `|a - b|`. Defaults to `T::epsilon()`.
/// - `msg`: *(optional)* Custom message to include on failure, supports formatting arguments.
///
/// # Panics
/// Panics if the absolute difference `|a - b|` exceeds the tolerance.
///
/// # Examples
/// ```
/// # use biasvar::assert_close;
/// assert_close!(1.0 + 1e-16, 1.0);
/// assert_close!(0.1 + 0.2, 0.3, tol = 1e-12, msg = "sum of {}", "thirds");
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr $(, tol = $tol:expr)? $(, msg = $msg:literal $(, $($args:tt),*)?)?) => { #[allow(clippy::float_cmp)] {
        let (a, b) = ($a, $b);

        #[allow(unused_mut, unused_assignments)] let mut tol = $crate::test::default_tolerance(a);
        $( tol = $tol; )?

        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($msg $(, $($args),*)?); )?

        assert!(
            a == b || $crate::value::Value::abs(a - b) <= tol,
            "{msg}: {a} != {b} (tolerance {tol})"
        );
    }};
}

/// Asserts that two slices of floating-point values are approximately equal element-wise.
///
/// # Syntax
///
/// `assert_all_close!(<src>, <dst> [, tol = <tolerance>] [, msg = <custom message>])`
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements differ by more than the tolerance.
///
/// # Examples
/// ```
/// # use biasvar::assert_all_close;
/// let a = vec![1.0, 2.0, 3.0];
/// let b = vec![1.0 + 1e-16, 2.0, 3.0];
///
/// assert_all_close!(a, b);
/// assert_all_close!(a, b, tol = 1e-9, msg = "Vectors must match");
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr $(, tol = $tol:expr)? $(, msg = $msg:literal $(, $($args:tt),*)?)?) => {{
        let (src, dst) = (&$src, &$dst);

        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", src.len());
        $( msg = format!($msg $(, $($args),*)?); )?

        assert_eq!(src.len(), dst.len(), "{msg} - length mismatch");

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d $(, tol = $tol)?, msg = "{msg} - src[{i}]");
        }
    }};
}

/// Macro for asserting that a fitted curve meets a minimum R² threshold against its own data.
///
/// # Syntax
///
/// `assert_r_squared!(<CurveFit>, <threshold> [, msg = <custom message>])`
///
/// - `threshold`: Minimum acceptable R² value. Defaults to `0.9` if omitted.
///
/// # Example
/// ```rust
/// # use biasvar::{assert_r_squared, MonomialFit};
/// let data = vec![(0.0, 1.0), (1.0, 3.1), (2.0, 4.9), (3.0, 7.0)];
/// let fit = MonomialFit::new(&data, 1).unwrap();
/// assert_r_squared!(fit, 0.99);
/// ```
#[macro_export]
macro_rules! assert_r_squared {
    ($fit:expr $(, msg = $msg:literal $(, $($args:tt),*)?)?) => {
        $crate::assert_r_squared!($fit, 0.9 $(, msg = $msg $(, $($args),*)?)?)
    };

    ($fit:expr, $r2:expr $(, msg = $msg:literal $(, $($args:tt),*)?)?) => {
        #[allow(clippy::toplevel_ref_arg)]
        {
            let ref fit = $fit;
            let threshold = $r2;
            let r2 = fit.r_squared(fit.data());

            if r2 <= threshold {
                #[allow(unused_mut, unused_assignments)] let mut msg = format!("R² = {r2} is below {threshold}");
                $( msg = format!("{msg}: {}", format!($msg $(, $($args),*)?)); )?
                panic!("{msg}");
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::MonomialFit;

    #[test]
    fn test_assert_close_macro() {
        assert_close!(1.0 + 1e-16, 1.0, msg = "Values should be close");
        assert_close!(1.0_f32, 1.0005, tol = 1e-3);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_fails() {
        assert_close!(1.0, 1.1);
    }

    #[test]
    fn test_assert_all_close_macro() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0 + 1e-16, 2.0, 3.0];
        assert_all_close!(a, b, msg = "Vectors must match");
        assert_all_close!(a, [1.01, 2.0, 2.99], tol = 0.05);
        assert_all_close!(a, b, tol = 1e-9, msg = "{} of {}", "run", 3);
    }

    #[test]
    fn test_assert_close_format_args() {
        let label = "sum";
        assert_close!(0.1 + 0.2, 0.3, tol = 1e-12, msg = "{} of {}", label, "thirds");
    }

    #[test]
    #[should_panic(expected = "at index - src[1]")]
    fn test_assert_all_close_reports_index() {
        assert_all_close!([1.0, 2.0], [1.0, 2.5], msg = "at index");
    }

    #[test]
    fn test_assert_all_close_evaluates_once() {
        let mut calls = 0;
        let mut values = || {
            calls += 1;
            vec![1.0, 2.0]
        };
        assert_all_close!(values(), [1.0, 2.0]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_assert_r_squared_macro() {
        let data: Vec<(f64, f64)> = (0..20)
            .map(|i| {
                let x = f64::from(i);
                (x, 3.0 * x - 1.0 + if i % 2 == 0 { 0.1 } else { -0.1 })
            })
            .collect();
        let fit = MonomialFit::new(&data, 1).unwrap();
        assert_r_squared!(&fit, 0.99);
        assert_r_squared!(&fit, 0.99, msg = "line");
        assert_r_squared!(&fit);
    }
}
