//! Field calibration constants and small numerical helpers shared by the
//! analyses.

use num_traits::Float;

/// Low-field sweep-coil calibration [G / V].
///
/// Kept as the literal product the calibration was recorded as, not a
/// rounded value, so offsets reproduce exactly.
pub const GAUSS_PER_VOLT: f64 = 8.991e-3 * 11.0 / 0.1639;

/// High-field probe calibration [T / V].
pub const TESLA_PER_VOLT: f64 = 0.1;

/// Convert a sweep-voltage difference to a field difference [G].
pub fn volts_to_gauss(dv: f64) -> f64 { dv * GAUSS_PER_VOLT }

/// Convert a probe voltage to a field [T].
pub fn volts_to_tesla(v: f64) -> f64 { v * TESLA_PER_VOLT }

/// Piecewise-linear interpolation of `(xs, ys)` at `x`, with `xs` ascending;
/// outside the span of `xs` the end values are returned unchanged.
///
/// *Panics* if `xs` and `ys` differ in length or are empty.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    assert!(
        !xs.is_empty() && xs.len() == ys.len(),
        "interp: expected equal-length, non-empty inputs",
    );
    let n = xs.len();
    if x <= xs[0] { return ys[0]; }
    if x >= xs[n - 1] { return ys[n - 1]; }
    let hi = xs.partition_point(|&xk| xk <= x); // first index with xs[hi] > x
    let lo = hi - 1;
    let frac = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + frac * (ys[hi] - ys[lo])
}

/// Least-squares straight-line fit, returning `(slope, intercept)`.
///
/// `None` when fewer than two points are given, the lengths differ, or the
/// x values carry no spread to fit against.
pub fn linfit<T>(x: &[T], y: &[T]) -> Option<(T, T)>
where T: Float
{
    if x.len() != y.len() || x.len() < 2 { return None; }
    let n = T::from(x.len())?;
    let xbar = x.iter().fold(T::zero(), |acc, &xk| acc + xk) / n;
    let ybar = y.iter().fold(T::zero(), |acc, &yk| acc + yk) / n;
    let sxx = x.iter()
        .fold(T::zero(), |acc, &xk| acc + (xk - xbar) * (xk - xbar));
    let sxy = x.iter().zip(y)
        .fold(T::zero(), |acc, (&xk, &yk)| acc + (xk - xbar) * (yk - ybar));
    // all-equal x values leave only rounding residue in sxx
    if sxx <= T::epsilon() * n * xbar * xbar { return None; }
    let slope = sxy / sxx;
    Some((slope, ybar - slope * xbar))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn calibration_constant_value() {
        assert!((GAUSS_PER_VOLT - 0.6034228).abs() < 1e-6);
        assert!((volts_to_gauss(2.0) - 2.0 * GAUSS_PER_VOLT).abs() < 1e-15);
        assert!((volts_to_tesla(3.7) - 0.37).abs() < 1e-15);
    }

    #[test]
    fn interp_hits_knots_and_midpoints() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 2.0, -2.0];
        assert_eq!(interp(1.0, &xs, &ys), 2.0);
        assert_eq!(interp(0.5, &xs, &ys), 1.0);
        assert_eq!(interp(2.0, &xs, &ys), 0.0);
    }

    #[test]
    fn interp_clamps_outside_span() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 2.0, -2.0];
        assert_eq!(interp(-10.0, &xs, &ys), 0.0);
        assert_eq!(interp(10.0, &xs, &ys), -2.0);
    }

    #[test]
    fn linfit_recovers_an_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let (slope, intercept) = linfit(&xs, &ys).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linfit_rejects_degenerate_input() {
        assert!(linfit::<f64>(&[], &[]).is_none());
        assert!(linfit(&[1.0], &[2.0]).is_none());
        assert!(linfit(&[1.0, 2.0], &[0.0]).is_none());
        assert!(linfit(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn linfit_is_generic_over_floats() {
        let xs: [f32; 3] = [0.0, 1.0, 2.0];
        let ys: [f32; 3] = [1.0, 0.0, -1.0];
        let (slope, intercept) = linfit(&xs, &ys).unwrap();
        assert!((slope + 1.0).abs() < 1e-6);
        assert!((intercept - 1.0).abs() < 1e-6);
    }
}
