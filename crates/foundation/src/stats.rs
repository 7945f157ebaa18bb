//! Deterministic statistical primitives
//!
//! Hand-rolled implementations so results are bit-reproducible across
//! platforms and builds. Vulnerability evaluation composes distributions
//! exactly rather than sampling, so these are the only numeric kernels
//! the engine needs.

use std::f64::consts::SQRT_2;

/// Tolerance for checking that discrete probabilities sum to one.
pub const PROB_TOLERANCE: f64 = 1e-9;

/// Error function, Abramowitz & Stegun formula 7.1.26.
///
/// Maximum absolute error 1.5e-7 over the real line. Odd symmetry is exact:
/// `erf(-x) == -erf(x)` bit-for-bit.
pub fn erf(x: f64) -> f64 {
    if x < 0.0 {
        return -erf(-x);
    }
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    1.0 - poly * (-x * x).exp()
}

/// Cumulative distribution function of a normal with the given mean and
/// standard deviation.
///
/// `std_dev` must be strictly positive; degenerate (zero-spread) cases are
/// handled by callers as point masses before reaching this function.
pub fn norm_cdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    0.5 * (1.0 + erf((x - mean) / (std_dev * SQRT_2)))
}
