//! Vulnerability response curves
//!
//! A response relation maps hazard intensity to impact. The deterministic
//! form is a piecewise-linear curve; the uncertain form is a curve family
//! where impact at each intensity is normally distributed around a mean
//! curve, discretized over fixed impact bins so downstream composition
//! stays exact and reproducible (no sampling anywhere).

use windward_foundation::norm_cdf;

use crate::error::{Error, Result};

/// Conditional impact at one hazard intensity: (impact value, conditional
/// probability) pairs. Values need not be ordered; composition sorts.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalImpact {
    values: Vec<f64>,
    probabilities: Vec<f64>,
}

impl ConditionalImpact {
    /// A single certain impact value.
    pub fn point(value: f64) -> Self {
        Self {
            values: vec![value],
            probabilities: vec![1.0],
        }
    }

    /// Creates a conditional from pairs, validating finiteness and
    /// non-negative probabilities. The probabilities may sum to slightly
    /// less than 1 when a discretization truncates distribution tails;
    /// composition renormalizes.
    pub fn new(values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self> {
        if values.is_empty() || values.len() != probabilities.len() {
            return Err(Error::invalid_distribution(format!(
                "conditional impact has {} values but {} probabilities",
                values.len(),
                probabilities.len()
            )));
        }
        for v in &values {
            if !v.is_finite() {
                return Err(Error::invalid_distribution(format!(
                    "conditional impact value {v} is not finite"
                )));
            }
        }
        for p in &probabilities {
            if !p.is_finite() || *p < 0.0 {
                return Err(Error::invalid_distribution(format!(
                    "conditional probability {p} is negative or not finite"
                )));
            }
        }
        Ok(Self {
            values,
            probabilities,
        })
    }

    /// Impact values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Conditional probability per value.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}

/// Piecewise-linear curve from hazard intensity to a value.
///
/// Lookups outside the curve's intensity range clamp to the end values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCurve {
    intensities: Vec<f64>,
    values: Vec<f64>,
}

impl ResponseCurve {
    /// Creates a curve from knot points. Intensities must be finite and
    /// strictly ascending; values must be finite.
    pub fn new(intensities: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if intensities.is_empty() || intensities.len() != values.len() {
            return Err(Error::invalid_distribution(format!(
                "curve has {} intensities but {} values",
                intensities.len(),
                values.len()
            )));
        }
        for x in intensities.iter().chain(&values) {
            if !x.is_finite() {
                return Err(Error::invalid_distribution(format!(
                    "curve knot {x} is not finite"
                )));
            }
        }
        for pair in intensities.windows(2) {
            if pair[1] <= pair[0] {
                return Err(Error::invalid_distribution(format!(
                    "curve intensities must be strictly ascending, got {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Self {
            intensities,
            values,
        })
    }

    /// Curve knot intensities.
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Curve knot values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at the given intensity, linearly interpolated between knots
    /// and clamped to the end values outside the knot range.
    pub fn value_at(&self, intensity: f64) -> f64 {
        let n = self.intensities.len();
        if intensity <= self.intensities[0] {
            return self.values[0];
        }
        if intensity >= self.intensities[n - 1] {
            return self.values[n - 1];
        }
        // First knot strictly above the lookup point; the checks above
        // guarantee 1 <= hi <= n - 1.
        let hi = self.intensities.partition_point(|x| *x <= intensity);
        let lo = hi - 1;
        let span = self.intensities[hi] - self.intensities[lo];
        let t = (intensity - self.intensities[lo]) / span;
        self.values[lo] + t * (self.values[hi] - self.values[lo])
    }
}

/// Curve family with spread: impact at each intensity is normally
/// distributed around the mean curve with the std-dev curve's spread,
/// discretized over fixed impact bins.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertainResponse {
    mean: ResponseCurve,
    std_dev: ResponseCurve,
    impact_bin_edges: Vec<f64>,
}

impl UncertainResponse {
    /// Creates a family. Bin edges must be finite and strictly ascending
    /// with at least two entries; the std-dev curve must be non-negative.
    pub fn new(
        mean: ResponseCurve,
        std_dev: ResponseCurve,
        impact_bin_edges: Vec<f64>,
    ) -> Result<Self> {
        if impact_bin_edges.len() < 2 {
            return Err(Error::invalid_distribution(
                "uncertain response needs at least two impact bin edges",
            ));
        }
        for pair in impact_bin_edges.windows(2) {
            if !pair[0].is_finite() || !pair[1].is_finite() || pair[1] <= pair[0] {
                return Err(Error::invalid_distribution(format!(
                    "impact bin edges must be finite and strictly ascending, got {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
        if std_dev.values().iter().any(|s| *s < 0.0) {
            return Err(Error::invalid_distribution(
                "std-dev curve has negative values",
            ));
        }
        Ok(Self {
            mean,
            std_dev,
            impact_bin_edges,
        })
    }

    fn conditional_at(&self, intensity: f64) -> ConditionalImpact {
        let m = self.mean.value_at(intensity);
        let s = self.std_dev.value_at(intensity);
        if s <= 0.0 {
            // Zero spread degenerates to the mean curve.
            return ConditionalImpact::point(m);
        }
        let bins = self.impact_bin_edges.len() - 1;
        let mut values = Vec::with_capacity(bins);
        let mut probabilities = Vec::with_capacity(bins);
        for pair in self.impact_bin_edges.windows(2) {
            values.push(0.5 * (pair[0] + pair[1]));
            let p = norm_cdf(pair[1], m, s) - norm_cdf(pair[0], m, s);
            probabilities.push(p.max(0.0));
        }
        ConditionalImpact {
            values,
            probabilities,
        }
    }
}

/// Response relation owned by a concrete vulnerability model.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Each intensity maps to a single impact value.
    Deterministic(ResponseCurve),
    /// Each intensity maps to a discretized normal over impact bins.
    Uncertain(UncertainResponse),
}

impl Response {
    /// The conditional impact distribution at one hazard intensity.
    pub fn conditional_at(&self, intensity: f64) -> ConditionalImpact {
        match self {
            Response::Deterministic(curve) => ConditionalImpact::point(curve.value_at(intensity)),
            Response::Uncertain(family) => family.conditional_at(intensity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation() {
        let curve = ResponseCurve::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 0.6]).unwrap();
        assert_eq!(curve.value_at(0.0), 0.0);
        assert_eq!(curve.value_at(1.0), 0.5);
        assert!((curve.value_at(0.5) - 0.25).abs() < 1e-12);
        assert!((curve.value_at(1.5) - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_clamps_outside_range() {
        let curve = ResponseCurve::new(vec![0.0, 1.0], vec![0.1, 0.5]).unwrap();
        assert_eq!(curve.value_at(-3.0), 0.1);
        assert_eq!(curve.value_at(7.0), 0.5);
    }

    #[test]
    fn test_rejects_unordered_knots() {
        assert!(ResponseCurve::new(vec![0.0, 0.0], vec![0.0, 1.0]).is_err());
        assert!(ResponseCurve::new(vec![1.0, 0.0], vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn test_deterministic_conditional_is_point() {
        let curve = ResponseCurve::new(vec![0.0, 1.0], vec![0.0, 0.5]).unwrap();
        let response = Response::Deterministic(curve);
        let cond = response.conditional_at(1.0);
        assert_eq!(cond.values(), &[0.5]);
        assert_eq!(cond.probabilities(), &[1.0]);
    }

    #[test]
    fn test_uncertain_zero_spread_is_point() {
        let mean = ResponseCurve::new(vec![0.0, 1.0], vec![0.2, 0.4]).unwrap();
        let std_dev = ResponseCurve::new(vec![0.0, 1.0], vec![0.0, 0.0]).unwrap();
        let family =
            UncertainResponse::new(mean, std_dev, vec![0.0, 0.5, 1.0]).unwrap();
        let cond = Response::Uncertain(family).conditional_at(1.0);
        assert_eq!(cond.values(), &[0.4]);
        assert_eq!(cond.probabilities(), &[1.0]);
    }

    #[test]
    fn test_uncertain_discretization() {
        // N(0.5, 0.1) over bins [0, 0.4], [0.4, 0.6], [0.6, 1.0]: the
        // central bin spans +-1 sigma, so roughly 0.6827 of the mass.
        let mean = ResponseCurve::new(vec![0.0, 1.0], vec![0.5, 0.5]).unwrap();
        let std_dev = ResponseCurve::new(vec![0.0, 1.0], vec![0.1, 0.1]).unwrap();
        let family =
            UncertainResponse::new(mean, std_dev, vec![0.0, 0.4, 0.6, 1.0]).unwrap();
        let cond = Response::Uncertain(family).conditional_at(0.3);
        assert_eq!(cond.values(), &[0.2, 0.5, 0.8]);
        let p = cond.probabilities();
        assert!((p[1] - 0.6827).abs() < 1e-3);
        // Symmetric bins around the mean carry equal mass.
        assert!((p[0] - p[2]).abs() < 1e-9);
        let total: f64 = p.iter().sum();
        assert!(total <= 1.0 + 1e-9);
        assert!(total > 0.99);
    }

    #[test]
    fn test_uncertain_rejects_bad_edges() {
        let mean = ResponseCurve::new(vec![0.0, 1.0], vec![0.5, 0.5]).unwrap();
        let std = ResponseCurve::new(vec![0.0, 1.0], vec![0.1, 0.1]).unwrap();
        assert!(UncertainResponse::new(mean.clone(), std.clone(), vec![0.5]).is_err());
        assert!(UncertainResponse::new(mean, std, vec![0.5, 0.5]).is_err());
    }

    #[test]
    fn test_conditional_rejects_negative_probability() {
        assert!(ConditionalImpact::new(vec![0.1], vec![-0.2]).is_err());
    }
}
