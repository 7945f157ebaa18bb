//! Hazard intensity distributions
//!
//! A [`IntensityDistribution`] is the discrete probability distribution of
//! hazard intensity at one location, for one hazard type, scenario and year.
//! Gridded acute-hazard data arrives as return-period exceedance curves;
//! [`ExceedanceCurve`] converts those to the distribution form consumed by
//! vulnerability models.

use windward_foundation::{HazardType, PROB_TOLERANCE};

use crate::error::{Error, Result};

/// Discrete probability distribution over hazard intensity.
///
/// Invariants, checked at construction:
/// - support and probabilities have equal, non-zero length
/// - support values are finite and strictly ascending
/// - probabilities are finite and non-negative, and either sum to 1 within
///   [`PROB_TOLERANCE`] or are all exactly zero (the "no coverage" shape)
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityDistribution {
    hazard_type: HazardType,
    support: Vec<f64>,
    probabilities: Vec<f64>,
}

impl IntensityDistribution {
    /// Creates a distribution, validating the invariants above.
    pub fn new(
        hazard_type: HazardType,
        support: Vec<f64>,
        probabilities: Vec<f64>,
    ) -> Result<Self> {
        validate_support(&support)?;
        if probabilities.len() != support.len() {
            return Err(Error::invalid_distribution(format!(
                "support has {} bins but probabilities has {}",
                support.len(),
                probabilities.len()
            )));
        }
        let mut total = 0.0;
        for p in &probabilities {
            if !p.is_finite() || *p < 0.0 {
                return Err(Error::invalid_distribution(format!(
                    "probability {p} is negative or not finite"
                )));
            }
            total += p;
        }
        if total != 0.0 && (total - 1.0).abs() > PROB_TOLERANCE {
            return Err(Error::invalid_distribution(format!(
                "probabilities sum to {total}, expected 1 or all-zero"
            )));
        }
        Ok(Self {
            hazard_type,
            support,
            probabilities,
        })
    }

    /// A distribution with all mass on a single intensity value.
    pub fn point_mass(hazard_type: HazardType, intensity: f64) -> Result<Self> {
        Self::new(hazard_type, vec![intensity], vec![1.0])
    }

    /// The all-zero "no coverage" shape: data exists structurally but
    /// carries no probability mass for this location.
    pub fn no_coverage(hazard_type: HazardType) -> Self {
        Self {
            hazard_type,
            support: vec![0.0],
            probabilities: vec![0.0],
        }
    }

    /// Hazard category this distribution describes.
    pub fn hazard_type(&self) -> HazardType {
        self.hazard_type
    }

    /// Intensity support values, strictly ascending.
    pub fn support(&self) -> &[f64] {
        &self.support
    }

    /// Probability per support bin.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of support bins.
    pub fn len(&self) -> usize {
        self.support.len()
    }

    /// True when the distribution has no bins (never constructible; kept
    /// for slice-like symmetry with `len`).
    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }

    /// True when any bin carries probability mass. The all-zero shape means
    /// the underlying store had no coverage for this location.
    pub fn has_coverage(&self) -> bool {
        self.probabilities.iter().any(|p| *p > 0.0)
    }
}

/// Intensity as a function of exceedance probability, the native shape of
/// return-period hazard data.
///
/// Invariants: intensities are finite, non-negative and strictly ascending;
/// exceedance probabilities are in [0, 1] and non-increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceedanceCurve {
    intensities: Vec<f64>,
    exceedance: Vec<f64>,
}

impl ExceedanceCurve {
    /// Creates a curve from (intensity, exceedance probability) pairs.
    pub fn new(intensities: Vec<f64>, exceedance: Vec<f64>) -> Result<Self> {
        validate_support(&intensities)?;
        if intensities[0] < 0.0 {
            return Err(Error::invalid_distribution(format!(
                "exceedance curve intensity {} is negative",
                intensities[0]
            )));
        }
        if exceedance.len() != intensities.len() {
            return Err(Error::invalid_distribution(format!(
                "curve has {} intensities but {} exceedance values",
                intensities.len(),
                exceedance.len()
            )));
        }
        for pair in exceedance.windows(2) {
            if pair[1] > pair[0] {
                return Err(Error::invalid_distribution(format!(
                    "exceedance must be non-increasing, got {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
        for e in &exceedance {
            if !e.is_finite() || *e < 0.0 || *e > 1.0 {
                return Err(Error::invalid_distribution(format!(
                    "exceedance probability {e} outside [0, 1]"
                )));
            }
        }
        Ok(Self {
            intensities,
            exceedance,
        })
    }

    /// Creates a curve from intensities at the given return periods, in
    /// years. Exceedance per epoch is `1 / return_period`.
    pub fn from_return_periods(intensities: Vec<f64>, return_periods: &[f64]) -> Result<Self> {
        for rp in return_periods {
            if !rp.is_finite() || *rp < 1.0 {
                return Err(Error::invalid_distribution(format!(
                    "return period {rp} must be >= 1 year"
                )));
            }
        }
        let exceedance = return_periods.iter().map(|rp| 1.0 / rp).collect();
        Self::new(intensities, exceedance)
    }

    /// Intensity values, strictly ascending.
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Exceedance probability per intensity, non-increasing.
    pub fn exceedance(&self) -> &[f64] {
        &self.exceedance
    }

    /// Convert to a discrete intensity distribution by differencing.
    ///
    /// Mass between consecutive curve points lands on the lower point; the
    /// residual below the first point lands on a zero-intensity baseline
    /// bin (merged with the first point when that is itself zero).
    pub fn to_intensity_distribution(&self, hazard_type: HazardType) -> Result<IntensityDistribution> {
        let n = self.intensities.len();
        let mut support = Vec::with_capacity(n + 1);
        let mut probabilities = Vec::with_capacity(n + 1);

        let below = 1.0 - self.exceedance[0];
        if self.intensities[0] > 0.0 {
            support.push(0.0);
            probabilities.push(below);
            support.extend_from_slice(&self.intensities);
            for pair in self.exceedance.windows(2) {
                probabilities.push(pair[0] - pair[1]);
            }
            probabilities.push(self.exceedance[n - 1]);
        } else {
            // First curve point is already the zero baseline.
            support.extend_from_slice(&self.intensities);
            let first_bin = if n > 1 {
                below + (self.exceedance[0] - self.exceedance[1])
            } else {
                1.0
            };
            probabilities.push(first_bin);
            for pair in self.exceedance.windows(2).skip(1) {
                probabilities.push(pair[0] - pair[1]);
            }
            if n > 1 {
                probabilities.push(self.exceedance[n - 1]);
            }
        }

        IntensityDistribution::new(hazard_type, support, probabilities)
    }
}

fn validate_support(support: &[f64]) -> Result<()> {
    if support.is_empty() {
        return Err(Error::invalid_distribution("support is empty"));
    }
    for v in support {
        if !v.is_finite() {
            return Err(Error::invalid_distribution(format!(
                "support value {v} is not finite"
            )));
        }
    }
    for pair in support.windows(2) {
        if pair[1] <= pair[0] {
            return Err(Error::invalid_distribution(format!(
                "support must be strictly ascending, got {} then {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}
