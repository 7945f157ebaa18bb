//! Impact distributions
//!
//! The output side of vulnerability evaluation. A computed distribution is
//! an [`ImpactDistrib`]; the full result type [`ImpactDistribution`] adds
//! the distinguished empty state for "no impact could be computed", which
//! is not zero impact but the absence of an answer. Mean and exceedance
//! queries exist only on the computed variant, so callers must branch on
//! the empty state before querying.

use std::fmt;

use serde::{Deserialize, Serialize};
use windward_foundation::{HazardType, PROB_TOLERANCE};

use crate::error::{Error, Result};

/// What the impact variable measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactKind {
    /// Fractional damage to the asset, in [0, 1].
    Damage,
    /// Fractional loss of output or availability, in [0, 1].
    Disruption,
}

impl ImpactKind {
    /// Stable snake_case label.
    pub fn label(&self) -> &'static str {
        match self {
            ImpactKind::Damage => "damage",
            ImpactKind::Disruption => "disruption",
        }
    }
}

impl fmt::Display for ImpactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why no impact could be computed for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// No vulnerability model is registered for the asset's class under
    /// the requested scenario and year.
    NoApplicableModel,
    /// The hazard store served a distribution with no probability mass
    /// for this location.
    NoHazardCoverage,
    /// The asset lacks a physical attribute the model requires (e.g.
    /// generating capacity).
    MissingAttribute,
}

impl EmptyReason {
    /// Human-readable description for summaries.
    pub fn describe(&self) -> &'static str {
        match self {
            EmptyReason::NoApplicableModel => "no applicable model",
            EmptyReason::NoHazardCoverage => "no hazard coverage",
            EmptyReason::MissingAttribute => "missing asset attribute",
        }
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A computed, non-empty impact distribution.
///
/// Invariants, checked at construction:
/// - support and probabilities have equal, non-zero length
/// - support values are finite and strictly ascending
/// - probabilities are finite, non-negative and sum to 1 within
///   [`PROB_TOLERANCE`]
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactDistrib {
    hazard_type: HazardType,
    kind: ImpactKind,
    support: Vec<f64>,
    probabilities: Vec<f64>,
}

impl ImpactDistrib {
    /// Creates a distribution, validating the invariants above.
    pub fn new(
        hazard_type: HazardType,
        kind: ImpactKind,
        support: Vec<f64>,
        probabilities: Vec<f64>,
    ) -> Result<Self> {
        if support.is_empty() {
            return Err(Error::invalid_distribution("impact support is empty"));
        }
        if probabilities.len() != support.len() {
            return Err(Error::invalid_distribution(format!(
                "impact support has {} points but probabilities has {}",
                support.len(),
                probabilities.len()
            )));
        }
        for v in &support {
            if !v.is_finite() {
                return Err(Error::invalid_distribution(format!(
                    "impact value {v} is not finite"
                )));
            }
        }
        for pair in support.windows(2) {
            if pair[1] <= pair[0] {
                return Err(Error::invalid_distribution(format!(
                    "impact support must be strictly ascending, got {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
        let mut total = 0.0;
        for p in &probabilities {
            if !p.is_finite() || *p < 0.0 {
                return Err(Error::invalid_distribution(format!(
                    "impact probability {p} is negative or not finite"
                )));
            }
            total += p;
        }
        if (total - 1.0).abs() > PROB_TOLERANCE {
            return Err(Error::invalid_distribution(format!(
                "impact probabilities sum to {total}, expected 1"
            )));
        }
        Ok(Self {
            hazard_type,
            kind,
            support,
            probabilities,
        })
    }

    /// Hazard category the impact resulted from.
    pub fn hazard_type(&self) -> HazardType {
        self.hazard_type
    }

    /// What the impact variable measures.
    pub fn kind(&self) -> ImpactKind {
        self.kind
    }

    /// Impact support values, strictly ascending.
    pub fn support(&self) -> &[f64] {
        &self.support
    }

    /// Probability per support point.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability-weighted mean impact.
    pub fn mean_impact(&self) -> f64 {
        self.support
            .iter()
            .zip(&self.probabilities)
            .map(|(v, p)| v * p)
            .sum()
    }

    /// Probability that the impact strictly exceeds `threshold`.
    ///
    /// Support points equal to the threshold do not count as exceeding it.
    pub fn exceedance_probability(&self, threshold: f64) -> f64 {
        self.support
            .iter()
            .zip(&self.probabilities)
            .filter(|(v, _)| **v > threshold)
            .map(|(_, p)| p)
            .sum()
    }
}

/// Result of evaluating one vulnerability model against one asset: either
/// a computed distribution or the distinguished empty state.
#[derive(Debug, Clone, PartialEq)]
pub enum ImpactDistribution {
    /// Evaluation produced a distribution.
    Computed(ImpactDistrib),
    /// No impact could be computed; the reason says why. Distinct from a
    /// computed zero-impact outcome.
    Empty(EmptyReason),
}

impl ImpactDistribution {
    /// True for the empty state.
    pub fn is_empty(&self) -> bool {
        matches!(self, ImpactDistribution::Empty(_))
    }

    /// The computed distribution, if there is one.
    pub fn computed(&self) -> Option<&ImpactDistrib> {
        match self {
            ImpactDistribution::Computed(d) => Some(d),
            ImpactDistribution::Empty(_) => None,
        }
    }

    /// The empty reason, if this is the empty state.
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            ImpactDistribution::Computed(_) => None,
            ImpactDistribution::Empty(reason) => Some(*reason),
        }
    }
}
