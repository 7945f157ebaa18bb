//! Vulnerability models and mixture composition
//!
//! A vulnerability model turns a hazard intensity distribution plus an
//! asset's physical attributes into an impact distribution. All concrete
//! models funnel through [`compose_mixture`], the discrete composition of
//! the hazard distribution with the model's per-intensity conditional
//! impact:
//!
//! - bin `i` with probability `p_i` contributes `p_i * q(v | i)` to impact
//!   value `v`
//! - contributions to exactly-coinciding impact values merge; nothing is
//!   re-binned (binning strategy belongs to the concrete model)
//! - the result is renormalized to total probability 1; a zero total is a
//!   `Computation` error, never a silent NaN
//! - an all-zero hazard distribution short-circuits to the empty state
//!
//! Negative conditional probabilities are unrepresentable here: they are
//! rejected when a [`ConditionalImpact`](crate::curve::ConditionalImpact)
//! is constructed.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use windward_foundation::{HazardType, ScenarioYear};

use crate::assets::{Asset, AssetClass};
use crate::curve::Response;
use crate::error::{Error, Result};
use crate::impact::{EmptyReason, ImpactDistrib, ImpactDistribution, ImpactKind};
use crate::intensity::IntensityDistribution;

/// A vulnerability model shared across registry keys.
pub type ModelHandle = Arc<dyn VulnerabilityModel>;

/// External registry configuration: models per asset class, keyed by a
/// `"<scenario>_<year>"` label.
pub type ModelConfig = IndexMap<String, IndexMap<AssetClass, Vec<ModelHandle>>>;

/// Response of one asset class to one hazard type.
pub trait VulnerabilityModel: Send + Sync {
    /// Short stable name for diagnostics and result rows.
    fn name(&self) -> &str;

    /// Hazard category this model consumes.
    fn hazard_type(&self) -> HazardType;

    /// What the produced impact variable measures.
    fn impact_kind(&self) -> ImpactKind;

    /// Evaluate the model against one asset's hazard distribution.
    ///
    /// Returns the empty state (never an error) when the hazard has no
    /// coverage or the asset lacks a required attribute; returns a
    /// `Computation` error for degenerate numeric results.
    fn evaluate(
        &self,
        hazard: &IntensityDistribution,
        asset: &Asset,
    ) -> Result<ImpactDistribution>;
}

/// Compose a hazard distribution with a response relation into an impact
/// distribution. See the module docs for the composition rules. `context`
/// names the calling model in any `Computation` error.
pub fn compose_mixture(
    hazard: &IntensityDistribution,
    response: &Response,
    kind: ImpactKind,
    context: &str,
) -> Result<ImpactDistribution> {
    if !hazard.has_coverage() {
        return Ok(ImpactDistribution::Empty(EmptyReason::NoHazardCoverage));
    }

    let mut contributions: Vec<(f64, f64)> = Vec::with_capacity(hazard.len());
    for (intensity, p) in hazard.support().iter().zip(hazard.probabilities()) {
        if *p == 0.0 {
            continue;
        }
        let conditional = response.conditional_at(*intensity);
        for (v, q) in conditional
            .values()
            .iter()
            .zip(conditional.probabilities())
        {
            if *q == 0.0 {
                continue;
            }
            contributions.push((*v, p * q));
        }
    }

    // Deterministic order, then merge exactly-coinciding values.
    contributions.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut support: Vec<f64> = Vec::with_capacity(contributions.len());
    let mut probabilities: Vec<f64> = Vec::with_capacity(contributions.len());
    for (v, p) in contributions {
        match support.last() {
            Some(last) if *last == v => {
                let slot = probabilities.len() - 1;
                probabilities[slot] += p;
            }
            _ => {
                support.push(v);
                probabilities.push(p);
            }
        }
    }

    let total: f64 = probabilities.iter().sum();
    if !total.is_finite() {
        return Err(Error::computation(context, "non-finite total probability"));
    }
    if total <= 0.0 {
        return Err(Error::computation(context, "zero total probability"));
    }
    for p in &mut probabilities {
        *p /= total;
    }

    let distrib = ImpactDistrib::new(hazard.hazard_type(), kind, support, probabilities)?;
    Ok(ImpactDistribution::Computed(distrib))
}

/// Registry mapping (scenario, year, asset class) to the ordered models
/// that apply. Lookup is exact-match on all three; a miss is an empty
/// slice, never an error.
#[derive(Default)]
pub struct VulnerabilityRegistry {
    models: IndexMap<ScenarioYear, IndexMap<AssetClass, Vec<ModelHandle>>>,
}

// `ModelHandle` is a trait object without a `Debug` bound, so the registry
// formats model names instead of deriving.
impl fmt::Debug for VulnerabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, classes) in &self.models {
            let names: IndexMap<AssetClass, Vec<&str>> = classes
                .iter()
                .map(|(class, models)| (*class, models.iter().map(|m| m.name()).collect()))
                .collect();
            map.entry(key, &names);
        }
        map.finish()
    }
}

impl VulnerabilityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under one (scenario, year) key and asset class.
    /// Models registered for the same slot keep registration order.
    pub fn register(&mut self, key: ScenarioYear, class: AssetClass, model: ModelHandle) {
        debug!(key = %key, class = %class, model = model.name(), "model registered");
        self.models
            .entry(key)
            .or_default()
            .entry(class)
            .or_default()
            .push(model);
    }

    /// Build a registry from labelled external configuration, parsing each
    /// `"<scenario>_<year>"` label. Fails on the first malformed label.
    pub fn from_labeled(config: ModelConfig) -> Result<Self> {
        let mut registry = Self::new();
        for (label, classes) in config {
            let key = ScenarioYear::parse_label(&label)?;
            for (class, models) in classes {
                for model in models {
                    registry.register(key.clone(), class, model);
                }
            }
        }
        Ok(registry)
    }

    /// The models applicable to an asset class under a scenario and year,
    /// in registration order. Empty when nothing matches.
    pub fn models_for(&self, class: AssetClass, scenario: &str, year: i32) -> &[ModelHandle] {
        self.models
            .iter()
            .find(|(key, _)| key.scenario == scenario && key.year == year)
            .and_then(|(_, classes)| classes.get(&class))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Registered (scenario, year) keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ScenarioYear> {
        self.models.keys()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
