//! Vulnerability models for buildings.
//!
//! The depth-damage relation for buildings is notoriously uncertain;
//! identical depths produce very different losses across construction
//! types and contents. The riverine model therefore carries a mean and a
//! standard deviation curve and spreads each conditional over a fixed
//! damage-fraction grid, rather than committing to a single value per
//! depth.

use std::sync::Arc;

use windward_foundation::HazardType;
use windward_kernel::{
    Asset, ImpactDistribution, ImpactKind, IntensityDistribution, ModelHandle, Response,
    ResponseCurve, Result, UncertainResponse, VulnerabilityModel, compose_mixture,
};

/// Number of damage-fraction bins the conditional normals discretize over.
const DAMAGE_BINS: usize = 20;

/// Damage to buildings from riverine flooding, with per-depth uncertainty.
pub struct RealEstateRiverineInundationModel {
    response: Response,
}

impl RealEstateRiverineInundationModel {
    pub fn new() -> Result<Self> {
        let depths = vec![0.0, 0.5, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mean = ResponseCurve::new(
            depths.clone(),
            vec![0.0, 0.25, 0.40, 0.50, 0.60, 0.75, 0.85, 0.95, 1.0],
        )?;
        // Spread is widest at intermediate depths. Dry buildings are
        // certainly undamaged and fully submerged ones certainly lost, so
        // both ends pin to zero and the conditionals there collapse to
        // point masses.
        let std_dev = ResponseCurve::new(
            depths,
            vec![0.0, 0.10, 0.12, 0.125, 0.12, 0.10, 0.08, 0.05, 0.0],
        )?;
        let edges = (0..=DAMAGE_BINS).map(|i| i as f64 / DAMAGE_BINS as f64).collect();
        let family = UncertainResponse::new(mean, std_dev, edges)?;
        Ok(Self {
            response: Response::Uncertain(family),
        })
    }
}

impl VulnerabilityModel for RealEstateRiverineInundationModel {
    fn name(&self) -> &str {
        "real_estate/riverine_inundation"
    }

    fn hazard_type(&self) -> HazardType {
        HazardType::RiverineInundation
    }

    fn impact_kind(&self) -> ImpactKind {
        ImpactKind::Damage
    }

    fn evaluate(
        &self,
        hazard: &IntensityDistribution,
        _asset: &Asset,
    ) -> Result<ImpactDistribution> {
        compose_mixture(hazard, &self.response, ImpactKind::Damage, self.name())
    }
}

/// The real estate suite in evaluation order.
pub fn models() -> Result<Vec<ModelHandle>> {
    Ok(vec![Arc::new(RealEstateRiverineInundationModel::new()?)])
}
