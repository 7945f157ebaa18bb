//! Vulnerability models for thermal power generation.
//!
//! Acute flooding damages plant and switchgear; drought and chronic heat
//! disrupt generation by constraining cooling water and derating
//! turbines. Damage curves give the impaired fraction of plant value on
//! flood depth in metres. Disruption curves give the lost fraction of
//! annual output on months of severe drought per year, or on warming in
//! degrees Celsius.
//!
//! The inundation models report an empty impact for assets without a
//! usable generating capacity, since a damage fraction of an unknown
//! plant cannot be aggregated downstream.

use std::sync::Arc;

use tracing::debug;

use windward_foundation::HazardType;
use windward_kernel::{
    Asset, EmptyReason, ImpactDistribution, ImpactKind, IntensityDistribution, ModelHandle,
    Response, ResponseCurve, Result, VulnerabilityModel, compose_mixture,
};

/// Damage to plant from riverine flooding.
pub struct ThermalPowerRiverineInundationModel {
    response: Response,
}

impl ThermalPowerRiverineInundationModel {
    pub fn new() -> Result<Self> {
        let curve = ResponseCurve::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            vec![0.0, 0.28, 0.48, 0.62, 0.72, 0.80, 0.86],
        )?;
        Ok(Self {
            response: Response::Deterministic(curve),
        })
    }
}

impl VulnerabilityModel for ThermalPowerRiverineInundationModel {
    fn name(&self) -> &str {
        "thermal_power/riverine_inundation"
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
        asset: &Asset,
    ) -> Result<ImpactDistribution> {
        if asset.usable_capacity().is_none() {
            return Ok(ImpactDistribution::Empty(EmptyReason::MissingAttribute));
        }
        compose_mixture(hazard, &self.response, ImpactKind::Damage, self.name())
    }
}

/// Damage to plant from coastal flooding. Steeper than the riverine curve
/// at the same depth; salt water corrodes what fresh water only soaks.
pub struct ThermalPowerCoastalInundationModel {
    response: Response,
}

impl ThermalPowerCoastalInundationModel {
    pub fn new() -> Result<Self> {
        let curve = ResponseCurve::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            vec![0.0, 0.33, 0.55, 0.69, 0.78, 0.85, 0.90],
        )?;
        Ok(Self {
            response: Response::Deterministic(curve),
        })
    }
}

impl VulnerabilityModel for ThermalPowerCoastalInundationModel {
    fn name(&self) -> &str {
        "thermal_power/coastal_inundation"
    }

    fn hazard_type(&self) -> HazardType {
        HazardType::CoastalInundation
    }

    fn impact_kind(&self) -> ImpactKind {
        ImpactKind::Damage
    }

    fn evaluate(
        &self,
        hazard: &IntensityDistribution,
        asset: &Asset,
    ) -> Result<ImpactDistribution> {
        if asset.usable_capacity().is_none() {
            return Ok(ImpactDistribution::Empty(EmptyReason::MissingAttribute));
        }
        compose_mixture(hazard, &self.response, ImpactKind::Damage, self.name())
    }
}

/// Lost generation from cooling-water scarcity. Intensity is months per
/// year in severe drought.
pub struct ThermalPowerDroughtModel {
    response: Response,
}

impl ThermalPowerDroughtModel {
    pub fn new() -> Result<Self> {
        let curve = ResponseCurve::new(
            vec![0.0, 1.0, 2.0, 3.0, 6.0, 12.0],
            vec![0.0, 0.005, 0.012, 0.02, 0.045, 0.1],
        )?;
        Ok(Self {
            response: Response::Deterministic(curve),
        })
    }
}

impl VulnerabilityModel for ThermalPowerDroughtModel {
    fn name(&self) -> &str {
        "thermal_power/drought"
    }

    fn hazard_type(&self) -> HazardType {
        HazardType::Drought
    }

    fn impact_kind(&self) -> ImpactKind {
        ImpactKind::Disruption
    }

    fn evaluate(
        &self,
        hazard: &IntensityDistribution,
        _asset: &Asset,
    ) -> Result<ImpactDistribution> {
        compose_mixture(hazard, &self.response, ImpactKind::Disruption, self.name())
    }
}

/// Turbine derating under chronic heat. Intensity is warming in degrees
/// Celsius over the reference climate; the derating slope depends on the
/// turbine subtype. Combustion turbines lose more output per degree than
/// steam cycles because intake air thins as it warms.
pub struct ThermalPowerChronicHeatModel {
    gas: Response,
    steam: Response,
    generic: Response,
}

impl ThermalPowerChronicHeatModel {
    pub fn new() -> Result<Self> {
        let warming = vec![0.0, 2.0, 4.0, 6.0, 8.0];
        let gas = ResponseCurve::new(warming.clone(), vec![0.0, 0.016, 0.036, 0.060, 0.088])?;
        let steam = ResponseCurve::new(warming.clone(), vec![0.0, 0.008, 0.018, 0.030, 0.044])?;
        // Fleet average of the two cycle types, used when the subtype is
        // absent or unrecognized.
        let generic = ResponseCurve::new(warming, vec![0.0, 0.012, 0.027, 0.045, 0.066])?;
        Ok(Self {
            gas: Response::Deterministic(gas),
            steam: Response::Deterministic(steam),
            generic: Response::Deterministic(generic),
        })
    }

    fn response_for(&self, asset: &Asset) -> &Response {
        match asset.subtype.as_deref() {
            Some(subtype) if subtype.eq_ignore_ascii_case("gas") => &self.gas,
            Some(subtype) if subtype.eq_ignore_ascii_case("steam") => &self.steam,
            Some(subtype) => {
                debug!(subtype, "unrecognized turbine subtype, derating as fleet average");
                &self.generic
            }
            None => &self.generic,
        }
    }
}

impl VulnerabilityModel for ThermalPowerChronicHeatModel {
    fn name(&self) -> &str {
        "thermal_power/chronic_heat"
    }

    fn hazard_type(&self) -> HazardType {
        HazardType::ChronicHeat
    }

    fn impact_kind(&self) -> ImpactKind {
        ImpactKind::Disruption
    }

    fn evaluate(
        &self,
        hazard: &IntensityDistribution,
        asset: &Asset,
    ) -> Result<ImpactDistribution> {
        let response = self.response_for(asset);
        compose_mixture(hazard, response, ImpactKind::Disruption, self.name())
    }
}

/// The full thermal power suite in evaluation order.
pub fn models() -> Result<Vec<ModelHandle>> {
    Ok(vec![
        Arc::new(ThermalPowerRiverineInundationModel::new()?),
        Arc::new(ThermalPowerCoastalInundationModel::new()?),
        Arc::new(ThermalPowerDroughtModel::new()?),
        Arc::new(ThermalPowerChronicHeatModel::new()?),
    ])
}
