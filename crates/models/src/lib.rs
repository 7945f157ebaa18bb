//! Windward Models
//!
//! The shipped vulnerability model suite. Thermal power plants respond to
//! flooding, drought, and chronic heat; buildings respond to flooding
//! with an uncertain depth-damage relation. Industrial facilities carry
//! no shipped models, so their calculations resolve to the no-model
//! outcome until a caller registers its own.

use indexmap::IndexMap;

use windward_kernel::{AssetClass, ModelConfig, ModelHandle, Result};

pub mod real_estate;
pub mod thermal_power;

pub use real_estate::RealEstateRiverineInundationModel;
pub use thermal_power::{
    ThermalPowerChronicHeatModel, ThermalPowerCoastalInundationModel, ThermalPowerDroughtModel,
    ThermalPowerRiverineInundationModel,
};

/// Builds the shipped suite for each scenario/year label, every label
/// receiving the same models. Feed the result to
/// [`VulnerabilityRegistry::from_labeled`](windward_kernel::VulnerabilityRegistry::from_labeled).
pub fn standard_model_config(labels: &[&str]) -> Result<ModelConfig> {
    let thermal = thermal_power::models()?;
    let estate = real_estate::models()?;
    let mut config = ModelConfig::new();
    for label in labels {
        let mut classes: IndexMap<AssetClass, Vec<ModelHandle>> = IndexMap::new();
        classes.insert(AssetClass::ThermalPowerPlant, thermal.clone());
        classes.insert(AssetClass::RealEstate, estate.clone());
        config.insert((*label).to_string(), classes);
    }
    Ok(config)
}
