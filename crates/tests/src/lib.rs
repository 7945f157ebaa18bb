//! Integration test harness for windward.
//!
//! This crate provides utilities for end-to-end testing of the full
//! calculation pipeline: Configure → Seed arrays → Calculate → Verify.
//!
//! Fixtures run on a 2x2 degree grid (latitudes 50/51, longitudes 4/5)
//! with a single 10-year return period, so a uniform intensity `v` turns
//! into the two-point hazard distribution `{0: 0.9, v: 0.1}` at every
//! asset inside the grid.

use windward_foundation::HazardType;
use windward_kernel::{
    Asset, AssetClass, ResultSet, VulnerabilityRegistry, calculate_impacts,
};
use windward_models::standard_model_config;
use windward_store::{GriddedHazardModel, HazardArray, Inventory, StoreConfig};

/// Test harness running portfolio calculations against seeded hazard data.
pub struct TestHarness {
    model: GriddedHazardModel,
    registry: VulnerabilityRegistry,
}

impl TestHarness {
    /// Create a harness with the shipped model suite registered under
    /// each scenario/year label and an in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if a label does not parse as `<scenario>_<year>`.
    pub fn new(labels: &[&str]) -> Self {
        Self::with_model(
            GriddedHazardModel::from_config(&StoreConfig::new(), &Inventory::embedded()),
            labels,
        )
    }

    /// Create a harness over an existing hazard model, e.g. one backed
    /// by a data directory. Initializes test logging.
    ///
    /// # Panics
    ///
    /// Panics if a label does not parse as `<scenario>_<year>`.
    pub fn with_model(model: GriddedHazardModel, labels: &[&str]) -> Self {
        init_tracing();
        let config = standard_model_config(labels).expect("model suite construction failed");
        let registry = VulnerabilityRegistry::from_labeled(config).expect("invalid label");
        Self { model, registry }
    }

    /// Seed one hazard type with a uniform array: every grid cell
    /// carries `value` at the 10-year return period.
    ///
    /// # Panics
    ///
    /// Panics if no source path is known for the hazard type.
    pub fn seed_uniform(&self, hazard_type: HazardType, scenario: &str, year: i32, value: f64) {
        let path = self
            .model
            .paths()
            .path_for(hazard_type, scenario, year)
            .expect("no source path for hazard type");
        self.model
            .store()
            .insert(path, uniform_array(value))
            .expect("fixture array rejected");
    }

    /// Seed one hazard type with a fully masked array.
    ///
    /// # Panics
    ///
    /// Panics if no source path is known for the hazard type.
    pub fn seed_masked(&self, hazard_type: HazardType, scenario: &str, year: i32) {
        let path = self
            .model
            .paths()
            .path_for(hazard_type, scenario, year)
            .expect("no source path for hazard type");
        self.model
            .store()
            .insert(path, masked_array())
            .expect("fixture array rejected");
    }

    /// Seed every hazard type the shipped suite consumes: riverine
    /// flooding at `depth`, a dry coast, no drought, no warming.
    pub fn seed_flood_scenario(&self, scenario: &str, year: i32, depth: f64) {
        self.seed_uniform(HazardType::RiverineInundation, scenario, year, depth);
        self.seed_uniform(HazardType::CoastalInundation, scenario, year, 0.0);
        self.seed_uniform(HazardType::Drought, scenario, year, 0.0);
        self.seed_uniform(HazardType::ChronicHeat, scenario, year, 0.0);
    }

    /// The hazard model under test.
    pub fn model(&self) -> &GriddedHazardModel {
        &self.model
    }

    /// Run the calculation over a portfolio.
    pub fn run(&self, assets: &[Asset], scenario: &str, year: i32) -> ResultSet {
        calculate_impacts(assets, &self.model, &self.registry, scenario, year)
    }
}

/// A 2x2 degree grid with one 10-year return period, every cell `value`.
pub fn uniform_array(value: f64) -> HazardArray {
    HazardArray {
        return_periods: vec![10.0],
        latitudes: vec![50.0, 51.0],
        longitudes: vec![4.0, 5.0],
        values: vec![value; 4],
        nodata: None,
    }
}

/// The same grid with every cell masked.
pub fn masked_array() -> HazardArray {
    HazardArray {
        return_periods: vec![10.0],
        latitudes: vec![50.0, 51.0],
        longitudes: vec![4.0, 5.0],
        values: vec![-9999.0; 4],
        nodata: Some(-9999.0),
    }
}

/// A thermal plant with capacity inside the fixture grid.
pub fn plant() -> Asset {
    Asset::new(50.0, 4.0, AssetClass::ThermalPowerPlant).with_capacity(500.0)
}

/// A building inside the fixture grid.
pub fn house() -> Asset {
    Asset::new(50.0, 4.0, AssetClass::RealEstate)
}

/// A facility with no registered models.
pub fn warehouse() -> Asset {
    Asset::new(51.0, 5.0, AssetClass::IndustrialFacility)
}

/// Route log output through the test framework; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
