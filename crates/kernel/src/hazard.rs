//! Hazard model interface
//!
//! The kernel consumes hazard data through this boundary and never reaches
//! past it. Implementations translate a request (coordinates, hazard type,
//! scenario, year) into an intensity distribution, or a `DataUnavailable`
//! error when the underlying store has no coverage. Lookups must be
//! idempotent and deterministic within one data epoch; the kernel never
//! retries.

use windward_foundation::{HazardType, ScenarioYear};

use crate::assets::Asset;
use crate::error::{Error, Result};
use crate::intensity::IntensityDistribution;

/// A single hazard-data lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardRequest {
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees.
    pub longitude: f64,
    /// Hazard category requested.
    pub hazard_type: HazardType,
    /// Climate scenario name.
    pub scenario: String,
    /// Calendar year of the data epoch.
    pub year: i32,
}

impl HazardRequest {
    /// Request for an asset's coordinates.
    pub fn for_asset(asset: &Asset, hazard_type: HazardType, scenario: &str, year: i32) -> Self {
        Self {
            latitude: asset.latitude,
            longitude: asset.longitude,
            hazard_type,
            scenario: scenario.to_string(),
            year,
        }
    }

    /// The request's (scenario, year) key.
    pub fn scenario_year(&self) -> ScenarioYear {
        ScenarioYear::new(self.scenario.clone(), self.year)
    }

    /// A `DataUnavailable` error carrying this request's full context.
    pub fn unavailable(&self, message: impl Into<String>) -> Error {
        Error::DataUnavailable {
            hazard_type: self.hazard_type,
            latitude: self.latitude,
            longitude: self.longitude,
            scenario_year: self.scenario_year(),
            message: message.into(),
        }
    }
}

/// Source of hazard intensity distributions.
pub trait HazardModel: Send + Sync {
    /// Fetch the intensity distribution for one request.
    fn hazard_distribution(&self, request: &HazardRequest) -> Result<IntensityDistribution>;

    /// Fetch a batch of requests, one result per request in order.
    ///
    /// The default delegates per request; implementations backed by tiled
    /// stores may override it to coalesce reads. Per-request failures stay
    /// per-request and never abort the rest of the batch.
    fn hazard_distributions(
        &self,
        requests: &[HazardRequest],
    ) -> Vec<Result<IntensityDistribution>> {
        requests
            .iter()
            .map(|request| self.hazard_distribution(request))
            .collect()
    }
}
