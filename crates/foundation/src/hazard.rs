//! Hazard categories
//!
//! The closed set of physical hazards the engine understands. Each category
//! has a stable snake_case label used in data source paths and log output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of physical climate hazard.
///
/// Acute hazards (inundation, wind, hail, fire) are event-driven and
/// described by return-period curves; chronic hazards (heat, drought,
/// water stress) are described by intensity levels of a slowly varying
/// indicator. Both reach vulnerability models as discrete intensity
/// distributions, so the distinction does not leak past the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    /// River flooding; intensity is inundation depth in metres.
    RiverineInundation,
    /// Coastal/storm-surge flooding; intensity is inundation depth in metres.
    CoastalInundation,
    /// Sustained high air temperature; intensity is degree-days above a
    /// working threshold.
    ChronicHeat,
    /// Meteorological drought; intensity is a standardized severity index.
    Drought,
    /// Extreme wind; intensity is gust speed in m/s.
    Wind,
    /// Supply/demand imbalance of fresh water; intensity is a stress ratio.
    WaterStress,
    /// Wildfire; intensity is a dimensionless danger index.
    Fire,
    /// Hail; intensity is the number of severe hail days per year.
    Hail,
}

impl HazardType {
    /// All hazard categories, in declaration order.
    pub const ALL: &'static [HazardType] = &[
        HazardType::RiverineInundation,
        HazardType::CoastalInundation,
        HazardType::ChronicHeat,
        HazardType::Drought,
        HazardType::Wind,
        HazardType::WaterStress,
        HazardType::Fire,
        HazardType::Hail,
    ];

    /// Stable snake_case label, used in data paths and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            HazardType::RiverineInundation => "riverine_inundation",
            HazardType::CoastalInundation => "coastal_inundation",
            HazardType::ChronicHeat => "chronic_heat",
            HazardType::Drought => "drought",
            HazardType::Wind => "wind",
            HazardType::WaterStress => "water_stress",
            HazardType::Fire => "fire",
            HazardType::Hail => "hail",
        }
    }

    /// Parse a snake_case label back into a hazard category.
    pub fn from_label(label: &str) -> Option<Self> {
        HazardType::ALL.iter().copied().find(|h| h.label() == label)
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
