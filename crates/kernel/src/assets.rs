//! Asset descriptions
//!
//! Assets are immutable value objects owned by the caller; the kernel only
//! ever borrows them. Dispatch to vulnerability models is by the closed
//! [`AssetClass`] tag, and class-specific physical attributes are explicit
//! optional fields rather than probed dynamically, so a missing attribute
//! is a typed branch in the consuming model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of asset classes the engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Thermal power generation plant (gas, coal, nuclear, oil).
    ThermalPowerPlant,
    /// Residential or commercial buildings.
    RealEstate,
    /// Manufacturing or processing facility.
    IndustrialFacility,
}

impl AssetClass {
    /// All asset classes, in declaration order.
    pub const ALL: &'static [AssetClass] = &[
        AssetClass::ThermalPowerPlant,
        AssetClass::RealEstate,
        AssetClass::IndustrialFacility,
    ];

    /// Stable snake_case label, used in configuration and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::ThermalPowerPlant => "thermal_power_plant",
            AssetClass::RealEstate => "real_estate",
            AssetClass::IndustrialFacility => "industrial_facility",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A physical asset exposed to climate hazards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees.
    pub longitude: f64,
    /// Concrete class used for vulnerability model dispatch.
    pub class: AssetClass,
    /// Free-form subtype discriminant (e.g. fuel or cooling technology
    /// for power plants). Models may select curve variants on it.
    #[serde(default)]
    pub subtype: Option<String>,
    /// Free-form location label (e.g. country).
    #[serde(default)]
    pub location: Option<String>,
    /// Generating capacity in MW, for classes that carry one.
    #[serde(default)]
    pub capacity: Option<f64>,
}

impl Asset {
    /// Creates a new asset at the given coordinates.
    pub fn new(latitude: f64, longitude: f64, class: AssetClass) -> Self {
        Self {
            latitude,
            longitude,
            class,
            subtype: None,
            location: None,
            capacity: None,
        }
    }

    /// Set the subtype discriminant.
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Set the location label.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the generating capacity in MW.
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Capacity if present and usable (finite and strictly positive).
    ///
    /// Models that scale by capacity branch on `None` here and report the
    /// missing-attribute empty state instead of evaluating.
    pub fn usable_capacity(&self) -> Option<f64> {
        self.capacity.filter(|c| c.is_finite() && *c > 0.0)
    }
}
