//! Hazard resource inventory and source path resolution.
//!
//! The inventory lists the data resources a store knows about; resolving
//! it against a [`StoreConfig`] yields one path template per hazard type,
//! honouring the configured flood vendor. Templates carry `{scenario}`
//! and `{year}` placeholders substituted per request.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use windward_foundation::HazardType;

use crate::config::{FloodModelProvider, StoreConfig};

/// One data resource: where arrays for a hazard type live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardResource {
    /// Hazard category the resource serves. A resource without one is
    /// skipped unless the config supplies a default hazard type.
    #[serde(default)]
    pub hazard_type: Option<HazardType>,

    /// Vendor restriction; `None` matches any configured vendor.
    #[serde(default)]
    pub provider: Option<FloodModelProvider>,

    /// Path template with `{scenario}` and `{year}` placeholders.
    pub path: String,
}

impl HazardResource {
    /// Creates a resource for a hazard type.
    pub fn new(hazard_type: HazardType, path: impl Into<String>) -> Self {
        Self {
            hazard_type: Some(hazard_type),
            provider: None,
            path: path.into(),
        }
    }

    /// Restrict the resource to one flood vendor.
    pub fn with_provider(mut self, provider: FloodModelProvider) -> Self {
        self.provider = Some(provider);
        self
    }
}

/// The set of data resources a store knows about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    resources: Vec<HazardResource>,
}

impl Inventory {
    /// Creates an inventory from resources.
    pub fn new(resources: Vec<HazardResource>) -> Self {
        Self { resources }
    }

    /// All resources, in declaration order.
    pub fn resources(&self) -> &[HazardResource] {
        &self.resources
    }

    /// The built-in resource set covering every hazard type, with both
    /// flood vendors for the inundation types.
    pub fn embedded() -> Self {
        use HazardType::*;
        Self::new(vec![
            HazardResource::new(RiverineInundation, "inundation/wri/v2/inunriver_{scenario}_{year}")
                .with_provider(FloodModelProvider::Wri),
            HazardResource::new(
                RiverineInundation,
                "inundation/tudelft/v1/inunriver_{scenario}_{year}",
            )
            .with_provider(FloodModelProvider::TuDelft),
            HazardResource::new(CoastalInundation, "inundation/wri/v2/inuncoast_{scenario}_{year}")
                .with_provider(FloodModelProvider::Wri),
            HazardResource::new(
                CoastalInundation,
                "inundation/tudelft/v1/inuncoast_{scenario}_{year}",
            )
            .with_provider(FloodModelProvider::TuDelft),
            HazardResource::new(ChronicHeat, "chronic_heat/osc/v2/degree_days_{scenario}_{year}"),
            HazardResource::new(Drought, "drought/osc/v1/spei_{scenario}_{year}"),
            HazardResource::new(Wind, "wind/iris/v1/gust_speed_{scenario}_{year}"),
            HazardResource::new(WaterStress, "water_stress/wri/v2/stress_index_{scenario}_{year}"),
            HazardResource::new(Fire, "fire/osc/v1/fwi_{scenario}_{year}"),
            HazardResource::new(Hail, "hail/osc/v1/severe_days_{scenario}_{year}"),
        ])
    }
}

/// Resolved source paths: one template per hazard type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePaths {
    templates: IndexMap<HazardType, String>,
}

impl SourcePaths {
    /// Resolve an inventory against a config.
    ///
    /// For each hazard type the first matching resource wins: resources
    /// restricted to a vendor match only the configured flood vendor, and
    /// untyped resources take the config's default hazard type or are
    /// skipped with a warning.
    pub fn resolve(inventory: &Inventory, config: &StoreConfig) -> Self {
        let mut templates: IndexMap<HazardType, String> = IndexMap::new();
        for resource in inventory.resources() {
            let Some(hazard_type) = resource.hazard_type.or(config.default_hazard_type) else {
                warn!(path = %resource.path, "resource has no hazard type, skipping");
                continue;
            };
            if let Some(provider) = resource.provider {
                if provider != config.flood_model {
                    continue;
                }
            }
            templates
                .entry(hazard_type)
                .or_insert_with(|| resource.path.clone());
        }
        Self { templates }
    }

    /// Direct construction from templates, mainly for tests and tools.
    pub fn from_templates(templates: IndexMap<HazardType, String>) -> Self {
        Self { templates }
    }

    /// The unsubstituted template for a hazard type.
    pub fn template(&self, hazard_type: HazardType) -> Option<&str> {
        self.templates.get(&hazard_type).map(String::as_str)
    }

    /// The concrete path for a hazard type, scenario and year.
    pub fn path_for(&self, hazard_type: HazardType, scenario: &str, year: i32) -> Option<String> {
        self.templates.get(&hazard_type).map(|template| {
            template
                .replace("{scenario}", scenario)
                .replace("{year}", &year.to_string())
        })
    }

    /// Hazard types with a resolved path.
    pub fn hazard_types(&self) -> impl Iterator<Item = HazardType> + '_ {
        self.templates.keys().copied()
    }
}
