//! Store configuration and loading.
//!
//! A store config is a small declarative YAML document selecting where
//! hazard arrays live and which vendor's flood data to resolve. Remote
//! credentials are an explicit, all-optional struct: leaving them (or the
//! data directory) out produces a store that serves "no coverage" at
//! request time rather than failing construction.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use windward_foundation::HazardType;

/// Errors that can occur when loading store configuration or array data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read a config or array file.
    #[error("failed to read store file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse config or array YAML.
    #[error("failed to parse store YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid API version.
    #[error("invalid apiVersion: expected 'windward/v1', got '{0}'")]
    InvalidApiVersion(String),

    /// Invalid kind.
    #[error("invalid kind: expected 'HazardStore', got '{0}'")]
    InvalidKind(String),

    /// Hazard array with inconsistent shape or unordered axes.
    #[error("malformed hazard array: {0}")]
    MalformedArray(String),
}

/// Result type for store configuration operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Flood data vendor backing the inundation hazard types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodModelProvider {
    /// World Resources Institute Aqueduct flood layers.
    #[default]
    Wri,
    /// TU Delft / GLOFRIS flood layers.
    TuDelft,
}

impl FloodModelProvider {
    /// Stable snake_case label.
    pub fn label(&self) -> &'static str {
        match self {
            FloodModelProvider::Wri => "wri",
            FloodModelProvider::TuDelft => "tudelft",
        }
    }
}

/// Remote object-store credentials.
///
/// Every field is optional; [`is_complete`](Self::is_complete) reports
/// whether a remote reader could be constructed at all. Incomplete
/// credentials are a typed "no credentials" state, never a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCredentials {
    /// Access key ID.
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret access key.
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Bucket holding the hazard arrays.
    #[serde(default)]
    pub bucket: Option<String>,

    /// Service endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl StoreCredentials {
    /// True when every field is present.
    pub fn is_complete(&self) -> bool {
        self.access_key.is_some()
            && self.secret_key.is_some()
            && self.bucket.is_some()
            && self.endpoint.is_some()
    }
}

/// Configuration for a hazard data store.
///
/// Loaded from YAML or built programmatically with the `with_*` methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// API version for compatibility checking.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Kind must be "HazardStore".
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Local directory of hazard array files. Absent means no local data.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Remote store credentials. Absent or incomplete credentials degrade
    /// to "no coverage" at request time.
    #[serde(default)]
    pub credentials: Option<StoreCredentials>,

    /// Which vendor's flood layers the inundation hazard types resolve to.
    #[serde(default)]
    pub flood_model: FloodModelProvider,

    /// Hazard type assumed for inventory resources that omit one.
    /// Defaults to none: a resource without a hazard type stays
    /// unresolved and is skipped.
    #[serde(default)]
    pub default_hazard_type: Option<HazardType>,
}

fn default_api_version() -> String {
    "windward/v1".to_string()
}

fn default_kind() -> String {
    "HazardStore".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConfig {
    /// Create a config with defaults: no local data, no credentials, WRI
    /// flood layers, no default hazard type.
    pub fn new() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            data_dir: None,
            credentials: None,
            flood_model: FloodModelProvider::default(),
            default_hazard_type: None,
        }
    }

    /// Load a config from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> StoreResult<Self> {
        let config: StoreConfig = serde_yaml::from_str(yaml)?;
        config.validate_schema()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> StoreResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the config schema (API version, kind).
    fn validate_schema(&self) -> StoreResult<()> {
        if self.api_version != "windward/v1" {
            return Err(StoreError::InvalidApiVersion(self.api_version.clone()));
        }
        if self.kind != "HazardStore" {
            return Err(StoreError::InvalidKind(self.kind.clone()));
        }
        Ok(())
    }

    /// Builder method: set the local data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Builder method: set remote credentials.
    pub fn with_credentials(mut self, credentials: StoreCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Builder method: select the flood data vendor.
    pub fn with_flood_model(mut self, provider: FloodModelProvider) -> Self {
        self.flood_model = provider;
        self
    }

    /// Builder method: set the default hazard type for untyped resources.
    pub fn with_default_hazard_type(mut self, hazard_type: HazardType) -> Self {
        self.default_hazard_type = Some(hazard_type);
        self
    }
}
