//! Windward Kernel
//!
//! The impact calculation kernel: combines hazard intensity distributions
//! with vulnerability models over a batch of assets and assembles ordered,
//! per-pair results with typed failure containment.

pub mod assets;
pub mod calculation;
pub mod curve;
pub mod error;
pub mod hazard;
pub mod impact;
pub mod intensity;
pub mod vulnerability;

pub use assets::{Asset, AssetClass};
pub use calculation::{CalculationResult, Outcome, ResultSet, Summary, calculate_impacts};
pub use curve::{ConditionalImpact, Response, ResponseCurve, UncertainResponse};
pub use error::{Error, Result};
pub use hazard::{HazardModel, HazardRequest};
pub use impact::{EmptyReason, ImpactDistrib, ImpactDistribution, ImpactKind};
pub use intensity::{ExceedanceCurve, IntensityDistribution};
pub use vulnerability::{
    ModelConfig, ModelHandle, VulnerabilityModel, VulnerabilityRegistry, compose_mixture,
};
