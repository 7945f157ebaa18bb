//! Windward Foundation
//!
//! Core foundational types for the windward physical-risk engine.
//! Provides hazard categories, scenario/year keys, and deterministic
//! statistical primitives required across crates.

pub mod hazard;
pub mod scenario;
pub mod stats;

// Re-export core types at crate root
pub use hazard::HazardType;
pub use scenario::{ScenarioKeyError, ScenarioYear};
pub use stats::{PROB_TOLERANCE, erf, norm_cdf};
