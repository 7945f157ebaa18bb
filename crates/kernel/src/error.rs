//! Kernel errors
//!
//! # Error Categories
//!
//! - Missing hazard data is `DataUnavailable` and is recorded per affected
//!   (asset, model) pair; it never aborts the rest of a batch.
//! - Degenerate numeric results (zero total probability, NaN, negative
//!   probability) are `Computation` errors. These signal a defective model
//!   or configuration and are never silently corrected.
//! - Absence of an applicable vulnerability model is *not* an error; it is
//!   the empty impact state (see [`crate::impact::EmptyReason`]).

use thiserror::Error;

use windward_foundation::{HazardType, ScenarioKeyError, ScenarioYear};

/// Kernel result type
pub type Result<T> = std::result::Result<T, Error>;

/// Kernel errors
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "hazard data unavailable for {hazard_type} at ({latitude}, {longitude}) under {scenario_year}: {message}"
    )]
    DataUnavailable {
        hazard_type: HazardType,
        latitude: f64,
        longitude: f64,
        scenario_year: ScenarioYear,
        message: String,
    },

    #[error("computation failed in {context}: {message}")]
    Computation { context: String, message: String },

    #[error("invalid distribution: {message}")]
    InvalidDistribution { message: String },

    #[error("{0}")]
    InvalidScenarioKey(#[from] ScenarioKeyError),
}

impl Error {
    /// Shorthand for a `Computation` error.
    pub fn computation(context: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Computation {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidDistribution` error.
    pub fn invalid_distribution(message: impl Into<String>) -> Self {
        Error::InvalidDistribution {
            message: message.into(),
        }
    }
}
