//! Scenario/year keys
//!
//! Hazard data and vulnerability model registrations are keyed by a climate
//! scenario name and a calendar year. External configuration writes the pair
//! as a single label of the form `"<scenario>_<year>"`; the label is split
//! on the first underscore, so scenario names themselves must not contain
//! one (`historical_1985`, `ssp585_2050`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a `"<scenario>_<year>"` label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scenario key `{key}`: {reason}")]
pub struct ScenarioKeyError {
    /// The offending label as received.
    pub key: String,
    /// Human-readable parse failure description.
    pub reason: String,
}

/// A (scenario, year) pair identifying one slice of hazard data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioYear {
    /// Climate scenario name (e.g. `historical`, `ssp245`, `ssp585`).
    pub scenario: String,
    /// Calendar year the data epoch is centred on.
    pub year: i32,
}

impl ScenarioYear {
    /// Creates a new key from parts.
    pub fn new(scenario: impl Into<String>, year: i32) -> Self {
        Self {
            scenario: scenario.into(),
            year,
        }
    }

    /// Parse a `"<scenario>_<year>"` label, splitting on the first underscore.
    pub fn parse_label(label: &str) -> Result<Self, ScenarioKeyError> {
        let (scenario, year_part) = label.split_once('_').ok_or_else(|| ScenarioKeyError {
            key: label.to_string(),
            reason: "expected `<scenario>_<year>`".to_string(),
        })?;
        if scenario.is_empty() {
            return Err(ScenarioKeyError {
                key: label.to_string(),
                reason: "scenario name is empty".to_string(),
            });
        }
        let year: i32 = year_part.parse().map_err(|_| ScenarioKeyError {
            key: label.to_string(),
            reason: format!("year `{year_part}` is not an integer"),
        })?;
        if year < 0 {
            return Err(ScenarioKeyError {
                key: label.to_string(),
                reason: format!("year {year} is negative"),
            });
        }
        Ok(Self::new(scenario, year))
    }
}

impl FromStr for ScenarioYear {
    type Err = ScenarioKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s)
    }
}

impl fmt::Display for ScenarioYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.scenario, self.year)
    }
}
