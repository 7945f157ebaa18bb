//! Impact calculation orchestrator
//!
//! Drives the asset x vulnerability-model cross product for one scenario
//! and year. Each (asset, model) pair moves through
//! `PENDING -> FETCHING_HAZARD -> EVALUATING -> DONE`, short-circuiting to
//! `NO_MODEL` when the registry has nothing for the asset's class, or
//! terminating in `ERROR` when the hazard fetch or the evaluation fails.
//! Terminal outcomes are recorded per pair; one pair's failure never aborts
//! the rest of the batch, and there are no retries here.
//!
//! Execution runs in three phases: plan (walk assets in input order and
//! snapshot their applicable models), evaluate (the pure per-pair work on a
//! rayon pool), and apply (sequential assembly so the result set preserves
//! asset input order deterministically).

use std::fmt;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info, instrument, trace, warn};

use windward_foundation::HazardType;

use crate::assets::Asset;
use crate::error::Error;
use crate::hazard::{HazardModel, HazardRequest};
use crate::impact::{EmptyReason, ImpactDistrib, ImpactDistribution};
use crate::vulnerability::{ModelHandle, VulnerabilityModel, VulnerabilityRegistry};

/// Terminal outcome of one (asset, model) pair.
#[derive(Debug)]
pub enum Outcome {
    /// Evaluation produced a computed impact distribution.
    Done(ImpactDistrib),
    /// No impact could be computed; an expected state, not a failure.
    Empty(EmptyReason),
    /// The hazard fetch or the evaluation failed.
    Failed(Error),
}

impl Outcome {
    /// The computed distribution, if the pair completed.
    pub fn distribution(&self) -> Option<&ImpactDistrib> {
        match self {
            Outcome::Done(d) => Some(d),
            _ => None,
        }
    }

    /// The failure, if the pair failed.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done(d) => write!(f, "{} (mean {:.6})", d.kind(), d.mean_impact()),
            Outcome::Empty(reason) => write!(f, "no result ({reason})"),
            Outcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// One row of the batch result set.
#[derive(Debug)]
pub struct CalculationResult {
    /// Index of the asset in the input slice.
    pub asset_index: usize,
    /// Name of the evaluated model; `None` for no-model rows.
    pub model: Option<String>,
    /// Hazard type the model consumed; `None` for no-model rows.
    pub hazard_type: Option<HazardType>,
    /// Terminal outcome for this pair.
    pub outcome: Outcome,
}

/// Derived batch diagnostics; computed by query, never accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub done: usize,
    pub empty: usize,
    pub failed: usize,
    pub empty_no_model: usize,
    pub empty_no_coverage: usize,
    pub empty_missing_attribute: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} done, {} no result, {} failed",
            self.done, self.empty, self.failed
        )
    }
}

/// Ordered results of one `calculate_impacts` call, keyed by
/// (asset index, model slot). Iteration order is asset input order.
#[derive(Debug)]
pub struct ResultSet {
    scenario: String,
    year: i32,
    results: IndexMap<(usize, usize), CalculationResult>,
}

impl ResultSet {
    fn new(scenario: &str, year: i32) -> Self {
        Self {
            scenario: scenario.to_string(),
            year,
            results: IndexMap::new(),
        }
    }

    /// Scenario this batch was calculated under.
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Year this batch was calculated under.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of (asset, model) rows.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when the batch had no assets.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// All rows, in insertion order (asset input order).
    pub fn iter(&self) -> impl Iterator<Item = &CalculationResult> {
        self.results.values()
    }

    /// The row for one (asset index, model slot) pair.
    pub fn get(&self, asset_index: usize, model_slot: usize) -> Option<&CalculationResult> {
        self.results.get(&(asset_index, model_slot))
    }

    /// Rows belonging to one asset.
    pub fn for_asset(&self, asset_index: usize) -> impl Iterator<Item = &CalculationResult> {
        self.results
            .values()
            .filter(move |row| row.asset_index == asset_index)
    }

    /// Count of pairs that produced a computed distribution.
    pub fn done_count(&self) -> usize {
        self.iter().filter(|r| matches!(r.outcome, Outcome::Done(_))).count()
    }

    /// Count of pairs that ended in the empty state.
    pub fn empty_count(&self) -> usize {
        self.iter().filter(|r| matches!(r.outcome, Outcome::Empty(_))).count()
    }

    /// Count of pairs that ended in the empty state for one reason.
    pub fn empty_count_by(&self, reason: EmptyReason) -> usize {
        self.iter()
            .filter(|r| matches!(r.outcome, Outcome::Empty(got) if got == reason))
            .count()
    }

    /// Count of pairs that failed.
    pub fn failed_count(&self) -> usize {
        self.iter().filter(|r| matches!(r.outcome, Outcome::Failed(_))).count()
    }

    /// Derived diagnostics for the whole batch.
    pub fn summary(&self) -> Summary {
        Summary {
            done: self.done_count(),
            empty: self.empty_count(),
            failed: self.failed_count(),
            empty_no_model: self.empty_count_by(EmptyReason::NoApplicableModel),
            empty_no_coverage: self.empty_count_by(EmptyReason::NoHazardCoverage),
            empty_missing_attribute: self.empty_count_by(EmptyReason::MissingAttribute),
        }
    }
}

enum Task {
    NoModel { asset_index: usize },
    Evaluate { asset_index: usize, slot: usize, model: ModelHandle },
}

/// Calculate impacts for every asset under one scenario and year.
///
/// Returns one row per (asset, model) pair, or one empty row for assets
/// with no applicable model. Always returns a result set; failures are
/// recorded per pair, never raised for the batch. Callers working across
/// several scenarios invoke this once per scenario so one scenario's
/// failures stay contained to its own result set.
#[instrument(skip(assets, hazard_model, registry), fields(assets = assets.len()))]
pub fn calculate_impacts(
    assets: &[Asset],
    hazard_model: &dyn HazardModel,
    registry: &VulnerabilityRegistry,
    scenario: &str,
    year: i32,
) -> ResultSet {
    // Plan: walk assets in input order and snapshot the applicable models
    // so evaluation never touches the registry.
    let mut tasks: Vec<Task> = Vec::with_capacity(assets.len());
    for (asset_index, asset) in assets.iter().enumerate() {
        let models = registry.models_for(asset.class, scenario, year);
        if models.is_empty() {
            debug!(asset = asset_index, class = %asset.class, "no applicable models");
            tasks.push(Task::NoModel { asset_index });
        } else {
            for (slot, model) in models.iter().enumerate() {
                tasks.push(Task::Evaluate {
                    asset_index,
                    slot,
                    model: ModelHandle::clone(model),
                });
            }
        }
    }

    // Evaluate: pure per-pair work, parallel over the cross product.
    let rows: Vec<CalculationResult> = tasks
        .par_iter()
        .map(|task| match task {
            Task::NoModel { asset_index } => CalculationResult {
                asset_index: *asset_index,
                model: None,
                hazard_type: None,
                outcome: Outcome::Empty(EmptyReason::NoApplicableModel),
            },
            Task::Evaluate { asset_index, slot: _, model } => evaluate_pair(
                *asset_index,
                &assets[*asset_index],
                model.as_ref(),
                hazard_model,
                scenario,
                year,
            ),
        })
        .collect();

    // Apply results sequentially for determinism.
    let mut results = ResultSet::new(scenario, year);
    for (task, row) in tasks.iter().zip(rows) {
        let slot = match task {
            Task::NoModel { .. } => 0,
            Task::Evaluate { slot, .. } => *slot,
        };
        if let Outcome::Failed(err) = &row.outcome {
            warn!(
                asset = row.asset_index,
                model = row.model.as_deref().unwrap_or("-"),
                error = %err,
                "pair failed"
            );
        }
        results.results.insert((row.asset_index, slot), row);
    }

    let summary = results.summary();
    info!(
        pairs = results.len(),
        done = summary.done,
        empty = summary.empty,
        failed = summary.failed,
        "impact calculation complete"
    );
    results
}

fn evaluate_pair(
    asset_index: usize,
    asset: &Asset,
    model: &dyn VulnerabilityModel,
    hazard_model: &dyn HazardModel,
    scenario: &str,
    year: i32,
) -> CalculationResult {
    let hazard_type = model.hazard_type();
    trace!(asset = asset_index, model = model.name(), "fetching hazard");
    let request = HazardRequest::for_asset(asset, hazard_type, scenario, year);
    let outcome = match hazard_model.hazard_distribution(&request) {
        Err(err) => Outcome::Failed(err),
        Ok(hazard) => {
            trace!(asset = asset_index, model = model.name(), "evaluating");
            match model.evaluate(&hazard, asset) {
                Err(err) => Outcome::Failed(err),
                Ok(ImpactDistribution::Computed(d)) => Outcome::Done(d),
                Ok(ImpactDistribution::Empty(reason)) => Outcome::Empty(reason),
            }
        }
    };
    CalculationResult {
        asset_index,
        model: Some(model.name().to_string()),
        hazard_type: Some(hazard_type),
        outcome,
    }
}
