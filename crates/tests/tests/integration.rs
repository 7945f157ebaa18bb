//! Integration tests for end-to-end portfolio calculation.
//!
//! These tests verify the full pipeline:
//! Configure → Seed arrays → Calculate → Verify ordered results
//!
//! The fixture grid turns a uniform depth `v` into the hazard
//! distribution `{0: 0.9, v: 0.1}`, so expectations reduce to reading
//! the shipped damage curves at `v`.

use windward_foundation::HazardType;
use windward_kernel::{Asset, AssetClass, EmptyReason, Outcome};
use windward_store::{GriddedHazardModel, Inventory, StoreConfig};
use windward_tests::{TestHarness, house, plant, warehouse};

/// A mixed portfolio produces one row per (asset, model) pair, in asset
/// input order, with values read off the shipped curves.
///
/// At 1 m flood depth: thermal damage is 0.28, so the plant's riverine
/// impact is {0: 0.9, 0.28: 0.1} with mean 0.028. Building damage is
/// N(0.40, 0.12), giving a mean near 0.9 * 0 + 0.1 * 0.40 = 0.04.
#[test]
fn test_mixed_portfolio_end_to_end() {
    let harness = TestHarness::new(&["ssp585_2050"]);
    harness.seed_flood_scenario("ssp585", 2050, 1.0);

    let assets = [plant(), house(), warehouse()];
    let set = harness.run(&assets, "ssp585", 2050);

    assert_eq!(set.scenario(), "ssp585");
    assert_eq!(set.year(), 2050);
    // Four thermal models, one building model, one no-model row.
    assert_eq!(set.len(), 6);

    let riverine = set.get(0, 0).unwrap();
    assert_eq!(riverine.model.as_deref(), Some("thermal_power/riverine_inundation"));
    let d = riverine.outcome.distribution().unwrap();
    assert_eq!(d.support(), &[0.0, 0.28]);
    assert!((d.probabilities()[0] - 0.9).abs() < 1e-12);
    assert!((d.probabilities()[1] - 0.1).abs() < 1e-12);
    assert!((d.mean_impact() - 0.028).abs() < 1e-12);

    // Dry coast, no drought, no warming: real zero-impact results.
    for slot in 1..4 {
        let row = set.get(0, slot).unwrap();
        let d = row.outcome.distribution().unwrap();
        assert_eq!(d.mean_impact(), 0.0, "slot {slot} should be a zero impact");
    }

    let building = set.get(1, 0).unwrap();
    let d = building.outcome.distribution().unwrap();
    assert!((d.mean_impact() - 0.04).abs() < 0.005);

    // The warehouse still gets a row, flagged rather than silently absent.
    let no_model = set.get(2, 0).unwrap();
    assert!(no_model.model.is_none());
    assert!(matches!(
        no_model.outcome,
        Outcome::Empty(EmptyReason::NoApplicableModel)
    ));

    assert_eq!(set.done_count(), 5);
    assert_eq!(set.empty_count_by(EmptyReason::NoApplicableModel), 1);
    assert_eq!(set.failed_count(), 0);
}

/// Rows come back in asset input order regardless of class.
#[test]
fn test_results_follow_input_order() {
    let harness = TestHarness::new(&["ssp585_2050"]);
    harness.seed_flood_scenario("ssp585", 2050, 1.0);

    let assets = [house(), plant()];
    let set = harness.run(&assets, "ssp585", 2050);

    let order: Vec<usize> = set.iter().map(|row| row.asset_index).collect();
    assert_eq!(order, [0, 1, 1, 1, 1]);
    assert_eq!(
        set.get(0, 0).unwrap().model.as_deref(),
        Some("real_estate/riverine_inundation")
    );
}

/// A scenario with missing data fails alone; the scenarios before and
/// after it in the loop still calculate.
#[test]
fn test_middle_scenario_failure_is_isolated() {
    let labels = ["ssp126_2050", "ssp585_2050", "ssp245_2050"];
    let harness = TestHarness::new(&labels);
    harness.seed_uniform(HazardType::RiverineInundation, "ssp126", 2050, 1.0);
    harness.seed_uniform(HazardType::RiverineInundation, "ssp245", 2050, 1.0);

    let assets = [house()];
    let mut means = Vec::new();
    for scenario in ["ssp126", "ssp585", "ssp245"] {
        let set = harness.run(&assets, scenario, 2050);
        assert_eq!(set.len(), 1);
        let row = set.get(0, 0).unwrap();
        match scenario {
            "ssp585" => {
                assert_eq!(set.failed_count(), 1);
                let message = row.outcome.error().unwrap().to_string();
                assert!(message.contains("ssp585_2050"), "error should name the key: {message}");
            }
            _ => {
                assert_eq!(set.failed_count(), 0);
                means.push(row.outcome.distribution().unwrap().mean_impact());
            }
        }
    }
    // Identical data on both sides of the failure, identical results.
    assert_eq!(means[0], means[1]);
}

/// A plant without a capacity attribute gets empty inundation results
/// while its attribute-free models still calculate.
#[test]
fn test_missing_capacity_surfaces_as_empty() {
    let harness = TestHarness::new(&["ssp585_2050"]);
    harness.seed_flood_scenario("ssp585", 2050, 1.0);

    let uncharted = Asset::new(50.0, 4.0, AssetClass::ThermalPowerPlant);
    let set = harness.run(&[uncharted], "ssp585", 2050);

    assert_eq!(set.len(), 4);
    assert_eq!(set.empty_count_by(EmptyReason::MissingAttribute), 2);
    assert_eq!(set.done_count(), 2);
    assert_eq!(set.failed_count(), 0);
}

/// Repeating a calculation yields bit-identical distributions.
#[test]
fn test_calculation_is_deterministic() {
    let harness = TestHarness::new(&["ssp585_2050"]);
    harness.seed_flood_scenario("ssp585", 2050, 1.0);

    let assets = [plant(), house()];
    let first = harness.run(&assets, "ssp585", 2050);
    let second = harness.run(&assets, "ssp585", 2050);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.asset_index, b.asset_index);
        assert_eq!(a.model, b.model);
        match (a.outcome.distribution(), b.outcome.distribution()) {
            (Some(da), Some(db)) => {
                assert_eq!(da.support(), db.support());
                assert_eq!(da.probabilities(), db.probabilities());
            }
            (None, None) => {}
            _ => panic!("outcome kind changed between runs"),
        }
    }
}

/// Zero hazard everywhere still produces computed distributions; "no
/// damage" and "no result" stay distinguishable at batch level.
#[test]
fn test_dry_world_keeps_zero_impacts_computed() {
    let harness = TestHarness::new(&["ssp585_2050"]);
    harness.seed_flood_scenario("ssp585", 2050, 0.0);

    let set = harness.run(&[plant()], "ssp585", 2050);

    assert_eq!(set.done_count(), 4);
    assert_eq!(set.empty_count(), 0);
    for row in set.iter() {
        let d = row.outcome.distribution().unwrap();
        assert_eq!(d.mean_impact(), 0.0);
    }
}

/// Fully masked data yields empty results with the no-coverage reason,
/// never failures.
#[test]
fn test_masked_world_is_empty_not_failed() {
    let harness = TestHarness::new(&["ssp585_2050"]);
    for hazard_type in [
        HazardType::RiverineInundation,
        HazardType::CoastalInundation,
        HazardType::Drought,
        HazardType::ChronicHeat,
    ] {
        harness.seed_masked(hazard_type, "ssp585", 2050);
    }

    let set = harness.run(&[plant()], "ssp585", 2050);

    assert_eq!(set.done_count(), 0);
    assert_eq!(set.failed_count(), 0);
    assert_eq!(set.empty_count_by(EmptyReason::NoHazardCoverage), 4);
}

/// Config file → data directory → results, with the array decoded from
/// YAML on first use.
#[test]
fn test_directory_backed_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let array_file = dir
        .path()
        .join("inundation/wri/v2/inunriver_ssp585_2050.yaml");
    std::fs::create_dir_all(array_file.parent().unwrap()).unwrap();
    std::fs::write(
        &array_file,
        "returnPeriods: [10.0]\n\
         latitudes: [50.0, 51.0]\n\
         longitudes: [4.0, 5.0]\n\
         values: [1.0, 1.0, 1.0, 1.0]\n",
    )
    .unwrap();

    let config_file = dir.path().join("store.yaml");
    std::fs::write(
        &config_file,
        format!(
            "apiVersion: windward/v1\n\
             kind: HazardStore\n\
             dataDir: {}\n",
            dir.path().display()
        ),
    )
    .unwrap();

    let config = StoreConfig::load(&config_file).unwrap();
    let model = GriddedHazardModel::from_config(&config, &Inventory::embedded());
    let harness = TestHarness::with_model(model, &["ssp585_2050"]);

    let first = harness.run(&[house()], "ssp585", 2050);
    assert_eq!(first.done_count(), 1);
    let mean = first.get(0, 0).unwrap().outcome.distribution().unwrap().mean_impact();
    assert!((mean - 0.04).abs() < 0.005);

    // Second run reads the cached array and reproduces the result.
    let second = harness.run(&[house()], "ssp585", 2050);
    assert_eq!(
        first.get(0, 0).unwrap().outcome.distribution().unwrap().support(),
        second.get(0, 0).unwrap().outcome.distribution().unwrap().support()
    );
}
