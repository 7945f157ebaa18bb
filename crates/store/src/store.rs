//! Gridded hazard arrays and the store serving them.
//!
//! A [`HazardArray`] holds one (hazard type, scenario, year) slice of data:
//! a regular latitude/longitude grid of intensity values per return
//! period. The [`HazardStore`] keys arrays by source path and either holds
//! them in memory or decodes them lazily from a directory of YAML files
//! behind a read-through cache. [`GriddedHazardModel`] turns store lookups
//! into intensity distributions via exceedance differencing.
//!
//! Cache discipline: arrays are published to the cache only after a full
//! decode, behind `Arc`, so concurrent readers never observe a partial
//! write. Two threads racing on the same path decode twice and publish
//! identical values, which is harmless.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use windward_kernel::{
    ExceedanceCurve, HazardModel, HazardRequest, IntensityDistribution, Result,
};

use crate::config::{StoreConfig, StoreError, StoreResult};
use crate::inventory::{Inventory, SourcePaths};

/// One slice of gridded hazard data.
///
/// `values` is row-major `[return_period][latitude][longitude]`. Axes are
/// strictly ascending cell centres. Cells may carry the `nodata` sentinel
/// (or NaN) to mark locations without data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardArray {
    /// Return periods in years, ascending, each >= 1.
    pub return_periods: Vec<f64>,
    /// Cell-centre latitudes, ascending.
    pub latitudes: Vec<f64>,
    /// Cell-centre longitudes, ascending.
    pub longitudes: Vec<f64>,
    /// Intensity values, `return_periods.len() * latitudes.len() *
    /// longitudes.len()` entries.
    pub values: Vec<f64>,
    /// Sentinel marking cells with no data. NaN is always treated as
    /// missing, with or without a sentinel.
    #[serde(default)]
    pub nodata: Option<f64>,
}

impl HazardArray {
    /// Validate shape and axis ordering. Arrays reach lookups only after
    /// passing this, so indexing by axis position cannot go out of bounds.
    pub fn validate(&self) -> StoreResult<()> {
        validate_axis("returnPeriods", &self.return_periods)?;
        validate_axis("latitudes", &self.latitudes)?;
        validate_axis("longitudes", &self.longitudes)?;
        if let Some(rp) = self.return_periods.iter().find(|rp| **rp < 1.0) {
            return Err(StoreError::MalformedArray(format!(
                "return period {rp} is below 1 year"
            )));
        }
        let expected = self.return_periods.len() * self.latitudes.len() * self.longitudes.len();
        if self.values.len() != expected {
            return Err(StoreError::MalformedArray(format!(
                "expected {} values, got {}",
                expected,
                self.values.len()
            )));
        }
        Ok(())
    }

    fn index(&self, rp_idx: usize, lat_idx: usize, lon_idx: usize) -> usize {
        (rp_idx * self.latitudes.len() + lat_idx) * self.longitudes.len() + lon_idx
    }

    fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || self.nodata.is_some_and(|sentinel| value == sentinel)
    }

    /// The (intensity, exceedance probability) curve at the cell nearest
    /// to the coordinates.
    ///
    /// Returns `None` when the point falls outside the grid, and an empty
    /// curve when the nearest cell is entirely masked. Runs of equal
    /// intensity collapse to the last (rarest) entry so the curve stays
    /// strictly ascending for dry cells.
    pub fn curve_at(&self, latitude: f64, longitude: f64) -> Option<Vec<(f64, f64)>> {
        let lat_idx = nearest_cell(&self.latitudes, latitude)?;
        let lon_idx = nearest_cell(&self.longitudes, longitude)?;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(self.return_periods.len());
        for (rp_idx, rp) in self.return_periods.iter().enumerate() {
            let value = self.values[self.index(rp_idx, lat_idx, lon_idx)];
            if self.is_nodata(value) {
                continue;
            }
            let exceedance = 1.0 / rp;
            if let Some(last) = pairs.last_mut() {
                if last.0 == value {
                    last.1 = exceedance;
                    continue;
                }
            }
            pairs.push((value, exceedance));
        }
        Some(pairs)
    }
}

fn validate_axis(name: &str, cells: &[f64]) -> StoreResult<()> {
    if cells.is_empty() {
        return Err(StoreError::MalformedArray(format!("{name} axis is empty")));
    }
    for c in cells {
        if !c.is_finite() {
            return Err(StoreError::MalformedArray(format!(
                "{name} axis value {c} is not finite"
            )));
        }
    }
    for pair in cells.windows(2) {
        if pair[1] <= pair[0] {
            return Err(StoreError::MalformedArray(format!(
                "{name} axis must be strictly ascending, got {} then {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

/// Nearest cell centre to `x`, or `None` when `x` lies more than half a
/// cell width beyond the grid edge or between unusually spaced cells.
fn nearest_cell(cells: &[f64], x: f64) -> Option<usize> {
    if cells.is_empty() || !x.is_finite() {
        return None;
    }
    let n = cells.len();
    let i = cells.partition_point(|c| *c < x);
    let j = match (i.checked_sub(1), (i < n).then_some(i)) {
        (Some(lo), Some(hi)) => {
            if x - cells[lo] <= cells[hi] - x {
                lo
            } else {
                hi
            }
        }
        (Some(lo), None) => lo,
        (None, Some(hi)) => hi,
        (None, None) => return None,
    };
    // Cell width from the gap on the side the point falls on; single-cell
    // grids assume one degree.
    let width = if x >= cells[j] {
        if j + 1 < n {
            cells[j + 1] - cells[j]
        } else if j > 0 {
            cells[j] - cells[j - 1]
        } else {
            1.0
        }
    } else if j > 0 {
        cells[j] - cells[j - 1]
    } else if j + 1 < n {
        cells[j + 1] - cells[j]
    } else {
        1.0
    };
    ((x - cells[j]).abs() <= 0.5 * width).then_some(j)
}

/// Collection of hazard arrays keyed by source path, in memory or lazily
/// decoded from a directory of `<path>.yaml` files.
pub struct HazardStore {
    root: Option<PathBuf>,
    arrays: RwLock<HashMap<String, Arc<HazardArray>>>,
}

impl HazardStore {
    /// A store holding only explicitly inserted arrays.
    pub fn in_memory() -> Self {
        Self {
            root: None,
            arrays: RwLock::new(HashMap::new()),
        }
    }

    /// A store backed by a directory; arrays decode on first access.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        debug!(root = %root.display(), "hazard store opened");
        Self {
            root: Some(root),
            arrays: RwLock::new(HashMap::new()),
        }
    }

    /// Insert an array under a source path, validating it first.
    pub fn insert(&self, path: impl Into<String>, array: HazardArray) -> StoreResult<()> {
        array.validate()?;
        if let Ok(mut map) = self.arrays.write() {
            map.insert(path.into(), Arc::new(array));
        }
        Ok(())
    }

    /// The array at a source path, from cache or by decoding the backing
    /// file. Missing or malformed files degrade to `None`.
    pub fn array(&self, path: &str) -> Option<Arc<HazardArray>> {
        if let Some(hit) = self.arrays.read().ok()?.get(path) {
            return Some(Arc::clone(hit));
        }
        let root = self.root.as_ref()?;
        let file = root.join(format!("{path}.yaml"));
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(err) => {
                trace!(file = %file.display(), %err, "array file not readable");
                return None;
            }
        };
        let array: HazardArray = match serde_yaml::from_str(&content) {
            Ok(array) => array,
            Err(err) => {
                warn!(file = %file.display(), %err, "failed to parse hazard array");
                return None;
            }
        };
        if let Err(err) = array.validate() {
            warn!(file = %file.display(), %err, "rejected hazard array");
            return None;
        }
        let array = Arc::new(array);
        if let Ok(mut map) = self.arrays.write() {
            map.insert(path.to_string(), Arc::clone(&array));
        }
        Some(array)
    }
}

/// Hazard model serving intensity distributions from gridded arrays.
pub struct GriddedHazardModel {
    store: HazardStore,
    paths: SourcePaths,
}

impl GriddedHazardModel {
    /// Creates a model over a store and resolved source paths.
    pub fn new(store: HazardStore, paths: SourcePaths) -> Self {
        Self { store, paths }
    }

    /// Builds a model from configuration: resolve source paths against
    /// the inventory and open the configured data directory, if any.
    pub fn from_config(config: &StoreConfig, inventory: &Inventory) -> Self {
        let paths = SourcePaths::resolve(inventory, config);
        let store = match &config.data_dir {
            Some(dir) => HazardStore::open(dir.clone()),
            None => {
                if config.credentials.as_ref().is_some_and(|c| c.is_complete()) {
                    debug!("credentials configured without a data directory; no arrays will load");
                }
                HazardStore::in_memory()
            }
        };
        Self { store, paths }
    }

    /// Access the underlying store, e.g. to insert arrays.
    pub fn store(&self) -> &HazardStore {
        &self.store
    }

    /// The resolved source paths.
    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }
}

impl HazardModel for GriddedHazardModel {
    #[instrument(
        skip(self, request),
        fields(
            hazard = %request.hazard_type,
            scenario = %request.scenario,
            year = request.year,
        )
    )]
    fn hazard_distribution(&self, request: &HazardRequest) -> Result<IntensityDistribution> {
        let Some(path) =
            self.paths
                .path_for(request.hazard_type, &request.scenario, request.year)
        else {
            return Err(request.unavailable("no source path for hazard type"));
        };
        trace!(path = %path, "serving hazard request");
        let Some(array) = self.store.array(&path) else {
            return Err(request.unavailable(format!("no data at `{path}`")));
        };
        let Some(pairs) = array.curve_at(request.latitude, request.longitude) else {
            return Err(request.unavailable("coordinates outside grid coverage"));
        };
        if pairs.is_empty() {
            // Masked cell: structurally present, no usable data.
            return Ok(IntensityDistribution::no_coverage(request.hazard_type));
        }
        let (intensities, exceedance): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let curve = ExceedanceCurve::new(intensities, exceedance)
            .map_err(|err| request.unavailable(format!("malformed curve data: {err}")))?;
        curve.to_intensity_distribution(request.hazard_type)
    }
}

#[cfg(test)]
mod tests {
    use windward_foundation::HazardType;

    use super::*;

    /// 2x2 grid: (50,4) wet, (50,5) dry, (51,4) masked, (51,5) wet.
    fn test_array() -> HazardArray {
        HazardArray {
            return_periods: vec![10.0, 100.0],
            latitudes: vec![50.0, 51.0],
            longitudes: vec![4.0, 5.0],
            values: vec![
                0.5, 0.0, -9999.0, 0.2, // 10-year depths
                1.0, 0.0, -9999.0, 0.8, // 100-year depths
            ],
            nodata: Some(-9999.0),
        }
    }

    fn test_model() -> GriddedHazardModel {
        let model = GriddedHazardModel::from_config(&StoreConfig::new(), &Inventory::embedded());
        model
            .store()
            .insert("inundation/wri/v2/inunriver_ssp585_2050", test_array())
            .unwrap();
        model
    }

    fn request(latitude: f64, longitude: f64) -> HazardRequest {
        HazardRequest {
            latitude,
            longitude,
            hazard_type: HazardType::RiverineInundation,
            scenario: "ssp585".to_string(),
            year: 2050,
        }
    }

    #[test]
    fn test_wet_cell_distribution() {
        let model = test_model();
        let d = model.hazard_distribution(&request(50.1, 4.2)).unwrap();
        assert_eq!(d.support(), &[0.0, 0.5, 1.0]);
        let p = d.probabilities();
        assert!((p[0] - 0.9).abs() < 1e-12);
        assert!((p[1] - 0.09).abs() < 1e-12);
        assert!((p[2] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_dry_cell_is_zero_point_mass() {
        let model = test_model();
        let d = model.hazard_distribution(&request(50.0, 5.0)).unwrap();
        // Dry cell means "floods never reach here": certain zero depth,
        // not missing data.
        assert_eq!(d.support(), &[0.0]);
        assert_eq!(d.probabilities(), &[1.0]);
        assert!(d.has_coverage());
    }

    #[test]
    fn test_masked_cell_has_no_coverage() {
        let model = test_model();
        let d = model.hazard_distribution(&request(51.0, 4.0)).unwrap();
        assert!(!d.has_coverage());
    }

    #[test]
    fn test_outside_grid_is_unavailable() {
        let model = test_model();
        let err = model.hazard_distribution(&request(10.0, 4.0)).unwrap_err();
        assert!(err.to_string().contains("outside grid coverage"));
    }

    #[test]
    fn test_unknown_scenario_is_unavailable() {
        let model = test_model();
        let mut req = request(50.0, 4.0);
        req.scenario = "ssp119".to_string();
        let err = model.hazard_distribution(&req).unwrap_err();
        assert!(err.to_string().contains("inunriver_ssp119_2050"));
    }

    #[test]
    fn test_nearest_cell_tolerance() {
        let cells = [50.0, 51.0, 52.0];
        assert_eq!(nearest_cell(&cells, 51.0), Some(1));
        assert_eq!(nearest_cell(&cells, 51.4), Some(1));
        assert_eq!(nearest_cell(&cells, 51.6), Some(2));
        // Half a cell of slack beyond the edges, no more.
        assert_eq!(nearest_cell(&cells, 49.6), Some(0));
        assert_eq!(nearest_cell(&cells, 49.4), None);
        assert_eq!(nearest_cell(&cells, 52.4), Some(2));
        assert_eq!(nearest_cell(&cells, 52.6), None);
        assert_eq!(nearest_cell(&cells, f64::NAN), None);
    }

    #[test]
    fn test_insert_rejects_malformed() {
        let store = HazardStore::in_memory();
        let mut array = test_array();
        array.values.pop();
        let err = store.insert("broken", array).unwrap_err();
        assert!(matches!(err, StoreError::MalformedArray(_)));
    }

    #[test]
    fn test_directory_read_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = "inundation/wri/v2/inunriver_ssp585_2050";
        let file = dir.path().join(format!("{path}.yaml"));
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, serde_yaml::to_string(&test_array()).unwrap()).unwrap();

        let store = HazardStore::open(dir.path());
        let first = store.array(path).unwrap();
        let second = store.array(path).unwrap();
        // Second read hits the cache, not the filesystem.
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.return_periods, vec![10.0, 100.0]);
    }

    #[test]
    fn test_concurrent_reads_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = "inundation/wri/v2/inunriver_ssp585_2050";
        let file = dir.path().join(format!("{path}.yaml"));
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, serde_yaml::to_string(&test_array()).unwrap()).unwrap();

        let paths = SourcePaths::resolve(&Inventory::embedded(), &StoreConfig::new());
        let model = GriddedHazardModel::new(HazardStore::open(dir.path()), paths);

        let expected = model.hazard_distribution(&request(50.1, 4.2)).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let got = model.hazard_distribution(&request(50.1, 4.2)).unwrap();
                    assert_eq!(got.support(), expected.support());
                    assert_eq!(got.probabilities(), expected.probabilities());
                });
            }
        });
    }

    #[test]
    fn test_malformed_file_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = "inundation/wri/v2/inunriver_ssp585_2050";
        let file = dir.path().join(format!("{path}.yaml"));
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "returnPeriods: [not, numbers]").unwrap();

        let store = HazardStore::open(dir.path());
        assert!(store.array(path).is_none());

        let paths = SourcePaths::resolve(&Inventory::embedded(), &StoreConfig::new());
        let model = GriddedHazardModel::new(store, paths);
        assert!(model.hazard_distribution(&request(50.0, 4.0)).is_err());
    }
}
