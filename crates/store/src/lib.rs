//! Windward Store
//!
//! Hazard data access: configuration, the inventory of known data
//! sources, and the gridded store serving intensity distributions to the
//! calculation kernel.
//!
//! The flow is config to paths to arrays. [`StoreConfig`] selects a data
//! directory and flood model provider, [`SourcePaths`] resolves the
//! [`Inventory`] into one path template per hazard type, and
//! [`GriddedHazardModel`] looks arrays up in a [`HazardStore`] and
//! converts their return-period curves into intensity distributions.

pub mod config;
pub mod inventory;
pub mod store;

pub use config::{FloodModelProvider, StoreConfig, StoreCredentials, StoreError, StoreResult};
pub use inventory::{HazardResource, Inventory, SourcePaths};
pub use store::{GriddedHazardModel, HazardArray, HazardStore};
