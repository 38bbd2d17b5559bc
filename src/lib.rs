//! Mann vs. Machine upgrade catalog: loads the upgrades file, decides which upgrades a
//! character may buy for a loadout slot, and turns attribute values into upgrade steps.

pub mod catalog;
pub mod cli;
pub mod keyvalues;
pub mod loadout;
pub mod manager;
pub mod report;
pub mod rules;
pub mod schema;
pub mod settings;
pub mod steps;

pub use catalog::{LoadReport, UpgradeCatalog, UpgradeDefinition, UpgradeGroup};
pub use manager::{LoadError, UpgradeManager};
pub use settings::Settings;
pub use steps::StepData;
