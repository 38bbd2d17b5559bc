//! Owner of the live upgrade catalog and the query surface built on it.
//!
//! The catalog is loaded on level init and dropped on level shutdown. A reload parses and
//! builds a complete catalog before replacing the current one, so a rejected path, an
//! unreadable file or a parse error leaves the previous catalog in place.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{
    validate_upgrades_path, LoadReport, PathRejection, UpgradeCatalog, UpgradeDefinition,
};
use crate::keyvalues::{parse_keyvalues, KeyValuesError};
use crate::loadout::{EquipmentResolver, Loadout, LoadoutSlot};
use crate::rules::{self, UpgradeContext};
use crate::schema::AttributeSchema;
use crate::settings::Settings;
use crate::steps::{compute_step_for, StepData};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("refusing to load upgrades from '{path}': path {reason}")]
    PathRejected { path: String, reason: PathRejection },
    #[error("can't open {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse upgrades file: {0}")]
    Parse(#[from] KeyValuesError),
}

pub struct UpgradeManager<S> {
    schema: S,
    settings: Settings,
    catalog: Option<UpgradeCatalog>,
}

impl<S: AttributeSchema> UpgradeManager<S> {
    pub fn new(schema: S, settings: Settings) -> Self {
        Self {
            schema,
            settings,
            catalog: None,
        }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> Option<&UpgradeCatalog> {
        self.catalog.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn level_init(&mut self) -> Result<LoadReport, LoadError> {
        self.load_default()
    }

    pub fn level_shutdown(&mut self) {
        if self.catalog.take().is_some() {
            tracing::debug!(target: "mvm_upgrades::manager", "upgrade catalog cleared");
        }
    }

    /// Loads the configured custom upgrades file, or `scripts/items/mvm_upgrades.txt`.
    pub fn load_default(&mut self) -> Result<LoadReport, LoadError> {
        let path = self.settings.upgrades_path().to_string();
        self.load_from_path(&path)
    }

    /// Loads a relative `.txt` path under the configured content root.
    pub fn load_from_path(&mut self, path: &str) -> Result<LoadReport, LoadError> {
        if let Err(reason) = validate_upgrades_path(path) {
            tracing::warn!(
                target: "mvm_upgrades::manager",
                path,
                %reason,
                "upgrades path rejected"
            );
            return Err(LoadError::PathRejected {
                path: path.to_string(),
                reason,
            });
        }

        let full_path = self.settings.content_root.join(path);
        let text = fs::read_to_string(&full_path).map_err(|source| {
            tracing::warn!(
                target: "mvm_upgrades::manager",
                path = %full_path.display(),
                error = %source,
                "can't open upgrades file"
            );
            LoadError::Read {
                path: full_path.clone(),
                source,
            }
        })?;
        let report = self.load_from_str(&text)?;
        tracing::info!(
            target: "mvm_upgrades::manager",
            path = %full_path.display(),
            upgrades = self.catalog.as_ref().map_or(0, UpgradeCatalog::len),
            "upgrades loaded"
        );
        Ok(report)
    }

    /// Parses upgrades text and swaps the resulting catalog in.
    pub fn load_from_str(&mut self, text: &str) -> Result<LoadReport, LoadError> {
        let root = parse_keyvalues(text)?;
        let (catalog, report) = UpgradeCatalog::from_keyvalues(&root, &self.schema);
        self.catalog = Some(catalog);
        Ok(report)
    }

    pub fn upgrade(&self, index: usize) -> Option<&UpgradeDefinition> {
        self.catalog.as_ref()?.get(index)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        match &self.catalog {
            Some(catalog) => catalog.index_of_attribute(name),
            None => {
                tracing::error!(
                    target: "mvm_upgrades::manager",
                    attribute = name,
                    "attribute lookup with no upgrades loaded"
                );
                None
            }
        }
    }

    /// False when nothing is loaded or `index` is out of range.
    pub fn is_upgrade_eligible<R>(&self, index: usize, resolver: &R, slot: LoadoutSlot) -> bool
    where
        R: EquipmentResolver + ?Sized,
    {
        let Some(catalog) = &self.catalog else {
            return false;
        };
        let Some(upgrade) = catalog.get(index) else {
            return false;
        };
        let ctx = UpgradeContext::resolve(resolver, slot);
        rules::is_upgrade_eligible(catalog, upgrade, &ctx)
    }

    /// Indices of every upgrade offered for `slot`, in catalog order.
    pub fn eligible_indices<R>(&self, resolver: &R, slot: LoadoutSlot) -> Vec<usize>
    where
        R: EquipmentResolver + ?Sized,
    {
        let Some(catalog) = &self.catalog else {
            return Vec::new();
        };
        let ctx = UpgradeContext::resolve(resolver, slot);
        catalog
            .upgrades()
            .iter()
            .enumerate()
            .filter(|(_, upgrade)| rules::is_upgrade_eligible(catalog, upgrade, &ctx))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn compute_step<L>(&self, loadout: &L, slot: LoadoutSlot, index: usize) -> StepData
    where
        L: Loadout + ?Sized,
    {
        match &self.catalog {
            Some(catalog) => compute_step_for(
                catalog,
                &self.schema,
                loadout,
                slot,
                index,
                self.settings.upgrade_mult,
            ),
            None => StepData::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LoadDiagnosticKind;
    use crate::loadout::{Character, EquippedItem, LoadoutFixture, PlayerClass, Weapon, WeaponId};
    use crate::schema::{AttributeDefinition, StaticSchema};
    use crate::steps::DescriptionFormat;

    const UPGRADES: &str = r#"
        "upgrades"
        {
            "ItemUpgrades"
            {
                "1" { "attribute" "damage bonus" "icon" "d" "increment" "0.25" "cap" "2" "cost" "400" }
                "2" { "attribute" "fire rate bonus" "icon" "f" "increment" "-0.1" "cap" "0.6" "cost" "200" "group" "guns" }
            }
            "PlayerUpgrades"
            {
                "1" { "attribute" "move speed bonus" "icon" "m" "increment" "0.1" "cap" "1.4" "cost" "200" }
            }
            "UpgradeGroups"
            {
                "guns" { "melee" "0" "damaging" "1" }
            }
        }
    "#;

    fn manager() -> UpgradeManager<StaticSchema> {
        let schema = StaticSchema::new([
            AttributeDefinition::float("damage bonus", DescriptionFormat::Percentage),
            AttributeDefinition::float("fire rate bonus", DescriptionFormat::InvertedPercentage),
            AttributeDefinition::float("move speed bonus", DescriptionFormat::Percentage),
        ]);
        UpgradeManager::new(schema, Settings::default())
    }

    #[test]
    fn loads_from_text_and_answers_queries() {
        let mut manager = manager();
        let report = manager.load_from_str(UPGRADES).unwrap();
        assert!(report.is_empty());
        assert_eq!(manager.index_of_attribute("move speed bonus"), Some(2));

        let heavy = LoadoutFixture::new(Character::new(PlayerClass::Heavy))
            .with_item(
                LoadoutSlot::Primary,
                EquippedItem::weapon(Weapon::new(WeaponId::Minigun)),
            )
            .with_item(
                LoadoutSlot::Melee,
                EquippedItem::weapon(Weapon::new(WeaponId::Fists)),
            );
        assert_eq!(manager.eligible_indices(&heavy, LoadoutSlot::Primary), [0, 1, 2]);
        assert_eq!(manager.eligible_indices(&heavy, LoadoutSlot::Melee), [0, 2]);
        assert!(!manager.is_upgrade_eligible(7, &heavy, LoadoutSlot::Primary));
    }

    #[test]
    fn failed_reload_keeps_previous_catalog() {
        let mut manager = manager();
        manager.load_from_str(UPGRADES).unwrap();

        let err = manager.load_from_path("../escape.txt").unwrap_err();
        assert!(matches!(
            err,
            LoadError::PathRejected {
                reason: PathRejection::Traversal,
                ..
            }
        ));
        assert!(matches!(
            manager.load_from_path("scripts/items/missing_file.txt"),
            Err(LoadError::Read { .. })
        ));
        assert!(matches!(
            manager.load_from_str("\"upgrades\" {"),
            Err(LoadError::Parse(_))
        ));
        assert_eq!(manager.catalog().map(UpgradeCatalog::len), Some(3));
    }

    #[test]
    fn shutdown_clears_everything() {
        let mut manager = manager();
        manager.load_from_str(UPGRADES).unwrap();
        manager.level_shutdown();
        assert!(!manager.is_loaded());
        assert_eq!(manager.index_of_attribute("damage bonus"), None);
        let scout = LoadoutFixture::new(Character::new(PlayerClass::Scout));
        assert!(!manager.is_upgrade_eligible(0, &scout, LoadoutSlot::Primary));
        assert_eq!(manager.compute_step(&scout, LoadoutSlot::Primary, 0), StepData::default());
    }

    #[test]
    fn reload_replaces_and_resets_the_index() {
        let mut manager = manager();
        manager.load_from_str(UPGRADES).unwrap();
        assert_eq!(manager.index_of_attribute("damage bonus"), Some(0));
        let report = manager
            .load_from_str(
                r#""upgrades" { "ItemUpgrades" {
                    "1" { "attribute" "fire rate bonus" "icon" "f" "increment" "-0.1" "cap" "0.6" "cost" "200" }
                    "2" { "attribute" "damage bonus" "icon" "d" "increment" "0.25" "cap" "2" "cost" "400" }
                    "3" { "attribute" "damage bonus" "icon" "d" "cap" "2" "cost" "400" }
                } }"#,
            )
            .unwrap();
        assert_eq!(report.of_kind(LoadDiagnosticKind::MalformedEntry).count(), 1);
        assert_eq!(manager.index_of_attribute("damage bonus"), Some(1));
        assert_eq!(manager.catalog().map(UpgradeCatalog::scan_count), Some(1));
    }
}
