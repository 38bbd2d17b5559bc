//! The parsed upgrade catalog: definitions, rule groups and the attribute index.
//!
//! A catalog is built in one pass from the `ItemUpgrades`, `PlayerUpgrades` and
//! `UpgradeGroups` blocks of an upgrades file and never patched afterwards. Reloading means
//! building a new value and swapping it in, which drops the attribute index with it.

mod build;
mod definition;
mod group;
mod path;
mod report;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde::Serialize;

use crate::keyvalues::KeyValues;
use crate::schema::AttributeSchema;

use build::CatalogBuilder;
pub use definition::{UiGroup, UpgradeDefinition, UpgradeQuality, DEFAULT_GROUP};
pub use group::{Condition, ConditionKind, UpgradeGroup};
pub use path::{validate_upgrades_path, PathRejection, DEFAULT_UPGRADES_PATH};
pub use report::{LoadDiagnostic, LoadDiagnosticKind, LoadReport, Severity};

pub const ITEM_UPGRADES_BLOCK: &str = "ItemUpgrades";
pub const PLAYER_UPGRADES_BLOCK: &str = "PlayerUpgrades";
pub const UPGRADE_GROUPS_BLOCK: &str = "UpgradeGroups";

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpgradeCatalog {
    upgrades: Vec<UpgradeDefinition>,
    groups: Vec<UpgradeGroup>,
    #[serde(skip)]
    attribute_index: RefCell<HashMap<String, usize>>,
    #[serde(skip)]
    scans: Cell<usize>,
}

impl UpgradeCatalog {
    pub fn new(upgrades: Vec<UpgradeDefinition>, groups: Vec<UpgradeGroup>) -> Self {
        Self {
            upgrades,
            groups,
            ..Self::default()
        }
    }

    /// Builds a catalog from the three blocks of an upgrades file. Item entries default to
    /// [UiGroup::Item], player entries to [UiGroup::Player]. Bad entries are skipped and
    /// reported; they never fail the build.
    pub fn build<S>(
        item_block: Option<&KeyValues>,
        player_block: Option<&KeyValues>,
        group_block: Option<&KeyValues>,
        schema: &S,
    ) -> (Self, LoadReport)
    where
        S: AttributeSchema + ?Sized,
    {
        let mut builder = CatalogBuilder::new(schema);
        if let Some(block) = item_block {
            builder.upgrade_block(block, UiGroup::Item);
        }
        if let Some(block) = player_block {
            builder.upgrade_block(block, UiGroup::Player);
        }
        if let Some(block) = group_block {
            builder.group_block(block);
        }
        tracing::debug!(
            target: "mvm_upgrades::catalog",
            upgrades = builder.upgrades.len(),
            groups = builder.groups.len(),
            diagnostics = builder.report.diagnostics.len(),
            "catalog built"
        );
        (Self::new(builder.upgrades, builder.groups), builder.report)
    }

    /// Builds from a parsed upgrades file root. Block names match case-insensitively.
    pub fn from_keyvalues<S>(root: &KeyValues, schema: &S) -> (Self, LoadReport)
    where
        S: AttributeSchema + ?Sized,
    {
        Self::build(
            root.find_key(ITEM_UPGRADES_BLOCK),
            root.find_key(PLAYER_UPGRADES_BLOCK),
            root.find_key(UPGRADE_GROUPS_BLOCK),
            schema,
        )
    }

    /// Index of the first upgrade for `name` (ASCII case-insensitive). Hits are memoized
    /// under the queried name; misses are logged and never cached.
    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        if let Some(&index) = self.attribute_index.borrow().get(name) {
            return Some(index);
        }

        self.scans.set(self.scans.get() + 1);
        let found = self
            .upgrades
            .iter()
            .position(|upgrade| upgrade.attribute.eq_ignore_ascii_case(name));
        match found {
            Some(index) => {
                self.attribute_index
                    .borrow_mut()
                    .insert(name.to_string(), index);
                Some(index)
            }
            None => {
                tracing::error!(
                    target: "mvm_upgrades::catalog",
                    attribute = name,
                    "attribute not found in upgrade catalog"
                );
                None
            }
        }
    }

    /// How many times [Self::index_of_attribute] fell through to a linear scan.
    pub fn scan_count(&self) -> usize {
        self.scans.get()
    }

    pub fn upgrades(&self) -> &[UpgradeDefinition] {
        &self.upgrades
    }

    pub fn groups(&self) -> &[UpgradeGroup] {
        &self.groups
    }

    pub fn get(&self, index: usize) -> Option<&UpgradeDefinition> {
        self.upgrades.get(index)
    }

    /// First group with this name, ignoring ASCII case.
    pub fn group(&self, name: &str) -> Option<&UpgradeGroup> {
        self.groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> UpgradeCatalog {
        UpgradeCatalog::new(
            vec![
                UpgradeDefinition::new("damage bonus", 0.25, 2.0, 400, UiGroup::Item),
                UpgradeDefinition::new("move speed bonus", 0.1, 1.4, 200, UiGroup::Player),
                UpgradeDefinition::new("damage bonus", 0.5, 3.0, 900, UiGroup::Item),
            ],
            vec![UpgradeGroup::new("rockets"), UpgradeGroup::new("Rockets")],
        )
    }

    #[test]
    fn index_lookup_is_memoized() {
        let catalog = catalog();
        assert_eq!(catalog.index_of_attribute("damage bonus"), Some(0));
        assert_eq!(catalog.scan_count(), 1);
        assert_eq!(catalog.index_of_attribute("damage bonus"), Some(0));
        assert_eq!(catalog.scan_count(), 1);
        assert_eq!(catalog.index_of_attribute("Move Speed Bonus"), Some(1));
        assert_eq!(catalog.scan_count(), 2);
    }

    #[test]
    fn misses_are_not_cached() {
        let catalog = catalog();
        assert_eq!(catalog.index_of_attribute("jump height"), None);
        assert_eq!(catalog.index_of_attribute("jump height"), None);
        assert_eq!(catalog.scan_count(), 2);
    }

    #[test]
    fn group_lookup_returns_first_match() {
        let catalog = catalog();
        assert_eq!(catalog.group("ROCKETS").map(|g| g.name.as_str()), Some("rockets"));
        assert!(catalog.group("swords").is_none());
    }
}
