//! YAML loadout fixtures: one character, their own attributes, and what sits in each slot.
//!
//! ```yaml
//! character:
//!   class: demoman
//!   wearables: [ { kind: demo_shield } ]
//! attributes:
//!   health regen: 4.0
//! slots:
//!   secondary:
//!     item: { kind: weapon, id: pipebomb_launcher, projectile: pipebomb_remote }
//!     backing_attributes: { damage bonus: 1.0 }
//!     attributes: { damage bonus: 1.25 }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loadout::{
    AttributeReader, AttributeStore, Character, EquipmentResolver, EquippedItem, LoadoutSlot,
};

#[derive(Debug, Error)]
pub enum LoadoutFixtureError {
    #[error("failed to read loadout fixture from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse loadout fixture: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotFixture {
    pub item: EquippedItem,
    /// Persistent item attributes, before purchased upgrades.
    #[serde(default)]
    pub backing_attributes: HashMap<String, f64>,
    /// Attributes as modified in play. Falls back to the backing value when absent.
    #[serde(default)]
    pub attributes: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutFixture {
    pub character: Character,
    #[serde(default)]
    pub attributes: HashMap<String, f64>,
    #[serde(default)]
    pub slots: BTreeMap<LoadoutSlot, SlotFixture>,
}

impl LoadoutFixture {
    pub fn new(character: Character) -> Self {
        Self {
            character,
            attributes: HashMap::new(),
            slots: BTreeMap::new(),
        }
    }

    pub fn with_item(mut self, slot: LoadoutSlot, item: EquippedItem) -> Self {
        self.slots.insert(
            slot,
            SlotFixture {
                item,
                backing_attributes: HashMap::new(),
                attributes: HashMap::new(),
            },
        );
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadoutFixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn slot_mut(&mut self, slot: LoadoutSlot) -> Option<&mut SlotFixture> {
        self.slots.get_mut(&slot)
    }
}

impl EquipmentResolver for LoadoutFixture {
    fn character(&self) -> &Character {
        &self.character
    }

    fn equipped(&self, slot: LoadoutSlot) -> Option<&EquippedItem> {
        self.slots.get(&slot).map(|fixture| &fixture.item)
    }
}

impl AttributeReader for LoadoutFixture {
    fn item_attribute(&self, slot: LoadoutSlot, store: AttributeStore, name: &str) -> Option<f64> {
        let fixture = self.slots.get(&slot)?;
        let backing = fixture.backing_attributes.get(name).copied();
        match store {
            AttributeStore::Backing => backing,
            AttributeStore::Live => fixture.attributes.get(name).copied().or(backing),
        }
    }

    fn character_attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }
}

/// Load a loadout fixture from a YAML file.
pub fn load_loadout_fixture(path: impl AsRef<Path>) -> Result<LoadoutFixture, LoadoutFixtureError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| LoadoutFixtureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    LoadoutFixture::from_yaml_str(&raw)
}
