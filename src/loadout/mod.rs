//! What a character is holding: class, loadout slots, equipped items and their attributes.
//!
//! Item resolution and attribute storage belong to the game; the engine only sees them
//! through [EquipmentResolver] and [AttributeReader]. [LoadoutFixture] implements both
//! from a YAML description for the CLI and tests.

mod fixture;
mod item;

pub use fixture::{load_loadout_fixture, LoadoutFixture, LoadoutFixtureError, SlotFixture};
pub use item::{
    AmmoType, ChargeCounter, Character, EquippedItem, ItemKind, LoadoutSlot, MeterChargeType,
    PlayerClass, ProjectileType, UnknownName, Weapon, WeaponId,
};

/// Resolves the entity a character has equipped in a loadout slot.
pub trait EquipmentResolver {
    fn character(&self) -> &Character;
    fn equipped(&self, slot: LoadoutSlot) -> Option<&EquippedItem>;
}

/// Which copy of an item's attributes to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeStore {
    /// Persistent item data, before any gameplay modification (purchased upgrades).
    Backing,
    /// The item as currently modified in play.
    Live,
}

/// Reads float attribute values from items and from the character itself.
pub trait AttributeReader {
    fn item_attribute(&self, slot: LoadoutSlot, store: AttributeStore, name: &str) -> Option<f64>;
    fn character_attribute(&self, name: &str) -> Option<f64>;
}

/// Everything the query surface needs about one character.
pub trait Loadout: EquipmentResolver + AttributeReader {}

impl<T: EquipmentResolver + AttributeReader + ?Sized> Loadout for T {}
