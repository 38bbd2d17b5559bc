use crate::loadout::{Character, EquipmentResolver, EquippedItem, LoadoutSlot};

/// Read-only view of the character, the slot under test and whatever is equipped in it.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeContext<'a> {
    pub character: &'a Character,
    pub slot: LoadoutSlot,
    pub equipped: Option<&'a EquippedItem>,
}

impl<'a> UpgradeContext<'a> {
    pub fn new(
        character: &'a Character,
        slot: LoadoutSlot,
        equipped: Option<&'a EquippedItem>,
    ) -> Self {
        Self {
            character,
            slot,
            equipped,
        }
    }

    /// Resolves the equipped item once; predicates never look it up again.
    pub fn resolve<R>(resolver: &'a R, slot: LoadoutSlot) -> Self
    where
        R: EquipmentResolver + ?Sized,
    {
        Self::new(resolver.character(), slot, resolver.equipped(slot))
    }
}
