use crate::catalog::{UiGroup, UpgradeCatalog};
use crate::loadout::{AttributeStore, Loadout, LoadoutSlot};
use crate::schema::AttributeSchema;
use crate::steps::{charge_steps, compute_step, default_value, StepData};

/// Step data for catalog entry `index` as seen by the item in `slot`.
///
/// The baseline comes from the item's backing store (players have none), the current value
/// from the character for player upgrades and from the live item otherwise. Either falls
/// back to the format default: 1.0 for percentages, 0.0 for everything else.
///
/// Powerup bottle upgrades count the charge item's charges instead and read all-zero when
/// the slot holds no charge item.
pub fn compute_step_for<S, L>(
    catalog: &UpgradeCatalog,
    schema: &S,
    loadout: &L,
    slot: LoadoutSlot,
    index: usize,
    global_mult: f64,
) -> StepData
where
    S: AttributeSchema + ?Sized,
    L: Loadout + ?Sized,
{
    let Some(upgrade) = catalog.get(index) else {
        tracing::error!(
            target: "mvm_upgrades::steps",
            index,
            upgrades = catalog.len(),
            "upgrade index out of range"
        );
        return StepData::default();
    };
    let name = upgrade.attribute.as_str();
    let Some(attribute) = schema.attribute_by_name(name) else {
        tracing::warn!(
            target: "mvm_upgrades::steps",
            attribute = name,
            "attribute missing from schema"
        );
        return StepData::default();
    };

    if upgrade.ui_group == UiGroup::PowerupBottle {
        let Some(counter) = loadout.equipped(slot).and_then(|item| item.charge_counter()) else {
            tracing::debug!(
                target: "mvm_upgrades::steps",
                attribute = name,
                %slot,
                "bottle upgrade without a charge item"
            );
            return StepData::default();
        };
        let has_attribute = loadout
            .item_attribute(slot, AttributeStore::Live, name)
            .is_some();
        return charge_steps(counter.charges, counter.max_charges, has_attribute);
    }

    let format = attribute.description_format;
    let fallback = default_value(format);
    let (base, current) = if upgrade.is_player_attached() {
        (fallback, loadout.character_attribute(name))
    } else {
        (
            loadout
                .item_attribute(slot, AttributeStore::Backing, name)
                .unwrap_or(fallback),
            loadout.item_attribute(slot, AttributeStore::Live, name),
        )
    };
    compute_step(
        upgrade,
        base,
        current.unwrap_or(fallback),
        format,
        global_mult,
    )
}
