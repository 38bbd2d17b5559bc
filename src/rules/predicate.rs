use std::fmt;
use std::str::FromStr;

use crate::loadout::{
    AmmoType, ItemKind, LoadoutSlot, MeterChargeType, PlayerClass, ProjectileType, UnknownName,
    WeaponId,
};
use crate::rules::UpgradeContext;

/// Every condition name an upgrade group may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Default,
    Class(PlayerClass),
    // misc
    Damaging,
    Energy,
    EffectBar,
    ProjectilePenetrate,
    Builder,
    Spellbook,
    Jar,
    SingleReload,
    BuffItem,
    Meter,
    Parachute,
    Primary,
    Secondary,
    Melee,
    PrimaryAmmo,
    SecondaryAmmo,
    Clip,
    ClipAtomic,
    // multiclass
    Shotgun,
    EnergyShotgun,
    Pistol,
    // scout
    Scattergun,
    Drink,
    Sandman,
    Ball,
    Bat,
    // soldier
    Rocket,
    Shovel,
    // pyro
    Flamethrower,
    DragonsFury,
    Airblast,
    Flare,
    Manmelter,
    GasPasser,
    RocketPack,
    Fireaxe,
    // demoman
    Grenade,
    Sticky,
    Shield,
    Sword,
    Bottle,
    FiresGrenade,
    // heavy
    Minigun,
    Fists,
    // engineer
    BuildPda,
    Wrench,
    // medic
    Syringe,
    Medigun,
    Bonesaw,
    // sniper
    Rifle,
    Bow,
    Kukri,
    // spy
    Sapper,
    Knife,
}

const NAMED: [(&str, Predicate); 55] = [
    ("damaging", Predicate::Damaging),
    ("energy", Predicate::Energy),
    ("effect_bar", Predicate::EffectBar),
    ("projectile_penetrate", Predicate::ProjectilePenetrate),
    ("builder", Predicate::Builder),
    ("spellbook", Predicate::Spellbook),
    ("jar", Predicate::Jar),
    ("single_reload", Predicate::SingleReload),
    ("buff_item", Predicate::BuffItem),
    ("meter", Predicate::Meter),
    ("parachute", Predicate::Parachute),
    ("primary", Predicate::Primary),
    ("secondary", Predicate::Secondary),
    ("melee", Predicate::Melee),
    ("primary_ammo", Predicate::PrimaryAmmo),
    ("secondary_ammo", Predicate::SecondaryAmmo),
    ("clip", Predicate::Clip),
    ("clip_atomic", Predicate::ClipAtomic),
    ("shotgun", Predicate::Shotgun),
    ("energy_shotgun", Predicate::EnergyShotgun),
    ("pistol", Predicate::Pistol),
    ("scattergun", Predicate::Scattergun),
    ("drink", Predicate::Drink),
    ("sandman", Predicate::Sandman),
    ("ball", Predicate::Ball),
    ("bat", Predicate::Bat),
    ("rocket", Predicate::Rocket),
    ("shovel", Predicate::Shovel),
    ("flamethrower", Predicate::Flamethrower),
    ("dragons_fury", Predicate::DragonsFury),
    ("airblast", Predicate::Airblast),
    ("flare", Predicate::Flare),
    ("manmelter", Predicate::Manmelter),
    ("gas_passer", Predicate::GasPasser),
    ("rocket_pack", Predicate::RocketPack),
    ("fireaxe", Predicate::Fireaxe),
    ("grenade", Predicate::Grenade),
    ("sticky", Predicate::Sticky),
    ("shield", Predicate::Shield),
    ("sword", Predicate::Sword),
    ("bottle", Predicate::Bottle),
    ("fires_grenade", Predicate::FiresGrenade),
    ("minigun", Predicate::Minigun),
    ("fists", Predicate::Fists),
    ("build_pda", Predicate::BuildPda),
    ("wrench", Predicate::Wrench),
    ("syringe", Predicate::Syringe),
    ("medigun", Predicate::Medigun),
    ("bonesaw", Predicate::Bonesaw),
    ("rifle", Predicate::Rifle),
    ("bow", Predicate::Bow),
    ("kukri", Predicate::Kukri),
    ("sapper", Predicate::Sapper),
    ("knife", Predicate::Knife),
    ("default", Predicate::Default),
];

/// Weapons that never get damage upgrades.
fn hides_damage_upgrades(id: WeaponId) -> bool {
    matches!(
        id,
        WeaponId::None
            | WeaponId::LaserPointer
            | WeaponId::Medigun
            | WeaponId::BuffItem
            | WeaponId::Builder
            | WeaponId::PdaEngineerBuild
            | WeaponId::Invis
            | WeaponId::Spellbook
            | WeaponId::JarGas
            | WeaponId::Lunchbox
            | WeaponId::Jar
            | WeaponId::JarMilk
            | WeaponId::Rocketpack
    )
}

impl Predicate {
    /// Every predicate, classes included.
    pub fn all() -> impl Iterator<Item = Predicate> {
        PlayerClass::ALL
            .into_iter()
            .map(Predicate::Class)
            .chain(NAMED.into_iter().map(|(_, predicate)| predicate))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Class(class) => class.as_str(),
            other => NAMED
                .iter()
                .find(|(_, predicate)| predicate == other)
                .map_or("default", |(name, _)| *name),
        }
    }

    /// True for the predicates that only look at the character.
    pub fn needs_item(&self) -> bool {
        !matches!(self, Self::Default | Self::Class(_))
    }

    pub fn evaluate(&self, ctx: &UpgradeContext<'_>) -> bool {
        let character = ctx.character;
        match self {
            Self::Default => return true,
            Self::Class(class) => return character.is_class(*class),
            _ => {}
        }

        let Some(item) = ctx.equipped else {
            return false;
        };
        let weapon = item.as_weapon();
        let id = item.weapon_id();
        let slot = ctx.slot;
        let class_melee = |class: PlayerClass| character.is_class(class) && slot.is_melee();

        match self {
            Self::Default | Self::Class(_) => true,

            Self::Damaging => !hides_damage_upgrades(id),
            Self::Energy => weapon.is_some_and(|w| w.energy),
            Self::EffectBar => weapon.is_some_and(|w| w.effect_bar_regen),
            Self::ProjectilePenetrate => weapon.and_then(|w| w.projectile).is_some_and(|p| {
                matches!(
                    p,
                    ProjectileType::Arrow
                        | ProjectileType::Bullet
                        | ProjectileType::HealingBolt
                        | ProjectileType::FestiveArrow
                        | ProjectileType::FestiveHealingBolt
                )
            }),
            Self::Builder => id == WeaponId::Builder,
            Self::Spellbook => id == WeaponId::Spellbook,
            Self::Jar => matches!(id, WeaponId::Jar | WeaponId::JarMilk),
            Self::SingleReload => weapon.is_some_and(|w| w.reloads_singly),
            Self::BuffItem => id == WeaponId::BuffItem,
            Self::Meter => item.meter != MeterChargeType::None,
            Self::Parachute => id == WeaponId::Parachute,
            Self::Primary => slot == LoadoutSlot::Primary,
            Self::Secondary => slot == LoadoutSlot::Secondary,
            Self::Melee => weapon.is_some_and(|w| w.is_melee()),
            Self::PrimaryAmmo => weapon.is_some_and(|w| w.ammo == AmmoType::Primary),
            Self::SecondaryAmmo => weapon.is_some_and(|w| w.ammo == AmmoType::Secondary),
            Self::Clip => {
                weapon.is_some_and(|w| !w.blast_impact && w.uses_clips && w.max_clip > 1)
            }
            Self::ClipAtomic => weapon.is_some_and(|w| w.blast_impact),

            Self::Shotgun => matches!(
                id,
                WeaponId::ShotgunBuildingRescue
                    | WeaponId::ShotgunHwg
                    | WeaponId::ShotgunPrimary
                    | WeaponId::ShotgunPyro
                    | WeaponId::ShotgunSoldier
                    | WeaponId::SentryRevenge
            ),
            Self::EnergyShotgun => matches!(id, WeaponId::Raygun | WeaponId::DrgPomson),
            Self::Pistol => matches!(id, WeaponId::Pistol | WeaponId::PistolScout),

            Self::Scattergun => matches!(
                id,
                WeaponId::Scattergun
                    | WeaponId::HandgunScoutPrimary
                    | WeaponId::SodaPopper
                    | WeaponId::PepBrawlerBlaster
            ),
            Self::Drink => {
                character.is_class(PlayerClass::Scout)
                    && slot == LoadoutSlot::Secondary
                    && weapon.is_some_and(|w| w.effect_bar_regen)
            }
            Self::Sandman => id == WeaponId::BatWood,
            Self::Ball => matches!(id, WeaponId::BatWood | WeaponId::BatGiftwrap),
            Self::Bat => class_melee(PlayerClass::Scout),

            Self::Rocket => matches!(
                id,
                WeaponId::RocketLauncher
                    | WeaponId::RocketLauncherDirectHit
                    | WeaponId::ParticleCannon
            ),
            Self::Shovel => class_melee(PlayerClass::Soldier),

            Self::Flamethrower => id == WeaponId::Flamethrower,
            Self::DragonsFury => id == WeaponId::FlameBall,
            Self::Airblast => {
                id == WeaponId::FlameBall
                    || (id == WeaponId::Flamethrower && weapon.is_some_and(|w| w.can_airblast_push))
            }
            Self::Flare => matches!(id, WeaponId::Flaregun | WeaponId::FlaregunRevenge),
            Self::Manmelter => id == WeaponId::FlaregunRevenge,
            Self::GasPasser => id == WeaponId::JarGas,
            Self::RocketPack => id == WeaponId::Rocketpack,
            Self::Fireaxe => class_melee(PlayerClass::Pyro),

            Self::Grenade => matches!(id, WeaponId::GrenadeLauncher | WeaponId::Cannon),
            Self::Sticky => id == WeaponId::PipebombLauncher,
            Self::Shield => {
                character.is_class(PlayerClass::Demoman) && item.kind == ItemKind::DemoShield
            }
            Self::Sword => {
                id == WeaponId::Sword
                    && character.is_class(PlayerClass::Demoman)
                    && character.wears_demo_shield()
            }
            Self::Bottle => class_melee(PlayerClass::Demoman),
            Self::FiresGrenade => weapon
                .and_then(|w| w.projectile)
                .is_some_and(|p| p == ProjectileType::Pipebomb),

            Self::Minigun => id == WeaponId::Minigun,
            Self::Fists => class_melee(PlayerClass::Heavy),

            Self::BuildPda => id == WeaponId::PdaEngineerBuild,
            Self::Wrench => class_melee(PlayerClass::Engineer),

            Self::Syringe => id == WeaponId::SyringeGunMedic,
            Self::Medigun => id == WeaponId::Medigun,
            Self::Bonesaw => class_melee(PlayerClass::Medic),

            Self::Rifle => id.is_sniper_rifle(),
            Self::Bow => id == WeaponId::CompoundBow,
            Self::Kukri => class_melee(PlayerClass::Sniper),

            Self::Sapper => character.is_class(PlayerClass::Spy) && id == WeaponId::Builder,
            Self::Knife => class_melee(PlayerClass::Spy),
        }
    }
}

impl FromStr for Predicate {
    type Err = UnknownName;

    /// Names match ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(class) = s.parse::<PlayerClass>() {
            if class.as_str().eq_ignore_ascii_case(s) {
                return Ok(Self::Class(class));
            }
        }
        NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, predicate)| *predicate)
            .ok_or_else(|| UnknownName {
                kind: "predicate",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::{Character, EquippedItem, Weapon};

    fn eval(
        predicate: Predicate,
        character: &Character,
        slot: LoadoutSlot,
        item: &EquippedItem,
    ) -> bool {
        predicate.evaluate(&UpgradeContext::new(character, slot, Some(item)))
    }

    #[test]
    fn every_name_round_trips() {
        let all: Vec<Predicate> = Predicate::all().collect();
        assert_eq!(all.len(), 64);
        for predicate in all {
            assert_eq!(predicate.name().parse::<Predicate>(), Ok(predicate));
        }
        assert_eq!("Sticky".parse::<Predicate>(), Ok(Predicate::Sticky));
        assert_eq!(
            "SCOUT".parse::<Predicate>(),
            Ok(Predicate::Class(PlayerClass::Scout))
        );
        assert!("laser".parse::<Predicate>().is_err());
        assert!(" scout".parse::<Predicate>().is_err());
    }

    #[test]
    fn item_predicates_need_an_item() {
        let heavy = Character::new(PlayerClass::Heavy);
        let ctx = UpgradeContext::new(&heavy, LoadoutSlot::Primary, None);
        assert!(Predicate::Default.evaluate(&ctx));
        assert!(Predicate::Class(PlayerClass::Heavy).evaluate(&ctx));
        assert!(!Predicate::Primary.evaluate(&ctx));
        assert!(!Predicate::Damaging.evaluate(&ctx));
    }

    #[test]
    fn sword_needs_a_worn_shield() {
        let mut demo = Character::new(PlayerClass::Demoman);
        let sword = EquippedItem::weapon(Weapon::new(WeaponId::Sword));
        assert!(!eval(Predicate::Sword, &demo, LoadoutSlot::Melee, &sword));
        demo.wearables.push(ItemKind::DemoShield);
        assert!(eval(Predicate::Sword, &demo, LoadoutSlot::Melee, &sword));
        assert!(eval(Predicate::Bottle, &demo, LoadoutSlot::Melee, &sword));
        assert!(!eval(Predicate::Bottle, &demo, LoadoutSlot::Secondary, &sword));
    }

    #[test]
    fn shield_is_the_equipped_shield_on_a_demoman() {
        let shield = EquippedItem::new(ItemKind::DemoShield);
        let demo = Character::new(PlayerClass::Demoman);
        let soldier = Character::new(PlayerClass::Soldier);
        assert!(eval(Predicate::Shield, &demo, LoadoutSlot::Secondary, &shield));
        assert!(!eval(Predicate::Shield, &soldier, LoadoutSlot::Secondary, &shield));
        assert!(!eval(Predicate::Damaging, &demo, LoadoutSlot::Secondary, &shield));
    }

    #[test]
    fn damaging_excludes_utility_items() {
        let soldier = Character::new(PlayerClass::Soldier);
        let rocket = EquippedItem::weapon(Weapon::gun(
            WeaponId::RocketLauncher,
            ProjectileType::Rocket,
        ));
        let banner = EquippedItem::weapon(Weapon::new(WeaponId::BuffItem));
        assert!(eval(Predicate::Damaging, &soldier, LoadoutSlot::Primary, &rocket));
        assert!(eval(Predicate::Rocket, &soldier, LoadoutSlot::Primary, &rocket));
        assert!(!eval(Predicate::Damaging, &soldier, LoadoutSlot::Secondary, &banner));
        assert!(eval(Predicate::BuffItem, &soldier, LoadoutSlot::Secondary, &banner));
    }

    #[test]
    fn hot_hand_is_damaging_melee() {
        let pyro = Character::new(PlayerClass::Pyro);
        let slap = EquippedItem::weapon(Weapon::new(WeaponId::Slap));
        assert!(eval(Predicate::Melee, &pyro, LoadoutSlot::Melee, &slap));
        assert!(eval(Predicate::Damaging, &pyro, LoadoutSlot::Melee, &slap));
        assert!(eval(Predicate::Fireaxe, &pyro, LoadoutSlot::Melee, &slap));

        let hook = EquippedItem::weapon(Weapon::new(WeaponId::GrapplingHook));
        assert!(!eval(Predicate::Melee, &pyro, LoadoutSlot::Item2, &hook));
    }

    #[test]
    fn clip_and_projectile_capabilities() {
        let sniper = Character::new(PlayerClass::Sniper);
        let mut smg = Weapon::gun(WeaponId::Smg, ProjectileType::Bullet);
        smg.uses_clips = true;
        smg.max_clip = 25;
        let smg = EquippedItem::weapon(smg);
        assert!(eval(Predicate::Clip, &sniper, LoadoutSlot::Secondary, &smg));
        assert!(eval(Predicate::ProjectilePenetrate, &sniper, LoadoutSlot::Secondary, &smg));
        assert!(!eval(Predicate::ClipAtomic, &sniper, LoadoutSlot::Secondary, &smg));

        let mut caber = Weapon::new(WeaponId::StickBomb);
        caber.blast_impact = true;
        caber.uses_clips = true;
        caber.max_clip = 2;
        let caber = EquippedItem::weapon(caber);
        assert!(!eval(Predicate::Clip, &sniper, LoadoutSlot::Melee, &caber));
        assert!(eval(Predicate::ClipAtomic, &sniper, LoadoutSlot::Melee, &caber));
        assert!(eval(Predicate::Kukri, &sniper, LoadoutSlot::MeleeAllclass, &caber));
    }

    #[test]
    fn airblast_covers_dragons_fury_and_pushing_flamethrowers() {
        let pyro = Character::new(PlayerClass::Pyro);
        let mut flamer = Weapon::new(WeaponId::Flamethrower);
        let fury = EquippedItem::weapon(Weapon::new(WeaponId::FlameBall));
        assert!(eval(Predicate::Airblast, &pyro, LoadoutSlot::Primary, &fury));
        assert!(!eval(
            Predicate::Airblast,
            &pyro,
            LoadoutSlot::Primary,
            &EquippedItem::weapon(flamer.clone())
        ));
        flamer.can_airblast_push = true;
        assert!(eval(
            Predicate::Airblast,
            &pyro,
            LoadoutSlot::Primary,
            &EquippedItem::weapon(flamer)
        ));
    }

    #[test]
    fn drink_is_scout_secondary_with_effect_bar() {
        let scout = Character::new(PlayerClass::Scout);
        let mut drink = Weapon::new(WeaponId::Lunchbox);
        drink.effect_bar_regen = true;
        let drink = EquippedItem::weapon(drink);
        assert!(eval(Predicate::Drink, &scout, LoadoutSlot::Secondary, &drink));
        assert!(!eval(Predicate::Drink, &scout, LoadoutSlot::Primary, &drink));
        assert!(!eval(
            Predicate::Drink,
            &Character::new(PlayerClass::Heavy),
            LoadoutSlot::Secondary,
            &drink
        ));
    }

    #[test]
    fn meter_reads_the_item_meter() {
        let scout = Character::new(PlayerClass::Scout);
        let mut item = EquippedItem::weapon(Weapon::new(WeaponId::Cleaver));
        assert!(!eval(Predicate::Meter, &scout, LoadoutSlot::Secondary, &item));
        item.meter = MeterChargeType::Time;
        assert!(eval(Predicate::Meter, &scout, LoadoutSlot::Secondary, &item));
    }
}
