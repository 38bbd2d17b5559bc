use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{name}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerClass {
    Scout,
    Soldier,
    Pyro,
    Demoman,
    Heavy,
    Engineer,
    Medic,
    Sniper,
    Spy,
}

impl PlayerClass {
    pub const ALL: [PlayerClass; 9] = [
        Self::Scout,
        Self::Soldier,
        Self::Pyro,
        Self::Demoman,
        Self::Heavy,
        Self::Engineer,
        Self::Medic,
        Self::Sniper,
        Self::Spy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scout => "scout",
            Self::Soldier => "soldier",
            Self::Pyro => "pyro",
            Self::Demoman => "demoman",
            Self::Heavy => "heavy",
            Self::Engineer => "engineer",
            Self::Medic => "medic",
            Self::Sniper => "sniper",
            Self::Spy => "spy",
        }
    }
}

impl FromStr for PlayerClass {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownName {
                kind: "class",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loadout slot an item is equipped in, numbered as the game numbers weapon types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadoutSlot {
    Primary,
    Secondary,
    Melee,
    Grenade,
    Building,
    Pda,
    Item1,
    Item2,
    Head,
    Misc,
    MeleeAllclass,
    Secondary2,
    Primary2,
}

impl LoadoutSlot {
    pub const ALL: [LoadoutSlot; 13] = [
        Self::Primary,
        Self::Secondary,
        Self::Melee,
        Self::Grenade,
        Self::Building,
        Self::Pda,
        Self::Item1,
        Self::Item2,
        Self::Head,
        Self::Misc,
        Self::MeleeAllclass,
        Self::Secondary2,
        Self::Primary2,
    ];

    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Melee => "melee",
            Self::Grenade => "grenade",
            Self::Building => "building",
            Self::Pda => "pda",
            Self::Item1 => "item1",
            Self::Item2 => "item2",
            Self::Head => "head",
            Self::Misc => "misc",
            Self::MeleeAllclass => "melee_allclass",
            Self::Secondary2 => "secondary2",
            Self::Primary2 => "primary2",
        }
    }

    /// Class melee or the all-class melee slot.
    pub fn is_melee(&self) -> bool {
        matches!(self, Self::Melee | Self::MeleeAllclass)
    }
}

impl FromStr for LoadoutSlot {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            if let Some(slot) = Self::from_code(code) {
                return Ok(slot);
            }
        }
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownName {
                kind: "loadout slot",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for LoadoutSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weapon identity as far as upgrade groups care. Items that are not weapons read as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponId {
    #[default]
    None,
    // multiclass
    ShotgunPrimary,
    ShotgunSoldier,
    ShotgunHwg,
    ShotgunPyro,
    ShotgunBuildingRescue,
    SentryRevenge,
    Pistol,
    PistolScout,
    Raygun,
    DrgPomson,
    Parachute,
    Spellbook,
    LaserPointer,
    Lunchbox,
    GrapplingHook,
    PasstimeGun,
    // scout
    Scattergun,
    HandgunScoutPrimary,
    SodaPopper,
    PepBrawlerBlaster,
    HandgunScoutSecondary,
    Cleaver,
    JarMilk,
    Bat,
    BatWood,
    BatGiftwrap,
    BatFish,
    // soldier
    RocketLauncher,
    RocketLauncherDirectHit,
    ParticleCannon,
    BuffItem,
    RaygunRevenge,
    Shovel,
    // pyro
    Flamethrower,
    FlameBall,
    Flaregun,
    FlaregunRevenge,
    JarGas,
    Rocketpack,
    Fireaxe,
    Slap,
    // demoman
    GrenadeLauncher,
    Cannon,
    PipebombLauncher,
    Bottle,
    Sword,
    StickBomb,
    // heavy
    Minigun,
    Fists,
    // engineer
    Wrench,
    Builder,
    PdaEngineerBuild,
    PdaEngineerDestroy,
    MechanicalArm,
    // medic
    SyringeGunMedic,
    Crossbow,
    Medigun,
    Bonesaw,
    // sniper
    SniperRifle,
    SniperRifleDecap,
    SniperRifleClassic,
    CompoundBow,
    Smg,
    ChargedSmg,
    Jar,
    Club,
    // spy
    Revolver,
    Knife,
    Invis,
    PdaSpy,
}

impl WeaponId {
    pub fn is_sniper_rifle(&self) -> bool {
        matches!(
            self,
            Self::SniperRifle | Self::SniperRifleDecap | Self::SniperRifleClassic
        )
    }

    /// Melee weapon classes.
    pub fn is_melee(&self) -> bool {
        matches!(
            self,
            Self::Bat
                | Self::BatWood
                | Self::BatGiftwrap
                | Self::BatFish
                | Self::Shovel
                | Self::Fireaxe
                | Self::Slap
                | Self::Bottle
                | Self::Sword
                | Self::StickBomb
                | Self::Fists
                | Self::Wrench
                | Self::Bonesaw
                | Self::Club
                | Self::Knife
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileType {
    Bullet,
    Rocket,
    Pipebomb,
    PipebombRemote,
    Syringe,
    Flare,
    Jar,
    Arrow,
    JarMilk,
    HealingBolt,
    EnergyBall,
    EnergyRing,
    Cleaver,
    Cannonball,
    BuildingRepairBolt,
    FestiveArrow,
    FestiveHealingBolt,
    JarGas,
    BallOfFire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmmoType {
    #[default]
    None,
    Primary,
    Secondary,
    Metal,
    Grenades1,
    Grenades2,
}

/// How an item's effect meter fills, from the item's meter-charge-type attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterChargeType {
    #[default]
    None,
    Time,
    Damage,
    TimeAndDamage,
}

/// Capabilities of an equipped weapon, resolved once by whoever builds the loadout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: WeaponId,
    /// Set for guns: the projectile they fire.
    #[serde(default)]
    pub projectile: Option<ProjectileType>,
    #[serde(default)]
    pub ammo: AmmoType,
    #[serde(default)]
    pub energy: bool,
    #[serde(default)]
    pub effect_bar_regen: bool,
    #[serde(default)]
    pub reloads_singly: bool,
    #[serde(default)]
    pub blast_impact: bool,
    #[serde(default)]
    pub uses_clips: bool,
    #[serde(default)]
    pub max_clip: i32,
    /// Flamethrowers only.
    #[serde(default)]
    pub can_airblast_push: bool,
}

impl Weapon {
    pub fn new(id: WeaponId) -> Self {
        Self {
            id,
            projectile: None,
            ammo: AmmoType::None,
            energy: false,
            effect_bar_regen: false,
            reloads_singly: false,
            blast_impact: false,
            uses_clips: false,
            max_clip: 0,
            can_airblast_push: false,
        }
    }

    pub fn gun(id: WeaponId, projectile: ProjectileType) -> Self {
        Self {
            projectile: Some(projectile),
            ammo: AmmoType::Primary,
            ..Self::new(id)
        }
    }

    pub fn is_gun(&self) -> bool {
        self.projectile.is_some()
    }

    pub fn is_melee(&self) -> bool {
        self.id.is_melee()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeCounter {
    pub charges: u32,
    pub max_charges: u32,
}

/// The kinds of entity that can sit in a loadout slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon(Weapon),
    DemoShield,
    PowerupBottle(ChargeCounter),
    Wearable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    #[serde(flatten)]
    pub kind: ItemKind,
    #[serde(default)]
    pub meter: MeterChargeType,
}

impl EquippedItem {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            meter: MeterChargeType::None,
        }
    }

    pub fn weapon(weapon: Weapon) -> Self {
        Self::new(ItemKind::Weapon(weapon))
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            ItemKind::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn weapon_id(&self) -> WeaponId {
        self.as_weapon().map_or(WeaponId::None, |weapon| weapon.id)
    }

    pub fn charge_counter(&self) -> Option<ChargeCounter> {
        match self.kind {
            ItemKind::PowerupBottle(counter) => Some(counter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub class: PlayerClass,
    #[serde(default)]
    pub wearables: Vec<ItemKind>,
}

impl Character {
    pub fn new(class: PlayerClass) -> Self {
        Self {
            class,
            wearables: Vec::new(),
        }
    }

    pub fn is_class(&self, class: PlayerClass) -> bool {
        self.class == class
    }

    pub fn wears_demo_shield(&self) -> bool {
        self.wearables
            .iter()
            .any(|wearable| matches!(wearable, ItemKind::DemoShield))
    }
}
