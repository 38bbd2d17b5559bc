use serde::Serialize;

/// Where an upgrade's value lives: on the item, on the character, or in a native charge
/// counter. Codes come from the upgrade file's `ui_group` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum UiGroup {
    Item,
    Player,
    PowerupBottle,
    Other(i64),
}

impl UiGroup {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Item,
            1 => Self::Player,
            2 => Self::PowerupBottle,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Item => 0,
            Self::Player => 1,
            Self::PowerupBottle => 2,
            Self::Other(code) => *code,
        }
    }
}

impl From<UiGroup> for i64 {
    fn from(group: UiGroup) -> Self {
        group.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "i64")]
pub enum UpgradeQuality {
    Low,
    #[default]
    Normal,
    High,
    Other(i64),
}

impl UpgradeQuality {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Low,
            2 => Self::Normal,
            3 => Self::High,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
            Self::Other(code) => *code,
        }
    }
}

impl From<UpgradeQuality> for i64 {
    fn from(quality: UpgradeQuality) -> Self {
        quality.code()
    }
}

pub const DEFAULT_GROUP: &str = "default";

/// One purchasable upgrade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeDefinition {
    pub attribute: String,
    pub icon: String,
    pub increment: f64,
    pub cap: f64,
    pub cost: i64,
    pub ui_group: UiGroup,
    pub quality: UpgradeQuality,
    /// Non-zero tiers are mutually exclusive per target. Callers enforce this.
    pub tier: i64,
    pub group: String,
    pub mult: f64,
    pub cost_mult: f64,
}

impl UpgradeDefinition {
    pub fn new(
        attribute: impl Into<String>,
        increment: f64,
        cap: f64,
        cost: i64,
        ui_group: UiGroup,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            icon: String::new(),
            increment,
            cap,
            cost,
            ui_group,
            quality: UpgradeQuality::Normal,
            tier: 0,
            group: DEFAULT_GROUP.to_string(),
            mult: 1.0,
            cost_mult: 1.0,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_mult(mut self, mult: f64) -> Self {
        self.mult = mult;
        self
    }

    pub fn is_player_attached(&self) -> bool {
        self.ui_group == UiGroup::Player
    }
}
