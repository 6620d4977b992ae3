use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub type GroupList = SmallVec<[String; 2]>;

/// Which side of the card a character plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharacterType {
    #[default]
    Hero,
    #[serde(rename = "Dual Mode/Anti-Hero")]
    DualModeAntiHero,
}

impl CharacterType {
    /// Parse a sheet `Type` cell. Missing or unrecognised values are heroes.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Hero;
        };
        let folded = raw.to_ascii_lowercase();
        if ["dual", "anti", "villain"]
            .iter()
            .any(|marker| folded.contains(marker))
        {
            Self::DualModeAntiHero
        } else {
            Self::Hero
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::DualModeAntiHero => "Dual Mode/Anti-Hero",
        }
    }

    #[must_use]
    pub const fn is_dual_mode(self) -> bool {
        matches!(self, Self::DualModeAntiHero)
    }
}

/// The four stat columns, in their fixed positional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Wild,
    Heroic,
    Attack,
    Movement,
}

impl StatKind {
    pub const ALL: [Self; 4] = [Self::Wild, Self::Heroic, Self::Attack, Self::Movement];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Wild => 0,
            Self::Heroic => 1,
            Self::Attack => 2,
            Self::Movement => 3,
        }
    }

    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Wild => crate::constants::COLUMN_WILD,
            Self::Heroic => crate::constants::COLUMN_HEROIC,
            Self::Attack => crate::constants::COLUMN_ATTACK,
            Self::Movement => crate::constants::COLUMN_MOVEMENT,
        }
    }

    #[must_use]
    pub const fn color(self) -> StatColor {
        match self {
            Self::Wild => StatColor::Gray,
            Self::Heroic => StatColor::Yellow,
            Self::Attack => StatColor::Red,
            Self::Movement => StatColor::Green,
        }
    }

    #[must_use]
    pub const fn icon(self) -> StatIcon {
        match self {
            Self::Wild => StatIcon::Arrow,
            Self::Heroic => StatIcon::Lightning,
            Self::Attack => StatIcon::Explosion,
            Self::Movement => StatIcon::Leaf,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wild => "Wild",
            Self::Heroic => "Heroic",
            Self::Attack => "Attacks",
            Self::Movement => "Movements",
        }
    }

    /// Parse a stat name as used in query strings and CLI flags.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "wild" => Some(Self::Wild),
            "heroic" | "heroics" => Some(Self::Heroic),
            "attack" | "attacks" => Some(Self::Attack),
            "movement" | "movements" | "move" => Some(Self::Movement),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatColor {
    Gray,
    Yellow,
    Red,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatIcon {
    Arrow,
    Lightning,
    Explosion,
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stat {
    pub value: u32,
    pub icon: StatIcon,
    pub color: StatColor,
}

impl Stat {
    #[must_use]
    pub const fn new(kind: StatKind, value: u32) -> Self {
        Self {
            value,
            icon: kind.icon(),
            color: kind.color(),
        }
    }
}

/// Fixed stat block, always `[wild, heroic, attack, movement]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBlock([Stat; 4]);

impl StatBlock {
    #[must_use]
    pub const fn new(wild: u32, heroic: u32, attack: u32, movement: u32) -> Self {
        Self([
            Stat::new(StatKind::Wild, wild),
            Stat::new(StatKind::Heroic, heroic),
            Stat::new(StatKind::Attack, attack),
            Stat::new(StatKind::Movement, movement),
        ])
    }

    #[must_use]
    pub const fn value(&self, kind: StatKind) -> u32 {
        self.0[kind.index()].value
    }

    #[must_use]
    pub const fn get(&self, kind: StatKind) -> &Stat {
        &self.0[kind.index()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stat> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// Canonical roster entry, immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(rename = "type")]
    pub kind: CharacterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default)]
    pub groups: GroupList,
    pub image_url: String,
    pub stats: StatBlock,
}

impl Character {
    #[must_use]
    pub const fn stat(&self, kind: StatKind) -> u32 {
        self.stats.value(kind)
    }

    /// Case-insensitive group membership.
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        let wanted = group.trim();
        self.groups
            .iter()
            .any(|g| g.trim().eq_ignore_ascii_case(wanted))
    }
}
