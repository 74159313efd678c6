use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Fast,
    Charged,
}

/// Coarse behavioural tag attached to a move by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveArchetype {
    #[default]
    General,
    SelfBuff,
    SelfDebuff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuffTarget {
    #[default]
    #[serde(rename = "self")]
    Attacker,
    Opponent,
}

fn default_buff_chance() -> f64 {
    1.0
}

fn default_cooldown() -> u64 {
    500
}

fn default_level() -> u32 {
    20
}

/// Stage changes a move may apply after it lands. Every field is optional in
/// catalog data; a missing field means no change for that stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffSpec {
    #[serde(default = "default_buff_chance")]
    pub chance: f64,
    #[serde(default)]
    pub target: BuffTarget,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
}

impl BuffSpec {
    pub fn is_empty(&self) -> bool {
        self.attack == 0 && self.defense == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: f64,
    #[serde(default)]
    pub energy_gain: u32,
    #[serde(default)]
    pub energy_cost: u32,
    #[serde(default = "default_cooldown")]
    pub cooldown: u64,
    #[serde(default)]
    pub archetype: MoveArchetype,
    #[serde(default)]
    pub buff: Option<BuffSpec>,
}

impl MoveEntry {
    pub fn fast(move_type: impl Into<String>, power: f64, energy_gain: u32, cooldown: u64) -> Self {
        Self {
            move_type: move_type.into(),
            category: MoveCategory::Fast,
            power,
            energy_gain,
            energy_cost: 0,
            cooldown,
            archetype: MoveArchetype::General,
            buff: None,
        }
    }

    pub fn charged(move_type: impl Into<String>, power: f64, energy_cost: u32, cooldown: u64) -> Self {
        Self {
            move_type: move_type.into(),
            category: MoveCategory::Charged,
            power,
            energy_gain: 0,
            energy_cost,
            cooldown,
            archetype: MoveArchetype::General,
            buff: None,
        }
    }

    pub fn with_buff(mut self, archetype: MoveArchetype, buff: BuffSpec) -> Self {
        self.archetype = archetype;
        self.buff = Some(buff);
        self
    }

    pub fn is_charged(&self) -> bool {
        self.category == MoveCategory::Charged
    }
}

/// Attacking types this type takes altered damage from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub resistances: Vec<String>,
    #[serde(default)]
    pub immunities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub base_attack: f64,
    pub base_defense: f64,
    pub base_stamina: f64,
}

/// Read-only source of move, type and unit metadata.
pub trait CatalogProvider: Send + Sync {
    fn move_entry(&self, id: &str) -> Option<&MoveEntry>;
    fn type_entry(&self, id: &str) -> Option<&TypeEntry>;
    fn unit_entry(&self, id: &str) -> Option<&UnitEntry>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub moves: HashMap<String, MoveEntry>,
    #[serde(default)]
    pub types: HashMap<String, TypeEntry>,
    #[serde(default)]
    pub units: HashMap<String, UnitEntry>,
}

impl Catalog {
    pub fn with_move(mut self, id: impl Into<String>, entry: MoveEntry) -> Self {
        self.moves.insert(id.into(), entry);
        self
    }

    pub fn with_type(mut self, id: impl Into<String>, entry: TypeEntry) -> Self {
        self.types.insert(id.into(), entry);
        self
    }

    pub fn with_unit(mut self, id: impl Into<String>, entry: UnitEntry) -> Self {
        self.units.insert(id.into(), entry);
        self
    }
}

impl CatalogProvider for Catalog {
    fn move_entry(&self, id: &str) -> Option<&MoveEntry> {
        self.moves.get(id)
    }

    fn type_entry(&self, id: &str) -> Option<&TypeEntry> {
        self.types.get(id)
    }

    fn unit_entry(&self, id: &str) -> Option<&UnitEntry> {
        self.units.get(id)
    }
}

/// Snapshot of one combat-ready unit as handed over by the roster system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub unit_id: String,
    pub fast_move: String,
    pub charged_move: String,
    #[serde(default)]
    pub tm_move: Option<String>,
    #[serde(default)]
    pub tm_enabled: bool,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub iv_attack: u32,
    #[serde(default)]
    pub iv_defense: u32,
    #[serde(default)]
    pub iv_hp: u32,
    #[serde(default)]
    pub shiny: bool,
    pub primary_type: String,
    #[serde(default)]
    pub secondary_type: Option<String>,
    /// Move id to move type. Entries present here take precedence over the catalog.
    #[serde(default)]
    pub move_types: BTreeMap<String, String>,
    #[serde(default)]
    pub bonus_shields: u32,
    #[serde(default)]
    pub choiced: bool,
    #[serde(default)]
    pub held_item: Option<String>,
}

impl Loadout {
    pub fn new(
        unit_id: impl Into<String>,
        primary_type: impl Into<String>,
        fast_move: impl Into<String>,
        charged_move: impl Into<String>,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            fast_move: fast_move.into(),
            charged_move: charged_move.into(),
            tm_move: None,
            tm_enabled: false,
            level: default_level(),
            iv_attack: 0,
            iv_defense: 0,
            iv_hp: 0,
            shiny: false,
            primary_type: primary_type.into(),
            secondary_type: None,
            move_types: BTreeMap::new(),
            bonus_shields: 0,
            choiced: false,
            held_item: None,
        }
    }

    /// Both type slots in order, without deduplication.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_type.as_str()).chain(self.secondary_type.as_deref())
    }

    /// The secondary move, only when it is present and enabled.
    pub fn secondary_move(&self) -> Option<&str> {
        if self.tm_enabled {
            self.tm_move.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    pub team1: Vec<Loadout>,
    pub team2: Vec<Loadout>,
}
