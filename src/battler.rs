use crate::config::BattleConfig;
use crate::error::{BattleError, BattleResult, CatalogKind};
use crate::model::{CatalogProvider, Loadout, MoveEntry, TypeEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const MIN_STARTING_HP: i32 = 10;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Team1, Side::Team2];

    pub fn opponent(self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Team1 => 0,
            Side::Team2 => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Team1 => f.write_str("team1"),
            Side::Team2 => f.write_str("team2"),
        }
    }
}

/// Position of a move in a unit's kit. Declaration order is the tie-break order
/// used by move selection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSlot {
    Fast,
    Charged,
    Secondary,
}

impl MoveSlot {
    pub const ALL: [MoveSlot; 3] = [MoveSlot::Fast, MoveSlot::Charged, MoveSlot::Secondary];
}

/// A catalog move bound to the type it resolves to for this unit.
#[derive(Clone, Debug, PartialEq)]
pub struct KnownMove {
    pub id: String,
    pub move_type: String,
    pub entry: MoveEntry,
}

impl KnownMove {
    pub fn is_charged(&self) -> bool {
        self.entry.is_charged()
    }
}

/// Catalog data resolved once per unit per fight. Shared between a battler and
/// its speculative copies.
#[derive(Debug)]
struct Profile {
    loadout: Loadout,
    fast: KnownMove,
    charged: KnownMove,
    secondary: Option<KnownMove>,
    type_entries: Vec<TypeEntry>,
}

#[derive(Clone, Debug)]
pub struct Battler {
    profile: Arc<Profile>,
    pub side: Side,
    /// Bench index in the original roster order.
    pub id: usize,
    pub a: f64,
    pub d: f64,
    pub hp: i32,
    pub max_hp: i32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub timer: u64,
    pub am: i32,
    pub dm: i32,
    pub energy: u32,
    pub shields: u32,
    /// Charged-category slot a choiced unit is locked into.
    pub locked: Option<MoveSlot>,
    energy_cap: u32,
}

pub fn level_multiplier(level: u32) -> f64 {
    0.125 * (level.clamp(1, 50) as f64).sqrt()
}

impl Battler {
    /// Builds a battler from a private copy of `loadout`, resolving every id it
    /// references against `catalog`.
    pub fn new(
        loadout: &Loadout,
        side: Side,
        id: usize,
        catalog: &dyn CatalogProvider,
        config: &BattleConfig,
    ) -> BattleResult<Self> {
        let mut working = loadout.clone();
        let unit = *catalog
            .unit_entry(&working.unit_id)
            .ok_or_else(|| BattleError::unknown(CatalogKind::Unit, &working.unit_id))?;

        let fast = resolve_move(&mut working, &loadout.fast_move, catalog)?;
        let charged = resolve_move(&mut working, &loadout.charged_move, catalog)?;
        let secondary = match loadout.secondary_move() {
            Some(id) => Some(resolve_move(&mut working, id, catalog)?),
            None => None,
        };

        let mut type_names: Vec<&str> = Vec::with_capacity(2);
        for name in loadout.types() {
            if !type_names.iter().any(|t| t.eq_ignore_ascii_case(name)) {
                type_names.push(name);
            }
        }
        let type_entries = type_names
            .into_iter()
            .map(|name| {
                catalog
                    .type_entry(name)
                    .cloned()
                    .ok_or_else(|| BattleError::unknown(CatalogKind::Type, name))
            })
            .collect::<BattleResult<Vec<_>>>()?;

        let cpm = level_multiplier(working.level);
        let a = (unit.base_attack + working.iv_attack as f64) * cpm;
        let d = (unit.base_defense + working.iv_defense as f64) * cpm;
        let hp = (((unit.base_stamina + working.iv_hp as f64) * cpm).floor() as i32)
            .max(MIN_STARTING_HP);
        let shields = config.base_shields + working.bonus_shields;

        Ok(Self {
            profile: Arc::new(Profile {
                loadout: working,
                fast,
                charged,
                secondary,
                type_entries,
            }),
            side,
            id,
            a,
            d,
            hp,
            max_hp: hp,
            damage_dealt: 0,
            damage_taken: 0,
            timer: 0,
            am: 0,
            dm: 0,
            energy: 0,
            shields,
            locked: None,
            energy_cap: config.max_energy,
        })
    }

    /// The fight's working copy of the loadout.
    pub fn loadout(&self) -> &Loadout {
        &self.profile.loadout
    }

    pub fn name(&self) -> &str {
        &self.profile.loadout.unit_id
    }

    pub fn fast(&self) -> &KnownMove {
        &self.profile.fast
    }

    pub fn move_in(&self, slot: MoveSlot) -> Option<&KnownMove> {
        match slot {
            MoveSlot::Fast => Some(&self.profile.fast),
            MoveSlot::Charged => Some(&self.profile.charged),
            MoveSlot::Secondary => self.profile.secondary.as_ref(),
        }
    }

    /// Slots this unit actually carries.
    pub fn slots(&self) -> impl Iterator<Item = MoveSlot> + '_ {
        MoveSlot::ALL
            .into_iter()
            .filter(move |slot| self.move_in(*slot).is_some())
    }

    /// Deduplicated defending type chart rows.
    pub fn type_entries(&self) -> &[TypeEntry] {
        &self.profile.type_entries
    }

    pub fn is_fainted(&self) -> bool {
        self.hp <= 0
    }

    /// Whether `slot` may be fired right now, ignoring any lookahead policy.
    pub fn can_use(&self, slot: MoveSlot) -> bool {
        let Some(known) = self.move_in(slot) else {
            return false;
        };
        if self.timer < known.entry.cooldown {
            return false;
        }
        if !known.is_charged() {
            return true;
        }
        if self.energy < known.entry.energy_cost {
            return false;
        }
        match self.locked {
            Some(locked) => locked == slot,
            None => true,
        }
    }

    /// Timer, energy and choice-lock bookkeeping for firing `slot`.
    pub fn record_use(&mut self, slot: MoveSlot) {
        let Some(known) = self.move_in(slot) else {
            return;
        };
        let charged = known.is_charged();
        let gain = known.entry.energy_gain;
        let cost = known.entry.energy_cost;
        self.timer = 0;
        if charged {
            self.energy = self.energy.saturating_sub(cost);
            if self.loadout().choiced && self.locked.is_none() {
                self.locked = Some(slot);
            }
        } else {
            self.gain_energy(gain);
        }
    }

    pub fn gain_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount).min(self.energy_cap);
    }

    pub fn heal(&mut self, amount: i32) {
        if self.is_fainted() {
            return;
        }
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn apply_stages(&mut self, attack: i32, defense: i32) {
        self.am = self.am.saturating_add(attack);
        self.dm = self.dm.saturating_add(defense);
    }
}

fn resolve_move(
    working: &mut Loadout,
    move_id: &str,
    catalog: &dyn CatalogProvider,
) -> BattleResult<KnownMove> {
    let entry = catalog
        .move_entry(move_id)
        .cloned()
        .ok_or_else(|| BattleError::unknown(CatalogKind::Move, move_id))?;
    let move_type = working
        .move_types
        .entry(move_id.to_string())
        .or_insert_with(|| entry.move_type.clone())
        .clone();
    Ok(KnownMove {
        id: move_id.to_string(),
        move_type,
        entry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Catalog, MoveEntry, UnitEntry};

    fn catalog() -> Catalog {
        Catalog::default()
            .with_move("ember", MoveEntry::fast("fire", 6.0, 8, 500))
            .with_move("flamethrower", MoveEntry::charged("fire", 70.0, 50, 500))
            .with_move("solar", MoveEntry::charged("grass", 120.0, 80, 1000))
            .with_type("fire", TypeEntry::default())
            .with_unit(
                "emberling",
                UnitEntry {
                    base_attack: 100.0,
                    base_defense: 80.0,
                    base_stamina: 120.0,
                },
            )
    }

    fn loadout() -> Loadout {
        let mut l = Loadout::new("emberling", "fire", "ember", "flamethrower");
        l.level = 16;
        l
    }

    #[test]
    fn stats_follow_level_multiplier() {
        let b = Battler::new(&loadout(), Side::Team1, 0, &catalog(), &BattleConfig::default())
            .unwrap();
        assert_eq!(b.a, 50.0);
        assert_eq!(b.d, 40.0);
        assert_eq!(b.hp, 60);
        assert_eq!(b.max_hp, 60);
    }

    #[test]
    fn hp_is_clamped_to_minimum() {
        let mut catalog = catalog();
        catalog.units.get_mut("emberling").unwrap().base_stamina = 0.0;
        let b = Battler::new(&loadout(), Side::Team1, 0, &catalog, &BattleConfig::default())
            .unwrap();
        assert_eq!(b.hp, 10);
    }

    #[test]
    fn working_copy_fills_type_cache_without_touching_input() {
        let input = loadout();
        let b = Battler::new(&input, Side::Team1, 0, &catalog(), &BattleConfig::default())
            .unwrap();
        assert!(input.move_types.is_empty());
        assert_eq!(b.loadout().move_types.get("ember").map(String::as_str), Some("fire"));
        assert_eq!(b.fast().move_type, "fire");
    }

    #[test]
    fn unknown_move_is_reported() {
        let mut input = loadout();
        input.charged_move = "hyperbeam".to_string();
        let err = Battler::new(&input, Side::Team1, 0, &catalog(), &BattleConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            BattleError::UnknownCatalogEntry {
                kind: CatalogKind::Move,
                id: "hyperbeam".to_string()
            }
        );
    }

    #[test]
    fn disabled_secondary_is_not_resolved() {
        let mut input = loadout();
        input.tm_move = Some("does-not-exist".to_string());
        let b = Battler::new(&input, Side::Team1, 0, &catalog(), &BattleConfig::default())
            .unwrap();
        assert!(b.move_in(MoveSlot::Secondary).is_none());
        assert_eq!(b.slots().count(), 2);
    }

    #[test]
    fn choiced_unit_locks_to_first_charged_slot() {
        let mut input = loadout();
        input.choiced = true;
        input.tm_move = Some("solar".to_string());
        input.tm_enabled = true;
        let mut b = Battler::new(&input, Side::Team1, 0, &catalog(), &BattleConfig::default())
            .unwrap();
        b.energy = 100;
        b.timer = 1000;
        assert!(b.can_use(MoveSlot::Charged));
        assert!(b.can_use(MoveSlot::Secondary));
        b.record_use(MoveSlot::Charged);
        assert_eq!(b.energy, 50);
        assert_eq!(b.timer, 0);
        b.energy = 100;
        b.timer = 1000;
        assert!(b.can_use(MoveSlot::Charged));
        assert!(!b.can_use(MoveSlot::Secondary));
    }

    #[test]
    fn extreme_heals_and_stages_saturate() {
        let mut b = Battler::new(&loadout(), Side::Team1, 0, &catalog(), &BattleConfig::default())
            .unwrap();
        b.heal(i32::MAX);
        assert_eq!(b.hp, b.max_hp);

        b.apply_stages(i32::MAX, i32::MIN);
        b.apply_stages(1, -1);
        assert_eq!(b.am, i32::MAX);
        assert_eq!(b.dm, i32::MIN);
    }

    #[test]
    fn fast_move_energy_is_capped() {
        let mut b = Battler::new(&loadout(), Side::Team1, 0, &catalog(), &BattleConfig::default())
            .unwrap();
        b.energy = 96;
        b.record_use(MoveSlot::Fast);
        assert_eq!(b.energy, 100);
    }
}
