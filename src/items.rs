//! Combat items and the hook dispatcher that drives them.
//!
//! The simulator only decides *when* hooks fire and *which* items see them;
//! every effect lives behind [`CombatItem`].

use crate::battler::{Battler, Side};
use crate::error::{BattleError, BattleResult, CatalogKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookPoint {
    PreBattle,
    PreCombat,
    OnTick,
    OnFastMove,
    OnEnemyFastMove,
    OnChargedMove,
    OnEnemyChargedMove,
    PostCombat,
    PostBattle,
}

impl HookPoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            HookPoint::PreBattle => "PRE_BATTLE",
            HookPoint::PreCombat => "PRE_COMBAT",
            HookPoint::OnTick => "ON_TICK",
            HookPoint::OnFastMove => "ON_FAST_MOVE",
            HookPoint::OnEnemyFastMove => "ON_ENEMY_FAST_MOVE",
            HookPoint::OnChargedMove => "ON_CHARGED_MOVE",
            HookPoint::OnEnemyChargedMove => "ON_ENEMY_CHARGED_MOVE",
            HookPoint::PostCombat => "POST_COMBAT",
            HookPoint::PostBattle => "POST_BATTLE",
        }
    }

    /// Fired once per fight; every item on both rosters participates.
    pub const fn is_battle_scope(self) -> bool {
        matches!(self, HookPoint::PreBattle | HookPoint::PostBattle)
    }

    /// Fired from inside the tick loop.
    pub const fn is_tick_scope(self) -> bool {
        matches!(
            self,
            HookPoint::OnTick
                | HookPoint::OnFastMove
                | HookPoint::OnEnemyFastMove
                | HookPoint::OnChargedMove
                | HookPoint::OnEnemyChargedMove
        )
    }

    /// For move hooks, whether the holder must sit on the acting side (`Some(true)`)
    /// or the opposing side (`Some(false)`).
    const fn acting_perspective(self) -> Option<bool> {
        match self {
            HookPoint::OnFastMove | HookPoint::OnChargedMove => Some(true),
            HookPoint::OnEnemyFastMove | HookPoint::OnEnemyChargedMove => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ItemFlags {
    /// Active for every lifecycle point outside the tick loop regardless of the holder.
    pub global: bool,
    /// Active while the holder is alive, even from the bench.
    pub remote: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UnitRef {
    pub side: Side,
    pub index: usize,
}

/// View handed to item handlers. Rosters are mutable so effects can adjust
/// combat state directly.
pub struct HookContext<'a> {
    pub point: HookPoint,
    pub holder: UnitRef,
    /// Side whose move triggered a move hook.
    pub actor: Option<Side>,
    pub clock: u64,
    pub tick: u64,
    teams: &'a mut [Vec<Battler>; 2],
    actives: [usize; 2],
    active_items: &'a [(UnitRef, Arc<dyn CombatItem>)],
}

impl<'a> HookContext<'a> {
    pub fn holder(&self) -> &Battler {
        &self.teams[self.holder.side.index()][self.holder.index]
    }

    pub fn holder_mut(&mut self) -> &mut Battler {
        &mut self.teams[self.holder.side.index()][self.holder.index]
    }

    pub fn active(&self, side: Side) -> &Battler {
        &self.teams[side.index()][self.actives[side.index()]]
    }

    pub fn active_mut(&mut self, side: Side) -> &mut Battler {
        &mut self.teams[side.index()][self.actives[side.index()]]
    }

    pub fn roster(&self, side: Side) -> &[Battler] {
        &self.teams[side.index()]
    }

    pub fn roster_mut(&mut self, side: Side) -> &mut [Battler] {
        &mut self.teams[side.index()]
    }

    /// The item currently active for `unit`, if any.
    pub fn active_item(&self, unit: UnitRef) -> Option<&dyn CombatItem> {
        self.active_items
            .iter()
            .find(|(holder, _)| *holder == unit)
            .map(|(_, item)| item.as_ref())
    }
}

/// An item effect. Every handler defaults to a no-op; implementors override
/// only the lifecycle points they care about.
pub trait CombatItem: Send + Sync {
    fn id(&self) -> &str;

    fn flags(&self) -> ItemFlags {
        ItemFlags::default()
    }

    fn pre_battle(&self, _ctx: &mut HookContext<'_>) {}
    fn pre_combat(&self, _ctx: &mut HookContext<'_>) {}
    fn on_tick(&self, _ctx: &mut HookContext<'_>) {}
    fn on_fast_move(&self, _ctx: &mut HookContext<'_>) {}
    fn on_enemy_fast_move(&self, _ctx: &mut HookContext<'_>) {}
    fn on_charged_move(&self, _ctx: &mut HookContext<'_>) {}
    fn on_enemy_charged_move(&self, _ctx: &mut HookContext<'_>) {}
    fn post_combat(&self, _ctx: &mut HookContext<'_>) {}
    fn post_battle(&self, _ctx: &mut HookContext<'_>) {}
}

fn dispatch(item: &dyn CombatItem, ctx: &mut HookContext<'_>) {
    match ctx.point {
        HookPoint::PreBattle => item.pre_battle(ctx),
        HookPoint::PreCombat => item.pre_combat(ctx),
        HookPoint::OnTick => item.on_tick(ctx),
        HookPoint::OnFastMove => item.on_fast_move(ctx),
        HookPoint::OnEnemyFastMove => item.on_enemy_fast_move(ctx),
        HookPoint::OnChargedMove => item.on_charged_move(ctx),
        HookPoint::OnEnemyChargedMove => item.on_enemy_charged_move(ctx),
        HookPoint::PostCombat => item.post_combat(ctx),
        HookPoint::PostBattle => item.post_battle(ctx),
    }
}

/// Whether an item held by `holder` takes part in `point`.
pub fn is_item_active(
    point: HookPoint,
    flags: ItemFlags,
    holder: UnitRef,
    holder_fainted: bool,
    actives: [usize; 2],
) -> bool {
    if point.is_battle_scope() {
        return true;
    }
    if actives[holder.side.index()] == holder.index {
        return true;
    }
    if flags.remote && !holder_fainted {
        return true;
    }
    flags.global && !point.is_tick_scope()
}

/// Position of a hook invocation inside the fight.
#[derive(Clone, Copy, Debug)]
pub struct HookCall {
    pub point: HookPoint,
    pub actor: Option<Side>,
    pub clock: u64,
    pub tick: u64,
}

/// Per-fight dispatcher. Owned by the simulator; never shared between fights.
#[derive(Default)]
pub struct HookSystem {
    items: [Vec<Option<Arc<dyn CombatItem>>>; 2],
}

impl HookSystem {
    /// Resolves each battler's held item against `registry`.
    pub fn from_rosters(teams: &[Vec<Battler>; 2], registry: &ItemRegistry) -> BattleResult<Self> {
        let resolve = |team: &Vec<Battler>| {
            team.iter()
                .map(|b| registry.resolve(b.loadout().held_item.as_deref()))
                .collect::<BattleResult<Vec<_>>>()
        };
        Ok(Self {
            items: [resolve(&teams[0])?, resolve(&teams[1])?],
        })
    }

    /// Items participating in `call.point`, in side then bench order.
    pub fn active_items(
        &self,
        call: &HookCall,
        teams: &[Vec<Battler>; 2],
        actives: [usize; 2],
    ) -> Vec<(UnitRef, Arc<dyn CombatItem>)> {
        let mut active = Vec::new();
        for side in Side::BOTH {
            if let (Some(actor), Some(same_side)) = (call.actor, call.point.acting_perspective()) {
                if (side == actor) != same_side {
                    continue;
                }
            }
            for (index, slot) in self.items[side.index()].iter().enumerate() {
                let Some(item) = slot else {
                    continue;
                };
                let holder = UnitRef { side, index };
                let fainted = teams[side.index()]
                    .get(index)
                    .map_or(true, Battler::is_fainted);
                if is_item_active(call.point, item.flags(), holder, fainted, actives) {
                    active.push((holder, Arc::clone(item)));
                }
            }
        }
        active
    }

    /// Invokes every active item's handler for `call.point`. Returns the number
    /// of handlers invoked.
    pub fn fire(&self, call: HookCall, teams: &mut [Vec<Battler>; 2], actives: [usize; 2]) -> usize {
        let active = self.active_items(&call, teams, actives);
        for (holder, item) in &active {
            tracing::trace!(
                point = %call.point,
                item = item.id(),
                side = %holder.side,
                unit = holder.index,
                "dispatching item hook"
            );
            let mut ctx = HookContext {
                point: call.point,
                holder: *holder,
                actor: call.actor,
                clock: call.clock,
                tick: call.tick,
                teams: &mut *teams,
                actives,
                active_items: &active,
            };
            dispatch(item.as_ref(), &mut ctx);
        }
        active.len()
    }
}

/// Item lookup by id, as referenced from [`crate::model::Loadout::held_item`].
#[derive(Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<String, Arc<dyn CombatItem>>,
}

type ItemFactory = fn() -> Arc<dyn CombatItem>;

static BUILTIN_ITEMS: phf::Map<&'static str, ItemFactory> = phf::phf_map! {
    "attack-charm" => attack_charm as ItemFactory,
    "guard-banner" => guard_banner as ItemFactory,
    "energy-band" => energy_band as ItemFactory,
    "medic-kit" => medic_kit as ItemFactory,
    "retaliation-orb" => retaliation_orb as ItemFactory,
};

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in items.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (id, factory) in BUILTIN_ITEMS.entries() {
            registry.register(*id, factory());
        }
        registry
    }

    pub fn register(&mut self, id: impl Into<String>, item: Arc<dyn CombatItem>) {
        self.items.insert(id.into(), item);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn CombatItem>> {
        self.items.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn resolve(&self, held: Option<&str>) -> BattleResult<Option<Arc<dyn CombatItem>>> {
        match held {
            None => Ok(None),
            Some(id) => self
                .get(id)
                .map(Some)
                .ok_or_else(|| BattleError::unknown(CatalogKind::Item, id)),
        }
    }
}

fn attack_charm() -> Arc<dyn CombatItem> {
    Arc::new(AttackCharm)
}

fn guard_banner() -> Arc<dyn CombatItem> {
    Arc::new(GuardBanner)
}

fn energy_band() -> Arc<dyn CombatItem> {
    Arc::new(EnergyBand)
}

fn medic_kit() -> Arc<dyn CombatItem> {
    Arc::new(MedicKit)
}

fn retaliation_orb() -> Arc<dyn CombatItem> {
    Arc::new(RetaliationOrb)
}

/// Raises the holder to at least +1 attack whenever it enters a matchup.
pub struct AttackCharm;

impl CombatItem for AttackCharm {
    fn id(&self) -> &str {
        "attack-charm"
    }

    fn pre_combat(&self, ctx: &mut HookContext<'_>) {
        let holder = ctx.holder_mut();
        holder.am = holder.am.max(1);
    }
}

/// Grants every living ally one defense stage before the first tick.
pub struct GuardBanner;

impl CombatItem for GuardBanner {
    fn id(&self) -> &str {
        "guard-banner"
    }

    fn flags(&self) -> ItemFlags {
        ItemFlags {
            global: true,
            remote: false,
        }
    }

    fn pre_battle(&self, ctx: &mut HookContext<'_>) {
        let side = ctx.holder.side;
        for ally in ctx.roster_mut(side).iter_mut().filter(|b| !b.is_fainted()) {
            ally.dm += 1;
        }
    }
}

pub struct EnergyBand;

impl CombatItem for EnergyBand {
    fn id(&self) -> &str {
        "energy-band"
    }

    fn on_fast_move(&self, ctx: &mut HookContext<'_>) {
        ctx.holder_mut().gain_energy(2);
    }
}

/// Patches up whichever ally is active, even from the bench.
pub struct MedicKit;

impl CombatItem for MedicKit {
    fn id(&self) -> &str {
        "medic-kit"
    }

    fn flags(&self) -> ItemFlags {
        ItemFlags {
            global: false,
            remote: true,
        }
    }

    fn on_tick(&self, ctx: &mut HookContext<'_>) {
        if ctx.tick % 10 != 0 {
            return;
        }
        let side = ctx.holder.side;
        ctx.active_mut(side).heal(1);
    }
}

pub struct RetaliationOrb;

impl CombatItem for RetaliationOrb {
    fn id(&self) -> &str {
        "retaliation-orb"
    }

    fn on_enemy_charged_move(&self, ctx: &mut HookContext<'_>) {
        ctx.holder_mut().dm += 1;
    }
}
