use crate::ai::select_move;
use crate::battle_logger::{BattleLogger, Event, EventKind};
use crate::battler::{Battler, MoveSlot, Side};
use crate::combat::{apply_move, arbitrate};
use crate::config::BattleConfig;
use crate::error::{BattleError, BattleResult};
use crate::items::{HookCall, HookPoint, HookSystem, ItemRegistry};
use crate::model::{CatalogProvider, Loadout};
use crate::switching::check_advantage;
use rand_chacha::ChaCha8Rng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const MAX_ROSTER: usize = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Team1,
    Team2,
    Tie,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BattlePhase {
    Initializing,
    PreBattle,
    MatchupStart,
    Ticking,
    MatchupEnd,
    PostBattle,
    Concluded,
}

/// Per-side statistics, indexed by original roster position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub damage_dealt: Vec<u32>,
    pub damage_taken: Vec<u32>,
    pub fainted: Vec<bool>,
}

impl TeamSummary {
    fn from_roster(roster: &[Battler]) -> Self {
        Self {
            damage_dealt: roster.iter().map(|b| b.damage_dealt).collect(),
            damage_taken: roster.iter().map(|b| b.damage_taken).collect(),
            fainted: roster.iter().map(Battler::is_fainted).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FightResult {
    pub winner: Winner,
    pub team1: TeamSummary,
    pub team2: TeamSummary,
    /// Main loop iterations executed.
    pub ticks: u64,
    pub events: Vec<Event>,
}

impl FightResult {
    pub fn team(&self, side: Side) -> &TeamSummary {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }
}

/// One fight between two rosters. Owns its battlers, hook dispatcher, event
/// log and RNG; nothing is shared with other fights except the catalog data
/// captured at construction.
pub struct Battle<R = ChaCha8Rng> {
    config: BattleConfig,
    teams: [Vec<Battler>; 2],
    actives: [usize; 2],
    switches_left: [u32; 2],
    hooks: HookSystem,
    logger: BattleLogger,
    rng: R,
    phase: BattlePhase,
    clock: u64,
    tick: u64,
    winner: Option<Winner>,
}

fn validate_roster(side: Side, roster: &[Loadout]) -> BattleResult<()> {
    if roster.is_empty() || roster.len() > MAX_ROSTER {
        return Err(BattleError::InvalidRoster {
            side,
            len: roster.len(),
        });
    }
    Ok(())
}

fn roster_names(roster: &[Battler]) -> Vec<String> {
    roster.iter().map(|b| b.name().to_string()).collect()
}

fn build_roster(
    side: Side,
    roster: &[Loadout],
    catalog: &dyn CatalogProvider,
    config: &BattleConfig,
) -> BattleResult<Vec<Battler>> {
    roster
        .iter()
        .enumerate()
        .map(|(id, loadout)| Battler::new(loadout, side, id, catalog, config))
        .collect()
}

impl Battle<ChaCha8Rng> {
    /// Seeds a [`ChaCha8Rng`], whose stream is fixed across platforms and
    /// `rand` releases, so a seed replays the same fight everywhere.
    pub fn new(
        team1: &[Loadout],
        team2: &[Loadout],
        catalog: &dyn CatalogProvider,
        items: &ItemRegistry,
        config: BattleConfig,
        seed: u64,
    ) -> BattleResult<Self> {
        Self::with_rng(team1, team2, catalog, items, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Battle<R> {
    pub fn with_rng(
        team1: &[Loadout],
        team2: &[Loadout],
        catalog: &dyn CatalogProvider,
        items: &ItemRegistry,
        config: BattleConfig,
        rng: R,
    ) -> BattleResult<Self> {
        config.validate()?;
        validate_roster(Side::Team1, team1)?;
        validate_roster(Side::Team2, team2)?;
        let teams = [
            build_roster(Side::Team1, team1, catalog, &config)?,
            build_roster(Side::Team2, team2, catalog, &config)?,
        ];
        let hooks = HookSystem::from_rosters(&teams, items)?;
        let switches_left = [config.switch_budget; 2];
        Ok(Self {
            config,
            teams,
            actives: [0, 0],
            switches_left,
            hooks,
            logger: BattleLogger::new(),
            rng,
            phase: BattlePhase::Initializing,
            clock: 0,
            tick: 0,
            winner: None,
        })
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn roster(&self, side: Side) -> &[Battler] {
        &self.teams[side.index()]
    }

    pub fn active(&self, side: Side) -> &Battler {
        &self.teams[side.index()][self.actives[side.index()]]
    }

    pub fn switches_left(&self, side: Side) -> u32 {
        self.switches_left[side.index()]
    }

    pub fn events(&self) -> &[Event] {
        self.logger.events()
    }

    /// Drives the state machine to completion.
    pub fn run(mut self) -> BattleResult<FightResult> {
        tracing::info!(
            team1 = self.teams[0].len(),
            team2 = self.teams[1].len(),
            "fight started"
        );
        while self.phase != BattlePhase::Concluded {
            self.advance()?;
        }
        let result = self.into_result();
        tracing::info!(winner = ?result.winner, ticks = result.ticks, "fight concluded");
        Ok(result)
    }

    /// Executes the work of the current phase and moves to the next one.
    /// `Ticking` repeats until an active faints.
    pub fn advance(&mut self) -> BattleResult<BattlePhase> {
        self.phase = match self.phase {
            BattlePhase::Initializing => {
                let kind = EventKind::BattleStart {
                    team1: roster_names(&self.teams[0]),
                    team2: roster_names(&self.teams[1]),
                };
                self.logger.push(kind);
                BattlePhase::PreBattle
            }
            BattlePhase::PreBattle => {
                self.fire(HookPoint::PreBattle, None);
                BattlePhase::MatchupStart
            }
            BattlePhase::MatchupStart => {
                self.start_matchup();
                BattlePhase::Ticking
            }
            BattlePhase::Ticking => self.tick()?,
            BattlePhase::MatchupEnd => self.end_matchup(),
            BattlePhase::PostBattle => {
                self.fire(HookPoint::PostBattle, None);
                let winner = self.winner.unwrap_or(Winner::Tie);
                self.logger.push(EventKind::BattleEnd { winner });
                BattlePhase::Concluded
            }
            BattlePhase::Concluded => BattlePhase::Concluded,
        };
        Ok(self.phase)
    }

    fn fire(&mut self, point: HookPoint, actor: Option<Side>) -> usize {
        let call = HookCall {
            point,
            actor,
            clock: self.clock,
            tick: self.tick,
        };
        self.hooks.fire(call, &mut self.teams, self.actives)
    }

    fn start_matchup(&mut self) {
        self.logger.push(EventKind::MatchupStart {
            team1: self.actives[0],
            team2: self.actives[1],
        });
        self.fire(HookPoint::PreCombat, None);
    }

    fn intent(&self, side: Side) -> Option<MoveSlot> {
        select_move(
            self.active(side),
            self.active(side.opponent()),
            self.config.tick_increment,
        )
    }

    fn tick(&mut self) -> BattleResult<BattlePhase> {
        if let Some(limit) = self.config.max_ticks {
            if self.tick >= limit {
                return Err(BattleError::StalemateExceeded { ticks: limit });
            }
        }
        self.tick += 1;
        self.clock += self.config.tick_increment;
        self.logger.set_clock(self.clock);

        self.fire(HookPoint::OnTick, None);
        for side in Side::BOTH {
            let index = self.actives[side.index()];
            let active = &mut self.teams[side.index()][index];
            active.timer = active.timer.saturating_add(self.config.tick_increment);
        }

        let mut intents = [self.intent(Side::Team1), self.intent(Side::Team2)];
        tracing::trace!(tick = self.tick, ?intents, "intended moves");

        for side in Side::BOTH {
            if intents[side.index()].is_none() || !self.try_switch(side) {
                continue;
            }
            intents[side.index()] = None;
            let other = side.opponent();
            if intents[other.index()].is_some() {
                intents[other.index()] = self.intent(other);
            }
        }

        let mut suppressed = [false, false];
        if let [Some(first), Some(second)] = intents {
            let threshold = self.config.action_threshold;
            let actives = [self.active(Side::Team1), self.active(Side::Team2)];
            if actives.iter().all(|b| b.timer >= threshold) {
                suppressed = arbitrate(actives, [first, second]);
            }
        }

        for side in Side::BOTH {
            let Some(slot) = intents[side.index()] else {
                continue;
            };
            if suppressed[side.index()] {
                let unit = self.actives[side.index()];
                self.logger.push(EventKind::AttackSuppressed { side, unit });
                continue;
            }
            self.resolve_attack(side, slot);
        }

        let mut any_fainted = false;
        for side in Side::BOTH {
            if self.active(side).is_fainted() {
                let unit = self.actives[side.index()];
                self.logger.log_faint(side, unit);
                tracing::debug!(%side, unit, tick = self.tick, "active unit fainted");
                any_fainted = true;
            }
        }
        Ok(if any_fainted {
            BattlePhase::MatchupEnd
        } else {
            BattlePhase::Ticking
        })
    }

    fn resolve_attack(&mut self, side: Side, slot: MoveSlot) {
        let charged = self
            .active(side)
            .move_in(slot)
            .is_some_and(|known| known.is_charged());
        let (own, enemy) = if charged {
            (HookPoint::OnChargedMove, HookPoint::OnEnemyChargedMove)
        } else {
            (HookPoint::OnFastMove, HookPoint::OnEnemyFastMove)
        };
        self.fire(own, Some(side));
        self.fire(enemy, Some(side));

        let [first, second] = self.actives;
        let [team1, team2] = &mut self.teams;
        let (attacker, defender) = match side {
            Side::Team1 => (&mut team1[first], &mut team2[second]),
            Side::Team2 => (&mut team2[second], &mut team1[first]),
        };
        apply_move(attacker, slot, defender, &mut self.rng, &mut self.logger);
    }

    fn try_switch(&mut self, side: Side) -> bool {
        if self.switches_left[side.index()] == 0 {
            return false;
        }
        let roster = &self.teams[side.index()];
        let active = &roster[self.actives[side.index()]];
        let Some(to) = check_advantage(active, self.active(side.opponent()), roster) else {
            return false;
        };
        // The outgoing pair is closed in the log only; POST_COMBAT is
        // reserved for matchups that end in a faint.
        self.log_matchup_end();
        self.swap_in(side, to, false);
        self.start_matchup();
        true
    }

    fn swap_in(&mut self, side: Side, to: usize, forced: bool) {
        let i = side.index();
        let from = self.actives[i];
        self.actives[i] = to;
        self.switches_left[i] = self.switches_left[i].saturating_sub(1);
        self.teams[i][to].timer = 0;
        self.logger.log_switch(side, from, to, forced);
        tracing::debug!(
            %side,
            from,
            to,
            forced,
            switches_left = self.switches_left[i],
            "switched active unit"
        );
    }

    fn first_living(&self, side: Side) -> Option<usize> {
        self.teams[side.index()].iter().position(|b| !b.is_fainted())
    }

    fn log_matchup_end(&mut self) {
        self.logger.push(EventKind::MatchupEnd {
            team1: self.actives[0],
            team2: self.actives[1],
        });
    }

    fn end_matchup(&mut self) -> BattlePhase {
        self.log_matchup_end();
        self.fire(HookPoint::PostCombat, None);

        let mut replacements = [None, None];
        let mut exhausted = [false, false];
        for side in Side::BOTH {
            if !self.active(side).is_fainted() {
                continue;
            }
            match self.first_living(side) {
                Some(next) => replacements[side.index()] = Some(next),
                None => exhausted[side.index()] = true,
            }
        }

        if exhausted.iter().any(|e| *e) {
            self.winner = Some(match exhausted {
                [true, true] => Winner::Tie,
                [true, false] => Winner::Team2,
                _ => Winner::Team1,
            });
            return BattlePhase::PostBattle;
        }

        for side in Side::BOTH {
            if let Some(next) = replacements[side.index()] {
                self.swap_in(side, next, true);
            }
        }
        BattlePhase::MatchupStart
    }

    fn into_result(self) -> FightResult {
        FightResult {
            winner: self.winner.unwrap_or(Winner::Tie),
            team1: TeamSummary::from_roster(&self.teams[0]),
            team2: TeamSummary::from_roster(&self.teams[1]),
            ticks: self.tick,
            events: self.logger.into_events(),
        }
    }
}

/// Builds and runs one fight with a seeded [`ChaCha8Rng`].
pub fn simulate_fight(
    team1: &[Loadout],
    team2: &[Loadout],
    catalog: &dyn CatalogProvider,
    items: &ItemRegistry,
    config: &BattleConfig,
    seed: u64,
) -> BattleResult<FightResult> {
    Battle::new(team1, team2, catalog, items, config.clone(), seed)?.run()
}
