use crate::battle::{simulate_fight, FightResult, Winner};
use crate::config::BattleConfig;
use crate::error::BattleResult;
use crate::items::ItemRegistry;
use crate::model::{CatalogProvider, Loadout};
use rand_chacha::ChaCha8Rng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

/// Two rosters scheduled to fight each other in a round.
#[derive(Clone, Debug)]
pub struct Pairing {
    pub team1: Vec<Loadout>,
    pub team2: Vec<Loadout>,
}

/// Seed for the `index`-th fight of a round, independent of scheduling order.
pub fn fight_seed(round_seed: u64, index: usize) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(round_seed ^ ((index as u64) << 32) ^ index as u64);
    rng.gen()
}

/// Runs every pairing of a round in parallel. Results keep pairing order.
pub fn simulate_round(
    pairings: &[Pairing],
    catalog: &dyn CatalogProvider,
    items: &ItemRegistry,
    config: &BattleConfig,
    round_seed: u64,
) -> Vec<BattleResult<FightResult>> {
    pairings
        .par_iter()
        .enumerate()
        .map(|(index, pairing)| {
            simulate_fight(
                &pairing.team1,
                &pairing.team2,
                catalog,
                items,
                config,
                fight_seed(round_seed, index),
            )
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WinTally {
    pub team1: u64,
    pub team2: u64,
    pub ties: u64,
}

impl WinTally {
    pub fn record(&mut self, winner: Winner) {
        match winner {
            Winner::Team1 => self.team1 += 1,
            Winner::Team2 => self.team2 += 1,
            Winner::Tie => self.ties += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.team1 + self.team2 + self.ties
    }

    /// Team 1 win rate with ties counted as half a win.
    pub fn team1_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.team1 as f64 + 0.5 * self.ties as f64) / total as f64
    }

    fn merge(mut self, other: WinTally) -> WinTally {
        self.team1 += other.team1;
        self.team2 += other.team2;
        self.ties += other.ties;
        self
    }
}

/// Replays one pairing `sims` times with seeds derived from `seed`.
pub fn win_rates(
    pairing: &Pairing,
    catalog: &dyn CatalogProvider,
    items: &ItemRegistry,
    config: &BattleConfig,
    sims: usize,
    seed: u64,
) -> BattleResult<WinTally> {
    (0..sims)
        .into_par_iter()
        .map(|index| {
            let result = simulate_fight(
                &pairing.team1,
                &pairing.team2,
                catalog,
                items,
                config,
                fight_seed(seed, index),
            )?;
            let mut tally = WinTally::default();
            tally.record(result.winner);
            Ok(tally)
        })
        .try_reduce(WinTally::default, |a, b| Ok(a.merge(b)))
}
