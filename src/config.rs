use crate::error::BattleError;
use serde::{Deserialize, Serialize};

/// Tunables for a single fight.
///
/// Every field falls back to its default when omitted from a config file, so
/// `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Clock advance per main loop iteration.
    pub tick_increment: u64,
    /// Timer value both actives must reach before simultaneous-lethal arbitration runs.
    pub action_threshold: u64,
    /// Voluntary plus forced swaps allowed per side.
    pub switch_budget: u32,
    pub max_energy: u32,
    /// Shields every unit starts with before its loadout bonus.
    pub base_shields: u32,
    /// Caller-imposed ceiling on the fight clock. `None` lets the fight run to completion.
    pub max_ticks: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            tick_increment: 100,
            action_threshold: 500,
            switch_budget: 5,
            max_energy: 100,
            base_shields: 0,
            max_ticks: None,
        }
    }
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.tick_increment == 0 {
            return Err(BattleError::InvalidConfig("tick_increment must be > 0"));
        }
        if self.max_energy == 0 {
            return Err(BattleError::InvalidConfig("max_energy must be > 0"));
        }
        Ok(())
    }

    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }
}
