use crate::battle::Winner;
use crate::battler::{MoveSlot, Side};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EventKind {
    BattleStart {
        team1: Vec<String>,
        team2: Vec<String>,
    },
    MatchupStart {
        team1: usize,
        team2: usize,
    },
    MoveUsed {
        side: Side,
        unit: usize,
        move_id: String,
        slot: MoveSlot,
    },
    /// `side`/`unit` name the unit that took the damage.
    Damage {
        side: Side,
        unit: usize,
        amount: u32,
        multiplier: f64,
        hp_after: i32,
    },
    Shielded {
        side: Side,
        unit: usize,
        move_id: String,
        shields_left: u32,
    },
    BuffApplied {
        side: Side,
        unit: usize,
        attack: i32,
        defense: i32,
    },
    AttackSuppressed {
        side: Side,
        unit: usize,
    },
    Switch {
        side: Side,
        from: usize,
        to: usize,
        forced: bool,
    },
    Faint {
        side: Side,
        unit: usize,
    },
    MatchupEnd {
        team1: usize,
        team2: usize,
    },
    BattleEnd {
        winner: Winner,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub sequence: u64,
    pub timestamp: u64,
    pub kind: EventKind,
}

/// Append-only event record for one fight. Timestamps come from the fight
/// clock set by the simulator; sequence numbers follow emission order.
#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    clock: u64,
    events: Vec<Event>,
}

impl BattleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_clock(&mut self, clock: u64) {
        self.clock = clock;
    }

    pub fn push(&mut self, kind: EventKind) {
        let sequence = self.events.len() as u64;
        self.events.push(Event {
            sequence,
            timestamp: self.clock,
            kind,
        });
    }

    pub fn log_move(&mut self, side: Side, unit: usize, move_id: &str, slot: MoveSlot) {
        self.push(EventKind::MoveUsed {
            side,
            unit,
            move_id: move_id.to_string(),
            slot,
        });
    }

    pub fn log_damage(&mut self, side: Side, unit: usize, amount: u32, multiplier: f64, hp_after: i32) {
        self.push(EventKind::Damage {
            side,
            unit,
            amount,
            multiplier,
            hp_after: hp_after.max(0),
        });
    }

    pub fn log_switch(&mut self, side: Side, from: usize, to: usize, forced: bool) {
        self.push(EventKind::Switch {
            side,
            from,
            to,
            forced,
        });
    }

    pub fn log_faint(&mut self, side: Side, unit: usize) {
        self.push(EventKind::Faint { side, unit });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "events": self.events })
    }
}
