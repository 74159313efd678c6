//! Errors surfaced by fight construction and execution.

use crate::battler::Side;
use std::fmt;

/// Which catalog table a missing id was looked up in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CatalogKind {
    Move,
    Type,
    Unit,
    Item,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Move => "move",
            CatalogKind::Type => "type",
            CatalogKind::Unit => "unit",
            CatalogKind::Item => "item",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BattleError {
    #[error("{side} roster must hold 1 to 3 units, got {len}")]
    InvalidRoster { side: Side, len: usize },

    #[error("unknown {kind} `{id}` in catalog")]
    UnknownCatalogEntry { kind: CatalogKind, id: String },

    #[error("fight exceeded the tick ceiling of {ticks}")]
    StalemateExceeded { ticks: u64 },

    #[error("invalid battle config: {0}")]
    InvalidConfig(&'static str),
}

impl BattleError {
    pub(crate) fn unknown(kind: CatalogKind, id: impl Into<String>) -> Self {
        BattleError::UnknownCatalogEntry {
            kind,
            id: id.into(),
        }
    }
}

pub type BattleResult<T> = Result<T, BattleError>;
