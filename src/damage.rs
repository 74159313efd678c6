use crate::battler::{Battler, MoveSlot};
use crate::types::type_multiplier;

pub const BUFF_DIVISOR: f64 = 4.0;
const BASE_SCALE: f64 = 0.5;
const BONUS_SCALE: f64 = 1.3;

/// Applies a buff stage to a base stat. Stages are not clamped.
pub fn effective_stat(base: f64, stage: i32) -> f64 {
    let m = stage as f64;
    match stage {
        s if s > 0 => base * (BUFF_DIVISOR + m) / BUFF_DIVISOR,
        s if s < 0 => base * BUFF_DIVISOR / (BUFF_DIVISOR - m),
        _ => base,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub damage: u32,
    pub multiplier: f64,
}

/// Core formula. Always yields at least one point of damage.
pub fn calculate_damage(power: f64, attack: f64, defense: f64, multiplier: f64) -> u32 {
    let defense = if defense > 0.0 { defense } else { 1.0 };
    let raw = (power * (attack / defense) * multiplier * BASE_SCALE * BONUS_SCALE).floor();
    if raw.is_finite() && raw > 0.0 {
        (raw as u32).saturating_add(1)
    } else {
        1
    }
}

/// Damage `attacker` would deal to `defender` with the move in `slot`, using
/// current buff stages on both sides.
pub fn compute_damage(attacker: &Battler, slot: MoveSlot, defender: &Battler) -> Option<DamageRoll> {
    let known = attacker.move_in(slot)?;
    let multiplier = type_multiplier(
        &known.move_type,
        attacker.loadout().types(),
        defender.type_entries(),
    );
    let damage = calculate_damage(
        known.entry.power,
        effective_stat(attacker.a, attacker.am),
        effective_stat(defender.d, defender.dm),
        multiplier,
    );
    Some(DamageRoll { damage, multiplier })
}
