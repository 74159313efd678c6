//! Move resolution, split into a pure evaluation step and a state-mutating
//! application step, plus the simultaneous-lethal arbitration built on the
//! former.

use crate::ai::has_lethal_option;
use crate::battle_logger::{BattleLogger, EventKind};
use crate::battler::{Battler, MoveSlot, Side};
use crate::damage::{compute_damage, DamageRoll};
use crate::model::{BuffTarget, MoveArchetype, MoveEntry};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitOutcome {
    /// A shield absorbed the hit.
    Blocked,
    Landed(DamageRoll),
}

/// Whether `defender` spends a shield on an incoming hit of `damage`.
pub fn should_shield(defender: &Battler, entry: &MoveEntry, damage: u32) -> bool {
    if defender.shields == 0 || !entry.is_charged() {
        return false;
    }
    let lethal = i64::from(damage) >= i64::from(defender.hp);
    lethal || entry.archetype == MoveArchetype::SelfBuff
}

/// What `slot` would do to `defender` right now. Never mutates.
pub fn evaluate_hit(attacker: &Battler, slot: MoveSlot, defender: &Battler) -> Option<HitOutcome> {
    let known = attacker.move_in(slot)?;
    let roll = compute_damage(attacker, slot, defender)?;
    if should_shield(defender, &known.entry, roll.damage) {
        Some(HitOutcome::Blocked)
    } else {
        Some(HitOutcome::Landed(roll))
    }
}

/// Commits hp, shield and damage counters for an evaluated hit.
pub fn land_hit(outcome: HitOutcome, attacker: &mut Battler, defender: &mut Battler) {
    match outcome {
        HitOutcome::Blocked => defender.shields = defender.shields.saturating_sub(1),
        HitOutcome::Landed(roll) => {
            let damage = i32::try_from(roll.damage).unwrap_or(i32::MAX);
            defender.hp = defender.hp.saturating_sub(damage);
            defender.damage_taken = defender.damage_taken.saturating_add(roll.damage);
            attacker.damage_dealt = attacker.damage_dealt.saturating_add(roll.damage);
        }
    }
}

/// Fires `slot` from `attacker` into `defender`: bookkeeping, damage or
/// block, then the move's buff roll. Every step is logged.
pub fn apply_move<R: Rng + ?Sized>(
    attacker: &mut Battler,
    slot: MoveSlot,
    defender: &mut Battler,
    rng: &mut R,
    logger: &mut BattleLogger,
) -> Option<HitOutcome> {
    let outcome = evaluate_hit(attacker, slot, defender)?;
    let known = attacker.move_in(slot)?.clone();

    attacker.record_use(slot);
    logger.log_move(attacker.side, attacker.id, &known.id, slot);

    land_hit(outcome, attacker, defender);
    match outcome {
        HitOutcome::Blocked => logger.push(EventKind::Shielded {
            side: defender.side,
            unit: defender.id,
            move_id: known.id.clone(),
            shields_left: defender.shields,
        }),
        HitOutcome::Landed(roll) => logger.log_damage(
            defender.side,
            defender.id,
            roll.damage,
            roll.multiplier,
            defender.hp,
        ),
    }

    if known.is_charged() {
        if let Some(buff) = known.entry.buff.as_ref().filter(|b| !b.is_empty()) {
            if rng.gen::<f64>() < buff.chance {
                let target = match buff.target {
                    BuffTarget::Attacker => attacker,
                    BuffTarget::Opponent => defender,
                };
                target.apply_stages(buff.attack, buff.defense);
                logger.push(EventKind::BuffApplied {
                    side: target.side,
                    unit: target.id,
                    attack: buff.attack,
                    defense: buff.defense,
                });
            }
        }
    }

    Some(outcome)
}

fn is_charged(battler: &Battler, slot: MoveSlot) -> bool {
    battler.move_in(slot).is_some_and(|known| known.is_charged())
}

/// Which side acts first when both actives fire this tick. `None` means the
/// two attacks resolve independently.
pub fn attack_priority(actives: [&Battler; 2], intents: [MoveSlot; 2]) -> Option<Side> {
    let charged = [
        is_charged(actives[0], intents[0]),
        is_charged(actives[1], intents[1]),
    ];
    match charged {
        [true, true] => {
            if actives[0].a > actives[1].a {
                Some(Side::Team1)
            } else if actives[1].a > actives[0].a {
                Some(Side::Team2)
            } else {
                None
            }
        }
        [true, false] => Some(Side::Team1),
        [false, true] => Some(Side::Team2),
        [false, false] => None,
    }
}

/// Decides which of two simultaneous attacks must not land, by trading both
/// on value copies of the actives. Indexed by [`Side::index`].
pub fn arbitrate(actives: [&Battler; 2], intents: [MoveSlot; 2]) -> [bool; 2] {
    let mut suppressed = [false, false];
    if !has_lethal_option(actives[0], actives[1]) && !has_lethal_option(actives[1], actives[0]) {
        return suppressed;
    }

    let mut first = actives[0].clone();
    let mut second = actives[1].clone();
    if let Some(outcome) = evaluate_hit(&first, intents[0], &second) {
        land_hit(outcome, &mut first, &mut second);
    }
    if let Some(outcome) = evaluate_hit(&second, intents[1], &first) {
        land_hit(outcome, &mut second, &mut first);
    }

    let priority = attack_priority(actives, intents);
    match (first.is_fainted(), second.is_fainted()) {
        (true, true) => {
            if let Some(side) = priority {
                suppressed[side.opponent().index()] = true;
            }
        }
        (true, false) if priority != Some(Side::Team1) => suppressed[0] = true,
        (false, true) if priority != Some(Side::Team2) => suppressed[1] = true,
        _ => {}
    }
    tracing::debug!(?priority, ?suppressed, "simultaneous lethal arbitration");
    suppressed
}
