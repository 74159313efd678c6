//! Move selection and lethal lookahead. Everything here is a pure function of
//! the battlers it is given.

use crate::battler::{Battler, KnownMove, MoveSlot};
use crate::damage::{compute_damage, DamageRoll};
use crate::model::MoveArchetype;

/// Ticks needed before a move with `cooldown` can fire again.
fn ticks_for(cooldown: u64, tick_increment: u64) -> u64 {
    cooldown.div_ceil(tick_increment.max(1)).max(1)
}

/// Whether `slot` would knock out `defender` if fired now. The fast-move
/// cooldown doubles as the "may this unit act at all" gate.
pub fn is_lethal(attacker: &Battler, slot: MoveSlot, defender: &Battler) -> bool {
    if attacker.timer < attacker.fast().entry.cooldown {
        return false;
    }
    compute_damage(attacker, slot, defender)
        .is_some_and(|roll| i64::from(roll.damage) >= i64::from(defender.hp))
}

/// Any currently legal move of `attacker` is lethal against `defender`.
pub fn has_lethal_option(attacker: &Battler, defender: &Battler) -> bool {
    attacker
        .slots()
        .filter(|slot| attacker.can_use(*slot))
        .any(|slot| is_lethal(attacker, slot, defender))
}

/// The hardest-hitting charged-category move `attacker` carries against
/// `defender`, respecting a choice lock.
pub fn best_charged_move<'a>(
    attacker: &'a Battler,
    defender: &Battler,
) -> Option<(MoveSlot, &'a KnownMove, DamageRoll)> {
    let mut best: Option<(MoveSlot, &KnownMove, DamageRoll)> = None;
    for slot in attacker.slots() {
        let Some(known) = attacker.move_in(slot) else {
            continue;
        };
        if !known.is_charged() {
            continue;
        }
        if attacker.locked.is_some_and(|locked| locked != slot) {
            continue;
        }
        let Some(roll) = compute_damage(attacker, slot, defender) else {
            continue;
        };
        if best.map_or(true, |(_, _, current)| roll.damage > current.damage) {
            best = Some((slot, known, roll));
        }
    }
    best
}

/// Estimated ticks `me` survives against `them`: first every charged hit
/// `them` can already afford (each shield absorbs one), then fast moves.
pub fn turns_to_die(me: &Battler, them: &Battler, tick_increment: u64) -> u64 {
    let mut hp = i64::from(me.hp);
    if hp <= 0 {
        return 0;
    }
    let mut ticks = 0;
    let mut shields = me.shields;

    if let Some((_, known, roll)) = best_charged_move(them, me) {
        let cost = known.entry.energy_cost;
        let affordable = if cost == 0 { 1 } else { them.energy / cost };
        let per_hit = ticks_for(known.entry.cooldown, tick_increment);
        for _ in 0..affordable {
            ticks += per_hit;
            if shields > 0 {
                shields -= 1;
                continue;
            }
            hp -= i64::from(roll.damage);
            if hp <= 0 {
                return ticks;
            }
        }
    }

    let fast_damage = compute_damage(them, MoveSlot::Fast, me)
        .map_or(1, |roll| i64::from(roll.damage.max(1)));
    let per_hit = ticks_for(them.fast().entry.cooldown, tick_increment);
    let hits = (hp + fast_damage - 1) / fast_damage;
    ticks + hits as u64 * per_hit
}

/// A self-debuffing move is only worth firing when the uses `me` can already
/// afford (minus the defender's shields) finish the defender before `me` dies.
pub fn self_debuff_is_safe(
    me: &Battler,
    slot: MoveSlot,
    damage: u32,
    them: &Battler,
    tick_increment: u64,
) -> bool {
    let Some(known) = me.move_in(slot) else {
        return false;
    };
    let cost = known.entry.energy_cost.max(1);
    let max_uses = i64::from(me.energy / cost) - i64::from(them.shields);
    max_uses * i64::from(damage) > i64::from(them.hp)
        && max_uses < turns_to_die(me, them, tick_increment) as i64
}

fn is_self_debuff(me: &Battler, slot: MoveSlot) -> bool {
    me.move_in(slot).is_some_and(|known| {
        known.is_charged() && known.entry.archetype == MoveArchetype::SelfDebuff
    })
}

/// The move `me` would use this tick against `them`, if any is legal.
/// Highest damage wins; ties go to the earlier slot (fast, charged, secondary).
pub fn select_move(me: &Battler, them: &Battler, tick_increment: u64) -> Option<MoveSlot> {
    let mut best: Option<(MoveSlot, u32)> = None;
    for slot in me.slots() {
        if !me.can_use(slot) {
            continue;
        }
        let Some(roll) = compute_damage(me, slot, them) else {
            continue;
        };
        if is_self_debuff(me, slot)
            && !self_debuff_is_safe(me, slot, roll.damage, them, tick_increment)
        {
            continue;
        }
        match best {
            Some((_, damage)) if damage >= roll.damage => {}
            _ => best = Some((slot, roll.damage)),
        }
    }
    best.map(|(slot, _)| slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battler::Side;
    use crate::config::BattleConfig;
    use crate::model::{BuffSpec, BuffTarget, Catalog, Loadout, MoveEntry, TypeEntry, UnitEntry};

    const TICK: u64 = 100;

    fn catalog() -> Catalog {
        let unit = UnitEntry {
            base_attack: 100.0,
            base_defense: 100.0,
            base_stamina: 200.0,
        };
        let debuff = BuffSpec {
            chance: 1.0,
            target: BuffTarget::Attacker,
            attack: 0,
            defense: -2,
        };
        Catalog::default()
            // typeless moves carry no STAB; 10 power at a == d: floor(6.5) + 1 = 7
            .with_move("jab", MoveEntry::fast("typeless", 10.0, 10, 500))
            // floor(65) + 1 = 66
            .with_move("slam", MoveEntry::charged("typeless", 100.0, 50, 500))
            .with_move(
                "reckless",
                MoveEntry::charged("typeless", 150.0, 50, 500)
                    .with_buff(MoveArchetype::SelfDebuff, debuff),
            )
            .with_type("normal", TypeEntry::default())
            .with_unit("brawler", unit)
    }

    fn battler(charged: &str, side: Side) -> Battler {
        let mut loadout = Loadout::new("brawler", "normal", "jab", charged);
        loadout.level = 16;
        Battler::new(&loadout, side, 0, &catalog(), &BattleConfig::default()).unwrap()
    }

    #[test]
    fn nothing_legal_before_cooldown() {
        let me = battler("slam", Side::Team1);
        let them = battler("slam", Side::Team2);
        assert_eq!(select_move(&me, &them, TICK), None);
    }

    #[test]
    fn fast_move_chosen_without_energy() {
        let mut me = battler("slam", Side::Team1);
        let them = battler("slam", Side::Team2);
        me.timer = 500;
        assert_eq!(select_move(&me, &them, TICK), Some(MoveSlot::Fast));
    }

    #[test]
    fn charged_move_preferred_when_affordable() {
        let mut me = battler("slam", Side::Team1);
        let them = battler("slam", Side::Team2);
        me.timer = 500;
        me.energy = 50;
        assert_eq!(select_move(&me, &them, TICK), Some(MoveSlot::Charged));
    }

    #[test]
    fn lethal_requires_action_gate() {
        let mut me = battler("slam", Side::Team1);
        let mut them = battler("slam", Side::Team2);
        them.hp = 7;
        assert!(!is_lethal(&me, MoveSlot::Fast, &them));
        me.timer = 500;
        assert!(is_lethal(&me, MoveSlot::Fast, &them));
        them.hp = 8;
        assert!(!is_lethal(&me, MoveSlot::Fast, &them));
    }

    #[test]
    fn lethal_check_does_not_mutate() {
        let mut me = battler("slam", Side::Team1);
        let mut them = battler("slam", Side::Team2);
        me.timer = 500;
        them.hp = 3;
        let before = (them.hp, them.damage_taken, me.timer, me.energy);
        assert!(is_lethal(&me, MoveSlot::Fast, &them));
        assert_eq!(before, (them.hp, them.damage_taken, me.timer, me.energy));
    }

    #[test]
    fn turns_to_die_counts_shields_then_fast_hits() {
        let me = battler("slam", Side::Team1);
        let mut them = battler("slam", Side::Team2);
        // hp 100, no energy: ceil(100 / 7) = 15 fast hits of 5 ticks each
        assert_eq!(me.hp, 100);
        assert_eq!(turns_to_die(&me, &them, TICK), 75);

        // one slam (66) then ceil(34 / 7) = 5 fast hits
        them.energy = 50;
        assert_eq!(turns_to_die(&me, &them, TICK), 5 + 25);

        // a shield soaks the slam
        let mut shielded = me.clone();
        shielded.shields = 1;
        assert_eq!(turns_to_die(&shielded, &them, TICK), 5 + 75);

        // two slams kill outright
        them.energy = 100;
        assert_eq!(turns_to_die(&me, &them, TICK), 10);
    }

    #[test]
    fn self_debuff_suppressed_unless_it_closes_out() {
        let mut me = battler("reckless", Side::Team1);
        let mut them = battler("slam", Side::Team2);
        me.timer = 500;
        me.energy = 50;
        // 150 power: floor(97.5) + 1 = 98 < 100 hp, so not worth the drop
        assert_eq!(select_move(&me, &them, TICK), Some(MoveSlot::Fast));

        them.hp = 90;
        assert_eq!(select_move(&me, &them, TICK), Some(MoveSlot::Charged));

        // a shield on the defender eats the only use
        them.shields = 1;
        assert_eq!(select_move(&me, &them, TICK), Some(MoveSlot::Fast));
    }

    #[test]
    fn self_debuff_requires_surviving_long_enough() {
        let mut me = battler("reckless", Side::Team1);
        let mut them = battler("slam", Side::Team2);
        me.timer = 500;
        me.energy = 50;
        them.hp = 90;
        // two affordable slams: turns_to_die == 10
        them.energy = 100;
        assert!(self_debuff_is_safe(&me, MoveSlot::Charged, 98, &them, TICK));
        // the first slam finishes me: 5 ticks
        me.hp = 1;
        assert!(self_debuff_is_safe(&me, MoveSlot::Charged, 98, &them, TICK));
        // already fainted units survive zero ticks
        me.hp = 0;
        assert!(!self_debuff_is_safe(&me, MoveSlot::Charged, 98, &them, TICK));
    }
}
