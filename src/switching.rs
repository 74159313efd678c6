use crate::battler::Battler;
use crate::model::TypeEntry;
use crate::types::contains;

fn chart_score(move_type: &str, defender: &[TypeEntry]) -> i32 {
    defender
        .iter()
        .map(|entry| {
            let mut score = 0;
            if contains(&entry.weaknesses, move_type) {
                score += 1;
            }
            if contains(&entry.resistances, move_type) {
                score -= 1;
            }
            if contains(&entry.immunities, move_type) {
                score -= 2;
            }
            score
        })
        .sum()
}

fn offense(attacker: &Battler, defender: &Battler) -> i32 {
    attacker
        .slots()
        .filter_map(|slot| attacker.move_in(slot))
        .map(|known| chart_score(&known.move_type, defender.type_entries()))
        .sum()
}

/// Matchup balance of `attacker` against `defender`. Positive favours the
/// attacker: its moves against the defender's chart minus the reverse.
pub fn analyze_type(attacker: &Battler, defender: &Battler) -> i32 {
    offense(attacker, defender) - offense(defender, attacker)
}

/// Roster index of the unit to swap in for `active`, if the current matchup
/// is losing and a living bench unit would win it.
pub fn check_advantage(active: &Battler, defender: &Battler, roster: &[Battler]) -> Option<usize> {
    if analyze_type(active, defender) >= 0 {
        return None;
    }
    roster.iter().position(|candidate| {
        candidate.id != active.id
            && !candidate.is_fainted()
            && analyze_type(candidate, defender) > 0
    })
}
