use crate::model::TypeEntry;

pub const WEAKNESS_MULTIPLIER: f64 = 1.6;
pub const RESISTANCE_MULTIPLIER: f64 = 0.625;
// Immunity still lets a sliver of damage through.
pub const IMMUNITY_MULTIPLIER: f64 = 0.390625;
pub const STAB_MULTIPLIER: f64 = 1.2;

/// Effectiveness of `move_type` against a deduplicated set of defender types.
pub fn type_effectiveness<'a, I>(move_type: &str, defender_types: I) -> f64
where
    I: IntoIterator<Item = &'a TypeEntry>,
{
    defender_types
        .into_iter()
        .map(|entry| single_type_effectiveness(move_type, entry))
        .product()
}

fn single_type_effectiveness(move_type: &str, defending: &TypeEntry) -> f64 {
    let mut multiplier = 1.0;
    if contains(&defending.weaknesses, move_type) {
        multiplier *= WEAKNESS_MULTIPLIER;
    }
    if contains(&defending.resistances, move_type) {
        multiplier *= RESISTANCE_MULTIPLIER;
    }
    if contains(&defending.immunities, move_type) {
        multiplier *= IMMUNITY_MULTIPLIER;
    }
    multiplier
}

/// Same-type bonus; applied once per attacker type slot matching the move.
pub fn stab_multiplier<'a, I>(move_type: &str, attacker_types: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    attacker_types
        .into_iter()
        .filter(|t| t.eq_ignore_ascii_case(move_type))
        .fold(1.0, |acc, _| acc * STAB_MULTIPLIER)
}

/// Combined multiplier fed into the damage formula.
pub fn type_multiplier<'a, 'b, A, D>(move_type: &str, attacker_types: A, defender_types: D) -> f64
where
    A: IntoIterator<Item = &'a str>,
    D: IntoIterator<Item = &'b TypeEntry>,
{
    type_effectiveness(move_type, defender_types) * stab_multiplier(move_type, attacker_types)
}

pub(crate) fn contains(list: &[String], move_type: &str) -> bool {
    list.iter().any(|t| t.eq_ignore_ascii_case(move_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(weak: &[&str], resist: &[&str], immune: &[&str]) -> TypeEntry {
        let own = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        TypeEntry {
            weaknesses: own(weak),
            resistances: own(resist),
            immunities: own(immune),
        }
    }

    fn chart() -> Vec<(&'static str, TypeEntry)> {
        vec![
            ("fire", entry(&["water", "rock"], &["fire", "grass"], &[])),
            ("water", entry(&["grass", "electric"], &["fire", "water"], &[])),
            ("grass", entry(&["fire"], &["water", "grass", "electric"], &[])),
            ("ghost", entry(&["ghost"], &["poison"], &["normal", "fighting"])),
            ("flying", entry(&["electric", "rock"], &["grass"], &["ground"])),
            ("normal", entry(&["fighting"], &[], &["ghost"])),
        ]
    }

    const MOVE_TYPES: [&str; 9] = [
        "fire", "water", "grass", "electric", "rock", "ghost", "normal", "fighting", "ground",
    ];

    #[test]
    fn weakness_and_resistance_stack_across_types() {
        let chart = chart();
        let water = &chart[1].1;
        let flying = &chart[4].1;
        let eff = type_effectiveness("electric", [water, flying]);
        assert!((eff - 1.6 * 1.6).abs() < 1e-12);
        let grass = &chart[2].1;
        let eff = type_effectiveness("electric", [water, grass]);
        assert!((eff - 1.6 * 0.625).abs() < 1e-12);
    }

    #[test]
    fn immunity_is_never_zero() {
        let chart = chart();
        let ghost = &chart[3].1;
        assert_eq!(type_effectiveness("normal", [ghost]), IMMUNITY_MULTIPLIER);
    }

    #[test]
    fn stab_applies_per_matching_slot() {
        assert_eq!(stab_multiplier("fire", ["fire", "flying"]), 1.2);
        assert!((stab_multiplier("fire", ["fire", "fire"]) - 1.44).abs() < 1e-12);
        assert_eq!(stab_multiplier("water", ["fire", "flying"]), 1.0);
    }

    fn allowed_single() -> Vec<f64> {
        vec![
            1.0,
            WEAKNESS_MULTIPLIER,
            RESISTANCE_MULTIPLIER,
            IMMUNITY_MULTIPLIER,
        ]
    }

    proptest! {
        #[test]
        fn effectiveness_stays_in_finite_product_set(
            move_idx in 0usize..MOVE_TYPES.len(),
            first in 0usize..6,
            second in 0usize..6,
            stab_slots in 0usize..3,
        ) {
            let chart = chart();
            let move_type = MOVE_TYPES[move_idx];
            let mut defenders = vec![&chart[first].1];
            if second != first {
                defenders.push(&chart[second].1);
            }
            let attacker: Vec<&str> = std::iter::repeat(move_type).take(stab_slots).collect();
            let value = type_multiplier(move_type, attacker.iter().copied(), defenders);

            let singles = allowed_single();
            let stab = STAB_MULTIPLIER.powi(stab_slots as i32);
            let matched = singles.iter().any(|a| {
                singles
                    .iter()
                    .any(|b| ((a * b * stab) - value).abs() < 1e-9)
            });
            prop_assert!(matched, "unexpected multiplier {value}");
            prop_assert!(value > 0.0);
        }
    }
}
