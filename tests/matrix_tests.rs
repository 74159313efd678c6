mod common;

use common::{brawler, catalog, loadout};
use pvp_combat_sim::battle::Winner;
use pvp_combat_sim::items::ItemRegistry;
use pvp_combat_sim::matrix::{fight_seed, simulate_round, win_rates, Pairing};
use pvp_combat_sim::{simulate_fight, BattleConfig, BattleError};

fn pairings() -> Vec<Pairing> {
    vec![
        Pairing {
            team1: vec![loadout("striker", "normal", "jab5", "dud")],
            team2: vec![loadout("striker", "normal", "jab3", "dud")],
        },
        Pairing {
            team1: vec![brawler()],
            team2: vec![brawler()],
        },
        Pairing {
            team1: vec![brawler()],
            team2: vec![],
        },
        Pairing {
            team1: vec![loadout("striker", "normal", "jab3", "dud")],
            team2: vec![loadout("striker", "normal", "jab5", "dud")],
        },
    ]
}

#[test]
fn round_results_keep_pairing_order() {
    let items = ItemRegistry::with_builtin();
    let config = BattleConfig::default();
    let results = simulate_round(&pairings(), &catalog(), &items, &config, 17);

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().winner, Winner::Team1);
    assert_eq!(results[1].as_ref().unwrap().winner, Winner::Tie);
    assert!(matches!(
        results[2],
        Err(BattleError::InvalidRoster { len: 0, .. })
    ));
    assert_eq!(results[3].as_ref().unwrap().winner, Winner::Team2);
}

#[test]
fn round_fights_match_sequential_runs() {
    let items = ItemRegistry::with_builtin();
    let config = BattleConfig::default();
    let pairings = pairings();
    let parallel = simulate_round(&pairings, &catalog(), &items, &config, 5);
    for (index, pairing) in pairings.iter().enumerate() {
        let sequential = simulate_fight(
            &pairing.team1,
            &pairing.team2,
            &catalog(),
            &items,
            &config,
            fight_seed(5, index),
        );
        assert_eq!(parallel[index], sequential);
    }
}

#[test]
fn win_rates_tally_every_fight() {
    let items = ItemRegistry::with_builtin();
    let config = BattleConfig::default();
    let pairing = &pairings()[0];
    let tally = win_rates(pairing, &catalog(), &items, &config, 8, 1).unwrap();
    assert_eq!(tally.total(), 8);
    assert_eq!(tally.team1, 8);
    assert_eq!(tally.team1_rate(), 1.0);
}

#[test]
fn win_rates_surface_the_first_error() {
    let items = ItemRegistry::with_builtin();
    let config = BattleConfig::default();
    let pairing = &pairings()[2];
    assert!(win_rates(pairing, &catalog(), &items, &config, 4, 1).is_err());
}
