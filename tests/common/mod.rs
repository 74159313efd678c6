#![allow(dead_code)]

use pvp_combat_sim::model::{Catalog, Loadout, MoveEntry, TypeEntry, UnitEntry};
use std::path::PathBuf;

pub fn unit(base_attack: f64, base_defense: f64, base_stamina: f64) -> UnitEntry {
    UnitEntry {
        base_attack,
        base_defense,
        base_stamina,
    }
}

fn chart(weak: &[&str], resist: &[&str]) -> TypeEntry {
    TypeEntry {
        weaknesses: weak.iter().map(|s| s.to_string()).collect(),
        resistances: resist.iter().map(|s| s.to_string()).collect(),
        immunities: Vec::new(),
    }
}

/// Level 16 units have a level multiplier of exactly 0.5, so base 100 stats
/// become 50 and damage numbers stay round.
pub fn catalog() -> Catalog {
    Catalog::default()
        .with_type("normal", TypeEntry::default())
        .with_type("fire", chart(&["water"], &["grass", "fire"]))
        .with_type("water", chart(&["grass"], &["fire", "water"]))
        .with_type("grass", chart(&["fire"], &["water"]))
        // typeless moves never get STAB: floor(power * 0.65) + 1 at equal stats
        .with_move("jab5", MoveEntry::fast("typeless", 7.0, 0, 500))
        .with_move("jab3", MoveEntry::fast("typeless", 4.0, 0, 500))
        .with_move("dud", MoveEntry::charged("typeless", 1.0, 100, 500))
        .with_move("jab", MoveEntry::fast("typeless", 10.0, 10, 500))
        .with_move("slam", MoveEntry::charged("typeless", 100.0, 50, 500))
        .with_move("ember", MoveEntry::fast("fire", 5.0, 5, 500))
        .with_move("flame", MoveEntry::charged("fire", 60.0, 50, 500))
        .with_move("bubble", MoveEntry::fast("water", 5.0, 5, 500))
        .with_move("surf", MoveEntry::charged("water", 60.0, 50, 500))
        .with_move("vine", MoveEntry::fast("grass", 5.0, 5, 500))
        .with_move("leaf", MoveEntry::charged("grass", 60.0, 50, 500))
        .with_unit("striker", unit(100.0, 100.0, 20.0))
        .with_unit("husk", unit(100.0, 100.0, 0.0))
        .with_unit("brawler", unit(100.0, 100.0, 200.0))
        .with_unit("elemental", unit(100.0, 100.0, 200.0))
}

pub fn loadout(unit_id: &str, primary_type: &str, fast: &str, charged: &str) -> Loadout {
    let mut loadout = Loadout::new(unit_id, primary_type, fast, charged);
    loadout.level = 16;
    loadout
}

pub fn brawler() -> Loadout {
    loadout("brawler", "normal", "jab", "slam")
}

pub fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}
