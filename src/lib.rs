pub mod ai;
pub mod battle;
pub mod battle_logger;
pub mod battler;
pub mod combat;
pub mod config;
pub mod damage;
pub mod error;
pub mod items;
pub mod matrix;
pub mod model;
pub mod switching;
pub mod types;

pub use crate::battle::{simulate_fight, Battle, FightResult, Winner};
pub use crate::config::BattleConfig;
pub use crate::error::{BattleError, BattleResult};

use crate::items::ItemRegistry;
use crate::matrix::{win_rates, Pairing};
use crate::model::{Catalog, RosterFile};
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub catalog_path: PathBuf,
    pub rosters_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub seed: u64,
    pub sims: usize,
    pub output_path: Option<PathBuf>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} file at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {what} JSON from {}", path.display()))
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    read_json(path, "catalog")
}

pub fn load_rosters(path: &Path) -> anyhow::Result<RosterFile> {
    read_json(path, "rosters")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<BattleConfig> {
    let config = match path {
        Some(path) => read_json(path, "config")?,
        None => BattleConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.sims == 0 {
        anyhow::bail!("--sims must be > 0");
    }
    let catalog = load_catalog(&opts.catalog_path)?;
    let rosters = load_rosters(&opts.rosters_path)?;
    let config = load_config(opts.config_path.as_deref())?;
    let items = ItemRegistry::with_builtin();

    if opts.sims == 1 {
        let result = simulate_fight(
            &rosters.team1,
            &rosters.team2,
            &catalog,
            &items,
            &config,
            opts.seed,
        )
        .context("Fight could not be simulated")?;
        let json = serde_json::to_string_pretty(&result)?;
        match &opts.output_path {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write result to {}", path.display()))?;
                println!("Winner: {:?}; wrote result to {}", result.winner, path.display());
            }
            None => println!("{json}"),
        }
        return Ok(());
    }

    let pairing = Pairing {
        team1: rosters.team1,
        team2: rosters.team2,
    };
    let tally = win_rates(&pairing, &catalog, &items, &config, opts.sims, opts.seed)
        .context("Simulation batch failed")?;
    println!(
        "{} fights: team1 {} / team2 {} / ties {} (team1 rate {:.4})",
        tally.total(),
        tally.team1,
        tally.team2,
        tally.ties,
        tally.team1_rate()
    );
    if let Some(path) = &opts.output_path {
        let json = serde_json::to_string_pretty(&tally)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write tally to {}", path.display()))?;
    }
    Ok(())
}
