//! Scenario configuration and seeded population generation.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use star_skirmish_core::{
    ArenaConfig, Command, Position, Velocity, DEFAULT_CELL_SIZE, DEFAULT_MAP_SIZE,
};

pub(crate) const DEFAULT_TICKS: u32 = 600;
pub(crate) const DEFAULT_SHIPS: u32 = 12;
pub(crate) const DEFAULT_SEED: u64 = 0x5EED;
pub(crate) const DEFAULT_FIRE_INTERVAL: u32 = 5;

const MIN_SHIP_SPEED: f32 = 20.0;
const MAX_SHIP_SPEED: f32 = 120.0;

/// Complete description of one headless skirmish run.
///
/// Every field has a default, so a TOML scenario file may override any
/// subset of them. Unknown keys are rejected rather than ignored.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct Scenario {
    /// Number of simulation ticks to run.
    pub(crate) ticks: u32,
    /// Number of ships spawned at scenario start.
    pub(crate) ships: u32,
    /// Seed for the deterministic population generator.
    pub(crate) seed: u64,
    /// World extent of the square arena.
    pub(crate) map_size: f32,
    /// Edge length of a spatial-index cell.
    pub(crate) cell_size: f32,
    /// Fire projectiles from target locks every N ticks; 0 disables firing.
    pub(crate) fire_interval: u32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            ships: DEFAULT_SHIPS,
            seed: DEFAULT_SEED,
            map_size: DEFAULT_MAP_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
            fire_interval: DEFAULT_FIRE_INTERVAL,
        }
    }
}

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    pub(crate) fn arena_config(&self) -> ArenaConfig {
        ArenaConfig::new(self.map_size, self.cell_size)
    }

    /// Generates the spawn commands for the scenario's starting population.
    ///
    /// Positions land inside the arena and headings cover the full circle;
    /// the same seed always yields the same fleet.
    pub(crate) fn spawn_commands(&self) -> Vec<Command> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut commands = Vec::new();

        for _ in 0..self.ships {
            let position = Vec2::new(
                rng.gen_range(0.0..self.map_size),
                rng.gen_range(0.0..self.map_size),
            );
            let heading = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(MIN_SHIP_SPEED..MAX_SHIP_SPEED);
            let velocity = Vec2::from_angle(heading) * speed;

            commands.push(Command::SpawnShip {
                position: Position::new(position.x, position.y),
                velocity: Velocity::new(velocity.x, velocity.y),
            });
        }

        commands
    }
}
