#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for Star Skirmish scenarios.
//!
//! The binary stands in for the surrounding game. It owns the per-tick
//! sequence: advance the world clock, rebuild the broad-phase index, run
//! the collision and targeting passes, then react by retiring spent
//! projectiles and firing new ones from target locks. The library crates
//! underneath stay free of I/O, logging, and timing concerns.

mod scenario;

use std::{fmt, path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use star_skirmish_core::{
    Command, Contact, EntityId, EntityView, Event, Position, TargetLock, Velocity,
    DEFAULT_CELL_SIZE, DEFAULT_MAP_SIZE,
};
use star_skirmish_system_broadphase::Broadphase;
use star_skirmish_system_collision::Collision;
use star_skirmish_system_targeting::Targeting;
use star_skirmish_world::{self as world, query, World};

use crate::scenario::Scenario;

const TICK_DT: Duration = Duration::from_millis(100);
const PROJECTILE_SPEED: f32 = 200.0;
const MUZZLE_OFFSET: f32 = 42.0;

/// Runs a deterministic skirmish and prints a summary of the outcome.
#[derive(Debug, Parser)]
#[command(name = "star-skirmish", about = "Headless Star Skirmish scenario runner")]
struct Args {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = scenario::DEFAULT_TICKS)]
    ticks: u32,

    /// Number of ships spawned at scenario start.
    #[arg(long, default_value_t = scenario::DEFAULT_SHIPS)]
    ships: u32,

    /// Seed for the deterministic population generator.
    #[arg(long, default_value_t = scenario::DEFAULT_SEED)]
    seed: u64,

    /// World extent of the square arena.
    #[arg(long, default_value_t = DEFAULT_MAP_SIZE)]
    map_size: f32,

    /// Edge length of a spatial-index cell.
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: f32,

    /// Fire projectiles from target locks every N ticks; 0 disables firing.
    #[arg(long, default_value_t = scenario::DEFAULT_FIRE_INTERVAL)]
    fire_interval: u32,

    /// TOML scenario file that replaces the command-line scenario values.
    #[arg(long)]
    scenario: Option<PathBuf>,
}

/// Entry point for the Star Skirmish command-line interface.
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario {
            ticks: args.ticks,
            ships: args.ships,
            seed: args.seed,
            map_size: args.map_size,
            cell_size: args.cell_size,
            fire_interval: args.fire_interval,
        },
    };

    let summary = run(&scenario)?;
    println!("{summary}");
    Ok(())
}

fn run(scenario: &Scenario) -> Result<Summary> {
    let mut world = World::new(scenario.arena_config());
    let mut broadphase = Broadphase::new(&query::arena_config(&world))?;
    let mut collision = Collision::new();
    let mut targeting = Targeting::new();

    let mut summary = Summary::default();
    let mut contacts: Vec<Contact> = Vec::new();
    let mut locks: Vec<TargetLock> = Vec::new();
    let mut spent: Vec<EntityId> = Vec::new();

    for command in scenario.spawn_commands() {
        summary.absorb(&drive(&mut world, command));
    }
    log::info!(
        "scenario start: {} ships, seed {}, arena {} with {} cells per axis",
        summary.ships_spawned,
        scenario.seed,
        scenario.map_size,
        broadphase.index().columns(),
    );

    for tick in 1..=scenario.ticks {
        let events = drive(&mut world, Command::Tick { dt: TICK_DT });
        summary.absorb(&events);

        let view = query::entity_view(&world);
        broadphase.handle(&events, &view);
        collision.handle(&view, broadphase.index(), &mut contacts);
        targeting.handle(&view, broadphase.index(), &mut locks);
        summary.contacts += contacts.len() as u64;
        summary.locks += locks.len() as u64;

        log::debug!(
            "tick {tick}: {} active, {} occupied cells, {} contacts, {} locks",
            query::active_count(&world),
            broadphase.index().occupied_cells(),
            contacts.len(),
            locks.len(),
        );

        // A projectile is spent on first contact; ships shrug hits off.
        spent.clear();
        for contact in &contacts {
            if !spent.contains(&contact.projectile) {
                spent.push(contact.projectile);
            }
        }
        for &projectile in &spent {
            summary.absorb(&drive(&mut world, Command::Deactivate { entity: projectile }));
        }

        if scenario.fire_interval > 0 && tick % scenario.fire_interval == 0 {
            fire_from_locks(&mut world, &view, &locks, &mut summary);
        }
    }

    summary.ticks = u64::from(scenario.ticks);
    summary.final_active = query::active_count(&world) as u64;
    summary.pooled_slots = query::pooled_slots(&world) as u64;
    log::info!("scenario complete after {} ticks", scenario.ticks);

    Ok(summary)
}

/// Fires one projectile per lock, offset from the shooter toward its target.
///
/// The muzzle offset keeps the fresh projectile outside the shooter's own
/// contact reach, so a shot cannot collide with the hull that fired it on
/// the very next pass.
fn fire_from_locks(
    world: &mut World,
    view: &EntityView,
    locks: &[TargetLock],
    summary: &mut Summary,
) {
    for lock in locks {
        let shooter = match view.get(lock.shooter) {
            Some(snapshot) => snapshot,
            None => continue,
        };
        let target = match view.get(lock.target) {
            Some(snapshot) => snapshot,
            None => continue,
        };

        let aim = Vec2::new(
            target.position.x() - shooter.position.x(),
            target.position.y() - shooter.position.y(),
        );
        let direction = match aim.try_normalize() {
            Some(direction) => direction,
            None => continue,
        };
        let muzzle =
            Vec2::new(shooter.position.x(), shooter.position.y()) + direction * MUZZLE_OFFSET;

        summary.absorb(&drive(
            world,
            Command::FireProjectile {
                position: Position::new(muzzle.x, muzzle.y),
                velocity: Velocity::new(
                    direction.x * PROJECTILE_SPEED,
                    direction.y * PROJECTILE_SPEED,
                ),
            },
        ));
    }
}

fn drive(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    ticks: u64,
    ships_spawned: u64,
    projectiles_fired: u64,
    contacts: u64,
    locks: u64,
    projectiles_spent: u64,
    projectiles_expired: u64,
    final_active: u64,
    pooled_slots: u64,
}

impl Summary {
    fn absorb(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => {}
                Event::ShipSpawned { .. } => self.ships_spawned += 1,
                Event::ProjectileFired { .. } => self.projectiles_fired += 1,
                Event::EntityDeactivated { .. } => self.projectiles_spent += 1,
                Event::ProjectileExpired { .. } => self.projectiles_expired += 1,
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks: {} ships spawned, {} projectiles fired ({} spent, {} expired), \
             {} contacts, {} locks, {} active entities and {} pooled slots at exit",
            self.ticks,
            self.ships_spawned,
            self.projectiles_fired,
            self.projectiles_spent,
            self.projectiles_expired,
            self.contacts,
            self.locks,
            self.final_active,
            self.pooled_slots,
        )
    }
}
