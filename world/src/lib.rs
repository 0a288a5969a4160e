#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Star Skirmish.
//!
//! The world owns every entity in the arena. Adapters and systems mutate it
//! exclusively through [`apply`] and read it exclusively through the
//! [`query`] module, so all state transitions flow through one audited
//! entry point and surface as [`Event`] values.
//!
//! Storage slots of deactivated entities are pooled and handed to future
//! spawns in first-in first-out order. Identifiers are never reused: a
//! recycled slot always carries a fresh [`EntityId`], so stale identifiers
//! held by the spatial index or by adapters can never alias a new entity.

use std::{collections::VecDeque, time::Duration};

use star_skirmish_core::{ArenaConfig, Command, EntityId, EntityKind, Event, Position, Velocity};

/// Simulated time a projectile stays in play before expiring on its own.
pub const PROJECTILE_LIFETIME: Duration = Duration::from_secs(3);

struct Entity {
    id: EntityId,
    kind: EntityKind,
    position: Position,
    velocity: Velocity,
    active: bool,
    remaining: Option<Duration>,
}

/// Authoritative simulation state for one skirmish session.
pub struct World {
    config: ArenaConfig,
    entities: Vec<Entity>,
    free: VecDeque<usize>,
    next_id: u32,
}

impl World {
    /// Creates a new empty world for the provided arena configuration.
    #[must_use]
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            config,
            entities: Vec::new(),
            free: VecDeque::new(),
            next_id: 0,
        }
    }

    fn allocate(&mut self, kind: EntityKind, position: Position, velocity: Velocity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let entity = Entity {
            id,
            kind,
            position,
            velocity,
            active: true,
            remaining: match kind {
                EntityKind::Ship => None,
                EntityKind::Projectile => Some(PROJECTILE_LIFETIME),
            },
        };

        if let Some(slot) = self.free.pop_front() {
            if let Some(stored) = self.entities.get_mut(slot) {
                *stored = entity;
                return id;
            }
        }
        self.entities.push(entity);
        id
    }

    fn entity_index(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id == id)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}

/// Applies a command to the world and appends the resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            let seconds = dt.as_secs_f32();
            for (index, entity) in world.entities.iter_mut().enumerate() {
                if !entity.active {
                    continue;
                }
                entity.position = entity.position.translated(entity.velocity, seconds);

                if let Some(remaining) = entity.remaining {
                    match remaining.checked_sub(dt) {
                        Some(left) if !left.is_zero() => entity.remaining = Some(left),
                        _ => {
                            entity.active = false;
                            entity.remaining = None;
                            world.free.push_back(index);
                            out_events.push(Event::ProjectileExpired { entity: entity.id });
                        }
                    }
                }
            }
        }
        Command::SpawnShip { position, velocity } => {
            let id = world.allocate(EntityKind::Ship, position, velocity);
            out_events.push(Event::ShipSpawned { entity: id, position });
        }
        Command::FireProjectile { position, velocity } => {
            let id = world.allocate(EntityKind::Projectile, position, velocity);
            out_events.push(Event::ProjectileFired { entity: id, position });
        }
        Command::Deactivate { entity } => {
            if let Some(index) = world.entity_index(entity) {
                if let Some(stored) = world.entities.get_mut(index) {
                    if stored.active {
                        stored.active = false;
                        stored.remaining = None;
                        world.free.push_back(index);
                        out_events.push(Event::EntityDeactivated { entity });
                    }
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use star_skirmish_core::{ArenaConfig, EntitySnapshot, EntityView};

    use super::World;

    /// Captures a read-only view of every entity slot in the world.
    ///
    /// Deactivated entities remain visible with `active` set to false until
    /// their slot is reused, which lets the spatial index resolve activity
    /// flags that flipped after an insertion.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        let snapshots: Vec<EntitySnapshot> = world
            .entities
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id,
                kind: entity.kind,
                position: entity.position,
                velocity: entity.velocity,
                active: entity.active,
            })
            .collect();
        EntityView::from_snapshots(snapshots)
    }

    /// Arena dimensions the world was created with.
    #[must_use]
    pub fn arena_config(world: &World) -> ArenaConfig {
        world.config
    }

    /// Number of entities currently in play.
    #[must_use]
    pub fn active_count(world: &World) -> usize {
        world.entities.iter().filter(|entity| entity.active).count()
    }

    /// Number of pooled storage slots awaiting reuse by future spawns.
    #[must_use]
    pub fn pooled_slots(world: &World) -> usize {
        world.free.len()
    }
}
