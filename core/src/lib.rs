#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Star Skirmish engine.
//!
//! Everything that crosses a crate boundary is declared here: adapters
//! submit [`Command`] values describing desired mutations, the world
//! executes them through its `apply` entry point and broadcasts [`Event`]
//! values, and the per-tick systems read immutable [`EntityView`] snapshots
//! to produce contact and targeting reports. Nothing in this crate owns
//! simulation state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default world extent of the square arena, in world units.
pub const DEFAULT_MAP_SIZE: f32 = 2048.0;

/// Default edge length of a single spatial-index cell, in world units.
pub const DEFAULT_CELL_SIZE: f32 = 256.0;

/// Unique identifier assigned to an entity by the world.
///
/// Identifiers are allocated in strictly increasing order and are never
/// reused, even when the storage slot behind a despawned entity is recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Categories of entities inhabiting the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Persistent combatant steered by external logic.
    Ship,
    /// Transient projectile that expires after its lifetime elapses.
    Projectile,
}

impl EntityKind {
    /// Returns the collision radius of the entity kind in world units.
    ///
    /// Two entities are in contact when the distance between their centers
    /// does not exceed the sum of their contact radii.
    #[must_use]
    pub const fn contact_radius(self) -> f32 {
        match self {
            Self::Ship => 24.0,
            Self::Projectile => 4.0,
        }
    }

    /// Returns the targeting range of the entity kind in world units.
    ///
    /// Projectiles do not acquire targets, so their range is zero; callers
    /// never observe negative or undefined distances.
    #[must_use]
    pub const fn weapon_range(self) -> f32 {
        match self {
            Self::Ship => 320.0,
            Self::Projectile => 0.0,
        }
    }
}

/// Location in continuous 2D world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new world-space position from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the position.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component of the position.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Computes the squared Euclidean distance to another position.
    ///
    /// Comparing squared distances against a squared radius avoids the
    /// square root while preserving the ordering of true distances.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Computes the Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Returns the position advanced by a velocity over the given duration
    /// expressed in seconds.
    #[must_use]
    pub fn translated(self, velocity: Velocity, seconds: f32) -> Self {
        Self {
            x: self.x + velocity.dx() * seconds,
            y: self.y + velocity.dy() * seconds,
        }
    }
}

/// Rate of change of a position, in world units per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    dx: f32,
    dy: f32,
}

impl Velocity {
    /// Zero velocity for entities that hold position until steered.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Creates a new velocity from its components.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component of the velocity.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component of the velocity.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }
}

/// Location of a single spatial-index cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Fixed parameters of the square arena and its spatial partitioning.
///
/// The configuration is captured once at construction time; neither the map
/// extent nor the cell size changes for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    map_size: f32,
    cell_size: f32,
}

impl ArenaConfig {
    /// Creates a new arena configuration from explicit dimensions.
    #[must_use]
    pub const fn new(map_size: f32, cell_size: f32) -> Self {
        Self { map_size, cell_size }
    }

    /// World extent of the square arena.
    #[must_use]
    pub const fn map_size(&self) -> f32 {
        self.map_size
    }

    /// Edge length of a single spatial-index cell.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_SIZE, DEFAULT_CELL_SIZE)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new ship enter the arena.
    SpawnShip {
        /// World-space location the ship occupies on spawn.
        position: Position,
        /// Initial drift velocity assigned to the ship.
        velocity: Velocity,
    },
    /// Requests that a new projectile enter the arena.
    FireProjectile {
        /// World-space location the projectile occupies on spawn.
        position: Position,
        /// Flight velocity assigned to the projectile.
        velocity: Velocity,
    },
    /// Requests that an entity be removed from play and its slot pooled.
    Deactivate {
        /// Identifier of the entity to deactivate.
        entity: EntityId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a ship was created.
    ShipSpawned {
        /// Identifier assigned to the ship by the world.
        entity: EntityId,
        /// World-space location the ship occupies after spawning.
        position: Position,
    },
    /// Confirms that a projectile was created.
    ProjectileFired {
        /// Identifier assigned to the projectile by the world.
        entity: EntityId,
        /// World-space location the projectile occupies after spawning.
        position: Position,
    },
    /// Confirms that an entity was deactivated on request.
    EntityDeactivated {
        /// Identifier of the entity that left play.
        entity: EntityId,
    },
    /// Reports that a projectile exhausted its lifetime and left play.
    ProjectileExpired {
        /// Identifier of the projectile that expired.
        entity: EntityId,
    },
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Category the entity belongs to.
    pub kind: EntityKind,
    /// World-space location of the entity's center.
    pub position: Position,
    /// Current drift or flight velocity of the entity.
    pub velocity: Velocity,
    /// Whether the entity is in play. Inactive entities are never returned
    /// by spatial queries, even while a stale insertion still references
    /// them from a cell bucket.
    pub active: bool,
}

/// Read-only snapshot describing all entities known to the world.
///
/// Snapshots are sorted by identifier so iteration order is deterministic
/// and per-id lookup can binary search.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Retrieves the snapshot for the provided identifier, if present.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of snapshots captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Broad-phase contact between a projectile and a ship.
///
/// A contact reports that the two entities were within contact range of one
/// another when the collision pass ran; what happens to them afterwards is
/// the caller's concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Contact {
    /// Projectile participating in the contact.
    pub projectile: EntityId,
    /// Ship participating in the contact.
    pub ship: EntityId,
}

/// Deterministic target assignment produced by the targeting pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetLock {
    /// Ship that acquired the target.
    pub shooter: EntityId,
    /// Nearest in-range ship selected as the target.
    pub target: EntityId,
}

#[cfg(test)]
mod tests {
    use super::{
        ArenaConfig, CellCoord, EntityId, EntityKind, EntitySnapshot, EntityView, Position,
        Velocity,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn entity_id_round_trips_through_bincode() {
        assert_round_trip(&EntityId::new(42));
    }

    #[test]
    fn entity_kind_round_trips_through_bincode() {
        assert_round_trip(&EntityKind::Ship);
        assert_round_trip(&EntityKind::Projectile);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn arena_config_round_trips_through_bincode() {
        assert_round_trip(&ArenaConfig::new(2048.0, 256.0));
    }

    #[test]
    fn position_round_trips_through_bincode() {
        assert_round_trip(&Position::new(10.5, -3.25));
        assert_round_trip(&Velocity::new(-1.0, 2.0));
    }

    #[test]
    fn distance_matches_expectation() {
        let origin = Position::new(0.0, 0.0);
        let point = Position::new(3.0, 4.0);
        assert_eq!(origin.distance_squared(point), 25.0);
        assert_eq!(origin.distance_to(point), 5.0);
        assert_eq!(point.distance_to(origin), 5.0);
    }

    #[test]
    fn translation_advances_by_velocity_and_seconds() {
        let start = Position::new(10.0, 20.0);
        let moved = start.translated(Velocity::new(4.0, -2.0), 0.5);
        assert_eq!(moved, Position::new(12.0, 19.0));
    }

    #[test]
    fn projectile_range_is_zero() {
        assert_eq!(EntityKind::Projectile.weapon_range(), 0.0);
        assert!(EntityKind::Ship.weapon_range() > 0.0);
    }

    #[test]
    fn contact_radii_are_positive() {
        assert!(EntityKind::Ship.contact_radius() > 0.0);
        assert!(EntityKind::Projectile.contact_radius() > 0.0);
    }

    #[test]
    fn view_sorts_snapshots_by_identifier() {
        let view = EntityView::from_snapshots(vec![snapshot(9), snapshot(1), snapshot(4)]);

        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![1, 4, 9]);
    }

    #[test]
    fn view_lookup_finds_known_ids_only() {
        let view = EntityView::from_snapshots(vec![snapshot(2), snapshot(7)]);

        assert_eq!(view.get(EntityId::new(7)).map(|s| s.id), Some(EntityId::new(7)));
        assert!(view.get(EntityId::new(3)).is_none());
        assert_eq!(view.len(), 2);
        assert!(!view.is_empty());
    }

    fn snapshot(id: u32) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(id),
            kind: EntityKind::Ship,
            position: Position::new(0.0, 0.0),
            velocity: Velocity::ZERO,
            active: true,
        }
    }
}
