#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that reports projectile-ship contacts over the spatial index.
//!
//! The collision pass walks every active projectile, asks the index for
//! ships within contact reach, and reports each pair as a [`Contact`].
//! Consuming a contact, for damage or despawning, is the caller's business;
//! running the pass mutates nothing but its own scratch buffer.

use star_skirmish_core::{Contact, EntityId, EntityKind, EntityView};
use star_skirmish_spatial::SpatialGrid;

/// Collision system that reuses a scratch buffer across index queries.
#[derive(Debug, Default)]
pub struct Collision {
    scratch: Vec<EntityId>,
}

impl Collision {
    /// Creates a new collision system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports every projectile-ship pair currently within contact reach.
    ///
    /// Two entities are in contact when the distance between their centers
    /// does not exceed the sum of their contact radii. The output buffer is
    /// cleared first; results are ordered by `(projectile, ship)` and
    /// contain no duplicates. Projectiles never contact one another, and
    /// ship-ship proximity is not this system's concern.
    pub fn handle(&mut self, view: &EntityView, grid: &SpatialGrid, out: &mut Vec<Contact>) {
        out.clear();

        let reach = EntityKind::Projectile.contact_radius() + EntityKind::Ship.contact_radius();
        for snapshot in view.iter() {
            if !snapshot.active || snapshot.kind != EntityKind::Projectile {
                continue;
            }

            grid.nearby_into(view, snapshot.position, reach, &mut self.scratch);
            for &candidate in &self.scratch {
                if candidate == snapshot.id {
                    continue;
                }
                if let Some(other) = view.get(candidate) {
                    if other.kind == EntityKind::Ship {
                        out.push(Contact {
                            projectile: snapshot.id,
                            ship: candidate,
                        });
                    }
                }
            }
        }

        out.sort_unstable();
        out.dedup();
    }
}

#[cfg(test)]
mod tests {
    use super::Collision;
    use star_skirmish_core::{
        ArenaConfig, Contact, EntityId, EntityKind, EntitySnapshot, EntityView, Position, Velocity,
    };
    use star_skirmish_spatial::SpatialGrid;

    fn snapshot(id: u32, kind: EntityKind, x: f32, y: f32, active: bool) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(id),
            kind,
            position: Position::new(x, y),
            velocity: Velocity::ZERO,
            active,
        }
    }

    fn indexed(snapshots: Vec<EntitySnapshot>) -> (EntityView, SpatialGrid) {
        let mut grid = SpatialGrid::new(ArenaConfig::default()).expect("grid construction");
        grid.clear();
        for entry in &snapshots {
            grid.insert(entry);
        }
        (EntityView::from_snapshots(snapshots), grid)
    }

    fn contact(projectile: u32, ship: u32) -> Contact {
        Contact {
            projectile: EntityId::new(projectile),
            ship: EntityId::new(ship),
        }
    }

    #[test]
    fn reports_projectiles_touching_ships() {
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Ship, 100.0, 100.0, true),
            snapshot(2, EntityKind::Projectile, 110.0, 100.0, true),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);

        assert_eq!(contacts, vec![contact(2, 1)]);
    }

    #[test]
    fn contact_reach_boundary_is_inclusive() {
        // Ship radius 24 plus projectile radius 4 puts the contact
        // threshold at a center distance of 28.
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Ship, 100.0, 100.0, true),
            snapshot(2, EntityKind::Projectile, 128.0, 100.0, true),
            snapshot(3, EntityKind::Projectile, 129.0, 100.0, true),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);

        assert_eq!(contacts, vec![contact(2, 1)]);
    }

    #[test]
    fn projectiles_do_not_contact_each_other() {
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Projectile, 100.0, 100.0, true),
            snapshot(2, EntityKind::Projectile, 101.0, 100.0, true),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);

        assert!(contacts.is_empty());
    }

    #[test]
    fn ships_do_not_contact_each_other() {
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Ship, 100.0, 100.0, true),
            snapshot(2, EntityKind::Ship, 110.0, 100.0, true),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);

        assert!(contacts.is_empty());
    }

    #[test]
    fn inactive_participants_produce_no_contacts() {
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Ship, 100.0, 100.0, false),
            snapshot(2, EntityKind::Projectile, 110.0, 100.0, true),
            snapshot(3, EntityKind::Ship, 300.0, 300.0, true),
            snapshot(4, EntityKind::Projectile, 310.0, 300.0, false),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);

        assert!(contacts.is_empty());
    }

    #[test]
    fn contacts_are_ordered_by_projectile_then_ship() {
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Ship, 100.0, 100.0, true),
            snapshot(2, EntityKind::Ship, 110.0, 100.0, true),
            snapshot(5, EntityKind::Projectile, 105.0, 100.0, true),
            snapshot(3, EntityKind::Projectile, 104.0, 100.0, true),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);

        assert_eq!(
            contacts,
            vec![contact(3, 1), contact(3, 2), contact(5, 1), contact(5, 2)]
        );
    }

    #[test]
    fn contacts_spanning_cell_borders_are_found() {
        // 256-unit cells: the ship sits just across the boundary from the
        // projectile, in the neighboring cell.
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Ship, 258.0, 100.0, true),
            snapshot(2, EntityKind::Projectile, 254.0, 100.0, true),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);

        assert_eq!(contacts, vec![contact(2, 1)]);
    }

    #[test]
    fn output_buffer_is_cleared_between_passes() {
        let (view, grid) = indexed(vec![
            snapshot(1, EntityKind::Ship, 100.0, 100.0, true),
            snapshot(2, EntityKind::Projectile, 110.0, 100.0, true),
        ]);

        let mut collision = Collision::new();
        let mut contacts = Vec::new();
        collision.handle(&view, &grid, &mut contacts);
        collision.handle(&view, &grid, &mut contacts);

        assert_eq!(contacts, vec![contact(2, 1)]);

        let (empty_view, empty_grid) = indexed(Vec::new());
        collision.handle(&empty_view, &empty_grid, &mut contacts);
        assert!(contacts.is_empty());
    }
}
