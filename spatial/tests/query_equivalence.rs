//! Randomized checks that grid queries agree with exhaustive scans.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use star_skirmish_core::{
    ArenaConfig, EntityId, EntityKind, EntitySnapshot, EntityView, Position, Velocity,
};
use star_skirmish_spatial::SpatialGrid;

const MAP_SIZE: f32 = 2048.0;
const CELL_SIZE: f32 = 256.0;

fn random_population(rng: &mut ChaCha8Rng, count: u32) -> EntityView {
    let mut snapshots = Vec::new();
    for id in 0..count {
        let kind = if rng.gen_bool(0.7) {
            EntityKind::Ship
        } else {
            EntityKind::Projectile
        };
        snapshots.push(EntitySnapshot {
            id: EntityId::new(id),
            kind,
            // Spill past the arena on purpose so clamping is exercised.
            position: Position::new(
                rng.gen_range(-256.0..MAP_SIZE + 256.0),
                rng.gen_range(-256.0..MAP_SIZE + 256.0),
            ),
            velocity: Velocity::ZERO,
            active: rng.gen_bool(0.9),
        });
    }
    EntityView::from_snapshots(snapshots)
}

fn rebuild(grid: &mut SpatialGrid, view: &EntityView) {
    grid.clear();
    for snapshot in view.iter() {
        grid.insert(snapshot);
    }
}

fn brute_force_nearby(view: &EntityView, center: Position, radius: f32) -> Vec<EntityId> {
    let limit = radius * radius;
    let mut matches: Vec<EntityId> = view
        .iter()
        .filter(|snapshot| snapshot.active)
        .filter(|snapshot| snapshot.position.distance_squared(center) <= limit)
        .map(|snapshot| snapshot.id)
        .collect();
    matches.sort_unstable();
    matches
}

fn brute_force_cell(grid: &SpatialGrid, view: &EntityView, position: Position) -> Vec<EntityId> {
    let cell = grid.cell_for(position);
    let mut matches: Vec<EntityId> = view
        .iter()
        .filter(|snapshot| snapshot.active)
        .filter(|snapshot| grid.cell_for(snapshot.position) == cell)
        .map(|snapshot| snapshot.id)
        .collect();
    matches.sort_unstable();
    matches
}

#[test]
fn radius_queries_match_brute_force_over_random_populations() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0001);
    let mut grid =
        SpatialGrid::new(ArenaConfig::new(MAP_SIZE, CELL_SIZE)).expect("grid construction");
    let mut scratch = Vec::new();

    for round in 0..32 {
        let view = random_population(&mut rng, 200);
        rebuild(&mut grid, &view);

        for query in 0..16 {
            let center = Position::new(
                rng.gen_range(-128.0..MAP_SIZE + 128.0),
                rng.gen_range(-128.0..MAP_SIZE + 128.0),
            );
            let radius = rng.gen_range(0.0..600.0);

            grid.nearby_into(&view, center, radius, &mut scratch);
            assert_eq!(
                scratch,
                brute_force_nearby(&view, center, radius),
                "round {round} query {query} radius {radius}",
            );
        }
    }
}

#[test]
fn cell_queries_match_brute_force_over_random_populations() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0002);
    let mut grid =
        SpatialGrid::new(ArenaConfig::new(MAP_SIZE, CELL_SIZE)).expect("grid construction");

    for round in 0..32 {
        let view = random_population(&mut rng, 150);
        rebuild(&mut grid, &view);

        for query in 0..16 {
            let position = Position::new(
                rng.gen_range(-128.0..MAP_SIZE + 128.0),
                rng.gen_range(-128.0..MAP_SIZE + 128.0),
            );

            let mut reported: Vec<EntityId> = grid.in_cell(&view, position).collect();
            reported.sort_unstable();
            assert_eq!(
                reported,
                brute_force_cell(&grid, &view, position),
                "round {round} query {query}",
            );
        }
    }
}

#[test]
fn reusing_the_scratch_buffer_discards_previous_results() {
    let mut grid =
        SpatialGrid::new(ArenaConfig::new(MAP_SIZE, CELL_SIZE)).expect("grid construction");
    let snapshots = vec![
        EntitySnapshot {
            id: EntityId::new(1),
            kind: EntityKind::Ship,
            position: Position::new(10.0, 10.0),
            velocity: Velocity::ZERO,
            active: true,
        },
        EntitySnapshot {
            id: EntityId::new(2),
            kind: EntityKind::Ship,
            position: Position::new(1500.0, 1500.0),
            velocity: Velocity::ZERO,
            active: true,
        },
    ];
    let view = EntityView::from_snapshots(snapshots);
    rebuild(&mut grid, &view);

    let mut scratch = Vec::new();
    grid.nearby_into(&view, Position::new(10.0, 10.0), 50.0, &mut scratch);
    assert_eq!(scratch, vec![EntityId::new(1)]);

    grid.nearby_into(&view, Position::new(1500.0, 1500.0), 50.0, &mut scratch);
    assert_eq!(scratch, vec![EntityId::new(2)]);

    grid.nearby_into(&view, Position::new(700.0, 700.0), 10.0, &mut scratch);
    assert!(scratch.is_empty());
}
