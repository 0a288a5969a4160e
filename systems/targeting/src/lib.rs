#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic target locks from world snapshots.
//!
//! Every active ship scans the spatial index for other ships within its
//! weapon range and locks onto the nearest one. Ties resolve by squared
//! distance first, then by the lower identifier, so a replay of the same
//! snapshots always produces the same locks.

use star_skirmish_core::{EntityId, EntityKind, EntityView, TargetLock};
use star_skirmish_spatial::SpatialGrid;

/// Targeting system that reuses a scratch buffer across index queries.
#[derive(Debug, Default)]
pub struct Targeting {
    scratch: Vec<EntityId>,
}

impl Targeting {
    /// Creates a new targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a target lock for every active ship with a ship in range.
    ///
    /// The output buffer is cleared first. Locks are emitted in ascending
    /// shooter order, at most one per shooter; ships with no candidate in
    /// range emit nothing. The range boundary is inclusive.
    pub fn handle(&mut self, view: &EntityView, grid: &SpatialGrid, out: &mut Vec<TargetLock>) {
        out.clear();

        for snapshot in view.iter() {
            if !snapshot.active || snapshot.kind != EntityKind::Ship {
                continue;
            }

            grid.nearby_into(
                view,
                snapshot.position,
                snapshot.kind.weapon_range(),
                &mut self.scratch,
            );

            let mut best: Option<BestCandidate> = None;
            for &candidate in &self.scratch {
                if candidate == snapshot.id {
                    continue;
                }
                if let Some(other) = view.get(candidate) {
                    if other.kind != EntityKind::Ship {
                        continue;
                    }
                    let current = BestCandidate {
                        distance_sq: other.position.distance_squared(snapshot.position),
                        target: candidate,
                    };
                    match &mut best {
                        Some(existing) => {
                            if current.precedes(existing) {
                                *existing = current;
                            }
                        }
                        None => best = Some(current),
                    }
                }
            }

            if let Some(best) = best {
                out.push(TargetLock {
                    shooter: snapshot.id,
                    target: best.target,
                });
            }
        }
    }
}

struct BestCandidate {
    distance_sq: f32,
    target: EntityId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }
        self.target < other.target
    }
}
