#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that rebuilds the spatial index from world snapshots.
//!
//! The broad-phase system owns the one [`SpatialGrid`] of the simulation.
//! Every tick it discards the previous frame's buckets and re-inserts the
//! current population, so downstream query passes always read an index that
//! matches the view they were handed. Rebuilding completes inside
//! [`Broadphase::handle`] before the index is observable again; queries
//! never interleave with a half-finished insertion pass.

use star_skirmish_core::{ArenaConfig, EntityView, Event};
use star_skirmish_spatial::{SpatialError, SpatialGrid};

/// Broad-phase driver that owns the spatial index and rebuilds it per tick.
#[derive(Debug)]
pub struct Broadphase {
    grid: SpatialGrid,
    rebuilds: u64,
}

impl Broadphase {
    /// Creates a driver with a fresh grid covering the configured arena.
    pub fn new(config: &ArenaConfig) -> Result<Self, SpatialError> {
        Ok(Self {
            grid: SpatialGrid::new(*config)?,
            rebuilds: 0,
        })
    }

    /// Rebuilds the index when the events report an advanced tick.
    ///
    /// The rebuild clears the grid and re-inserts every snapshot from the
    /// view in one pass. Events without a `TimeAdvanced` entry leave the
    /// index untouched; activity flips are still honored because queries
    /// resolve flags through the view at lookup time.
    pub fn handle(&mut self, events: &[Event], view: &EntityView) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.grid.clear();
        for snapshot in view.iter() {
            self.grid.insert(snapshot);
        }
        self.rebuilds = self.rebuilds.saturating_add(1);
    }

    /// Read-only access to the index for downstream query passes.
    #[must_use]
    pub fn index(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Number of rebuilds performed since construction.
    #[must_use]
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
