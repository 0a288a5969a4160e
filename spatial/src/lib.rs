#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Uniform-grid spatial index over the arena.
//!
//! The grid partitions the square arena into fixed-size cells and buckets
//! entity identifiers by the cell their position fell into at insertion
//! time. Callers rebuild the index every tick with [`SpatialGrid::clear`]
//! followed by one [`SpatialGrid::insert`] per entity, then answer
//! proximity questions with [`SpatialGrid::nearby`] and
//! [`SpatialGrid::in_cell`].
//!
//! The grid stores identifiers only. Queries resolve each candidate through
//! the caller's [`EntityView`], so an entity deactivated after insertion is
//! excluded without touching the index, and identifiers the view no longer
//! knows are silently skipped. Positions outside the arena clamp to the
//! border cells, which keeps every entity reachable by queries near the
//! edge of the map.

use star_skirmish_core::{ArenaConfig, CellCoord, EntityId, EntitySnapshot, EntityView, Position};
use thiserror::Error;

/// Reasons a [`SpatialGrid`] cannot be constructed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SpatialError {
    /// The arena extent was zero, negative, or not a finite number.
    #[error("map size must be positive and finite, got {size}")]
    InvalidMapSize {
        /// The rejected map extent in world units.
        size: f32,
    },
    /// The cell edge length was zero, negative, or not a finite number.
    #[error("cell size must be positive and finite, got {size}")]
    InvalidCellSize {
        /// The rejected cell edge length in world units.
        size: f32,
    },
}

/// Spatial index mapping arena positions to buckets of entity identifiers.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: u32,
    rows: u32,
    buckets: Vec<Vec<EntityId>>,
    occupied: Vec<usize>,
}

impl SpatialGrid {
    /// Creates an empty grid covering the configured arena.
    ///
    /// The arena is divided into `ceil(map_size / cell_size)` cells per
    /// axis, so a map whose extent is not an exact multiple of the cell
    /// size still covers its far edge with a partial cell. Construction
    /// fails only when either size is non-positive or non-finite.
    pub fn new(config: ArenaConfig) -> Result<Self, SpatialError> {
        let map_size = config.map_size();
        let cell_size = config.cell_size();
        if !map_size.is_finite() || map_size <= 0.0 {
            return Err(SpatialError::InvalidMapSize { size: map_size });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(SpatialError::InvalidCellSize { size: cell_size });
        }

        let cells_per_axis = (map_size / cell_size).ceil().max(1.0) as u32;
        let columns = cells_per_axis;
        let rows = cells_per_axis;
        let bucket_count =
            usize::try_from(u64::from(columns).saturating_mul(u64::from(rows))).unwrap_or(0);

        Ok(Self {
            cell_size,
            columns,
            rows,
            buckets: vec![Vec::new(); bucket_count],
            occupied: Vec::new(),
        })
    }

    /// Number of cell columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of a single cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of cells currently holding at least one identifier.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.occupied.len()
    }

    /// Maps a world-space position to the grid cell containing it.
    ///
    /// Positions outside the arena clamp to the nearest border cell, so
    /// every finite position maps to a valid coordinate.
    #[must_use]
    pub fn cell_for(&self, position: Position) -> CellCoord {
        CellCoord::new(
            clamp_axis(position.x(), self.cell_size, self.columns),
            clamp_axis(position.y(), self.cell_size, self.rows),
        )
    }

    /// Removes every identifier from the grid.
    ///
    /// Only buckets that received an insertion since the previous clear are
    /// visited, so the cost scales with occupancy rather than with the
    /// total cell count. Bucket allocations are retained for reuse.
    pub fn clear(&mut self) {
        while let Some(index) = self.occupied.pop() {
            if let Some(bucket) = self.buckets.get_mut(index) {
                bucket.clear();
            }
        }
    }

    /// Registers an entity in the cell containing its position.
    ///
    /// Inactive snapshots are ignored, so callers may feed an entire view
    /// without pre-filtering. Inserting the same identifier into the same
    /// cell twice leaves a single entry behind. Activity is re-resolved at
    /// query time as well, so a flag flipped after insertion still takes
    /// effect immediately.
    pub fn insert(&mut self, snapshot: &EntitySnapshot) {
        if !snapshot.active {
            return;
        }
        let cell = self.cell_for(snapshot.position);
        if let Some(index) = self.index(cell) {
            if let Some(bucket) = self.buckets.get_mut(index) {
                if bucket.contains(&snapshot.id) {
                    return;
                }
                if bucket.is_empty() {
                    self.occupied.push(index);
                }
                bucket.push(snapshot.id);
            }
        }
    }

    /// Collects the active entities within `radius` of `center` into `out`.
    ///
    /// The buffer is cleared first and may be reused across calls to avoid
    /// per-query allocation. Results are sorted by identifier and contain
    /// no duplicates; the boundary is inclusive, so an entity exactly
    /// `radius` away is reported. A negative or non-finite radius yields no
    /// results.
    pub fn nearby_into(
        &self,
        view: &EntityView,
        center: Position,
        radius: f32,
        out: &mut Vec<EntityId>,
    ) {
        out.clear();
        if !radius.is_finite() || radius < 0.0 {
            return;
        }

        let min = self.cell_for(Position::new(center.x() - radius, center.y() - radius));
        let max = self.cell_for(Position::new(center.x() + radius, center.y() + radius));
        let limit = radius * radius;

        for row in min.row()..=max.row() {
            for column in min.column()..=max.column() {
                for &id in self.bucket(CellCoord::new(column, row)) {
                    if let Some(snapshot) = view.get(id) {
                        if snapshot.active && snapshot.position.distance_squared(center) <= limit {
                            out.push(id);
                        }
                    }
                }
            }
        }

        out.sort_unstable();
        out.dedup();
    }

    /// Returns the active entities within `radius` of `center`.
    ///
    /// Convenience wrapper around [`SpatialGrid::nearby_into`] that
    /// allocates a fresh result vector.
    #[must_use]
    pub fn nearby(&self, view: &EntityView, center: Position, radius: f32) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.nearby_into(view, center, radius, &mut out);
        out
    }

    /// Iterates over the active entities registered in the cell containing
    /// `position`.
    ///
    /// The iterator walks the bucket lazily and performs no distance test;
    /// it reports exactly the identifiers inserted into that cell, filtered
    /// through the view's activity flags.
    #[must_use]
    pub fn in_cell<'a>(&'a self, view: &'a EntityView, position: Position) -> CellEntities<'a> {
        CellEntities {
            view,
            remaining: self.bucket(self.cell_for(position)),
        }
    }

    fn bucket(&self, cell: CellCoord) -> &[EntityId] {
        self.index(cell)
            .and_then(|index| self.buckets.get(index))
            .map_or(&[], Vec::as_slice)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Lazy iterator over the active entities in one grid cell.
pub struct CellEntities<'a> {
    view: &'a EntityView,
    remaining: &'a [EntityId],
}

impl<'a> Iterator for CellEntities<'a> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((&id, rest)) = self.remaining.split_first() {
            self.remaining = rest;
            if let Some(snapshot) = self.view.get(id) {
                if snapshot.active {
                    return Some(id);
                }
            }
        }
        None
    }
}

fn clamp_axis(value: f32, cell_size: f32, cells: u32) -> u32 {
    let raw = (value / cell_size).floor() as i64;
    let limit = i64::from(cells.saturating_sub(1));
    raw.clamp(0, limit) as u32
}
