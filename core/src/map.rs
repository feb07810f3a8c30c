//! Map layout consumed by the simulation: the enemy path plus buildable terrain.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::geometry::point_segment_distance;
use crate::CellCoord;

const DEFAULT_GRID_COLUMNS: u32 = 12;
const DEFAULT_GRID_ROWS: u32 = 9;
const DEFAULT_CELL_LENGTH: f32 = 64.0;

/// Reasons a map layout may be rejected at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapError {
    /// A path needs at least two waypoints to define a direction of travel.
    TooFewWaypoints,
    /// The cell edge length must be a positive distance.
    NonPositiveCellLength,
}

/// Immutable description of the battlefield: the waypoint path enemies walk
/// and the set of grid cells towers may occupy.
///
/// The layout is validated once at construction and never mutated afterwards;
/// enemies consume the path by waypoint index and towers never touch it.
#[derive(Clone, Debug)]
pub struct MapLayout {
    waypoints: Vec<Vec2>,
    buildable: BTreeSet<CellCoord>,
    cell_length: f32,
}

impl MapLayout {
    /// Creates a new layout, rejecting degenerate paths and cell sizes.
    pub fn new(
        waypoints: Vec<Vec2>,
        buildable: Vec<CellCoord>,
        cell_length: f32,
    ) -> Result<Self, MapError> {
        if waypoints.len() < 2 {
            return Err(MapError::TooFewWaypoints);
        }
        if cell_length <= 0.0 {
            return Err(MapError::NonPositiveCellLength);
        }

        Ok(Self {
            waypoints,
            buildable: buildable.into_iter().collect(),
            cell_length,
        })
    }

    /// Ordered waypoints of the enemy path.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Side length of a single square grid cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Reports whether a tower may be constructed on the provided cell.
    #[must_use]
    pub fn is_buildable(&self, cell: CellCoord) -> bool {
        self.buildable.contains(&cell)
    }

    /// Iterates the buildable cells in deterministic order.
    pub fn buildable_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.buildable.iter().copied()
    }

    /// World-space center of the provided grid cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.column() as f32 + 0.5) * self.cell_length,
            (cell.row() as f32 + 0.5) * self.cell_length,
        )
    }

    /// Grid cell containing the provided position, or `None` for positions
    /// left of or above the grid origin.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / self.cell_length) as u32;
        let row = (position.y / self.cell_length) as u32;
        Some(CellCoord::new(column, row))
    }
}

impl Default for MapLayout {
    /// A single-lane demonstration map: an S-shaped path across a 12x9 grid
    /// with every cell clear of the path corridor open for construction.
    fn default() -> Self {
        let waypoints = vec![
            Vec2::new(0.0, 288.0),
            Vec2::new(320.0, 288.0),
            Vec2::new(320.0, 128.0),
            Vec2::new(640.0, 128.0),
            Vec2::new(640.0, 448.0),
            Vec2::new(768.0, 448.0),
        ];

        let corridor = DEFAULT_CELL_LENGTH * 0.75;
        let mut buildable = Vec::new();
        for row in 0..DEFAULT_GRID_ROWS {
            for column in 0..DEFAULT_GRID_COLUMNS {
                let center = Vec2::new(
                    (column as f32 + 0.5) * DEFAULT_CELL_LENGTH,
                    (row as f32 + 0.5) * DEFAULT_CELL_LENGTH,
                );
                let on_path = waypoints
                    .windows(2)
                    .any(|pair| point_segment_distance(center, pair[0], pair[1]) < corridor);
                if !on_path {
                    buildable.push(CellCoord::new(column, row));
                }
            }
        }

        Self::new(waypoints, buildable, DEFAULT_CELL_LENGTH)
            .expect("default layout satisfies its own validation")
    }
}

#[cfg(test)]
mod tests {
    use super::{MapError, MapLayout};
    use crate::CellCoord;
    use glam::Vec2;

    #[test]
    fn single_waypoint_paths_are_rejected() {
        let result = MapLayout::new(vec![Vec2::ZERO], Vec::new(), 64.0);
        assert_eq!(result.err(), Some(MapError::TooFewWaypoints));
    }

    #[test]
    fn zero_cell_length_is_rejected() {
        let waypoints = vec![Vec2::ZERO, Vec2::new(100.0, 0.0)];
        let result = MapLayout::new(waypoints, Vec::new(), 0.0);
        assert_eq!(result.err(), Some(MapError::NonPositiveCellLength));
    }

    #[test]
    fn cell_centers_land_mid_cell() {
        let layout = MapLayout::default();
        let center = layout.cell_center(CellCoord::new(0, 0));
        assert_eq!(center, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn cell_lookup_rejects_negative_positions() {
        let layout = MapLayout::default();
        assert_eq!(layout.cell_at(Vec2::new(-1.0, 10.0)), None);
        assert_eq!(
            layout.cell_at(Vec2::new(100.0, 100.0)),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn default_layout_keeps_the_corridor_clear() {
        let layout = MapLayout::default();
        assert!(layout.waypoints().len() >= 2);

        // (0, 288) -> (320, 288) crosses row 4 on the left edge.
        assert!(!layout.is_buildable(CellCoord::new(0, 4)));
        assert!(layout.is_buildable(CellCoord::new(0, 0)));
    }
}
