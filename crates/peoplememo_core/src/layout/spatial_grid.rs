//! Uniform bucket grid for short-range neighbour queries.
//!
//! # Responsibility
//! - Bucket point indices by cell so the repulsion pass scans a 3x3 block
//!   instead of every pair.
//!
//! # Invariants
//! - With the cell size set to the interaction radius, every pair closer than
//!   that radius sits in the same or an adjacent cell.
//! - Candidates are always a superset of the true neighbours. When a cell index
//!   would leave the safe integer range, every point is a candidate.

use crate::model::geometry::Point;
use std::collections::HashMap;

/// Largest cell coordinate magnitude stored in the grid.
const MAX_CELL_INDEX: f64 = (1u64 << 52) as f64;

/// Point indices bucketed by cell.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
    /// Set when some point cannot be bucketed; queries then visit every index.
    all_points: Option<usize>,
}

impl SpatialGrid {
    /// Buckets `points` by index. `cell_size` must be positive and finite.
    pub fn build(points: &[Point], cell_size: f64) -> Self {
        let mut grid = Self {
            cell_size,
            cells: HashMap::new(),
            all_points: None,
        };
        for (index, point) in points.iter().enumerate() {
            let Some(cell) = grid.cell_of(*point) else {
                grid.cells.clear();
                grid.all_points = Some(points.len());
                return grid;
            };
            grid.cells.entry(cell).or_default().push(index);
        }
        grid
    }

    fn cell_of(&self, point: Point) -> Option<(i64, i64)> {
        Some((
            cell_index(point.x, self.cell_size)?,
            cell_index(point.y, self.cell_size)?,
        ))
    }

    /// Calls `visit` with every index in the 3x3 block around `point`.
    ///
    /// Candidates are a superset of the points within `cell_size`; the caller
    /// does the exact distance check. Visiting order is deterministic.
    pub fn for_each_candidate(&self, point: Point, mut visit: impl FnMut(usize)) {
        let cell = match self.all_points {
            Some(_) => None,
            None => self.cell_of(point),
        };
        let Some((cx, cy)) = cell else {
            let count = self
                .all_points
                .unwrap_or_else(|| self.cells.values().map(Vec::len).sum());
            (0..count).for_each(visit);
            return;
        };
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    for &index in indices {
                        visit(index);
                    }
                }
            }
        }
    }
}

/// Cell coordinate of `value`, or `None` when it is not safely representable.
fn cell_index(value: f64, cell_size: f64) -> Option<i64> {
    let cell = (value / cell_size).floor();
    if cell.is_finite() && cell.abs() <= MAX_CELL_INDEX {
        Some(cell as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::SpatialGrid;
    use crate::model::geometry::Point;

    fn candidates(grid: &SpatialGrid, point: Point) -> Vec<usize> {
        let mut found = Vec::new();
        grid.for_each_candidate(point, |index| found.push(index));
        found.sort_unstable();
        found
    }

    #[test]
    fn finds_neighbours_across_cell_borders() {
        let points = [
            Point::new(49.0, 49.0),
            Point::new(51.0, 51.0),
            Point::new(300.0, 300.0),
        ];
        let grid = SpatialGrid::build(&points, 50.0);

        assert_eq!(candidates(&grid, points[0]), vec![0, 1]);
        assert_eq!(candidates(&grid, points[2]), vec![2]);
    }

    #[test]
    fn out_of_range_cells_fall_back_to_every_point() {
        let points = [Point::new(1e22, 1e22), Point::new(1e22 + 1e7, 1e22)];
        let grid = SpatialGrid::build(&points, 50.0);
        assert_eq!(candidates(&grid, points[0]), vec![0, 1]);

        let tiny = SpatialGrid::build(&[Point::new(10.0, 10.0), Point::new(300.0, 600.0)], 1e-17);
        assert_eq!(candidates(&tiny, Point::new(10.0, 10.0)), vec![0, 1]);
    }

    #[test]
    fn handles_negative_coordinates() {
        let points = [Point::new(-10.0, -10.0), Point::new(10.0, 10.0)];
        let grid = SpatialGrid::build(&points, 50.0);
        assert_eq!(candidates(&grid, points[1]), vec![0, 1]);
    }
}
