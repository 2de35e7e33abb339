// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-resolution bucket grids for mirror-candidate lookup.
//!
//! A symmetry pass keeps two grids of [`Bucket`]s over the same
//! [`SymmetryBox`]: one holding Plus-side candidates and one holding
//! Minus-side candidates. A point always searches the grid of the opposite
//! side, scanning only the cells that overlap a box of `±tolerance` around
//! its folded position.
//!
//! Unlike a hash grid, the cell count is fixed and every position clamps
//! into range, so the grid is a flat `Vec` indexed by a linear cell offset.

use std::fmt;
use std::str::FromStr;

use crate::axis::SymmetrySide;
use crate::bounds::SymmetryBox;
use crate::error::Error;
use crate::point::Point;

/// Integer cell coordinates `(ix, iy, iz)`.
pub type CellIndex = [usize; 3];

/// Number of cells along world X, Y and Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridResolution {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Default for GridResolution {
    fn default() -> Self {
        Self { x: 4, y: 8, z: 8 }
    }
}

impl GridResolution {
    /// Creates a resolution. Each dimension is raised to at least one cell.
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self {
            x: x.max(1),
            y: y.max(1),
            z: z.max(1),
        }
    }

    /// Cell counts per axis. A zero set directly on a field reads as one cell.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        [self.x.max(1), self.y.max(1), self.z.max(1)]
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.dims().iter().product()
    }

    /// Maps a projected position to its cell, per dimension:
    /// `clamp(floor(pos / extent * res), 0, res - 1)`, or cell 0 when the
    /// extent along that dimension is zero (flat model).
    pub fn cell_of(&self, extent: &nalgebra::Vector3<f32>, pos: &Point) -> CellIndex {
        let dims = self.dims();
        let mut cell = [0usize; 3];
        for i in 0..3 {
            cell[i] = Self::axis_cell(extent[i], pos[i], dims[i]);
        }
        cell
    }

    fn axis_cell(extent: f32, pos: f32, cells: usize) -> usize {
        if extent <= 0.0 {
            return 0;
        }
        let c = (pos / extent * cells as f32).floor();
        if c > 0.0 {
            (c as usize).min(cells - 1)
        } else {
            0
        }
    }
}

impl fmt::Display for GridResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

impl FromStr for GridResolution {
    type Err = Error;

    /// Parses `NXxNYxNZ`, e.g. `4x8x8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidResolution(s.to_string());
        let dims: Vec<usize> = s
            .trim()
            .split(['x', 'X'])
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid())?;
        match dims.as_slice() {
            &[x, y, z] if x > 0 && y > 0 && z > 0 => Ok(Self { x, y, z }),
            _ => Err(invalid()),
        }
    }
}

/// Inclusive range of cells to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: CellIndex,
    pub max: CellIndex,
}

impl CellRange {
    /// Iterates cells with x varying fastest, then y, then z.
    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (self.min[2]..=self.max[2]).flat_map(move |z| {
            (self.min[1]..=self.max[1])
                .flat_map(move |y| (self.min[0]..=self.max[0]).map(move |x| [x, y, z]))
        })
    }
}

/// One grid cell's point indices.
///
/// Order is not meaningful: removal moves the last element into the freed
/// slot, so iteration order changes after every removal.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    items: Vec<usize>,
}

impl Bucket {
    #[inline]
    pub fn push(&mut self, point: usize) {
        self.items.push(point);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().copied()
    }

    pub fn contains(&self, point: usize) -> bool {
        self.items.contains(&point)
    }

    /// Removes the entry in `slot` by swapping in the last entry.
    ///
    /// Returns the removed point index, or `None` if `slot` is out of range.
    pub fn remove_slot(&mut self, slot: usize) -> Option<usize> {
        (slot < self.items.len()).then(|| self.items.swap_remove(slot))
    }

    /// Removes the first entry equal to `point`. Returns `false` if absent.
    pub fn remove_value(&mut self, point: usize) -> bool {
        match self.items.iter().position(|&p| p == point) {
            Some(slot) => {
                self.items.swap_remove(slot);
                true
            }
            None => false,
        }
    }
}

/// Closest candidate found by [`BucketGrid::find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Index of the matched point.
    pub point: usize,
    /// Cell holding the match.
    pub cell: CellIndex,
    /// Slot of the match inside that cell's bucket.
    pub slot: usize,
    /// Distance to the query position.
    pub distance: f32,
}

/// A fixed-size 3D array of buckets.
#[derive(Debug, Clone)]
pub struct BucketGrid {
    resolution: GridResolution,
    cells: Vec<Bucket>,
}

impl BucketGrid {
    pub fn new(resolution: GridResolution) -> Self {
        Self {
            resolution,
            cells: vec![Bucket::default(); resolution.cell_count()],
        }
    }

    pub fn resolution(&self) -> GridResolution {
        self.resolution
    }

    #[inline]
    fn offset(&self, cell: CellIndex) -> usize {
        let [nx, ny, nz] = self.resolution.dims();
        cell[0].min(nx - 1) + cell[1].min(ny - 1) * nx + cell[2].min(nz - 1) * nx * ny
    }

    pub fn bucket(&self, cell: CellIndex) -> &Bucket {
        &self.cells[self.offset(cell)]
    }

    fn bucket_mut(&mut self, cell: CellIndex) -> &mut Bucket {
        let offset = self.offset(cell);
        &mut self.cells[offset]
    }

    /// Total number of registered points.
    pub fn len(&self) -> usize {
        self.cells.iter().map(Bucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Bucket::is_empty)
    }

    pub fn insert(&mut self, cell: CellIndex, point: usize) {
        self.bucket_mut(cell).push(point);
    }

    pub fn remove_slot(&mut self, cell: CellIndex, slot: usize) -> Option<usize> {
        self.bucket_mut(cell).remove_slot(slot)
    }

    pub fn remove_value(&mut self, cell: CellIndex, point: usize) -> bool {
        self.bucket_mut(cell).remove_value(point)
    }

    /// Finds the registered point closest to `query` within `max_distance`,
    /// scanning every cell in `range`.
    ///
    /// Comparison uses squared distances; a candidate at exactly the running
    /// best replaces it, so among equal distances the one scanned last wins.
    pub fn find_nearest(
        &self,
        points: &[Point],
        query: &Point,
        range: &CellRange,
        max_distance: f32,
    ) -> Option<Nearest> {
        let mut best_sq = max_distance * max_distance;
        let mut best: Option<(usize, CellIndex, usize)> = None;

        for cell in range.iter() {
            for (slot, point) in self.bucket(cell).iter().enumerate() {
                let Some(p) = points.get(point) else {
                    continue;
                };
                let dist_sq = (p - query).norm_squared();
                if dist_sq <= best_sq {
                    best_sq = dist_sq;
                    best = Some((point, cell, slot));
                }
            }
        }

        best.map(|(point, cell, slot)| Nearest {
            point,
            cell,
            slot,
            distance: best_sq.sqrt(),
        })
    }
}

/// The pair of Plus/Minus candidate grids for one symmetry pass.
#[derive(Debug, Clone)]
pub struct MirrorGrid {
    frame: SymmetryBox,
    plus: BucketGrid,
    minus: BucketGrid,
}

impl MirrorGrid {
    pub fn new(frame: SymmetryBox, resolution: GridResolution) -> Self {
        Self {
            frame,
            plus: BucketGrid::new(resolution),
            minus: BucketGrid::new(resolution),
        }
    }

    pub fn frame(&self) -> &SymmetryBox {
        &self.frame
    }

    /// Candidate grid for `side`. `None` and `Center` have no grid.
    pub fn grid(&self, side: SymmetrySide) -> Option<&BucketGrid> {
        match side {
            SymmetrySide::Plus => Some(&self.plus),
            SymmetrySide::Minus => Some(&self.minus),
            _ => None,
        }
    }

    fn grid_mut(&mut self, side: SymmetrySide) -> Option<&mut BucketGrid> {
        match side {
            SymmetrySide::Plus => Some(&mut self.plus),
            SymmetrySide::Minus => Some(&mut self.minus),
            _ => None,
        }
    }

    /// Cell holding `p` (in model space).
    pub fn cell_of(&self, p: &Point) -> CellIndex {
        self.plus
            .resolution()
            .cell_of(self.frame.extent(), &self.frame.project(p))
    }

    /// Cells overlapping the box of `±radius` around `p`'s folded position.
    pub fn search_range(&self, p: &Point, radius: f32) -> CellRange {
        let resolution = self.plus.resolution();
        let center = self.frame.project(p).coords;
        let offset = nalgebra::Vector3::repeat(radius);
        CellRange {
            min: resolution.cell_of(self.frame.extent(), &Point::from(center - offset)),
            max: resolution.cell_of(self.frame.extent(), &Point::from(center + offset)),
        }
    }

    /// Registers point `index` at position `p` as a `side` candidate.
    /// Returns `false` for sides without a grid.
    pub fn insert(&mut self, side: SymmetrySide, index: usize, p: &Point) -> bool {
        let cell = self.cell_of(p);
        match self.grid_mut(side) {
            Some(grid) => {
                grid.insert(cell, index);
                true
            }
            None => false,
        }
    }

    pub fn remove_slot(&mut self, side: SymmetrySide, cell: CellIndex, slot: usize) -> Option<usize> {
        self.grid_mut(side)?.remove_slot(cell, slot)
    }

    /// Retracts point `index`, registered at position `p`, from the `side` grid.
    pub fn remove_value(&mut self, side: SymmetrySide, index: usize, p: &Point) -> bool {
        let cell = self.cell_of(p);
        self.grid_mut(side)
            .is_some_and(|grid| grid.remove_value(cell, index))
    }

    /// Nearest `side` candidate to `query` within `max_distance`, scanning `range`.
    pub fn find_nearest(
        &self,
        side: SymmetrySide,
        points: &[Point],
        query: &Point,
        range: &CellRange,
        max_distance: f32,
    ) -> Option<Nearest> {
        self.grid(side)?
            .find_nearest(points, query, range, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::SymmetryAxis;
    use nalgebra::Vector3;

    #[test]
    fn bucket_swap_removal() {
        let mut bucket = Bucket::default();
        for p in [10, 11, 12, 13] {
            bucket.push(p);
        }

        assert_eq!(bucket.remove_slot(0), Some(10));
        assert_eq!(bucket.len(), 3);
        assert!(!bucket.contains(10));
        assert!(bucket.contains(13));

        assert!(bucket.remove_value(12));
        assert!(!bucket.remove_value(12));
        assert_eq!(bucket.len(), 2);

        let mut rest: Vec<_> = bucket.iter().collect();
        rest.sort_unstable();
        assert_eq!(rest, vec![11, 13]);

        assert_eq!(bucket.remove_slot(5), None);
    }

    #[test]
    fn cell_of_clamps_and_handles_flat_extent() {
        let res = GridResolution::default();
        let extent = Vector3::new(2.0, 8.0, 0.0);

        assert_eq!(res.cell_of(&extent, &Point::new(0.0, 0.0, 0.0)), [0, 0, 0]);
        assert_eq!(res.cell_of(&extent, &Point::new(1.0, 4.0, 5.0)), [2, 4, 0]);
        assert_eq!(res.cell_of(&extent, &Point::new(2.0, 8.0, 0.0)), [3, 7, 0]);
        assert_eq!(res.cell_of(&extent, &Point::new(-1.0, 100.0, 0.0)), [0, 7, 0]);
    }

    #[test]
    fn resolution_parse_and_display() {
        let res: GridResolution = "2x3x4".parse().unwrap();
        assert_eq!(res, GridResolution::new(2, 3, 4));
        assert_eq!(res.to_string(), "2x3x4");
        assert_eq!(res.cell_count(), 24);

        assert!("2x3".parse::<GridResolution>().is_err());
        assert!("0x8x8".parse::<GridResolution>().is_err());
        assert!("axbxc".parse::<GridResolution>().is_err());
        assert_eq!(GridResolution::new(0, 0, 3), GridResolution::new(1, 1, 3));
    }

    #[test]
    fn cell_range_visits_every_cell_once() {
        let range = CellRange {
            min: [0, 1, 2],
            max: [1, 2, 2],
        };
        let cells: Vec<_> = range.iter().collect();
        assert_eq!(cells, vec![[0, 1, 2], [1, 1, 2], [0, 2, 2], [1, 2, 2]]);
    }

    #[test]
    fn find_nearest_respects_radius() {
        let points = vec![
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.3, 0.0, 0.0),
            Point::new(5.0, 0.0, 0.0),
        ];
        let mut grid = BucketGrid::new(GridResolution::new(1, 1, 1));
        for i in 0..points.len() {
            grid.insert([0, 0, 0], i);
        }
        let all = CellRange {
            min: [0, 0, 0],
            max: [0, 0, 0],
        };

        let hit = grid
            .find_nearest(&points, &Point::new(1.2, 0.0, 0.0), &all, 0.5)
            .unwrap();
        assert_eq!(hit.point, 1);
        assert!((hit.distance - 0.1).abs() < 1e-5);
        assert_eq!(grid.bucket([0, 0, 0]).iter().nth(hit.slot), Some(1));

        assert!(grid
            .find_nearest(&points, &Point::new(3.0, 0.0, 0.0), &all, 0.5)
            .is_none());
    }

    #[test]
    fn zero_cell_dimension_reads_as_one() {
        let res = GridResolution { x: 0, y: 8, z: 0 };
        assert_eq!(res.dims(), [1, 8, 1]);
        assert_eq!(res.cell_count(), 8);

        let extent = Vector3::new(2.0, 8.0, 2.0);
        assert_eq!(res.cell_of(&extent, &Point::new(2.0, 8.0, 2.0)), [0, 7, 0]);

        let points = vec![Point::new(0.0, 3.0, 0.0)];
        let mut grid = BucketGrid::new(res);
        grid.insert([5, 3, 5], 0);
        assert_eq!(grid.len(), 1);
        assert!(grid.bucket([0, 3, 0]).contains(0));
        let all = CellRange {
            min: [0, 0, 0],
            max: [0, 7, 0],
        };
        assert!(grid
            .find_nearest(&points, &Point::new(0.0, 3.0, 0.0), &all, 0.1)
            .is_some());
    }

    #[test]
    fn equal_distance_tie_goes_to_later_slot() {
        let points = vec![Point::new(0.0, 0.5, 0.0), Point::new(0.0, -0.5, 0.0)];
        let mut grid = BucketGrid::new(GridResolution::new(1, 1, 1));
        grid.insert([0, 0, 0], 0);
        grid.insert([0, 0, 0], 1);
        let all = CellRange {
            min: [0, 0, 0],
            max: [0, 0, 0],
        };

        let hit = grid.find_nearest(&points, &Point::origin(), &all, 1.0).unwrap();
        assert_eq!(hit.point, 1);
        assert_eq!(hit.slot, 1);
    }

    #[test]
    fn equal_distance_tie_goes_to_later_cell() {
        let points = vec![Point::new(0.0, 0.5, 0.0), Point::new(0.0, -0.5, 0.0)];
        let mut grid = BucketGrid::new(GridResolution::new(1, 2, 1));
        // Point 1 sits in the first cell scanned, point 0 in the second.
        grid.insert([0, 0, 0], 1);
        grid.insert([0, 1, 0], 0);
        let all = CellRange {
            min: [0, 0, 0],
            max: [0, 1, 0],
        };

        let hit = grid.find_nearest(&points, &Point::origin(), &all, 1.0).unwrap();
        assert_eq!(hit.point, 0);
        assert_eq!(hit.cell, [0, 1, 0]);
    }

    #[test]
    fn mirror_grid_keeps_sides_apart() {
        let points = vec![Point::new(-2.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0)];
        let frame = SymmetryBox::from_points(&points, SymmetryAxis::X).unwrap();
        let mut grid = MirrorGrid::new(frame, GridResolution::default());

        assert!(grid.insert(SymmetrySide::Minus, 0, &points[0]));
        assert!(grid.insert(SymmetrySide::Plus, 1, &points[1]));
        assert!(!grid.insert(SymmetrySide::Center, 1, &points[1]));

        // Both points fold to the same cell.
        assert_eq!(grid.cell_of(&points[0]), grid.cell_of(&points[1]));

        let query = SymmetryAxis::X.mirror(&points[1]);
        let range = grid.search_range(&points[1], 0.5);
        let hit = grid
            .find_nearest(SymmetrySide::Minus, &points, &query, &range, 0.5)
            .unwrap();
        assert_eq!(hit.point, 0);
        assert!(grid
            .find_nearest(SymmetrySide::Center, &points, &query, &range, 0.5)
            .is_none());

        assert_eq!(grid.remove_slot(SymmetrySide::Minus, hit.cell, hit.slot), Some(0));
        assert!(grid.grid(SymmetrySide::Minus).unwrap().is_empty());
        assert!(grid.remove_value(SymmetrySide::Plus, 1, &points[1]));
        assert_eq!(grid.grid(SymmetrySide::Plus).unwrap().len(), 0);
    }
}
