//! Offset hex coordinates for the flat-top, shifted-odd-column layout.

use serde::{Deserialize, Serialize};

/// Largest radius honoured by [`HexCoord::range`].
const MAX_RANGE: u32 = 1 << 15;

/// Location of a single hex expressed as column (`q`) and row (`r`).
///
/// Odd columns sit half a hex lower than even columns, so the neighbor set of
/// a coordinate depends on the parity of its column even though visual
/// adjacency is symmetric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    q: i32,
    r: i32,
}

impl HexCoord {
    /// Creates a new hex coordinate from its column and row.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column index of the hex.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row index of the hex.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Reports whether the hex lives in a shifted (odd) column.
    #[must_use]
    pub const fn is_odd_column(&self) -> bool {
        self.q.rem_euclid(2) == 1
    }

    /// Returns the adjacent hex in the provided direction.
    #[must_use]
    pub const fn neighbor(self, direction: HexDirection) -> Self {
        let (dq, dr) = direction.offset(self.is_odd_column());
        Self::new(self.q + dq, self.r + dr)
    }

    /// All six adjacent hexes in `NW, N, NE, SE, S, SW` order.
    ///
    /// The result is not clipped to any grid; see [`GridBounds::neighbors`].
    #[must_use]
    pub fn neighbors(self) -> [HexCoord; 6] {
        HexDirection::ALL.map(|direction| self.neighbor(direction))
    }

    /// Converts the offset coordinate into axial `(q, r)` form.
    #[must_use]
    pub const fn to_axial(self) -> (i32, i32) {
        let parity = self.q.rem_euclid(2);
        (self.q, self.r - (self.q - parity) / 2)
    }

    /// Converts an axial coordinate back into the offset layout.
    #[must_use]
    pub const fn from_axial(q: i32, r: i32) -> Self {
        let parity = q.rem_euclid(2);
        Self::new(q, r + (q - parity) / 2)
    }

    /// Number of single-hex steps separating two coordinates.
    ///
    /// Computed as `max(|dq|, |dr|, |dq + dr|)` over the axial mapping of both
    /// endpoints, which is the exact hex distance on an unobstructed grid.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let (from_q, from_r) = self.to_axial();
        let (to_q, to_r) = other.to_axial();
        let dq = i64::from(to_q) - i64::from(from_q);
        let dr = i64::from(to_r) - i64::from(from_r);
        let steps = dq.unsigned_abs().max(dr.unsigned_abs()).max((dq + dr).unsigned_abs());
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Centre of the hex on the ground plane for a hex of the given radius.
    #[must_use]
    pub fn to_world(self, radius: f32) -> WorldPosition {
        let shift = if self.is_odd_column() { 0.5 } else { 0.0 };
        WorldPosition {
            x: radius * 1.5 * self.q as f32,
            z: radius * 3f32.sqrt() * (self.r as f32 + shift),
        }
    }

    /// Every hex whose distance from `self` is at most `radius`, unclipped.
    pub fn range(self, radius: u32) -> impl Iterator<Item = HexCoord> {
        let radius = radius.min(MAX_RANGE) as i32;
        let (center_q, center_r) = self.to_axial();
        (-radius..=radius).flat_map(move |dq| {
            let low = (-radius).max(-dq - radius);
            let high = radius.min(-dq + radius);
            (low..=high).map(move |dr| HexCoord::from_axial(center_q + dq, center_r + dr))
        })
    }
}

/// The six directions leading out of a hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HexDirection {
    /// Upper-left neighbor.
    NorthWest,
    /// Neighbor directly above.
    North,
    /// Upper-right neighbor.
    NorthEast,
    /// Lower-right neighbor.
    SouthEast,
    /// Neighbor directly below.
    South,
    /// Lower-left neighbor.
    SouthWest,
}

impl HexDirection {
    /// Every direction in clockwise order starting from the north-west.
    pub const ALL: [HexDirection; 6] = [
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
    ];

    /// Column and row delta for this direction from a hex of the given parity.
    #[must_use]
    pub const fn offset(self, odd_column: bool) -> (i32, i32) {
        match (self, odd_column) {
            (Self::North, _) => (0, -1),
            (Self::South, _) => (0, 1),
            (Self::NorthWest, true) => (-1, 0),
            (Self::NorthEast, true) => (1, 0),
            (Self::SouthEast, true) => (1, 1),
            (Self::SouthWest, true) => (-1, 1),
            (Self::NorthWest, false) => (-1, -1),
            (Self::NorthEast, false) => (1, -1),
            (Self::SouthEast, false) => (1, 0),
            (Self::SouthWest, false) => (-1, 0),
        }
    }
}

/// Position of a hex centre on the horizontal ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPosition {
    /// Horizontal offset along the column axis.
    pub x: f32,
    /// Depth offset along the row axis.
    pub z: f32,
}

/// Fixed extents of the hex grid, set once when a map is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    columns: u32,
    rows: u32,
}

impl GridBounds {
    /// Creates bounds spanning `columns` by `rows` hexes.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of hexes covered by the bounds.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether `0 <= q < columns` and `0 <= r < rows`.
    #[must_use]
    pub fn contains(&self, cell: HexCoord) -> bool {
        match (u32::try_from(cell.q()), u32::try_from(cell.r())) {
            (Ok(q), Ok(r)) => q < self.columns && r < self.rows,
            _ => false,
        }
    }

    /// Row-major index of the cell inside dense per-hex storage.
    #[must_use]
    pub fn index(&self, cell: HexCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.r()).ok()?;
        let column = usize::try_from(cell.q()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Inverse of [`GridBounds::index`].
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<HexCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let q = i32::try_from(index % width).ok()?;
        let r = i32::try_from(index / width).ok()?;
        Some(HexCoord::new(q, r))
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = HexCoord> {
        let columns = i32::try_from(self.columns).unwrap_or(i32::MAX);
        let rows = i32::try_from(self.rows).unwrap_or(i32::MAX);
        (0..rows).flat_map(move |r| (0..columns).map(move |q| HexCoord::new(q, r)))
    }

    /// Neighbors of `cell` that fall inside the bounds.
    pub fn neighbors(&self, cell: HexCoord) -> impl Iterator<Item = HexCoord> + '_ {
        cell.neighbors()
            .into_iter()
            .filter(move |neighbor| self.contains(*neighbor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_column_neighbors_lean_upward() {
        let neighbors = HexCoord::new(2, 2).neighbors();
        assert_eq!(
            neighbors,
            [
                HexCoord::new(1, 1),
                HexCoord::new(2, 1),
                HexCoord::new(3, 1),
                HexCoord::new(3, 2),
                HexCoord::new(2, 3),
                HexCoord::new(1, 2),
            ]
        );
    }

    #[test]
    fn odd_column_neighbors_lean_downward() {
        let neighbors = HexCoord::new(3, 2).neighbors();
        assert_eq!(
            neighbors,
            [
                HexCoord::new(2, 2),
                HexCoord::new(3, 1),
                HexCoord::new(4, 2),
                HexCoord::new(4, 3),
                HexCoord::new(3, 3),
                HexCoord::new(2, 3),
            ]
        );
    }

    #[test]
    fn adjacency_is_symmetric_across_column_parity() {
        for cell in [HexCoord::new(2, 2), HexCoord::new(3, 2)] {
            for neighbor in cell.neighbors() {
                assert!(neighbor.neighbors().contains(&cell), "{neighbor:?} -> {cell:?}");
            }
        }
    }

    #[test]
    fn distance_follows_axial_metric() {
        let origin = HexCoord::new(2, 2);
        assert_eq!(origin.distance(origin), 0);
        assert_eq!(origin.distance(HexCoord::new(2, 5)), 3);
        assert_eq!(origin.distance(HexCoord::new(5, 2)), 3);
        assert_eq!(origin.distance(HexCoord::new(4, 4)), 3);
        assert_eq!(HexCoord::new(0, 0).distance(HexCoord::new(1, 0)), 1);
    }

    #[test]
    fn axial_round_trip_preserves_negative_columns() {
        for cell in [HexCoord::new(-3, 4), HexCoord::new(-2, -1), HexCoord::new(7, 0)] {
            let (q, r) = cell.to_axial();
            assert_eq!(HexCoord::from_axial(q, r), cell);
        }
    }

    #[test]
    fn world_position_shifts_odd_columns_by_half_a_hex() {
        let even = HexCoord::new(2, 1).to_world(1.0);
        let odd = HexCoord::new(3, 1).to_world(1.0);
        assert!((even.x - 3.0).abs() < f32::EPSILON);
        assert!((even.z - 3f32.sqrt()).abs() < 1e-6);
        assert!((odd.x - 4.5).abs() < f32::EPSILON);
        assert!((odd.z - 1.5 * 3f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn range_covers_centered_hexagon() {
        let center = HexCoord::new(10, 10);
        let cells: Vec<_> = center.range(2).collect();
        assert_eq!(cells.len(), 19);
        assert!(cells.iter().all(|cell| center.distance(*cell) <= 2));
        assert_eq!(center.range(0).collect::<Vec<_>>(), vec![center]);
    }

    #[test]
    fn bounds_reject_negative_and_overflowing_cells() {
        let bounds = GridBounds::new(4, 3);
        assert!(bounds.contains(HexCoord::new(3, 2)));
        assert!(!bounds.contains(HexCoord::new(4, 2)));
        assert!(!bounds.contains(HexCoord::new(0, 3)));
        assert!(!bounds.contains(HexCoord::new(-1, 0)));
        assert_eq!(bounds.index(HexCoord::new(1, 2)), Some(9));
        assert_eq!(bounds.cell_at(9), Some(HexCoord::new(1, 2)));
        assert_eq!(bounds.cells().count(), 12);
    }

    #[test]
    fn bounded_neighbors_drop_cells_outside_the_grid() {
        let bounds = GridBounds::new(5, 5);
        let corner: Vec<_> = bounds.neighbors(HexCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![HexCoord::new(1, 0), HexCoord::new(0, 1)]);
    }
}
