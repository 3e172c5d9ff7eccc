#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted movement search over the hex grid.
//!
//! Entering a hex costs the movement cost of its tile; impassable tiles are
//! never entered and hexes rejected by the caller's blocking predicate are
//! never expanded. The predicate is consulted during the search, so it always
//! reflects the occupancy the caller observes at that moment.

use std::{cmp::Reverse, collections::BinaryHeap};

use hex_tactics_core::{GridBounds, HexCoord, TileMap};

const UNVISITED: u32 = u32::MAX;

/// Cheapest known costs from a single origin within a move budget.
#[derive(Clone, Debug)]
pub struct ReachabilityField {
    bounds: GridBounds,
    origin: HexCoord,
    budget: u32,
    distances: Vec<u32>,
    predecessors: Vec<Option<usize>>,
}

impl ReachabilityField {
    /// Runs a budget-limited Dijkstra search starting at `origin`.
    ///
    /// The origin is always reachable at distance zero when it lies on the
    /// map, whatever its own terrain or occupancy. An origin outside the map
    /// produces an empty field.
    pub fn compute<F>(map: &TileMap, origin: HexCoord, budget: u32, mut is_blocked: F) -> Self
    where
        F: FnMut(HexCoord) -> bool,
    {
        let bounds = map.bounds();
        let cell_count = bounds.cell_count();
        let mut field = Self {
            bounds,
            origin,
            budget,
            distances: vec![UNVISITED; cell_count],
            predecessors: vec![None; cell_count],
        };

        let Some(origin_index) = bounds.index(origin) else {
            return field;
        };
        field.distances[origin_index] = 0;

        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((0u32, origin_index)));

        while let Some(Reverse((distance, index))) = frontier.pop() {
            if distance > field.distances[index] {
                continue;
            }
            let Some(cell) = bounds.cell_at(index) else {
                continue;
            };

            for neighbor in bounds.neighbors(cell) {
                let Some(step) = map.movement_cost(neighbor).steps() else {
                    continue;
                };
                let Some(next_distance) = distance.checked_add(step) else {
                    continue;
                };
                if next_distance > budget {
                    continue;
                }
                let Some(neighbor_index) = bounds.index(neighbor) else {
                    continue;
                };
                if field.distances[neighbor_index] <= next_distance {
                    continue;
                }
                if is_blocked(neighbor) {
                    continue;
                }

                field.distances[neighbor_index] = next_distance;
                field.predecessors[neighbor_index] = Some(index);
                frontier.push(Reverse((next_distance, neighbor_index)));
            }
        }

        tracing::trace!(
            q = origin.q(),
            r = origin.r(),
            budget,
            reachable = field.distances.iter().filter(|d| **d != UNVISITED).count(),
            "computed reachability"
        );
        field
    }

    /// Hex the search started from.
    #[must_use]
    pub const fn origin(&self) -> HexCoord {
        self.origin
    }

    /// Move budget the search was limited to.
    #[must_use]
    pub const fn budget(&self) -> u32 {
        self.budget
    }

    /// Cheapest cost of reaching the cell, when it lies within the budget.
    #[must_use]
    pub fn distance(&self, cell: HexCoord) -> Option<u32> {
        let index = self.bounds.index(cell)?;
        match self.distances.get(index).copied() {
            Some(UNVISITED) | None => None,
            Some(distance) => Some(distance),
        }
    }

    /// Hex preceding `cell` on its cheapest path.
    #[must_use]
    pub fn predecessor(&self, cell: HexCoord) -> Option<HexCoord> {
        let index = self.bounds.index(cell)?;
        self.predecessors
            .get(index)
            .copied()
            .flatten()
            .and_then(|previous| self.bounds.cell_at(previous))
    }

    /// Reports whether the cell can be reached within the budget.
    #[must_use]
    pub fn is_reachable(&self, cell: HexCoord) -> bool {
        self.distance(cell).is_some()
    }

    /// Every reachable cell in row-major order, the origin included.
    pub fn reachable(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, distance)| **distance != UNVISITED)
            .filter_map(|(index, _)| self.bounds.cell_at(index))
    }

    /// Cells entered on the cheapest path to `destination`, origin excluded.
    ///
    /// Returns an empty path when the destination is unreachable or equals
    /// the origin.
    #[must_use]
    pub fn path_to(&self, destination: HexCoord) -> Vec<HexCoord> {
        if destination == self.origin || !self.is_reachable(destination) {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut current = destination;
        while current != self.origin {
            path.push(current);
            match self.predecessor(current) {
                Some(previous) => current = previous,
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }
}

/// Cheapest path from `origin` to `destination` within `budget`, origin excluded.
pub fn find_path<F>(
    map: &TileMap,
    origin: HexCoord,
    destination: HexCoord,
    budget: u32,
    is_blocked: F,
) -> Vec<HexCoord>
where
    F: FnMut(HexCoord) -> bool,
{
    ReachabilityField::compute(map, origin, budget, is_blocked).path_to(destination)
}

/// Sum of the movement costs of every cell entered along `path`.
///
/// Returns `None` when the path enters an impassable or off-map cell.
#[must_use]
pub fn path_cost(map: &TileMap, path: &[HexCoord]) -> Option<u32> {
    path.iter().try_fold(0u32, |total, cell| {
        map.movement_cost(*cell)
            .steps()
            .and_then(|step| total.checked_add(step))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_tactics_core::{TerrainCatalog, TerrainKind};

    fn grass(columns: u32, rows: u32) -> TileMap {
        TileMap::uniform(
            GridBounds::new(columns, rows),
            &TerrainCatalog::default(),
            TerrainKind::Grass,
        )
    }

    #[test]
    fn zero_budget_reaches_only_the_origin() {
        let map = grass(5, 5);
        let field = ReachabilityField::compute(&map, HexCoord::new(2, 2), 0, |_| false);
        assert_eq!(field.reachable().collect::<Vec<_>>(), vec![HexCoord::new(2, 2)]);
    }

    #[test]
    fn off_map_origin_produces_empty_field() {
        let map = grass(3, 3);
        let field = ReachabilityField::compute(&map, HexCoord::new(9, 9), 5, |_| false);
        assert_eq!(field.reachable().count(), 0);
    }

    #[test]
    fn predecessors_chain_back_to_origin() {
        let map = grass(6, 6);
        let origin = HexCoord::new(1, 1);
        let field = ReachabilityField::compute(&map, origin, 4, |_| false);
        let destination = HexCoord::new(4, 3);
        let path = field.path_to(destination);

        assert_eq!(path.len() as u32, origin.distance(destination));
        assert_eq!(path.last(), Some(&destination));
        assert_eq!(field.predecessor(path[0]), Some(origin));
        assert_eq!(path_cost(&map, &path), field.distance(destination));
    }

    #[test]
    fn path_cost_rejects_impassable_steps() {
        let catalog = TerrainCatalog::default();
        let map = TileMap::uniform(GridBounds::new(2, 2), &catalog, TerrainKind::Water);
        assert_eq!(path_cost(&map, &[HexCoord::new(1, 1)]), None);
        assert_eq!(path_cost(&map, &[]), Some(0));
    }
}
