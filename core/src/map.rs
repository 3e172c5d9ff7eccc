//! Immutable tile grid produced once per session.

use crate::{
    hex::{GridBounds, HexCoord},
    terrain::{MovementCost, TerrainCatalog, TerrainKind, TerrainProfile},
    Color,
};

/// Generated contents of a single hex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    kind: TerrainKind,
    movement_cost: MovementCost,
    height: f32,
    color: Color,
}

impl Tile {
    /// Creates a tile of the profile's kind raised to the given render height.
    #[must_use]
    pub const fn from_profile(profile: &TerrainProfile, height: f32) -> Self {
        Self {
            kind: profile.kind,
            movement_cost: profile.movement_cost,
            height,
            color: profile.color,
        }
    }

    /// Terrain kind the tile was classified as.
    #[must_use]
    pub const fn kind(&self) -> TerrainKind {
        self.kind
    }

    /// Cost of entering the tile.
    #[must_use]
    pub const fn movement_cost(&self) -> MovementCost {
        self.movement_cost
    }

    /// Render height of the tile surface.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Render color of the tile.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }
}

/// Fixed-size grid of tiles stored in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    bounds: GridBounds,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Builds a map by evaluating `tile_for` at every cell in row-major order.
    pub fn from_fn<F>(bounds: GridBounds, mut tile_for: F) -> Self
    where
        F: FnMut(HexCoord) -> Tile,
    {
        let mut tiles = Vec::with_capacity(bounds.cell_count());
        for cell in bounds.cells() {
            tiles.push(tile_for(cell));
        }
        Self { bounds, tiles }
    }

    /// Map where every tile has the same terrain kind at its base height.
    #[must_use]
    pub fn uniform(bounds: GridBounds, catalog: &TerrainCatalog, kind: TerrainKind) -> Self {
        let profile = catalog.profile(kind);
        let tile = Tile::from_profile(profile, profile.base_height);
        Self::from_fn(bounds, |_| tile)
    }

    /// Extents of the map.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Tile stored at the provided cell, if it lies on the map.
    #[must_use]
    pub fn tile(&self, cell: HexCoord) -> Option<&Tile> {
        self.bounds
            .index(cell)
            .and_then(|index| self.tiles.get(index))
    }

    /// Cost of entering the cell; cells off the map are impassable.
    #[must_use]
    pub fn movement_cost(&self, cell: HexCoord) -> MovementCost {
        self.tile(cell)
            .map_or(MovementCost::Impassable, Tile::movement_cost)
    }

    /// Iterates every cell together with its tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (HexCoord, &Tile)> + '_ {
        self.bounds.cells().zip(self.tiles.iter())
    }
}
