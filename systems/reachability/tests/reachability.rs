use std::collections::BTreeSet;

use hex_tactics_core::{GridBounds, HexCoord, TerrainCatalog, TerrainKind, Tile, TileMap};
use hex_tactics_system_reachability::{find_path, path_cost, ReachabilityField};
use proptest::prelude::*;

fn map_from_kinds<F>(columns: u32, rows: u32, mut kind_at: F) -> TileMap
where
    F: FnMut(HexCoord) -> TerrainKind,
{
    let catalog = TerrainCatalog::default();
    TileMap::from_fn(GridBounds::new(columns, rows), |cell| {
        let profile = catalog.profile(kind_at(cell));
        Tile::from_profile(profile, profile.base_height)
    })
}

#[test]
fn path_to_origin_is_empty_for_any_budget() {
    let map = map_from_kinds(5, 5, |_| TerrainKind::Grass);
    let origin = HexCoord::new(2, 2);
    for budget in [0, 1, 7, u32::MAX] {
        assert!(find_path(&map, origin, origin, budget, |_| false).is_empty());
    }
}

#[test]
fn impassable_ring_confines_search_to_origin() {
    let origin = HexCoord::new(2, 2);
    let ring = origin.neighbors();
    let mut flip = false;
    let map = map_from_kinds(5, 5, |cell| {
        if ring.contains(&cell) {
            flip = !flip;
            if flip {
                TerrainKind::Water
            } else {
                TerrainKind::Mountain
            }
        } else {
            TerrainKind::Grass
        }
    });

    let field = ReachabilityField::compute(&map, origin, 1_000, |_| false);
    assert_eq!(field.reachable().collect::<Vec<_>>(), vec![origin]);
}

#[test]
fn occupant_on_only_route_cuts_destination_off() {
    // A single row is a line graph: every column only touches its direct
    // neighbours.
    let map = map_from_kinds(5, 1, |_| TerrainKind::Grass);
    let origin = HexCoord::new(0, 0);
    let destination = HexCoord::new(4, 0);
    let occupant = HexCoord::new(2, 0);

    let open = find_path(&map, origin, destination, 10, |_| false);
    assert_eq!(
        open,
        vec![
            HexCoord::new(1, 0),
            HexCoord::new(2, 0),
            HexCoord::new(3, 0),
            HexCoord::new(4, 0),
        ]
    );

    let blocked = find_path(&map, origin, destination, 10, |cell| cell == occupant);
    assert!(blocked.is_empty());
}

#[test]
fn forest_costs_more_than_grass() {
    let map = map_from_kinds(5, 1, |cell| {
        if cell.q() == 1 {
            TerrainKind::Forest
        } else {
            TerrainKind::Grass
        }
    });
    let field = ReachabilityField::compute(&map, HexCoord::new(0, 0), 3, |_| false);

    assert_eq!(field.distance(HexCoord::new(1, 0)), Some(2));
    assert_eq!(field.distance(HexCoord::new(2, 0)), Some(3));
    assert!(!field.is_reachable(HexCoord::new(3, 0)));
}

#[test]
fn three_moves_on_grass_cover_the_hex_disc() {
    let map = map_from_kinds(10, 10, |_| TerrainKind::Grass);
    let origin = HexCoord::new(2, 2);
    let field = ReachabilityField::compute(&map, origin, 3, |_| false);

    let reachable: BTreeSet<_> = field.reachable().collect();
    let expected: BTreeSet<_> = origin
        .range(3)
        .filter(|cell| map.bounds().contains(*cell))
        .collect();
    assert_eq!(reachable, expected);

    let far = HexCoord::new(2, 6);
    assert_eq!(origin.distance(far), 4);
    assert!(find_path(&map, origin, far, 3, |_| false).is_empty());
}

fn terrain_strategy() -> impl Strategy<Value = Vec<TerrainKind>> {
    prop::collection::vec(
        prop::sample::select(vec![
            TerrainKind::Grass,
            TerrainKind::Grass,
            TerrainKind::Forest,
            TerrainKind::Water,
            TerrainKind::Mountain,
        ]),
        64,
    )
}

proptest! {
    #[test]
    fn paths_are_contiguous_and_priced_by_distance(
        kinds in terrain_strategy(),
        origin_index in 0usize..64,
        budget in 0u32..8,
    ) {
        let bounds = GridBounds::new(8, 8);
        let map = map_from_kinds(8, 8, |cell| kinds[bounds.index(cell).unwrap()]);
        let origin = bounds.cell_at(origin_index).unwrap();
        let field = ReachabilityField::compute(&map, origin, budget, |_| false);

        prop_assert_eq!(field.distance(origin), Some(0));
        for cell in field.reachable() {
            let distance = field.distance(cell).unwrap();
            prop_assert!(distance <= budget);

            let path = field.path_to(cell);
            prop_assert_eq!(path_cost(&map, &path), Some(distance));

            let mut previous = origin;
            for step in path {
                prop_assert_eq!(previous.distance(step), 1);
                prop_assert!(map.movement_cost(step).is_passable());
                previous = step;
            }
        }
    }
}
