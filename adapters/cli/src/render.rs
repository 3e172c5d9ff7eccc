//! Text rendering of world snapshots and events.

use std::{collections::BTreeSet, fmt::Write as _};

use hex_tactics_core::{Event, HexCoord, PlayerId, Selection, UnitSnapshot};
use hex_tactics_system_reachability::ReachabilityField;
use hex_tactics_world::{query, World};

const REACHABLE: char = '*';

/// Draws the map with one character per hex.
///
/// Odd columns sit half a hex lower, which the row layout cannot show; the
/// header marks them with `'` to keep the offset visible.
pub(crate) fn map(world: &World) -> String {
    let map = query::tile_map(world);
    let bounds = map.bounds();
    let units = query::unit_view(world);
    let reachable: BTreeSet<HexCoord> = query::reachable_for_selection(world)
        .map(|field| field.reachable().collect())
        .unwrap_or_default();

    let mut out = String::from("    ");
    for q in 0..bounds.columns() {
        out.push(if q % 2 == 1 { '\'' } else { ' ' });
        let _ = write!(out, "{}", q % 10);
    }
    out.push('\n');

    for r in 0..bounds.rows() {
        let _ = write!(out, "{r:>3} ");
        for q in 0..bounds.columns() {
            let cell = HexCoord::new(q as i32, r as i32);
            let glyph = match units.at(cell) {
                Some(unit) => unit_glyph(unit),
                None if reachable.contains(&cell) => REACHABLE,
                None => map.tile(cell).map_or(' ', |tile| tile.kind().glyph()),
            };
            out.push(' ');
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Uppercase glyphs for the first player, lowercase for everybody else.
pub(crate) fn unit_glyph(unit: &UnitSnapshot) -> char {
    let glyph = unit.kind.glyph();
    if unit.owner == PlayerId::new(0) {
        glyph
    } else {
        glyph.to_ascii_lowercase()
    }
}

/// Lists every unit with its owner, position and remaining resources.
pub(crate) fn units(world: &World) -> String {
    let players = query::players(world);
    let selected = match query::turn(world).selection {
        Selection::UnitSelected(unit) => Some(unit),
        Selection::AwaitingSelection => None,
    };

    let mut out = String::new();
    for unit in query::unit_view(world).iter() {
        let owner = players
            .get(unit.owner.index())
            .map_or("?", |player| player.name.as_str());
        let marker = if Some(unit.id) == selected { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} #{id:<3} {kind:<9} {owner:<8} ({q}, {r})  hp {hp:>2}/{max_hp:<2} moves {moves}",
            id = unit.id.get(),
            kind = unit.kind.name(),
            q = unit.cell.q(),
            r = unit.cell.r(),
            hp = unit.hp,
            max_hp = unit.kind.stats().max_hp(),
            moves = unit.remaining_moves,
        );
    }
    out
}

/// Lists reachable hexes with their accumulated cost.
pub(crate) fn reachable(field: &ReachabilityField) -> String {
    let mut out = String::new();
    for cell in field.reachable().filter(|cell| *cell != field.origin()) {
        let cost = field.distance(cell).unwrap_or_default();
        let _ = writeln!(out, "  ({}, {}) cost {cost}", cell.q(), cell.r());
    }
    if out.is_empty() {
        out.push_str("  nothing within reach\n");
    }
    out
}

/// Formats a path as a chain of coordinates.
pub(crate) fn path(path: &[HexCoord]) -> String {
    if path.is_empty() {
        return "no path".to_owned();
    }
    path.iter()
        .map(|cell| format!("({}, {})", cell.q(), cell.r()))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Human readable line for events the player should notice.
pub(crate) fn event(world: &World, event: &Event) -> Option<String> {
    let name = |player: PlayerId| {
        query::players(world)
            .get(player.index())
            .map_or_else(|| format!("player {}", player.get()), |config| config.name.clone())
    };

    match event {
        Event::GameStarted { generation, bounds } => Some(format!(
            "game {} started on a {}x{} map",
            generation.get(),
            bounds.columns(),
            bounds.rows()
        )),
        Event::UnitSelected { unit, cell } => Some(format!(
            "selected unit #{} at ({}, {})",
            unit.get(),
            cell.q(),
            cell.r()
        )),
        Event::UnitMoved {
            unit,
            to,
            cost,
            remaining_moves,
            ..
        } => Some(format!(
            "unit #{} moved to ({}, {}) for {cost}, {remaining_moves} moves left",
            unit.get(),
            to.q(),
            to.r()
        )),
        Event::TurnStarted { player, round, .. } => {
            Some(format!("round {round}: {} to act", name(*player)))
        }
        Event::UnitRemoved { unit, .. } => Some(format!("unit #{} was removed", unit.get())),
        Event::CommandRejected { reason, .. } => Some(format!("rejected: {reason}")),
        Event::NewGameRejected { reason } => Some(format!("cannot start new game: {reason}")),
        _ => None,
    }
}
