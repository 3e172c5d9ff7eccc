#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hex Tactics.
//!
//! The [`World`] owns the generated map, every fielded unit and the turn
//! state of one game session. It is mutated exclusively through [`apply`],
//! which reports every outcome as an [`Event`]; adapters and systems observe
//! it through the read-only functions in [`query`].

mod registry;
mod turn;

use hex_tactics_core::{
    Command, CommandError, ConfigError, Controller, Event, GameConfig, HexCoord, PlayerId,
    SessionGeneration, TileMap, UnitId, WELCOME_BANNER,
};
use hex_tactics_system_reachability::ReachabilityField;

use registry::{Damage, UnitRegistry};
use turn::TurnState;

/// Represents the authoritative state of one Hex Tactics session.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    generation: SessionGeneration,
    config: GameConfig,
    map: TileMap,
    units: UnitRegistry,
    turn: TurnState,
}

impl World {
    /// Creates the first session described by `config`.
    ///
    /// Malformed configurations fail here instead of being clamped.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::build(config, SessionGeneration::new(1))
    }

    fn build(config: GameConfig, generation: SessionGeneration) -> Result<Self, ConfigError> {
        config.validate()?;
        let map = hex_tactics_system_mapgen::generate(&config)?;
        let mut units = UnitRegistry::new(map.bounds());

        for (index, player) in config.players.iter().enumerate() {
            let owner = PlayerId::new(u32::try_from(index).unwrap_or(u32::MAX));
            for unit in &player.units {
                // Validation already rejected off-map and overlapping rosters.
                let _ = units.spawn(unit.kind, unit.cell(), owner).map_err(|error| {
                    tracing::warn!(%error, "skipping starting unit");
                });
            }
        }

        let player_count = u32::try_from(config.players.len()).unwrap_or(u32::MAX);
        tracing::info!(
            generation = generation.get(),
            columns = config.columns,
            rows = config.rows,
            seed = config.seed,
            "game session started"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            generation,
            config,
            map,
            units,
            turn: TurnState::new(player_count),
        })
    }

    fn controller_of(&self, player: PlayerId) -> Controller {
        self.config
            .players
            .get(player.index())
            .map_or(Controller::Human, |config| config.controller)
    }

    fn reachability_for(&self, unit: UnitId) -> Option<ReachabilityField> {
        let unit = self.units.get(unit)?;
        let mover = unit.id;
        Some(ReachabilityField::compute(
            &self.map,
            unit.cell,
            unit.remaining_moves,
            |cell| self.units.occupant_at(cell, Some(mover)).is_some(),
        ))
    }

    fn select(&mut self, cell: HexCoord, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        if !self.map.bounds().contains(cell) {
            return Err(CommandError::InvalidCoordinate { cell });
        }
        let unit = self
            .units
            .occupant_at(cell, None)
            .ok_or(CommandError::EmptyCell { cell })?;
        if unit.owner != self.turn.active() {
            return Err(CommandError::NotYourTurn { player: unit.owner });
        }

        let id = unit.id;
        if let Some(previous) = self.turn.select(id) {
            if previous != id {
                out_events.push(Event::SelectionCleared { unit: previous });
            }
        }
        tracing::debug!(unit = id.get(), q = cell.q(), r = cell.r(), "unit selected");
        out_events.push(Event::UnitSelected { unit: id, cell });
        Ok(())
    }

    fn move_selected(
        &mut self,
        destination: HexCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let selected = self.turn.selected().ok_or(CommandError::NoSelection)?;
        let unit = *self
            .units
            .get(selected)
            .ok_or(CommandError::UnknownUnit { unit: selected })?;

        if !self.map.bounds().contains(destination) {
            return Err(CommandError::InvalidCoordinate { cell: destination });
        }
        if destination == unit.cell {
            return Ok(());
        }
        if self.units.occupant_at(destination, Some(unit.id)).is_some() {
            return Err(CommandError::OccupiedDestination { cell: destination });
        }

        let field = self
            .reachability_for(unit.id)
            .ok_or(CommandError::UnknownUnit { unit: unit.id })?;
        let path = field.path_to(destination);
        let cost = field
            .distance(destination)
            .filter(|_| !path.is_empty())
            .ok_or(CommandError::Unreachable { cell: destination })?;

        self.units.relocate(unit.id, destination, cost);
        let _ = self.turn.clear();
        let remaining_moves = unit.remaining_moves.saturating_sub(cost);

        tracing::debug!(
            unit = unit.id.get(),
            steps = path.len(),
            cost,
            remaining_moves,
            "unit moved"
        );
        out_events.push(Event::UnitMoved {
            unit: unit.id,
            from: unit.cell,
            to: destination,
            path,
            cost,
            remaining_moves,
        });
        Ok(())
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        let ending = self.turn.active();
        if let Some(previous) = self.turn.clear() {
            out_events.push(Event::SelectionCleared { unit: previous });
        }
        out_events.push(Event::TurnEnded { player: ending });

        let next = self.turn.advance();
        self.units.reset_moves_for(next);
        let controller = self.controller_of(next);

        tracing::info!(
            player = next.get(),
            round = self.turn.round(),
            ?controller,
            "turn started"
        );
        out_events.push(Event::TurnStarted {
            player: next,
            controller,
            round: self.turn.round(),
            generation: self.generation,
        });
    }

    fn spawn(
        &mut self,
        kind: hex_tactics_core::UnitKind,
        cell: HexCoord,
        owner: PlayerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        if owner.index() >= self.config.players.len() {
            return Err(CommandError::UnknownPlayer { player: owner });
        }
        let unit = self.units.spawn(kind, cell, owner)?;
        out_events.push(Event::UnitSpawned {
            unit,
            kind,
            cell,
            owner,
        });
        Ok(())
    }

    fn removed(&mut self, unit: UnitId, cell: HexCoord, out_events: &mut Vec<Event>) {
        if self.turn.selected() == Some(unit) {
            let _ = self.turn.clear();
            out_events.push(Event::SelectionCleared { unit });
        }
        tracing::debug!(unit = unit.get(), "unit removed");
        out_events.push(Event::UnitRemoved { unit, cell });
    }

    fn announce_session(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::GameStarted {
            generation: self.generation,
            bounds: self.map.bounds(),
        });
        for unit in self.units.all_units() {
            out_events.push(Event::UnitSpawned {
                unit: unit.id,
                kind: unit.kind,
                cell: unit.cell,
                owner: unit.owner,
            });
        }
        let player = self.turn.active();
        out_events.push(Event::TurnStarted {
            player,
            controller: self.controller_of(player),
            round: self.turn.round(),
            generation: self.generation,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and are reported through
/// [`Event::CommandRejected`] or [`Event::NewGameRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let kind = command.kind();
    let outcome = match command {
        Command::NewGame { config } => {
            match World::build(config, world.generation.next()) {
                Ok(fresh) => {
                    *world = fresh;
                    world.announce_session(out_events);
                }
                Err(reason) => {
                    tracing::warn!(%reason, "new game rejected");
                    out_events.push(Event::NewGameRejected { reason });
                }
            }
            Ok(())
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            Ok(())
        }
        Command::Select { cell } => world.select(cell, out_events),
        Command::Deselect => {
            if let Some(unit) = world.turn.clear() {
                out_events.push(Event::SelectionCleared { unit });
            }
            Ok(())
        }
        Command::MoveSelected { destination } => world.move_selected(destination, out_events),
        Command::EndTurn => {
            world.end_turn(out_events);
            Ok(())
        }
        Command::PassTurn {
            generation,
            player,
            round,
        } => {
            if generation == world.generation
                && player == world.turn.active()
                && round == world.turn.round()
            {
                world.end_turn(out_events);
            } else {
                tracing::debug!(
                    generation = generation.get(),
                    player = player.get(),
                    round,
                    "ignoring stale turn pass"
                );
                out_events.push(Event::StalePassIgnored {
                    generation,
                    player,
                    round,
                });
            }
            Ok(())
        }
        Command::SpawnUnit { kind, cell, owner } => world.spawn(kind, cell, owner, out_events),
        Command::RemoveUnit { unit } => world.units.remove(unit).map(|removed| {
            world.removed(removed.id, removed.cell, out_events);
        }),
        Command::DamageUnit { unit, amount } => {
            world
                .units
                .apply_damage(unit, amount)
                .map(|outcome| match outcome {
                    Damage::Survived(hp) => out_events.push(Event::UnitDamaged { unit, hp }),
                    Damage::Removed(removed) => {
                        out_events.push(Event::UnitDamaged { unit, hp: 0 });
                        world.removed(removed.id, removed.cell, out_events);
                    }
                })
        }
    };

    if let Err(reason) = outcome {
        tracing::warn!(command = ?kind, %reason, "command rejected");
        out_events.push(Event::CommandRejected {
            command: kind,
            reason,
        });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use hex_tactics_core::{
        GameConfig, HexCoord, OccupancyView, PlayerConfig, PlayerId, SessionGeneration,
        TileMap, TurnSnapshot, UnitId, UnitSnapshot, UnitView,
    };
    use hex_tactics_system_reachability::ReachabilityField;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Token of the running session.
    #[must_use]
    pub fn generation(world: &World) -> SessionGeneration {
        world.generation
    }

    /// Configuration the running session was created from.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the generated map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.map
    }

    /// Players in turn order.
    #[must_use]
    pub fn players(world: &World) -> &[PlayerConfig] {
        &world.config.players
    }

    /// Captures a read-only view of every unit on the map.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.units.all_units().map(|unit| unit.snapshot()).collect())
    }

    /// Snapshots of every unit owned by the player, in identifier order.
    #[must_use]
    pub fn units_of(world: &World, player: PlayerId) -> Vec<UnitSnapshot> {
        world
            .units
            .units_of(player)
            .map(|unit| unit.snapshot())
            .collect()
    }

    /// Unit standing on the hex, ignoring `excluding` when provided.
    #[must_use]
    pub fn occupant_at(
        world: &World,
        cell: HexCoord,
        excluding: Option<UnitId>,
    ) -> Option<UnitSnapshot> {
        world
            .units
            .occupant_at(cell, excluding)
            .map(|unit| unit.snapshot())
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView::new(world.units.occupancy(), world.map.bounds())
    }

    /// Turn order and selection state.
    #[must_use]
    pub fn turn(world: &World) -> TurnSnapshot {
        let active_player = world.turn.active();
        TurnSnapshot {
            generation: world.generation,
            active_player,
            controller: world.controller_of(active_player),
            round: world.turn.round(),
            selection: world.turn.selection(),
        }
    }

    /// Cells the unit could reach with its remaining move points.
    #[must_use]
    pub fn reachability(world: &World, unit: UnitId) -> Option<ReachabilityField> {
        world.reachability_for(unit)
    }

    /// Reachability of the selected unit, if one is selected.
    #[must_use]
    pub fn reachable_for_selection(world: &World) -> Option<ReachabilityField> {
        world
            .turn
            .selected()
            .and_then(|unit| world.reachability_for(unit))
    }

    /// Path the selected unit would take to the destination; empty when none.
    #[must_use]
    pub fn preview_path(world: &World, destination: HexCoord) -> Vec<HexCoord> {
        reachable_for_selection(world)
            .map(|field| field.path_to(destination))
            .unwrap_or_default()
    }

    /// Enemy units within the attack range of the provided unit.
    #[must_use]
    pub fn units_in_attack_range(world: &World, unit: UnitId) -> Vec<UnitSnapshot> {
        let Some(attacker) = world.units.get(unit) else {
            return Vec::new();
        };
        let range = attacker.kind.stats().attack_range();
        let mut targets: Vec<UnitSnapshot> = attacker
            .cell
            .range(range)
            .filter_map(|cell| world.units.occupant_at(cell, None))
            .filter(|candidate| candidate.owner != attacker.owner)
            .map(|candidate| candidate.snapshot())
            .collect();
        targets.sort_by_key(|snapshot| snapshot.id);
        targets
    }
}
