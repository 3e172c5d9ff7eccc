#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hex Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as the [`TileMap`] and [`OccupancyView`], and respond
//! exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;
mod hex;
mod map;
mod terrain;
mod units;

pub use config::{
    ConfigError, GameConfig, PlayerConfig, StartingUnit, MAX_JITTER, MAX_NOISE_COORDINATE,
};
pub use hex::{GridBounds, HexCoord, HexDirection, WorldPosition};
pub use map::{Tile, TileMap};
pub use terrain::{CatalogError, MovementCost, TerrainCatalog, TerrainKind, TerrainProfile};
pub use units::{Controller, PlayerId, UnitId, UnitKind, UnitStats};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hex Tactics.";

/// Byte RGB color used for terrain and player presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Token identifying one game session; bumped by every new game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    /// Creates a generation token with the provided value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the token.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Token that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Tears down the current session and starts a new one.
    NewGame {
        /// Configuration for the new session.
        config: GameConfig,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Selects the unit standing on the provided hex.
    Select {
        /// Hex the acting player clicked.
        cell: HexCoord,
    },
    /// Clears the current selection.
    Deselect,
    /// Moves the selected unit to the destination hex.
    MoveSelected {
        /// Hex the selected unit should end on.
        destination: HexCoord,
    },
    /// Ends the acting player's turn.
    EndTurn,
    /// Deferred turn pass issued by the scripted opponent.
    PassTurn {
        /// Session the pass was scheduled in.
        generation: SessionGeneration,
        /// Player whose turn the pass ends.
        player: PlayerId,
        /// Round the pass was scheduled in.
        round: u32,
    },
    /// Places a new unit on the map.
    SpawnUnit {
        /// Kind of unit to create.
        kind: UnitKind,
        /// Hex the unit appears on.
        cell: HexCoord,
        /// Player owning the unit.
        owner: PlayerId,
    },
    /// Removes a unit from the map.
    RemoveUnit {
        /// Unit to remove.
        unit: UnitId,
    },
    /// Subtracts hit points from a unit, removing it once none remain.
    DamageUnit {
        /// Unit receiving the damage.
        unit: UnitId,
        /// Hit points to subtract.
        amount: u32,
    },
}

impl Command {
    /// Discriminant of the command used when reporting rejections.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::NewGame { .. } => CommandKind::NewGame,
            Self::Tick { .. } => CommandKind::Tick,
            Self::Select { .. } => CommandKind::Select,
            Self::Deselect => CommandKind::Deselect,
            Self::MoveSelected { .. } => CommandKind::MoveSelected,
            Self::EndTurn => CommandKind::EndTurn,
            Self::PassTurn { .. } => CommandKind::PassTurn,
            Self::SpawnUnit { .. } => CommandKind::SpawnUnit,
            Self::RemoveUnit { .. } => CommandKind::RemoveUnit,
            Self::DamageUnit { .. } => CommandKind::DamageUnit,
        }
    }
}

/// Payload-free mirror of [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// [`Command::NewGame`].
    NewGame,
    /// [`Command::Tick`].
    Tick,
    /// [`Command::Select`].
    Select,
    /// [`Command::Deselect`].
    Deselect,
    /// [`Command::MoveSelected`].
    MoveSelected,
    /// [`Command::EndTurn`].
    EndTurn,
    /// [`Command::PassTurn`].
    PassTurn,
    /// [`Command::SpawnUnit`].
    SpawnUnit,
    /// [`Command::RemoveUnit`].
    RemoveUnit,
    /// [`Command::DamageUnit`].
    DamageUnit,
}

/// Reasons the world may reject a command.
///
/// Every variant is local and recoverable: the world state is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum CommandError {
    /// The hex lies outside the grid.
    #[error("{cell:?} lies outside the grid")]
    InvalidCoordinate {
        /// Offending hex.
        cell: HexCoord,
    },
    /// Another unit already stands on the hex.
    #[error("{cell:?} is already occupied")]
    OccupiedDestination {
        /// Occupied hex.
        cell: HexCoord,
    },
    /// No path within the remaining move budget leads to the hex.
    #[error("{cell:?} cannot be reached with the remaining move points")]
    Unreachable {
        /// Hex that could not be reached.
        cell: HexCoord,
    },
    /// The unit does not belong to the acting player.
    #[error("it is not the turn of player {}", player.get())]
    NotYourTurn {
        /// Owner of the unit that was addressed.
        player: PlayerId,
    },
    /// A move was requested without a selected unit.
    #[error("no unit is selected")]
    NoSelection,
    /// Selection was requested on a hex without a unit.
    #[error("no unit stands on {cell:?}")]
    EmptyCell {
        /// Hex that was selected.
        cell: HexCoord,
    },
    /// The unit does not exist.
    #[error("unit {} does not exist", unit.get())]
    UnknownUnit {
        /// Identifier that failed to resolve.
        unit: UnitId,
    },
    /// The player does not take part in the session.
    #[error("player {} does not exist", player.get())]
    UnknownPlayer {
        /// Identifier that failed to resolve.
        player: PlayerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new session replaced the previous one.
    GameStarted {
        /// Token of the new session.
        generation: SessionGeneration,
        /// Extents of the freshly generated map.
        bounds: GridBounds,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a unit became the selection.
    UnitSelected {
        /// Selected unit.
        unit: UnitId,
        /// Hex the unit stands on.
        cell: HexCoord,
    },
    /// Confirms that the selection was cleared.
    SelectionCleared {
        /// Unit that was previously selected.
        unit: UnitId,
    },
    /// Confirms that a unit moved along a validated path.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Hex the unit left.
        from: HexCoord,
        /// Hex the unit ended on.
        to: HexCoord,
        /// Hexes entered in order, excluding `from`.
        path: Vec<HexCoord>,
        /// Move points spent on the path.
        cost: u32,
        /// Move points the unit has left.
        remaining_moves: u32,
    },
    /// Announces that a player's turn ended.
    TurnEnded {
        /// Player whose turn ended.
        player: PlayerId,
    },
    /// Announces that a player's turn began.
    TurnStarted {
        /// Player now acting.
        player: PlayerId,
        /// Who issues commands for that player.
        controller: Controller,
        /// Rotation count, starting at one.
        round: u32,
        /// Session the turn belongs to.
        generation: SessionGeneration,
    },
    /// Confirms that a unit was placed on the map.
    UnitSpawned {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Kind of unit.
        kind: UnitKind,
        /// Hex the unit stands on.
        cell: HexCoord,
        /// Owning player.
        owner: PlayerId,
    },
    /// Confirms that a unit lost hit points and survived.
    UnitDamaged {
        /// Damaged unit.
        unit: UnitId,
        /// Hit points remaining.
        hp: u32,
    },
    /// Confirms that a unit left the map.
    UnitRemoved {
        /// Removed unit.
        unit: UnitId,
        /// Hex the unit vacated.
        cell: HexCoord,
    },
    /// Reports that a command was rejected and state left unchanged.
    CommandRejected {
        /// Kind of command that was rejected.
        command: CommandKind,
        /// Specific reason for the rejection.
        reason: CommandError,
    },
    /// Reports that a new game could not start; the current session continues.
    NewGameRejected {
        /// Configuration problem.
        reason: ConfigError,
    },
    /// Reports that a deferred turn pass no longer matched the session.
    StalePassIgnored {
        /// Session the pass was scheduled in.
        generation: SessionGeneration,
        /// Player the pass was scheduled for.
        player: PlayerId,
        /// Round the pass was scheduled in.
        round: u32,
    },
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Kind of unit.
    pub kind: UnitKind,
    /// Owning player.
    pub owner: PlayerId,
    /// Hex currently occupied by the unit.
    pub cell: HexCoord,
    /// Hit points remaining.
    pub hp: u32,
    /// Move points left this turn.
    pub remaining_moves: u32,
}

/// Read-only snapshot describing all units on the map.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the unit standing on the provided hex, if any.
    #[must_use]
    pub fn at(&self, cell: HexCoord) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<UnitId>],
    bounds: GridBounds,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided row-major slice.
    #[must_use]
    pub fn new(cells: &'a [Option<UnitId>], bounds: GridBounds) -> Self {
        Self { cells, bounds }
    }

    /// Returns the unit occupying the provided hex, if any.
    #[must_use]
    pub fn occupant(&self, cell: HexCoord) -> Option<UnitId> {
        self.bounds
            .index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the hex hosts a unit other than `mover`.
    #[must_use]
    pub fn is_blocked_for(&self, cell: HexCoord, mover: UnitId) -> bool {
        self.occupant(cell)
            .map_or(false, |occupant| occupant != mover)
    }

    /// Reports whether the hex is currently free.
    #[must_use]
    pub fn is_free(&self, cell: HexCoord) -> bool {
        self.occupant(cell).is_none()
    }

    /// Provides the extents of the underlying occupancy grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }
}

/// Current selection state of the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
    /// No unit is selected.
    AwaitingSelection,
    /// The acting player selected the unit.
    UnitSelected(UnitId),
}

/// Read-only snapshot of turn order and selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnSnapshot {
    /// Session the snapshot belongs to.
    pub generation: SessionGeneration,
    /// Player whose turn it is.
    pub active_player: PlayerId,
    /// Who issues commands for the active player.
    pub controller: Controller,
    /// Rotation count, starting at one.
    pub round: u32,
    /// Current selection.
    pub selection: Selection,
}
