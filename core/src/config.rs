//! Session configuration recognised when a new game starts.

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    hex::{GridBounds, HexCoord},
    terrain::{CatalogError, TerrainCatalog, TerrainKind, TerrainProfile},
    units::{Controller, UnitKind},
    Color,
};

/// Largest jitter magnitude accepted for terrain classification.
pub const MAX_JITTER: f64 = 0.05;

/// Largest noise-space coordinate a grid may reach after scaling.
///
/// Lattice lookups convert coordinates to integers, so anything beyond this
/// magnitude is outside the sampled field.
pub const MAX_NOISE_COORDINATE: f64 = 1.0e6;

/// Reasons a configuration is rejected when a session is created.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid must span at least one column and one row.
    #[error("grid dimensions must be positive, got {columns}x{rows}")]
    InvalidDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The noise scale must be a positive finite number that keeps every
    /// scaled coordinate within [`MAX_NOISE_COORDINATE`].
    #[error("noise scale must be a positive finite number no smaller than grid extent / 1e6")]
    InvalidNoiseScale,
    /// The hex radius must be a positive finite number.
    #[error("hex radius must be a positive finite number")]
    InvalidHexRadius,
    /// The classification jitter must lie within `[0, MAX_JITTER]`.
    #[error("terrain jitter must lie within [0, 0.05]")]
    InvalidJitter,
    /// The terrain catalog is malformed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Turn rotation needs at least two players.
    #[error("at least two players are required, got {count}")]
    TooFewPlayers {
        /// Number of configured players.
        count: usize,
    },
    /// Turn index zero is reserved for the human player.
    #[error("the first player must be human controlled")]
    FirstPlayerNotHuman,
    /// A starting unit lies outside the grid.
    #[error("starting unit for player {player} at {cell:?} lies outside the grid")]
    StartingUnitOutOfBounds {
        /// Turn index of the owning player.
        player: usize,
        /// Requested starting coordinate.
        cell: HexCoord,
    },
    /// Two starting units share a coordinate.
    #[error("more than one starting unit occupies {cell:?}")]
    StartingUnitConflict {
        /// Contested coordinate.
        cell: HexCoord,
    },
    /// The scripted opponent must wait a non-zero delay before passing.
    #[error("opponent delay must be positive")]
    ZeroOpponentDelay,
}

/// Unit placed on the map when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingUnit {
    /// Kind of unit to spawn.
    pub kind: UnitKind,
    /// Column of the starting hex.
    pub q: i32,
    /// Row of the starting hex.
    pub r: i32,
}

impl StartingUnit {
    /// Creates a starting unit entry.
    #[must_use]
    pub const fn new(kind: UnitKind, q: i32, r: i32) -> Self {
        Self { kind, q, r }
    }

    /// Starting hex of the unit.
    #[must_use]
    pub const fn cell(&self) -> HexCoord {
        HexCoord::new(self.q, self.r)
    }
}

/// Player definition including its starting roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: Color,
    /// Who issues commands for the player.
    pub controller: Controller,
    /// Units spawned for the player at session start.
    #[serde(default)]
    pub units: Vec<StartingUnit>,
}

/// Every option recognised when starting a new game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of hex columns.
    pub columns: u32,
    /// Number of hex rows.
    pub rows: u32,
    /// Radius of a single hex in world units.
    pub hex_radius: f32,
    /// Divisor applied to coordinates before sampling noise.
    pub noise_scale: f64,
    /// Maximum random offset added to normalized noise before classification.
    pub jitter: f64,
    /// Seed driving noise permutation, jitter and height variation.
    pub seed: u64,
    /// One profile per terrain kind.
    pub terrain: Vec<TerrainProfile>,
    /// Players in turn order.
    pub players: Vec<PlayerConfig>,
    /// Delay before the scripted opponent passes its turn, in milliseconds.
    pub opponent_delay_ms: u64,
}

impl GameConfig {
    /// Grid extents after validating they are non-empty.
    pub fn bounds(&self) -> Result<GridBounds, ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::InvalidDimensions {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(GridBounds::new(self.columns, self.rows))
    }

    /// Terrain catalog assembled from the configured profiles.
    pub fn catalog(&self) -> Result<TerrainCatalog, ConfigError> {
        Ok(TerrainCatalog::new(&self.terrain)?)
    }

    /// Delay before the scripted opponent passes its turn.
    #[must_use]
    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }

    /// Checks every option, failing on the first malformed one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = self.bounds()?;
        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return Err(ConfigError::InvalidNoiseScale);
        }
        let extent = f64::from(self.columns.max(self.rows));
        if extent / self.noise_scale > MAX_NOISE_COORDINATE {
            return Err(ConfigError::InvalidNoiseScale);
        }
        if !(self.hex_radius.is_finite() && self.hex_radius > 0.0) {
            return Err(ConfigError::InvalidHexRadius);
        }
        if !(0.0..=MAX_JITTER).contains(&self.jitter) {
            return Err(ConfigError::InvalidJitter);
        }
        let _ = self.catalog()?;

        if self.players.len() < 2 {
            return Err(ConfigError::TooFewPlayers {
                count: self.players.len(),
            });
        }
        if self.players[0].controller != Controller::Human {
            return Err(ConfigError::FirstPlayerNotHuman);
        }
        if self.opponent_delay_ms == 0 {
            return Err(ConfigError::ZeroOpponentDelay);
        }

        let mut claimed = HashSet::new();
        for (player, config) in self.players.iter().enumerate() {
            for unit in &config.units {
                let cell = unit.cell();
                if !bounds.contains(cell) {
                    return Err(ConfigError::StartingUnitOutOfBounds { player, cell });
                }
                if !claimed.insert(cell) {
                    return Err(ConfigError::StartingUnitConflict { cell });
                }
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 50,
            rows: 50,
            hex_radius: 1.0,
            noise_scale: 10.0,
            jitter: MAX_JITTER,
            seed: 0x5eed_0f_4e55,
            terrain: TerrainKind::ALL
                .map(TerrainProfile::default_for)
                .to_vec(),
            players: vec![
                PlayerConfig {
                    name: "human".to_owned(),
                    color: Color::from_rgb(0x00, 0x00, 0xff),
                    controller: Controller::Human,
                    units: vec![
                        StartingUnit::new(UnitKind::Archer, 2, 2),
                        StartingUnit::new(UnitKind::Catapult, 3, 3),
                    ],
                },
                PlayerConfig {
                    name: "cpu1".to_owned(),
                    color: Color::from_rgb(0xff, 0x00, 0x00),
                    controller: Controller::Scripted,
                    units: vec![
                        StartingUnit::new(UnitKind::Barbarian, 5, 5),
                        StartingUnit::new(UnitKind::Troll, 6, 6),
                    ],
                },
            ],
            opponent_delay_ms: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_grid_fails_fast() {
        let config = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDimensions {
                columns: 50,
                rows: 0
            })
        );
    }

    #[test]
    fn starting_units_must_fit_and_not_overlap() {
        let mut config = GameConfig {
            columns: 4,
            rows: 4,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartingUnitOutOfBounds {
                player: 1,
                cell: HexCoord::new(5, 5)
            })
        );

        config.players[1].units = vec![StartingUnit::new(UnitKind::Troll, 2, 2)];
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartingUnitConflict {
                cell: HexCoord::new(2, 2)
            })
        );
    }

    #[test]
    fn vanishing_noise_scale_is_rejected() {
        for noise_scale in [0.0, -1.0, f64::NAN, 1e-300, 1e-5] {
            let config = GameConfig {
                noise_scale,
                ..GameConfig::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::InvalidNoiseScale));
        }

        let config = GameConfig {
            noise_scale: 1e-4,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn jitter_above_bound_is_rejected() {
        let config = GameConfig {
            jitter: 0.2,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidJitter));
    }

    #[test]
    fn partial_toml_inherits_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            columns = 12
            rows = 8
            seed = 7
            "#,
        )
        .expect("parse config");
        assert_eq!(config.columns, 12);
        assert_eq!(config.noise_scale, 10.0);
        assert_eq!(config.players.len(), 2);
    }

    #[test]
    fn toml_accepts_terrain_overrides() {
        let config: GameConfig = toml::from_str(
            r#"
            [[terrain]]
            kind = "water"
            movement_cost = "impassable"
            threshold = 0.3
            base_height = -0.1
            height_variance = 0.0
            color = { red = 0, green = 0, blue = 255 }

            [[terrain]]
            kind = "grass"
            movement_cost = { steps = 1 }
            threshold = 0.6
            base_height = 0.1
            height_variance = 0.1
            color = { red = 0, green = 255, blue = 0 }

            [[terrain]]
            kind = "forest"
            movement_cost = { steps = 3 }
            threshold = 0.75
            base_height = 0.3
            height_variance = 0.4
            color = { red = 0, green = 100, blue = 0 }

            [[terrain]]
            kind = "mountain"
            movement_cost = "impassable"
            threshold = 1.0
            base_height = 0.5
            height_variance = 0.3
            color = { red = 128, green = 128, blue = 128 }
            "#,
        )
        .expect("parse config");
        let catalog = config.catalog().expect("valid catalog");
        assert_eq!(
            catalog.movement_cost(TerrainKind::Forest),
            crate::MovementCost::Steps(3)
        );
    }
}
