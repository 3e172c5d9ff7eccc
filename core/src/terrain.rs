//! Static terrain catalog describing how each terrain kind behaves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Enumerates the terrain kinds a tile can be classified as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    /// Open water.
    Water,
    /// Grassland.
    Grass,
    /// Forest.
    Forest,
    /// Mountains.
    Mountain,
}

impl TerrainKind {
    /// Every terrain kind in declaration order.
    pub const ALL: [TerrainKind; 4] = [Self::Water, Self::Grass, Self::Forest, Self::Mountain];

    /// Character used by text adapters to draw the terrain.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Water => '~',
            Self::Grass => '.',
            Self::Forest => 'f',
            Self::Mountain => '^',
        }
    }

    /// Position of the kind in [`TerrainKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Water => 0,
            Self::Grass => 1,
            Self::Forest => 2,
            Self::Mountain => 3,
        }
    }
}

/// Price paid from a unit's move allowance when entering a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementCost {
    /// Entering the tile costs the given number of move points.
    Steps(u32),
    /// No unit can ever enter the tile.
    Impassable,
}

impl MovementCost {
    /// Number of move points required, or `None` when impassable.
    #[must_use]
    pub const fn steps(self) -> Option<u32> {
        match self {
            Self::Steps(steps) => Some(steps),
            Self::Impassable => None,
        }
    }

    /// Reports whether the tile can be entered at all.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Steps(_))
    }
}

/// Catalog entry describing a single terrain kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    /// Terrain kind described by the entry.
    pub kind: TerrainKind,
    /// Cost of entering a tile of this kind.
    pub movement_cost: MovementCost,
    /// Upper bound of the normalized noise value assigned to this kind.
    pub threshold: f64,
    /// Render height every tile of this kind starts from.
    pub base_height: f32,
    /// Maximum random height added on top of the base height.
    pub height_variance: f32,
    /// Render color of the terrain.
    pub color: Color,
}

impl TerrainProfile {
    /// Default catalog entry for the provided terrain kind.
    #[must_use]
    pub const fn default_for(kind: TerrainKind) -> Self {
        match kind {
            TerrainKind::Water => Self {
                kind,
                movement_cost: MovementCost::Impassable,
                threshold: 0.4,
                base_height: -0.1,
                height_variance: 0.0,
                color: Color::from_rgb(0x00, 0x00, 0xff),
            },
            TerrainKind::Grass => Self {
                kind,
                movement_cost: MovementCost::Steps(1),
                threshold: 0.6,
                base_height: 0.1,
                height_variance: 0.1,
                color: Color::from_rgb(0x00, 0xff, 0x00),
            },
            TerrainKind::Forest => Self {
                kind,
                movement_cost: MovementCost::Steps(2),
                threshold: 0.7,
                base_height: 0.3,
                height_variance: 0.4,
                color: Color::from_rgb(0x00, 0x64, 0x00),
            },
            TerrainKind::Mountain => Self {
                kind,
                movement_cost: MovementCost::Impassable,
                threshold: 1.0,
                base_height: 0.5,
                height_variance: 0.3,
                color: Color::from_rgb(0x80, 0x80, 0x80),
            },
        }
    }
}

/// Reasons a terrain catalog definition may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum CatalogError {
    /// No entry was provided for the terrain kind.
    #[error("terrain catalog has no entry for {kind:?}")]
    MissingKind {
        /// Kind lacking an entry.
        kind: TerrainKind,
    },
    /// More than one entry was provided for the terrain kind.
    #[error("terrain catalog lists {kind:?} more than once")]
    DuplicateKind {
        /// Kind listed repeatedly.
        kind: TerrainKind,
    },
    /// The classification threshold is not a number within `[0, 1]`.
    #[error("threshold for {kind:?} must lie within [0, 1]")]
    ThresholdOutOfRange {
        /// Kind carrying the invalid threshold.
        kind: TerrainKind,
    },
    /// A passable terrain was given a zero movement cost.
    #[error("movement cost for {kind:?} must be positive")]
    ZeroMovementCost {
        /// Kind carrying the zero cost.
        kind: TerrainKind,
    },
    /// Base height or height variance is negative or not finite.
    #[error("height parameters for {kind:?} must be finite with a non-negative variance")]
    InvalidHeight {
        /// Kind carrying the invalid height parameters.
        kind: TerrainKind,
    },
}

/// Registry mapping every terrain kind to its profile.
///
/// Classification walks the kinds in ascending threshold order, so the
/// catalog keeps that order precomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainCatalog {
    profiles: [TerrainProfile; 4],
    ascending: [TerrainKind; 4],
}

impl TerrainCatalog {
    /// Builds a catalog from one profile per terrain kind.
    pub fn new(profiles: &[TerrainProfile]) -> Result<Self, CatalogError> {
        let mut slots: [Option<TerrainProfile>; 4] = [None; 4];
        for profile in profiles {
            validate_profile(profile)?;
            let slot = &mut slots[profile.kind.index()];
            if slot.is_some() {
                return Err(CatalogError::DuplicateKind { kind: profile.kind });
            }
            *slot = Some(*profile);
        }

        let mut resolved = TerrainKind::ALL.map(TerrainProfile::default_for);
        for kind in TerrainKind::ALL {
            resolved[kind.index()] = slots[kind.index()].ok_or(CatalogError::MissingKind { kind })?;
        }

        let mut ascending = TerrainKind::ALL;
        ascending.sort_by(|left, right| {
            resolved[left.index()]
                .threshold
                .total_cmp(&resolved[right.index()].threshold)
        });

        Ok(Self {
            profiles: resolved,
            ascending,
        })
    }

    /// Profile registered for the provided terrain kind.
    #[must_use]
    pub fn profile(&self, kind: TerrainKind) -> &TerrainProfile {
        &self.profiles[kind.index()]
    }

    /// Movement cost registered for the provided terrain kind.
    #[must_use]
    pub fn movement_cost(&self, kind: TerrainKind) -> MovementCost {
        self.profile(kind).movement_cost
    }

    /// Profiles in ascending threshold order.
    pub fn profiles(&self) -> impl Iterator<Item = &TerrainProfile> + '_ {
        self.ascending.iter().map(|kind| self.profile(*kind))
    }

    /// Classifies a raw noise sample in `[-1, 1]`.
    #[must_use]
    pub fn classify(&self, raw: f64) -> TerrainKind {
        self.classify_normalized((raw + 1.0) / 2.0)
    }

    /// Classifies a value already normalized to `[0, 1]`.
    ///
    /// Values above every threshold fall back to the highest-threshold kind.
    #[must_use]
    pub fn classify_normalized(&self, value: f64) -> TerrainKind {
        self.ascending
            .iter()
            .copied()
            .find(|kind| self.profile(*kind).threshold >= value)
            .unwrap_or(self.ascending[self.ascending.len() - 1])
    }
}

impl Default for TerrainCatalog {
    fn default() -> Self {
        Self {
            profiles: TerrainKind::ALL.map(TerrainProfile::default_for),
            ascending: TerrainKind::ALL,
        }
    }
}

fn validate_profile(profile: &TerrainProfile) -> Result<(), CatalogError> {
    let kind = profile.kind;
    if !(0.0..=1.0).contains(&profile.threshold) {
        return Err(CatalogError::ThresholdOutOfRange { kind });
    }
    if profile.movement_cost == MovementCost::Steps(0) {
        return Err(CatalogError::ZeroMovementCost { kind });
    }
    if !profile.base_height.is_finite()
        || !profile.height_variance.is_finite()
        || profile.height_variance < 0.0
    {
        return Err(CatalogError::InvalidHeight { kind });
    }
    Ok(())
}
