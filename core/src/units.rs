//! Unit catalog and the identifiers used to address units and players.

use serde::{Deserialize, Serialize};

/// Types of units that can be fielded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Long-ranged, quick infantry.
    Archer,
    /// Slow siege engine with the longest reach.
    Catapult,
    /// Melee raider.
    Barbarian,
    /// Slow, heavily armoured brute.
    Troll,
}

impl UnitKind {
    /// Every unit kind in declaration order.
    pub const ALL: [UnitKind; 4] = [Self::Archer, Self::Catapult, Self::Barbarian, Self::Troll];

    /// Static statistics shared by every unit of this kind.
    #[must_use]
    pub const fn stats(self) -> UnitStats {
        match self {
            Self::Archer => UnitStats::new(15, 3, 4, 2),
            Self::Catapult => UnitStats::new(10, 1, 8, 3),
            Self::Barbarian => UnitStats::new(20, 2, 5, 1),
            Self::Troll => UnitStats::new(30, 1, 6, 1),
        }
    }

    /// Human readable name of the unit kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Archer => "Archer",
            Self::Catapult => "Catapult",
            Self::Barbarian => "Barbarian",
            Self::Troll => "Troll",
        }
    }

    /// Character used by text adapters to draw the unit.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Archer => 'A',
            Self::Catapult => 'C',
            Self::Barbarian => 'B',
            Self::Troll => 'T',
        }
    }
}

/// Statistics attached to a [`UnitKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitStats {
    max_hp: u32,
    move_allowance: u32,
    attack: u32,
    attack_range: u32,
}

impl UnitStats {
    const fn new(max_hp: u32, move_allowance: u32, attack: u32, attack_range: u32) -> Self {
        Self {
            max_hp,
            move_allowance,
            attack,
            attack_range,
        }
    }

    /// Hit points a freshly spawned unit starts with.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Move points restored at the start of the owner's turn.
    #[must_use]
    pub const fn move_allowance(&self) -> u32 {
        self.move_allowance
    }

    /// Damage dealt by a single attack.
    #[must_use]
    pub const fn attack(&self) -> u32 {
        self.attack
    }

    /// Maximum hex distance at which the unit can attack.
    #[must_use]
    pub const fn attack_range(&self) -> u32 {
        self.attack_range
    }
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Turn-order index of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided turn index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the player in turn order.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

/// Who issues commands on behalf of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Commands arrive from the input adapter.
    Human,
    /// The scripted opponent passes its turn after a fixed delay.
    Scripted,
}
