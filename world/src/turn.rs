//! Turn rotation and selection state machine.

use hex_tactics_core::{PlayerId, Selection, UnitId};

/// Whose turn it is and which unit, if any, is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TurnState {
    active: PlayerId,
    player_count: u32,
    round: u32,
    selection: Selection,
}

impl TurnState {
    /// Initial state: player zero acts in round one with nothing selected.
    pub(crate) fn new(player_count: u32) -> Self {
        Self {
            active: PlayerId::new(0),
            player_count: player_count.max(1),
            round: 1,
            selection: Selection::AwaitingSelection,
        }
    }

    pub(crate) const fn active(&self) -> PlayerId {
        self.active
    }

    pub(crate) const fn round(&self) -> u32 {
        self.round
    }

    pub(crate) const fn selection(&self) -> Selection {
        self.selection
    }

    pub(crate) const fn selected(&self) -> Option<UnitId> {
        match self.selection {
            Selection::UnitSelected(unit) => Some(unit),
            Selection::AwaitingSelection => None,
        }
    }

    /// Selects the unit, returning the unit it replaced.
    pub(crate) fn select(&mut self, unit: UnitId) -> Option<UnitId> {
        let previous = self.selected();
        self.selection = Selection::UnitSelected(unit);
        previous
    }

    /// Returns to `AwaitingSelection`, yielding the previously selected unit.
    pub(crate) fn clear(&mut self) -> Option<UnitId> {
        let previous = self.selected();
        self.selection = Selection::AwaitingSelection;
        previous
    }

    /// Hands the turn to the next player, starting a new round on wrap-around.
    pub(crate) fn advance(&mut self) -> PlayerId {
        let _ = self.clear();
        let next = (self.active.get() + 1) % self.player_count;
        if next == 0 {
            self.round = self.round.saturating_add(1);
        }
        self.active = PlayerId::new(next);
        self.active
    }
}
