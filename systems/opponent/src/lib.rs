#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted opponent that passes its turn after a fixed delay.
//!
//! The system never acts on units. When a scripted player's turn starts it
//! schedules a deferred pass stamped with the session generation, player and
//! round; simulated time from tick events counts the delay down. The world
//! discards a pass whose stamp no longer matches, so a pass scheduled before
//! a new game cannot touch the new session.

use std::time::Duration;

use hex_tactics_core::{Command, Controller, Event, PlayerId, SessionGeneration};

/// Configuration parameters required to construct the opponent system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pass_delay: Duration,
}

impl Config {
    /// Creates a configuration that passes after the provided delay.
    #[must_use]
    pub const fn new(pass_delay: Duration) -> Self {
        Self { pass_delay }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingPass {
    generation: SessionGeneration,
    player: PlayerId,
    round: u32,
    remaining: Duration,
}

/// Pure system emitting deferred turn passes for scripted players.
#[derive(Debug)]
pub struct ScriptedOpponent {
    pass_delay: Duration,
    pending: Option<PendingPass>,
}

impl ScriptedOpponent {
    /// Creates a new opponent system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            pass_delay: config.pass_delay,
            pending: None,
        }
    }

    /// Reports whether a pass is scheduled and not yet emitted.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes world events and emits the turn pass once its delay elapsed.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameStarted { .. } => self.pending = None,
                Event::TurnStarted {
                    player,
                    controller,
                    round,
                    generation,
                } => {
                    self.pending = (*controller == Controller::Scripted).then(|| PendingPass {
                        generation: *generation,
                        player: *player,
                        round: *round,
                        remaining: self.pass_delay,
                    });
                    if self.pending.is_some() {
                        tracing::debug!(
                            player = player.get(),
                            round,
                            delay_ms = whole_millis(self.pass_delay),
                            "scheduled turn pass"
                        );
                    }
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        pending.remaining = pending.remaining.saturating_sub(dt);
        if !pending.remaining.is_zero() {
            return;
        }

        out.push(Command::PassTurn {
            generation: pending.generation,
            player: pending.player,
            round: pending.round,
        });
        self.pending = None;
    }
}

fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
