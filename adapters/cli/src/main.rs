#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Hex Tactics at a text prompt.

mod input;
mod render;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use hex_tactics_core::{Command, Controller, Event, GameConfig};
use hex_tactics_system_opponent::{Config as OpponentConfig, ScriptedOpponent};
use hex_tactics_world::{self as world, query, World};
use tracing_subscriber::EnvFilter;

use input::{Input, HELP};

const DEFAULT_LOG_FILTER: &str = "hex_tactics=info";

/// Turn-based tactics on a procedurally generated hex map.
#[derive(Debug, Parser)]
#[command(name = "hex-tactics", version)]
struct Args {
    /// TOML file with game configuration; missing keys use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for terrain generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of hex columns.
    #[arg(long)]
    columns: Option<u32>,

    /// Number of hex rows.
    #[arg(long)]
    rows: Option<u32>,

    /// Simulated milliseconds advanced per tick while the opponent plays.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
}

/// Entry point for the Hex Tactics command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut session = Session::new(config, Duration::from_millis(args.tick_ms.max(1)))?;

    println!("{}", query::welcome_banner(&session.world));
    println!("{}", render::map(&session.world));
    println!("type `help` for commands");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush prompt")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;

        match input::parse(&line) {
            Ok(None) => {}
            Ok(Some(Input::Quit)) => break,
            Ok(Some(request)) => session.handle(request),
            Err(error) => println!("{error}"),
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    Ok(config)
}

/// World, opponent and the glue that pumps commands between them.
struct Session {
    world: World,
    opponent: ScriptedOpponent,
    tick: Duration,
}

impl Session {
    fn new(config: GameConfig, tick: Duration) -> Result<Self> {
        let world = World::new(config).context("invalid game configuration")?;
        Ok(Self {
            opponent: opponent_for(&world),
            world,
            tick,
        })
    }

    fn handle(&mut self, request: Input) {
        match request {
            Input::Select(cell) => self.submit(Command::Select { cell }),
            Input::Move(destination) => self.submit(Command::MoveSelected { destination }),
            Input::Deselect => self.submit(Command::Deselect),
            Input::EndTurn => self.submit(Command::EndTurn),
            Input::Wait(duration) => self.submit(Command::Tick { dt: duration }),
            Input::Map => println!("{}", render::map(&self.world)),
            Input::Units => print!("{}", render::units(&self.world)),
            Input::Reach => match query::reachable_for_selection(&self.world) {
                Some(field) => print!("{}", render::reachable(&field)),
                None => println!("no unit is selected"),
            },
            Input::Path(destination) => {
                let path = query::preview_path(&self.world, destination);
                println!("{}", render::path(&path));
            }
            Input::NewGame(seed) => {
                let mut config = query::config(&self.world).clone();
                if let Some(seed) = seed {
                    config.seed = seed;
                }
                self.submit(Command::NewGame { config });
                println!("{}", render::map(&self.world));
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => {}
        }
        self.play_scripted_turns();
    }

    /// Applies the command and every command the opponent answers with.
    fn submit(&mut self, command: Command) {
        let mut pending = vec![command];
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.report(&events);
            if events
                .iter()
                .any(|event| matches!(event, Event::GameStarted { .. }))
            {
                self.opponent = opponent_for(&self.world);
            }
            self.opponent.handle(&events, &mut pending);
        }
    }

    /// Lets simulated time pass until a human player acts again.
    fn play_scripted_turns(&mut self) {
        while query::turn(&self.world).controller == Controller::Scripted {
            if !self.opponent.is_waiting() {
                tracing::warn!("scripted player has no pending pass");
                break;
            }
            thread::sleep(self.tick);
            self.submit(Command::Tick { dt: self.tick });
        }
    }

    fn report(&self, events: &[Event]) {
        for event in events {
            if let Some(line) = render::event(&self.world, event) {
                println!("{line}");
            }
        }
    }
}

/// Opponent pacing taken from the running session's configuration.
fn opponent_for(world: &World) -> ScriptedOpponent {
    ScriptedOpponent::new(OpponentConfig::new(query::config(world).opponent_delay()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_adopts_the_new_opponent_delay() {
        let mut session = Session::new(GameConfig::default(), Duration::from_millis(1))
            .expect("default configuration is valid");

        let config = GameConfig {
            opponent_delay_ms: 10,
            ..GameConfig::default()
        };
        session.submit(Command::NewGame { config });
        session.submit(Command::EndTurn);
        assert_eq!(query::turn(&session.world).controller, Controller::Scripted);
        assert!(session.opponent.is_waiting());

        session.submit(Command::Tick {
            dt: Duration::from_millis(10),
        });
        assert_eq!(query::turn(&session.world).controller, Controller::Human);
        assert!(!session.opponent.is_waiting());
    }
}
