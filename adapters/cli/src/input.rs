//! Parser for the line-oriented commands typed at the prompt.

use std::time::Duration;

use hex_tactics_core::HexCoord;
use thiserror::Error;

/// Single request typed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Select(HexCoord),
    Move(HexCoord),
    Deselect,
    EndTurn,
    Wait(Duration),
    Map,
    Units,
    Reach,
    Path(HexCoord),
    NewGame(Option<u64>),
    Help,
    Quit,
}

/// Reasons a line could not be understood.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    #[error("unknown command `{0}`; type `help` for a list")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a number")]
    InvalidNumber(String),
    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),
}

pub(crate) const HELP: &str = "\
commands:
  select <q> <r>   select your unit standing on hex (q, r)
  move <q> <r>     move the selected unit to hex (q, r)
  deselect         clear the selection
  end              end your turn
  wait <ms>        let simulated time pass
  map              draw the map (reachable hexes of the selection as *)
  units            list every unit
  reach            list hexes the selected unit can reach
  path <q> <r>     preview the path of the selected unit
  new [seed]       start a new game, optionally with another seed
  help             show this text
  quit             leave the game";

/// Parses one line of input; blank lines yield `None`.
pub(crate) fn parse(line: &str) -> Result<Option<Input>, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let input = match command.to_ascii_lowercase().as_str() {
        "select" | "s" => Input::Select(coordinate("select", &mut words)?),
        "move" | "m" => Input::Move(coordinate("move", &mut words)?),
        "path" | "p" => Input::Path(coordinate("path", &mut words)?),
        "deselect" | "d" => Input::Deselect,
        "end" | "e" => Input::EndTurn,
        "wait" | "w" => {
            let millis = words.next().ok_or(InputError::MissingArgument {
                command: "wait",
                expected: "a duration in milliseconds",
            })?;
            Input::Wait(Duration::from_millis(number(millis)?))
        }
        "map" => Input::Map,
        "units" | "u" => Input::Units,
        "reach" | "r" => Input::Reach,
        "new" => Input::NewGame(words.next().map(number).transpose()?),
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(InputError::UnknownCommand(other.to_owned())),
    };

    match words.next() {
        Some(extra) => Err(InputError::TrailingInput(extra.to_owned())),
        None => Ok(Some(input)),
    }
}

fn coordinate<'a>(
    command: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<HexCoord, InputError> {
    let missing = InputError::MissingArgument {
        command,
        expected: "a column and a row",
    };
    let q = words.next().ok_or_else(|| missing.clone())?;
    let r = words.next().ok_or(missing)?;
    Ok(HexCoord::new(number(q)?, number(r)?))
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, InputError> {
    word.parse()
        .map_err(|_| InputError::InvalidNumber(word.to_owned()))
}
