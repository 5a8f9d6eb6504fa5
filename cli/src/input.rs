use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use buscaminas_core::{Coord, Coord2, Difficulty};

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    /// Start over, optionally switching to another preset.
    NewGame(Option<Difficulty>),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  r ROW COL          reveal a cell
  f ROW COL          flag or unflag a hidden cell
  n [DIFFICULTY]     new game (beginner, intermediate, expert)
  h                  this help
  q                  quit";

fn parse_coords<'a>(mut words: impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let mut next_axis = |name: &str| -> anyhow::Result<Coord> {
        let word = words.next().ok_or_else(|| anyhow!("missing {}", name))?;
        word.parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, word))
    };
    let row = next_axis("row")?;
    let col = next_axis("column")?;
    if words.next().is_some() {
        bail!("expected only a row and a column");
    }
    Ok((row, col))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command, try h for help");
        };

        Ok(match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(words)?),
            "f" | "flag" => Self::Flag(parse_coords(words)?),
            "n" | "new" => Self::NewGame(words.next().map(str::parse).transpose()?),
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {:?}, try h for help", other),
        })
    }
}
