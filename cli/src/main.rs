use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::Context;
use buscaminas_core::{CellCount, Coord, Difficulty, GameConfig};
use clap::Parser;

mod input;
mod session;
mod view;

use input::Command;
use session::{Flow, Session};

#[derive(Parser, Debug)]
#[command(version, about = "Terminal minesweeper", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Preset board: beginner, intermediate or expert
    #[arg(short, long, conflicts_with_all = ["rows", "cols", "mines"])]
    difficulty: Option<Difficulty>,

    /// Custom number of rows
    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<Coord>,

    /// Custom number of columns
    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,

    /// Custom number of mines
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,

    /// Force a session seed instead of random, replays the same boards across new games
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn game_config(&self) -> buscaminas_core::Result<GameConfig> {
        match (self.rows, self.cols, self.mines) {
            (Some(rows), Some(cols), Some(mines)) => GameConfig::new((rows, cols), mines),
            _ => Ok(self.difficulty.unwrap_or_default().config()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let config = args.game_config().context("Invalid board configuration")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("config: {:?}, session seed: {}", config, seed);

    let mut session = Session::new(config, seed).context("Could not start a game")?;
    let mut stdout = io::stdout().lock();
    view::render(&session.game, 0, &mut stdout)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let now = Instant::now();
        let flow = line
            .parse::<Command>()
            .and_then(|command| session.apply(command, now));
        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::ShowHelp) => writeln!(stdout, "{}", input::HELP)?,
            Ok(Flow::Continue) => {}
            Err(err) => {
                log::warn!("rejected {:?}: {:#}", line, err);
                writeln!(stdout, "error: {:#}", err)?;
            }
        }

        view::render(&session.game, session.elapsed_secs(now), &mut stdout)?;
    }

    log::debug!("App finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buscaminas_core::GameError;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("buscaminas").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_beginner() {
        let args = parse(&[]).unwrap();

        assert_eq!(args.game_config().unwrap(), Difficulty::Beginner.config());
        assert_eq!(args.seed, None);
    }

    #[test]
    fn preset_difficulty() {
        let args = parse(&["--difficulty", "expert", "--seed", "12"]).unwrap();

        assert_eq!(args.game_config().unwrap(), Difficulty::Expert.config());
        assert_eq!(args.seed, Some(12));
        assert_eq!(
            parse(&["-d", "Intermediate"]).unwrap().game_config().unwrap(),
            Difficulty::Intermediate.config()
        );
    }

    #[test]
    fn custom_board() {
        let args = parse(&["--rows", "5", "--cols", "7", "--mines", "3"]).unwrap();

        assert_eq!(args.game_config().unwrap(), GameConfig::new((5, 7), 3).unwrap());
    }

    #[test]
    fn invalid_custom_board_is_rejected() {
        let full = parse(&["--rows", "3", "--cols", "3", "--mines", "9"]).unwrap();
        let empty = parse(&["--rows", "0", "--cols", "3", "--mines", "1"]).unwrap();

        assert_eq!(full.game_config(), Err(GameError::TooManyMines));
        assert_eq!(empty.game_config(), Err(GameError::InvalidSize));
    }

    #[test]
    fn incomplete_or_conflicting_boards_fail_to_parse() {
        assert!(parse(&["--rows", "5"]).is_err());
        assert!(parse(&["--rows", "5", "--cols", "5"]).is_err());
        assert!(parse(&["-d", "expert", "--rows", "5", "--cols", "5", "--mines", "3"]).is_err());
        assert!(parse(&["-d", "impossible"]).is_err());
        assert!(parse(&["--rows", "256", "--cols", "5", "--mines", "3"]).is_err());
    }
}
