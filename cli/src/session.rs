use std::time::{Duration, Instant};

use buscaminas_core::{Game, GameConfig, MarkOutcome, RevealOutcome};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::input::Command;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Game plus the wall-clock timer shown next to it. The timer starts with the first reveal and
/// freezes once the game ends.
///
/// Every board's seed is drawn from `seeds`, so one session seed replays the same run of games.
#[derive(Debug)]
pub struct Session {
    pub game: Game,
    seeds: SmallRng,
    started_at: Option<Instant>,
    finished_after: Option<Duration>,
}

impl Session {
    pub fn new(config: GameConfig, session_seed: u64) -> buscaminas_core::Result<Self> {
        let mut seeds = SmallRng::seed_from_u64(session_seed);
        let game = Game::new(config, seeds.random())?;
        Ok(Self::with_seeds(game, seeds))
    }

    fn with_seeds(game: Game, seeds: SmallRng) -> Self {
        log::debug!("board seed: {}", game.seed());
        Self {
            game,
            seeds,
            started_at: None,
            finished_after: None,
        }
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        match (self.started_at, self.finished_after) {
            (_, Some(duration)) => duration.as_secs(),
            (Some(started_at), None) => now.saturating_duration_since(started_at).as_secs(),
            (None, None) => 0,
        }
    }

    fn on_successful_move(&mut self, now: Instant) {
        let started_at = *self.started_at.get_or_insert(now);
        if self.game.is_finished() && self.finished_after.is_none() {
            self.finished_after = Some(now.saturating_duration_since(started_at));
        }
    }

    fn restart(&mut self, config: GameConfig) -> buscaminas_core::Result<()> {
        self.game.restart(config, self.seeds.random())?;
        self.started_at = None;
        self.finished_after = None;
        Ok(())
    }

    /// Applies one command. Rejected moves come back as errors and leave the session untouched.
    pub fn apply(&mut self, command: Command, now: Instant) -> anyhow::Result<Flow> {
        match command {
            Command::Reveal(coords) => {
                let outcome = self.game.reveal(coords)?;
                log::debug!("reveal {:?}: {:?}", coords, outcome);
                if outcome.has_update() {
                    self.on_successful_move(now);
                }
                if outcome == RevealOutcome::NoChange {
                    log::info!("cell {:?} is already revealed or flagged", coords);
                }
            }
            Command::Flag(coords) => {
                let outcome = self.game.toggle_flag(coords)?;
                log::debug!("flag {:?}: {:?}", coords, outcome);
                if outcome == MarkOutcome::NoChange {
                    log::info!("cell {:?} is revealed and cannot be flagged", coords);
                }
            }
            Command::NewGame(difficulty) => {
                let config = difficulty.map_or(self.game.config(), |difficulty| difficulty.config());
                self.restart(config)?;
            }
            Command::Help => return Ok(Flow::ShowHelp),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buscaminas_core::{Difficulty, GameState};

    #[test]
    fn timer_waits_for_first_reveal_and_freezes_at_end() {
        let t0 = Instant::now();
        let game = Game::with_mines((1, 5), &[(0, 2)]).unwrap();
        let mut session = Session::with_seeds(game, SmallRng::seed_from_u64(0));
        assert_eq!(session.elapsed_secs(t0 + Duration::from_secs(30)), 0);

        session.apply(Command::Reveal((0, 0)), t0).unwrap();
        assert_eq!(session.elapsed_secs(t0 + Duration::from_secs(3)), 3);

        session
            .apply(Command::Reveal((0, 4)), t0 + Duration::from_secs(5))
            .unwrap();
        assert_eq!(session.game.state(), GameState::Won);
        assert_eq!(session.elapsed_secs(t0 + Duration::from_secs(60)), 5);
    }

    #[test]
    fn rejected_moves_surface_as_errors() {
        let now = Instant::now();
        let mut session = Session::new(Difficulty::Beginner.config(), 1).unwrap();

        assert!(session.apply(Command::Flag((0, 0)), now).is_err());
        assert!(session.apply(Command::Reveal((9, 9)), now).is_err());
        assert_eq!(session.elapsed_secs(now), 0);
    }

    #[test]
    fn new_game_switches_difficulty_and_resets_timer() {
        let now = Instant::now();
        let mut session = Session::new(Difficulty::Beginner.config(), 1).unwrap();
        session.apply(Command::Reveal((4, 4)), now).unwrap();

        let flow = session
            .apply(Command::NewGame(Some(Difficulty::Expert)), now)
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.game.config(), Difficulty::Expert.config());
        assert_eq!(session.game.state(), GameState::Ready);
        assert_eq!(session.elapsed_secs(now + Duration::from_secs(10)), 0);
        assert_eq!(session.apply(Command::Quit, now).unwrap(), Flow::Quit);
    }

    fn board_after_new_games(session_seed: u64, games: usize) -> Vec<Vec<bool>> {
        let now = Instant::now();
        let mut session = Session::new(Difficulty::Beginner.config(), session_seed).unwrap();
        let mut boards = Vec::new();
        for _ in 0..games {
            session.apply(Command::NewGame(None), now).unwrap();
            session.apply(Command::Reveal((4, 4)), now).unwrap();
            boards.push(session.game.grid().iter().map(|cell| cell.is_mine()).collect());
        }
        boards
    }

    #[test]
    fn seeded_session_replays_new_games() {
        let first = board_after_new_games(42, 3);
        let second = board_after_new_games(42, 3);

        assert_eq!(first, second);
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn new_games_get_fresh_seeds() {
        let now = Instant::now();
        let mut session = Session::new(Difficulty::Beginner.config(), 7).unwrap();
        let mut seeds = vec![session.game.seed()];
        for _ in 0..4 {
            session.apply(Command::NewGame(None), now).unwrap();
            seeds.push(session.game.seed());
        }

        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 5);
    }
}
