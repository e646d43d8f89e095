//! Game sessions: a board, a score and a budget, mutated only through `play`.
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use crate::board::{Board, Move};
use crate::config::GameConfig;
use crate::engine::{BoardChange, MatchEngine};
use crate::error::EngineError;
use crate::legality;

/// How much play a session has left.
///
/// Plays are accepted only while the budget is not exhausted, so a budget of
/// one move accepts exactly one valid move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Budget {
    /// Valid moves remaining. Rejected moves are free.
    Moves(u32),
    /// Wall-clock limit measured from `started`.
    Time { limit: Duration, started: Instant },
    /// The game only ends when no legal move remains.
    Unlimited,
}

impl Budget {
    /// A time budget starting now.
    pub fn time(limit: Duration) -> Self {
        Budget::Time {
            limit,
            started: Instant::now(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        match *self {
            Budget::Moves(left) => left == 0,
            Budget::Time { .. } => self.time_left() == Some(Duration::ZERO),
            Budget::Unlimited => false,
        }
    }

    pub fn remaining_moves(&self) -> Option<u32> {
        match *self {
            Budget::Moves(left) => Some(left),
            _ => None,
        }
    }

    pub fn time_left(&self) -> Option<Duration> {
        match *self {
            Budget::Time { limit, started } => Some(limit.saturating_sub(started.elapsed())),
            _ => None,
        }
    }

    /// Whole seconds left on a time budget, rounded down.
    pub fn seconds_left(&self) -> Option<u64> {
        self.time_left().map(|left| left.as_secs())
    }

    fn consume_move(&mut self) {
        if let Budget::Moves(left) = self {
            *left = left.saturating_sub(1);
        }
    }
}

/// A single game of swap-and-match.
///
/// The board is match-free whenever control returns to the caller: the
/// initial layout is settled on construction and every `play` resolves its
/// cascades before returning.
///
/// # Examples
/// ```
/// use candy_engine::config::GameConfig;
/// use candy_engine::session::Game;
///
/// let config = GameConfig { seed: Some(1), ..GameConfig::default() };
/// let mut game = Game::new(&config).unwrap();
/// assert_eq!(game.score(), 0);
///
/// if let Some(&mv) = game.legal_moves().first() {
///     assert!(game.play(mv).unwrap());
///     assert!(game.score() > 0);
///     assert_eq!(game.budget().remaining_moves(), Some(99));
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    score: u32,
    moves_played: u32,
    budget: Budget,
    engine: MatchEngine,
    rng: SmallRng,
}

impl Game {
    /// Starts a game on a random board sized and seeded by `config`.
    ///
    /// # Errors
    /// `InvalidDimensions` for a zero-sized board; `CascadeDivergence` if
    /// settling the initial layout does not terminate.
    pub fn new(config: &GameConfig) -> Result<Self, EngineError> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let board = Board::new_random(config.rows, config.columns, &mut rng)?;
        Game::from_parts(board, config, rng)
    }

    /// Starts a game on `board`, settling any matches it already contains.
    ///
    /// Dimensions come from the board; `config` supplies budget, scoring and seed.
    pub fn with_board(board: Board, config: &GameConfig) -> Result<Self, EngineError> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Game::from_parts(board, config, rng)
    }

    fn from_parts(mut board: Board, config: &GameConfig, mut rng: SmallRng) -> Result<Self, EngineError> {
        let engine = MatchEngine::new(config.score_rule);
        // Points from settling the starting layout are not the player's.
        engine.clear_all_matches(&mut board, &mut rng, &mut |_| {})?;
        info!(
            "new {}x{} game, budget {:?}",
            board.rows(),
            board.columns(),
            config.budget()
        );
        Ok(Game {
            board,
            score: 0,
            moves_played: 0,
            budget: config.budget(),
            engine,
            rng,
        })
    }

    /// Returns an immutable reference to the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the accumulated score, cascades included.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of valid moves played so far.
    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Plays `mv` and returns whether it was valid.
    ///
    /// See [`Game::play_with`].
    pub fn play(&mut self, mv: Move) -> Result<bool, EngineError> {
        self.play_with(mv, &mut |_| {})
    }

    /// Plays `mv`, resolves every cascade it triggers, and returns whether it
    /// was valid.
    ///
    /// Returns `Ok(false)` and leaves the game untouched once the game is over.
    /// An invalid move leaves board, score and budget unchanged. `on_change`
    /// receives every intermediate `BoardChange` in order.
    ///
    /// # Errors
    /// `CascadeDivergence` if resolution fails to settle.
    pub fn play_with<F>(&mut self, mv: Move, on_change: &mut F) -> Result<bool, EngineError>
    where
        F: FnMut(&BoardChange),
    {
        if self.is_game_over() {
            return Ok(false);
        }

        let outcome = self
            .engine
            .perform_move(&mut self.board, mv, &mut self.rng, on_change);
        let cascade = self
            .engine
            .clear_all_matches(&mut self.board, &mut self.rng, on_change)?;
        self.score += outcome.score_delta + cascade;

        if outcome.matched {
            self.budget.consume_move();
            self.moves_played += 1;
            debug!(
                "played {}: +{} (+{} cascade), score {}",
                mv, outcome.score_delta, cascade, self.score
            );
        }
        Ok(outcome.matched)
    }

    /// Plays `mv` and returns the validity flag together with every change it produced.
    pub fn play_recorded(&mut self, mv: Move) -> Result<(bool, Vec<BoardChange>), EngineError> {
        let mut changes = Vec::new();
        let valid = self.play_with(mv, &mut |change: &BoardChange| changes.push(change.clone()))?;
        Ok((valid, changes))
    }

    /// True once the budget is spent or the board has no legal move left.
    /// Refills are random, so a board can deadlock before the budget runs out.
    pub fn is_game_over(&self) -> bool {
        self.budget.is_exhausted() || self.legal_moves().is_empty()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legality::legal_moves(&self.board)
    }

    pub fn is_legal_move(&self, mv: Move) -> bool {
        legality::is_legal_move(&self.board, mv)
    }

    /// The game as it would be after `mv`, computed on a copy. The copy shares
    /// this game's random stream, so it predicts the real outcome exactly.
    pub fn game_for_move(&self, mv: Move) -> Result<Game, EngineError> {
        let mut copy = self.clone();
        copy.play(mv)?;
        Ok(copy)
    }
}
