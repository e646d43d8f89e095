//! Move-selection strategies and a runner that plays them to completion.
//!
//! A strategy only has to propose a move. The session decides legality, so a
//! strategy that proposes an illegal move costs nothing but a retry.
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Move};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::engine::MatchEngine;
use crate::legality::{legal_moves, preview_move_with};
use crate::session::Game;

/// Anything that can pick a move for a board.
pub trait Player {
    /// Proposes a move, or `None` if the strategy has nothing to offer.
    fn select_move(&mut self, board: &Board) -> Option<Move>;

    fn name(&self) -> &str;
}

/// Picks uniformly among the legal moves.
#[derive(Clone, Debug)]
pub struct RandomBot {
    rng: SmallRng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        RandomBot {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomBot {
    fn select_move(&mut self, board: &Board) -> Option<Move> {
        let moves = legal_moves(board);
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.gen_range(0..moves.len())])
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Picks the legal move reaching furthest down, then furthest right.
/// Later moves win ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicBot;

impl Player for DeterministicBot {
    fn select_move(&mut self, board: &Board) -> Option<Move> {
        let mut best: Option<(usize, usize, Move)> = None;
        for mv in legal_moves(board) {
            let row = mv.from.row.max(mv.to.row);
            let column = mv.from.column.max(mv.to.column);
            let better = match best {
                None => true,
                Some((best_row, best_column, _)) => {
                    row > best_row || (row == best_row && column >= best_column)
                }
            };
            if better {
                best = Some((row, column, mv));
            }
        }
        best.map(|(_, _, mv)| mv)
    }

    fn name(&self) -> &str {
        "deterministic"
    }
}

/// Picks the legal move with the largest immediate score under its engine's
/// scoring rule. Earlier moves win ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyBot {
    engine: MatchEngine,
}

impl GreedyBot {
    /// A bot that scores candidates the way `engine` would.
    pub fn new(engine: MatchEngine) -> Self {
        GreedyBot { engine }
    }
}

impl Player for GreedyBot {
    fn select_move(&mut self, board: &Board) -> Option<Move> {
        let mut best: Option<(u32, Move)> = None;
        for mv in legal_moves(board) {
            let (_, outcome) = preview_move_with(&self.engine, board, mv);
            if best.map_or(true, |(score, _)| outcome.score_delta > score) {
                best = Some((outcome.score_delta, mv));
            }
        }
        best.map(|(_, mv)| mv)
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

/// Result of one bot game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameReport {
    pub score: u32,
    pub moves_played: u32,
    /// Proposals the session rejected; each was replaced by the first legal move.
    pub rejected: u32,
}

/// Plays one game with `player` until it is over.
///
/// A rejected proposal is counted and replaced by the first legal move, so a
/// misbehaving strategy cannot stall the game.
pub fn run_game(player: &mut dyn Player, config: &GameConfig) -> Result<GameReport, EngineError> {
    let mut game = Game::new(config)?;
    let mut report = GameReport::default();

    while !game.is_game_over() {
        let proposal = player.select_move(game.board());
        let accepted = match proposal {
            Some(mv) => game.play(mv)?,
            None => false,
        };
        if !accepted {
            report.rejected += 1;
            warn!(
                "{} proposed {}, which was rejected",
                player.name(),
                proposal.map_or_else(|| "nothing".to_string(), |mv| mv.to_string())
            );
            match game.legal_moves().first() {
                Some(&fallback) => {
                    game.play(fallback)?;
                }
                None => break,
            }
        }
    }

    report.score = game.score();
    report.moves_played = game.moves_played();
    info!(
        "{} finished with {} points in {} moves",
        player.name(),
        report.score,
        report.moves_played
    );
    Ok(report)
}

/// Plays `games` games. With a configured seed, game `i` uses `seed + i`.
pub fn run_games(
    player: &mut dyn Player,
    config: &GameConfig,
    games: usize,
) -> Result<Vec<GameReport>, EngineError> {
    (0..games)
        .map(|i| {
            let game_config = GameConfig {
                seed: config.seed.map(|seed| seed.wrapping_add(i as u64)),
                ..config.clone()
            };
            run_game(player, &game_config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::engine::ScoreRule;
    use crate::legality::{is_legal_move, preview_move};
    use crate::utils::board_from_str_array;

    fn p(row: usize, column: usize) -> Position {
        Position::new(row, column)
    }

    fn config(seed: u64, moves: u32) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            move_limit: Some(moves),
            ..GameConfig::default()
        }
    }

    /// Always proposes the same corner-to-corner swap.
    struct StubbornBot;

    impl Player for StubbornBot {
        fn select_move(&mut self, _board: &Board) -> Option<Move> {
            Some(Move::new(p(0, 0), p(7, 7)))
        }

        fn name(&self) -> &str {
            "stubborn"
        }
    }

    #[test]
    fn test_bots_propose_legal_moves() {
        let board = board_from_str_array(&["RRGR", "BGRY", "YPBG"]).unwrap();
        let mut bots: Vec<Box<dyn Player>> = vec![
            Box::new(RandomBot::new(1)),
            Box::new(DeterministicBot),
            Box::new(GreedyBot::default()),
        ];
        for bot in bots.iter_mut() {
            let mv = bot.select_move(&board).unwrap();
            assert!(is_legal_move(&board, mv), "{} proposed {}", bot.name(), mv);
        }
    }

    #[test]
    fn test_bots_give_up_on_deadlock() {
        let board = board_from_str_array(&["RGB", "GBR", "BRG"]).unwrap();
        assert_eq!(RandomBot::new(0).select_move(&board), None);
        assert_eq!(DeterministicBot.select_move(&board), None);
        assert_eq!(GreedyBot::default().select_move(&board), None);
    }

    #[test]
    fn test_deterministic_bot_prefers_bottom_right() {
        let board = board_from_str_array(&["RRGR", "BGRY", "YPBG"]).unwrap();
        // Candidates reach (0, 3) and (1, 2); the lower row wins.
        assert_eq!(
            DeterministicBot.select_move(&board),
            Some(Move::new(p(1, 2), p(0, 2)))
        );
    }

    #[test]
    fn test_greedy_bot_prefers_longer_run() {
        // Swapping (0,2) right makes RRRG; swapping it down makes RRRR.
        let board = board_from_str_array(&["RRGR", "BGRY", "YPBG"]).unwrap();
        assert_eq!(preview_move(&board, Move::new(p(0, 2), p(0, 3))).1.score_delta, 3);

        let mv = GreedyBot::default().select_move(&board).unwrap();
        let (_, outcome) = preview_move(&board, mv);
        assert_eq!(outcome.score_delta, 4);
        assert_eq!(mv, Move::new(p(0, 2), p(1, 2)));
        assert_eq!(mv.from, p(0, 2));
    }

    #[test]
    fn test_greedy_bot_ranks_by_configured_rule() {
        // (2,2)<->(2,3) makes two crossing runs of three; (3,2)<->(4,2) makes YYYY.
        let board =
            board_from_str_array(&["GBRPY", "BPRYG", "RRGRB", "PGYBP", "YYBYG"]).unwrap();
        let crossing = Move::new(p(2, 2), p(2, 3));
        assert_eq!(GreedyBot::default().select_move(&board), Some(crossing));

        let engine = MatchEngine::new(ScoreRule::LongRunBonus { bonus: 5 });
        let mv = GreedyBot::new(engine).select_move(&board).unwrap();
        assert_ne!(mv, crossing);

        let best = legal_moves(&board)
            .into_iter()
            .map(|candidate| preview_move_with(&engine, &board, candidate).1.score_delta)
            .max()
            .unwrap();
        assert_eq!(preview_move_with(&engine, &board, mv).1.score_delta, best);
        assert!(best > preview_move_with(&engine, &board, crossing).1.score_delta);
    }

    #[test]
    fn test_run_game_respects_budget() {
        let report = run_game(&mut GreedyBot::default(), &config(3, 10)).unwrap();
        assert!(report.moves_played <= 10);
        assert!(report.score >= report.moves_played * 3);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn test_run_game_survives_illegal_proposals() {
        let report = run_game(&mut StubbornBot, &config(8, 5)).unwrap();
        assert!(report.rejected > 0);
        assert_eq!(report.rejected, report.moves_played);
    }

    #[test]
    fn test_run_games_is_reproducible() {
        let a = run_games(&mut DeterministicBot, &config(10, 8), 3).unwrap();
        let b = run_games(&mut DeterministicBot, &config(10, 8), 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }
}
