//! Move legality and enumeration.
//!
//! `is_legal_move` is the authoritative oracle: it plays the move on a copy
//! of the board and reports whether anything matched. `creates_match` answers
//! the same question without resolving anything and is kept in agreement by
//! the tests below.
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{Board, Move, Position};
use crate::engine::{has_run, MatchEngine, MoveOutcome};
use crate::error::EngineError;

/// Seed for the throwaway RNG used when probing moves. Spawned colours never
/// affect whether the probed move itself matched.
const PROBE_SEED: u64 = 0x5eed;

/// Plays `mv` on a copy of `board` with the default scoring rule and returns
/// the copy with the outcome. The caller's board is never touched.
pub fn preview_move(board: &Board, mv: Move) -> (Board, MoveOutcome) {
    preview_move_with(&MatchEngine::default(), board, mv)
}

/// Like [`preview_move`], but scored by `engine`'s rule.
pub fn preview_move_with(engine: &MatchEngine, board: &Board, mv: Move) -> (Board, MoveOutcome) {
    let mut copy = board.clone();
    let mut rng = SmallRng::seed_from_u64(PROBE_SEED);
    let outcome = engine.perform_move(&mut copy, mv, &mut rng, &mut |_| {});
    (copy, outcome)
}

/// True iff playing `mv` on `board` would produce at least one match.
///
/// # Examples
/// ```
/// use candy_engine::board::{Move, Position};
/// use candy_engine::legality::is_legal_move;
/// use candy_engine::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["RRGR", "BGRY", "YPBG"]).unwrap();
/// assert!(is_legal_move(&board, Move::new(Position::new(0, 2), Position::new(1, 2))));
/// assert!(!is_legal_move(&board, Move::new(Position::new(0, 0), Position::new(0, 1))));
/// ```
pub fn is_legal_move(board: &Board, mv: Move) -> bool {
    preview_move(board, mv).1.matched
}

/// Fast pre-check: swaps on a copy and looks for any run, without removing,
/// compacting or spawning anything. Agrees with [`is_legal_move`] on every
/// board and move.
pub fn creates_match(board: &Board, mv: Move) -> bool {
    let swappable =
        board.is_valid(mv.from) && (mv.is_identity() || board.are_adjacent(mv.from, mv.to));
    if !swappable {
        return false;
    }
    let mut copy = board.clone();
    copy.swap(mv.from, mv.to);
    has_run(&copy)
}

/// Every legal move, row-major over positions and then in up/right/down/left
/// neighbour order. A legal swap therefore appears once from each end.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    for position in board.positions() {
        for neighbour in board.adjacent_positions(position) {
            let mv = Move::new(position, neighbour);
            if creates_match(board, mv) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Every swap of two adjacent cells: horizontal pairs row-major, then vertical
/// pairs row-major. Depends only on the board's dimensions.
///
/// An `R×C` board has `R·(C−1) + C·(R−1)` pairs.
pub fn all_swap_pairs(board: &Board) -> Vec<Move> {
    let (rows, columns) = (board.rows(), board.columns());
    let horizontal = (0..rows).flat_map(move |row| {
        (0..columns.saturating_sub(1))
            .map(move |column| Move::new(Position::new(row, column), Position::new(row, column + 1)))
    });
    let vertical = (0..rows.saturating_sub(1)).flat_map(move |row| {
        (0..columns).map(move |column| Move::new(Position::new(row, column), Position::new(row + 1, column)))
    });
    horizontal.chain(vertical).collect()
}

/// The stable action index of `mv` within [`all_swap_pairs`].
///
/// # Errors
/// `UnknownMove` if `mv` is not a swap of two adjacent on-board cells.
pub fn move_index(board: &Board, mv: Move) -> Result<usize, EngineError> {
    all_swap_pairs(board)
        .iter()
        .position(|&candidate| candidate == mv)
        .ok_or(EngineError::UnknownMove(mv))
}

/// The move with action index `index`.
///
/// # Errors
/// `MoveIndexOutOfRange` unless `index < all_swap_pairs(board).len()`.
pub fn move_for_index(board: &Board, index: usize) -> Result<Move, EngineError> {
    let pairs = all_swap_pairs(board);
    pairs
        .get(index)
        .copied()
        .ok_or(EngineError::MoveIndexOutOfRange {
            index,
            len: pairs.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::utils::board_from_str_array;
    use std::collections::HashSet;

    fn p(row: usize, column: usize) -> Position {
        Position::new(row, column)
    }

    fn every_candidate(board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        for from in board.positions() {
            for to in board.positions() {
                moves.push(Move::new(from, to));
            }
            moves.push(Move::new(from, p(board.rows(), from.column)));
        }
        moves
    }

    #[test]
    fn test_pre_check_agrees_with_oracle_exhaustively() {
        let mut rng = SmallRng::seed_from_u64(2024);
        for _ in 0..40 {
            let board = Board::new_random(4, 4, &mut rng).unwrap();
            for mv in every_candidate(&board) {
                assert_eq!(
                    creates_match(&board, mv),
                    is_legal_move(&board, mv),
                    "disagreement on {} for board\n{:?}",
                    mv,
                    board
                );
            }
        }
    }

    #[test]
    fn test_illegal_moves_leave_board_unchanged() {
        let mut rng = SmallRng::seed_from_u64(7);
        let engine = MatchEngine::default();
        for _ in 0..20 {
            let board = Board::new_random(4, 5, &mut rng).unwrap();
            for mv in all_swap_pairs(&board) {
                if is_legal_move(&board, mv) {
                    continue;
                }
                let mut copy = board.clone();
                let outcome = engine.perform_move(&mut copy, mv, &mut rng, &mut |_| {});
                assert!(!outcome.matched);
                assert_eq!(copy, board);
            }
        }
    }

    #[test]
    fn test_is_legal_move_does_not_mutate() {
        let board = board_from_str_array(&["RRGR", "BGRY", "YPBG"]).unwrap();
        let before = board.clone();
        assert!(is_legal_move(&board, Move::new(p(0, 2), p(1, 2))));
        assert_eq!(board, before);
    }

    #[test]
    fn test_scenario_three_by_three_rejects() {
        let board = board_from_str_array(&["RGR", "GGB", "BRB"]).unwrap();
        assert!(!is_legal_move(&board, Move::new(p(1, 0), p(0, 0))));
        let (after, outcome) = preview_move(&board, Move::new(p(1, 0), p(0, 0)));
        assert!(!outcome.matched);
        assert_eq!(after, board);
    }

    #[test]
    fn test_legal_moves_order_and_membership() {
        let board = board_from_str_array(&["RRGR", "BGRY", "YPBG"]).unwrap();
        let moves = legal_moves(&board);
        assert_eq!(
            moves,
            vec![
                Move::new(p(0, 2), p(0, 3)),
                Move::new(p(0, 2), p(1, 2)),
                Move::new(p(0, 3), p(0, 2)),
                Move::new(p(1, 2), p(0, 2)),
            ]
        );
        let starts: Vec<Position> = moves.iter().map(|mv| mv.from).collect();
        assert_eq!(starts, vec![p(0, 2), p(0, 2), p(0, 3), p(1, 2)]);
        assert_eq!(moves[0].to, p(0, 3));
        assert_eq!(moves[1].to, p(1, 2));
    }

    #[test]
    fn test_legal_moves_subset_of_swap_pairs() {
        let mut rng = SmallRng::seed_from_u64(31);
        for _ in 0..20 {
            let board = Board::new_random(5, 5, &mut rng).unwrap();
            let pairs: HashSet<Move> = all_swap_pairs(&board).into_iter().collect();
            for mv in legal_moves(&board) {
                assert!(pairs.contains(&mv));
                assert!(is_legal_move(&board, mv));
            }
        }
    }

    #[test]
    fn test_all_swap_pairs_cardinality_and_order() {
        for (rows, columns) in [(1, 1), (1, 4), (3, 3), (4, 6), (8, 8)] {
            let board = Board::filled(rows, columns, Cell::Red).unwrap();
            let pairs = all_swap_pairs(&board);
            assert_eq!(pairs.len(), rows * (columns - 1) + columns * (rows - 1));
            let unique: HashSet<Move> = pairs.iter().copied().collect();
            assert_eq!(unique.len(), pairs.len());
            assert!(pairs.iter().all(|mv| board.are_adjacent(mv.from, mv.to)));
        }

        let board = Board::filled(2, 2, Cell::Red).unwrap();
        assert_eq!(
            all_swap_pairs(&board),
            vec![
                Move::new(p(0, 0), p(0, 1)),
                Move::new(p(1, 0), p(1, 1)),
                Move::new(p(0, 0), p(1, 0)),
                Move::new(p(0, 1), p(1, 1)),
            ]
        );
    }

    #[test]
    fn test_swap_pairs_independent_of_content() {
        let mut rng = SmallRng::seed_from_u64(5);
        let a = Board::new_random(5, 7, &mut rng).unwrap();
        let b = Board::new_random(5, 7, &mut rng).unwrap();
        assert_eq!(all_swap_pairs(&a), all_swap_pairs(&b));
    }

    #[test]
    fn test_move_index_round_trip() {
        let board = Board::filled(8, 8, Cell::Blue).unwrap();
        assert_eq!(move_index(&board, Move::new(p(0, 1), p(0, 0))), Ok(0));
        assert_eq!(move_index(&board, Move::new(p(0, 0), p(1, 0))), Ok(56));
        assert_eq!(move_for_index(&board, 111), Ok(Move::new(p(6, 7), p(7, 7))));

        for index in 0..all_swap_pairs(&board).len() {
            let mv = move_for_index(&board, index).unwrap();
            assert_eq!(move_index(&board, mv), Ok(index));
        }
    }

    #[test]
    fn test_move_index_errors() {
        let board = Board::filled(3, 3, Cell::Blue).unwrap();
        assert_eq!(
            move_for_index(&board, 12),
            Err(EngineError::MoveIndexOutOfRange { index: 12, len: 12 })
        );
        let diagonal = Move::new(p(0, 0), p(1, 1));
        assert_eq!(move_index(&board, diagonal), Err(EngineError::UnknownMove(diagonal)));
        assert!(move_index(&board, Move::identity(p(0, 0))).is_err());
    }
}
