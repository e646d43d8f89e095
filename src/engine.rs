//! Match resolution for swap-and-match boards.
//!
//! This module defines:
//! - `Run`: a maximal line of three or more same-coloured cells.
//! - `BoardChange`: a per-round diff telling, for every position, where its
//!   content came from, plus the cells a match removed.
//! - `ScoreRule`: how many points a run is worth.
//! - `MatchEngine`: applies a swap, resolves every run in one staged pass,
//!   compacts columns, spawns replacements, and repeats until the board is stable.
//!
//! Observers receive `BoardChange`s through an `FnMut(&BoardChange)` in the
//! order they happen: the swap, then the resolved round, then (for a
//! rejected move) the swap back.
use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

use crate::board::{Board, Cell, Move, Position};
use crate::error::EngineError;

/// Minimum number of aligned cells that counts as a match.
pub const MIN_RUN_LENGTH: usize = 3;

/// `clear_all_matches` gives up after this many rounds per board position.
pub const CASCADE_ROUNDS_PER_CELL: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A maximal line of at least [`MIN_RUN_LENGTH`] equal cells in one row or column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Run {
    pub orientation: Orientation,
    /// Leftmost cell of a horizontal run, topmost cell of a vertical one.
    pub start: Position,
    pub length: usize,
    pub cell: Cell,
}

impl Run {
    /// The positions covered by the run, from `start` onwards.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let Run {
            orientation,
            start,
            length,
            ..
        } = *self;
        (0..length).map(move |offset| match orientation {
            Orientation::Horizontal => Position::new(start.row, start.column + offset),
            Orientation::Vertical => Position::new(start.row + offset, start.column),
        })
    }
}

/// Walks every row (or column) and hands each maximal run to `visit`.
///
/// A run that reaches the board edge is closed by the `i == len` step, so it
/// is reported exactly once.
fn scan_runs<F>(board: &Board, orientation: Orientation, mut visit: F) -> ControlFlow<()>
where
    F: FnMut(Run) -> ControlFlow<()>,
{
    let (lines, len) = match orientation {
        Orientation::Horizontal => (board.rows(), board.columns()),
        Orientation::Vertical => (board.columns(), board.rows()),
    };
    let at = |line: usize, i: usize| match orientation {
        Orientation::Horizontal => Position::new(line, i),
        Orientation::Vertical => Position::new(i, line),
    };

    for line in 0..lines {
        let mut start = 0;
        for i in 1..=len {
            if i < len && board.get(at(line, i)) == board.get(at(line, start)) {
                continue;
            }
            let length = i - start;
            if length >= MIN_RUN_LENGTH {
                visit(Run {
                    orientation,
                    start: at(line, start),
                    length,
                    cell: board.get(at(line, start)),
                })?;
            }
            start = i;
        }
    }
    ControlFlow::Continue(())
}

/// Every run on the board: all horizontal runs row by row, then all vertical
/// runs column by column.
pub fn find_runs(board: &Board) -> Vec<Run> {
    let mut runs = Vec::new();
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let _ = scan_runs(board, orientation, |run| {
            runs.push(run);
            ControlFlow::Continue(())
        });
    }
    runs
}

/// True iff the board holds at least one run. Stops at the first one found.
pub fn has_run(board: &Board) -> bool {
    [Orientation::Horizontal, Orientation::Vertical]
        .into_iter()
        .any(|orientation| scan_runs(board, orientation, |_| ControlFlow::Break(())).is_break())
}

/// Where a position's content came from during one change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The content was at this on-board position before the change.
    Board(Position),
    /// The content is new and fell in from above the top edge. `depth` 1 is
    /// the row just above the board, 2 the one above that, and so on.
    Spawned { column: usize, depth: usize },
}

impl Origin {
    /// The source row, negative for spawned cells.
    pub fn row(&self) -> isize {
        match *self {
            Origin::Board(position) => position.row as isize,
            Origin::Spawned { depth, .. } => -(depth as isize),
        }
    }

    pub fn column(&self) -> usize {
        match *self {
            Origin::Board(position) => position.column,
            Origin::Spawned { column, .. } => column,
        }
    }
}

/// A snapshot diff of one step of move resolution.
///
/// Every board position maps to the origin of its new content and the new
/// cell; `removed_cells` lists what matches took away. A run crossing another
/// run lists the shared cell once per run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardChange {
    rows: usize,
    columns: usize,
    entries: Vec<(Origin, Cell)>,
    removed: Vec<(Position, Cell)>,
}

impl BoardChange {
    /// Every position stays where it is.
    pub fn identity(board: &Board) -> Self {
        let entries = board
            .positions()
            .zip(board.cells().iter().copied())
            .map(|(position, cell)| (Origin::Board(position), cell))
            .collect();
        BoardChange {
            rows: board.rows(),
            columns: board.columns(),
            entries,
            removed: Vec::new(),
        }
    }

    /// The two ends of `mv` trade places on `board`.
    pub fn swap(board: &Board, mv: Move) -> Self {
        let mut change = BoardChange::identity(board);
        let from = change.index(mv.from);
        let to = change.index(mv.to);
        change.entries[from] = (Origin::Board(mv.to), board.get(mv.to));
        change.entries[to] = (Origin::Board(mv.from), board.get(mv.from));
        change
    }

    fn index(&self, position: Position) -> usize {
        assert!(
            position.row < self.rows && position.column < self.columns,
            "position {position} is outside the {}x{} change",
            self.rows,
            self.columns
        );
        position.row * self.columns + position.column
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Where the content now at `position` came from.
    ///
    /// # Panics
    /// Panics if `position` is outside the board the change was made for.
    pub fn origin(&self, position: Position) -> Origin {
        self.entries[self.index(position)].0
    }

    /// The cell at `position` once the change is applied.
    ///
    /// # Panics
    /// Panics if `position` is outside the board the change was made for.
    pub fn cell(&self, position: Position) -> Cell {
        self.entries[self.index(position)].1
    }

    /// Cells removed by matches in this change, run by run.
    pub fn removed_cells(&self) -> &[(Position, Cell)] {
        &self.removed
    }

    /// Every position with its origin and new cell, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Origin, Cell)> + '_ {
        self.entries.iter().enumerate().map(move |(i, &(origin, cell))| {
            (Position::new(i / self.columns, i % self.columns), origin, cell)
        })
    }

    /// Positions whose content came from somewhere else.
    pub fn moved(&self) -> impl Iterator<Item = (Position, Origin, Cell)> + '_ {
        self.iter()
            .filter(|(position, origin, _)| *origin != Origin::Board(*position))
    }

    /// True if nothing moved and nothing was removed.
    pub fn is_identity(&self) -> bool {
        self.removed.is_empty() && self.moved().next().is_none()
    }

    fn apply_to(&self, board: &mut Board) {
        for (position, _, cell) in self.iter() {
            board.set(position, cell);
        }
    }
}

/// Points awarded for a single run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreRule {
    /// One point per matched cell.
    #[default]
    Linear,
    /// One point per cell, plus `bonus` for runs of four or more.
    LongRunBonus { bonus: u32 },
}

impl ScoreRule {
    pub fn score_for_run(&self, length: usize) -> u32 {
        let base = length as u32;
        match *self {
            ScoreRule::Linear => base,
            ScoreRule::LongRunBonus { bonus } if length > MIN_RUN_LENGTH => base + bonus,
            ScoreRule::LongRunBonus { .. } => base,
        }
    }
}

/// What `perform_move` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// False when the move was rejected and the board left as it was.
    pub matched: bool,
    pub score_delta: u32,
}

impl MoveOutcome {
    pub const REJECTED: MoveOutcome = MoveOutcome {
        matched: false,
        score_delta: 0,
    };
}

/// Applies moves to boards and resolves the resulting matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchEngine {
    score_rule: ScoreRule,
}

impl MatchEngine {
    pub fn new(score_rule: ScoreRule) -> Self {
        MatchEngine { score_rule }
    }

    pub fn score_rule(&self) -> ScoreRule {
        self.score_rule
    }

    /// Swaps the two cells of `mv` and resolves one round of matches.
    ///
    /// The move is rejected without touching the board when its ends are
    /// neither equal nor adjacent. Otherwise the swap is applied, every run is
    /// removed in a single staged pass, columns are compacted and refilled
    /// from `rng`, and the result is written back. If no run scored, the swap
    /// is undone and the board is left exactly as it was.
    ///
    /// `on_change` sees the swap, then the resolved round, then the swap back
    /// if the move was rejected.
    ///
    /// # Examples
    /// ```
    /// use candy_engine::board::{Move, Position};
    /// use candy_engine::engine::MatchEngine;
    /// use candy_engine::utils::board_from_str_array;
    /// use rand::{rngs::SmallRng, SeedableRng};
    ///
    /// let mut board = board_from_str_array(&["RRGR", "BGRY", "YPBG"]).unwrap();
    /// let mut rng = SmallRng::seed_from_u64(0);
    /// let mv = Move::new(Position::new(0, 2), Position::new(1, 2));
    /// let outcome = MatchEngine::default().perform_move(&mut board, mv, &mut rng, &mut |_| {});
    /// assert!(outcome.matched);
    /// assert_eq!(outcome.score_delta, 4);
    /// ```
    pub fn perform_move<R, F>(
        &self,
        board: &mut Board,
        mv: Move,
        rng: &mut R,
        on_change: &mut F,
    ) -> MoveOutcome
    where
        R: Rng + ?Sized,
        F: FnMut(&BoardChange),
    {
        let swappable = board.is_valid(mv.from)
            && (mv.is_identity() || board.are_adjacent(mv.from, mv.to));
        if !swappable {
            return MoveOutcome::REJECTED;
        }

        on_change(&BoardChange::swap(board, mv));
        board.swap(mv.from, mv.to);

        let (change, score_delta) = self.resolve_round(board, rng);
        change.apply_to(board);
        on_change(&change);

        if score_delta == 0 {
            on_change(&BoardChange::swap(board, mv));
            board.swap(mv.from, mv.to);
            return MoveOutcome::REJECTED;
        }

        debug!(
            "move {} scored {} ({} cells removed)",
            mv,
            score_delta,
            change.removed_cells().len()
        );
        MoveOutcome {
            matched: true,
            score_delta,
        }
    }

    /// Computes one round of removal, compaction and refill without writing
    /// to the board.
    fn resolve_round<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> (BoardChange, u32) {
        let mut change = BoardChange::identity(board);
        let runs = find_runs(board);
        if runs.is_empty() {
            return (change, 0);
        }

        let mut score = 0;
        let mut cleared = vec![false; board.area()];
        for run in &runs {
            score += self.score_rule.score_for_run(run.length);
            for position in run.positions() {
                change.removed.push((position, run.cell));
                cleared[position.row * board.columns() + position.column] = true;
            }
        }

        for column in 0..board.columns() {
            let survivors: Vec<Position> = (0..board.rows())
                .map(|row| Position::new(row, column))
                .filter(|p| !cleared[p.row * board.columns() + p.column])
                .collect();
            let spawned = board.rows() - survivors.len();
            if spawned == 0 {
                continue;
            }

            for row in 0..spawned {
                let cell = Cell::random(rng);
                let depth = spawned - row;
                trace!("spawned {:?} at ({}, {}) from depth {}", cell, row, column, depth);
                let i = change.index(Position::new(row, column));
                change.entries[i] = (Origin::Spawned { column, depth }, cell);
            }
            for (offset, source) in survivors.into_iter().enumerate() {
                let i = change.index(Position::new(spawned + offset, column));
                change.entries[i] = (Origin::Board(source), board.get(source));
            }
        }

        (change, score)
    }

    /// Resolves chain reactions until the board is stable and returns the
    /// points they earned.
    ///
    /// Each round is an identity move. Rounds stop when one scores nothing.
    ///
    /// # Errors
    /// `CascadeDivergence` if the board has not settled after
    /// `CASCADE_ROUNDS_PER_CELL * board.area()` scoring rounds.
    pub fn clear_all_matches<R, F>(
        &self,
        board: &mut Board,
        rng: &mut R,
        on_change: &mut F,
    ) -> Result<u32, EngineError>
    where
        R: Rng + ?Sized,
        F: FnMut(&BoardChange),
    {
        let limit = CASCADE_ROUNDS_PER_CELL * board.area();
        let settle = Move::identity(Position::new(0, 0));
        let mut total = 0;
        let mut rounds = 0;

        loop {
            let outcome = self.perform_move(board, settle, rng, on_change);
            if !outcome.matched {
                if rounds > 0 {
                    debug!("cascade settled after {} rounds, +{}", rounds, total);
                }
                return Ok(total);
            }
            total += outcome.score_delta;
            rounds += 1;
            if rounds > limit {
                return Err(EngineError::CascadeDivergence {
                    iterations: rounds,
                    limit,
                });
            }
        }
    }
}
