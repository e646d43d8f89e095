//! The playing field and its value types.
//!
//! This module defines:
//! - `Cell`: the five candy colours a board position can hold.
//! - `Position`: a (row, column) coordinate on the board.
//! - `Move`: an unordered pair of positions to swap.
//! - `Board`: a fixed-size, always-full grid of cells with bounds and adjacency queries.
//!
//! The board knows nothing about matching or scoring; see `engine` for that.
use rand::Rng;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::EngineError;

/// The colour of a candy occupying a board position.
///
/// Cells carry no identity beyond their colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    Green,
    Blue,
    Purple,
    Red,
    Yellow,
}

impl Cell {
    /// Every colour, in a fixed order. Random draws index into this.
    pub const ALL: [Cell; 5] = [Cell::Green, Cell::Blue, Cell::Purple, Cell::Red, Cell::Yellow];

    /// Draws a colour uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Cell {
        Cell::ALL[rng.gen_range(0..Cell::ALL.len())]
    }

    /// Converts the cell to its character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use candy_engine::board::Cell;
    /// assert_eq!(Cell::Red.to_char(), 'R');
    /// assert_eq!(Cell::Purple.to_char(), 'P');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Cell::Green => 'G',
            Cell::Blue => 'B',
            Cell::Purple => 'P',
            Cell::Red => 'R',
            Cell::Yellow => 'Y',
        }
    }

    /// Inverse of [`Cell::to_char`]. Returns `None` for any other character.
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            'G' => Some(Cell::Green),
            'B' => Some(Cell::Blue),
            'P' => Some(Cell::Purple),
            'R' => Some(Cell::Red),
            'Y' => Some(Cell::Yellow),
            _ => None,
        }
    }

    /// Returns the ANSI background colour code for terminal output.
    fn to_ansi_color_code(self) -> &'static str {
        match self {
            Cell::Red => "41",
            Cell::Green => "42",
            Cell::Yellow => "43",
            Cell::Blue => "44",
            Cell::Purple => "45",
        }
    }
}

/// A (row, column) coordinate. Row 0 is the top of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Position { row, column }
    }

    /// The neighbouring coordinate in `direction`, or `None` if it would leave
    /// the `usize` range. Board bounds are the board's business.
    pub fn step(self, direction: Direction) -> Option<Position> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Position::new(row, self.column)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Position::new(self.row, column)),
            Direction::Down => self.row.checked_add(1).map(|row| Position::new(row, self.column)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Position::new(self.row, column)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The four orthogonal directions, in neighbour enumeration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];
}

/// A request to swap the contents of two positions.
///
/// The pair is unordered: `Move::new(a, b) == Move::new(b, a)`. A move whose
/// two ends coincide is the identity move, which swaps nothing but still
/// triggers a match scan.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// The no-op swap used to drive cascade resolution.
    pub const fn identity(at: Position) -> Self {
        Move { from: at, to: at }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    pub fn contains(&self, position: Position) -> bool {
        self.from == position || self.to == position
    }

    /// The two ends ordered row-major, so that symmetric moves compare and hash alike.
    fn ordered(&self) -> (Position, Position) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.from, self.to)
    }
}

/// A `rows × columns` grid of cells stored row-major in a flat vector.
///
/// Every in-bounds position holds exactly one cell; there are no holes.
/// Cloning is a plain vector copy, which is what legality probing relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from row-major cells.
    ///
    /// # Errors
    /// `InvalidDimensions` if either dimension is zero, `CellCountMismatch`
    /// if `cells.len() != rows * columns`.
    pub fn from_cells(rows: usize, columns: usize, cells: Vec<Cell>) -> Result<Self, EngineError> {
        if rows == 0 || columns == 0 {
            return Err(EngineError::InvalidDimensions { rows, columns });
        }
        if cells.len() != rows * columns {
            return Err(EngineError::CellCountMismatch {
                expected: rows * columns,
                found: cells.len(),
            });
        }
        Ok(Board {
            rows,
            columns,
            cells,
        })
    }

    /// Creates a board where every position holds `cell`.
    pub fn filled(rows: usize, columns: usize, cell: Cell) -> Result<Self, EngineError> {
        Board::from_cells(rows, columns, vec![cell; rows * columns])
    }

    /// Creates a board with independently drawn random colours.
    ///
    /// The layout may contain matches; a `Game` clears them before play begins.
    ///
    /// # Examples
    /// ```
    /// use candy_engine::board::Board;
    /// use rand::{rngs::SmallRng, SeedableRng};
    ///
    /// let a = Board::new_random(8, 8, &mut SmallRng::seed_from_u64(7)).unwrap();
    /// let b = Board::new_random(8, 8, &mut SmallRng::seed_from_u64(7)).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn new_random<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let cells = (0..rows * columns).map(|_| Cell::random(rng)).collect();
        Board::from_cells(rows, columns, cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of positions on the board.
    pub fn area(&self) -> usize {
        self.rows * self.columns
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// True iff both coordinates lie within the board.
    pub fn is_valid(&self, position: Position) -> bool {
        position.row < self.rows && position.column < self.columns
    }

    fn index(&self, position: Position) -> Result<usize, EngineError> {
        if self.is_valid(position) {
            Ok(position.row * self.columns + position.column)
        } else {
            Err(EngineError::OutOfBounds {
                position,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Returns the cell at `position`.
    ///
    /// # Errors
    /// `OutOfBounds` if the position is not on the board.
    pub fn try_get(&self, position: Position) -> Result<Cell, EngineError> {
        self.index(position).map(|i| self.cells[i])
    }

    /// Overwrites the cell at `position`.
    ///
    /// # Errors
    /// `OutOfBounds` if the position is not on the board.
    pub fn try_set(&mut self, position: Position, cell: Cell) -> Result<(), EngineError> {
        let i = self.index(position)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Returns the cell at `position`.
    ///
    /// # Panics
    /// Panics if `position` is outside the board. Use [`Board::try_get`] at
    /// untrusted boundaries.
    pub fn get(&self, position: Position) -> Cell {
        match self.try_get(position) {
            Ok(cell) => cell,
            Err(err) => panic!("{err}"),
        }
    }

    /// Overwrites the cell at `position`.
    ///
    /// # Panics
    /// Panics if `position` is outside the board.
    pub fn set(&mut self, position: Position, cell: Cell) {
        if let Err(err) = self.try_set(position, cell) {
            panic!("{err}");
        }
    }

    /// Exchanges the contents of two positions. They need not be adjacent.
    ///
    /// # Panics
    /// Panics if either position is outside the board.
    pub fn swap(&mut self, a: Position, b: Position) {
        let (i, j) = match (self.index(a), self.index(b)) {
            (Ok(i), Ok(j)) => (i, j),
            (Err(err), _) | (_, Err(err)) => panic!("{err}"),
        };
        self.cells.swap(i, j);
    }

    /// The in-bounds neighbours of `position`, in up/right/down/left order.
    ///
    /// The order is part of the contract: legal move enumeration follows it.
    pub fn adjacent_positions(&self, position: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| position.step(direction))
            .filter(|&neighbour| self.is_valid(neighbour))
            .collect()
    }

    /// True iff `b` is one of `a`'s in-bounds neighbours. An off-board `a` has none.
    pub fn are_adjacent(&self, a: Position, b: Position) -> bool {
        self.is_valid(a) && self.adjacent_positions(a).contains(&b)
    }

    /// Every position on the board in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| Position::new(row, column)))
    }

    /// Renders the board with row/column headers and ANSI colours, optionally
    /// marking one position.
    pub fn to_string_with_highlight(&self, highlight: Option<Position>) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for column in 0..self.columns {
            output.push_str(&format!("{:<2}", column));
        }
        output.push('\n');

        for row in 0..self.rows {
            output.push_str(&format!("{:<3}", row));
            for column in 0..self.columns {
                let position = Position::new(row, column);
                let cell = self.get(position);
                let content = if highlight == Some(position) { ".." } else { "  " };
                output.push_str(&format!("\x1b[1;{}m{}\x1b[m", cell.to_ansi_color_code(), content));
            }
            if row + 1 < self.rows {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}
