use crate::board::{Board, Cell, Move, Position};
use crate::error::ParseError;

/// Parses an array of string slices into a `Board`.
///
/// Each string is one row, top row first; every row must have the same
/// length. The board's dimensions are taken from the input.
///
/// Valid characters are the cell codes: 'G', 'B', 'P', 'R', 'Y'.
///
/// # Errors
/// * `ParseError::Empty` if there are no rows or the first row is empty.
/// * `ParseError::RaggedRow` if a row's length differs from the first row's.
/// * `ParseError::UnknownCell` for any other character.
///
/// # Examples
/// ```
/// use candy_engine::board::{Cell, Position};
/// use candy_engine::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["RGY", "BPR"]).unwrap();
/// assert_eq!(board.rows(), 2);
/// assert_eq!(board.columns(), 3);
/// assert_eq!(board.get(Position::new(1, 1)), Cell::Purple);
///
/// assert!(board_from_str_array(&["RXB"]).is_err());
/// assert!(board_from_str_array(&["RG", "B"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, ParseError> {
    let columns = s.first().map_or(0, |row| row.chars().count());
    if columns == 0 {
        return Err(ParseError::Empty);
    }

    let mut cells = Vec::with_capacity(s.len() * columns);
    for (row, row_str) in s.iter().enumerate() {
        let found = row_str.chars().count();
        if found != columns {
            return Err(ParseError::RaggedRow {
                row,
                expected: columns,
                found,
            });
        }
        for (column, ch) in row_str.chars().enumerate() {
            let cell = Cell::from_char(ch).ok_or(ParseError::UnknownCell { ch, row, column })?;
            cells.push(cell);
        }
    }

    // Dimensions are non-zero and the count matches by construction.
    Board::from_cells(s.len(), columns, cells).map_err(|_| ParseError::Empty)
}

/// Parses whitespace-trimmed lines of text, skipping blank lines.
pub fn board_from_text(text: &str) -> Result<Board, ParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    board_from_str_array(&lines)
}

/// The inverse of [`board_from_str_array`]: one string of cell codes per row.
pub fn board_to_lines(board: &Board) -> Vec<String> {
    board
        .cells()
        .chunks(board.columns())
        .map(|row| row.iter().map(|cell| cell.to_char()).collect())
        .collect()
}

/// Parses "row col row col" into a move. Returns `None` unless there are
/// exactly four non-negative integers.
pub fn parse_move(input: &str) -> Option<Move> {
    let numbers: Vec<usize> = input
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers[..] {
        [r1, c1, r2, c2] => Some(Move::new(Position::new(r1, c1), Position::new(r2, c2))),
        _ => None,
    }
}
