use std::path::PathBuf;

use crate::board::{Move, Position};

/// Errors raised by the board and the match engine.
///
/// Illegal moves are not errors: they are reported as `false` by
/// `perform_move`, `is_legal_move` and `Game::play`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("position {position} is outside the {rows}x{columns} board")]
    OutOfBounds {
        position: Position,
        rows: usize,
        columns: usize,
    },

    #[error("board dimensions must be non-zero (got {rows}x{columns})")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("expected {expected} cells, found {found}")]
    CellCountMismatch { expected: usize, found: usize },

    #[error("cascade did not settle after {iterations} rounds (limit {limit})")]
    CascadeDivergence { iterations: usize, limit: usize },

    #[error("move index {index} out of range (board has {len} swap pairs)")]
    MoveIndexOutOfRange { index: usize, len: usize },

    #[error("move {0} is not a swap of two adjacent cells on this board")]
    UnknownMove(Move),
}

/// Errors produced while reading a board from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("board text has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized character '{ch}' in row {row} col {column}")]
    UnknownCell { ch: char, row: usize, column: usize },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_display() {
        let err = EngineError::OutOfBounds {
            position: Position::new(8, 2),
            rows: 8,
            columns: 8,
        };
        assert_eq!(err.to_string(), "position (8, 2) is outside the 8x8 board");
    }

    #[test]
    fn test_cascade_divergence_display() {
        let err = EngineError::CascadeDivergence {
            iterations: 641,
            limit: 640,
        };
        assert_eq!(
            err.to_string(),
            "cascade did not settle after 641 rounds (limit 640)"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnknownCell {
            ch: 'X',
            row: 0,
            column: 3,
        };
        assert_eq!(err.to_string(), "unrecognized character 'X' in row 0 col 3");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("rows must be at least 3".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: rows must be at least 3"
        );
    }
}
