//! # Candy Engine Library
//!
//! This library implements the rules of a swap-and-match tile puzzle: two
//! adjacent cells are swapped, runs of three or more same-coloured cells are
//! removed, columns fall, new cells drop in from the top, and chain reactions
//! are resolved until the board is stable.
//!
//! It is used by two binaries:
//! - `human_player`: interactive play in the terminal.
//! - `bot_runner`: plays the bundled strategies over many seeded games and
//!   compares their scores.
//!
//! ## Modules
//! - `board`: the grid (`Board`), its cells (`Cell`), coordinates (`Position`) and swaps (`Move`).
//! - `engine`: run detection, per-round `BoardChange` diffs, scoring and cascade resolution.
//! - `legality`: the legality oracle, legal move enumeration and the stable move index.
//! - `session`: `Game`, which owns a board, a score and a move or time budget.
//! - `bots`: the `Player` trait and a few simple strategies.
//! - `config`: `GameConfig`, loaded from TOML.
//! - `error`: error types.
//! - `utils`: reading and writing boards as text.

pub mod board;
pub mod bots;
pub mod config;
pub mod engine;
pub mod error;
pub mod legality;
pub mod session;
pub mod utils;
