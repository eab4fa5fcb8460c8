//! # MCTS Connect Four
//!
//! A Connect Four game against a Monte Carlo Tree Search opponent. The search
//! uses UCT selection with uniformly random playouts and reports per-column
//! statistics alongside its chosen move. Play happens in a terminal UI built
//! with Ratatui; the `analyze` binary runs a single search on a board file.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, pieces, turn rule, game state
//! - [`mcts`]: Arena search tree, UCT search, search statistics
//! - [`ui`]: Terminal UI: game view with the AI's search statistics
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod mcts;
pub mod ui;
