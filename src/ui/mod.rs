//! Terminal UI for playing against the MCTS opponent, with a live view of
//! the last search's per-column statistics.

mod app;
mod game_view;

pub use app::App;
