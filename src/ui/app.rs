use crate::config::{AppConfig, FirstTurn};
use crate::game::{GameOutcome, GameState, MoveError, Piece, COLS};
use crate::mcts::{search_with_rng, SearchStatistics};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::Backend, Terminal};
use std::io;
use tracing::{error, info};

pub struct App {
    pub(super) game_state: GameState,
    pub(super) selected_column: usize,
    pub(super) should_quit: bool,
    pub(super) message: Option<String>,
    /// Statistics of the last AI search, shown above the board
    pub(super) statistics: Option<SearchStatistics>,
    pub(super) last_ai_column: Option<usize>,
    pub(super) iterations: u32,
    /// Set when the AI could not move; cleared on restart
    ai_failed: bool,
    first_turn: FirstTurn,
    rng: StdRng,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let mut rng = match config.game.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let first = config.game.first_turn.resolve(&mut rng);

        App {
            game_state: GameState::new(first),
            selected_column: COLS / 2, // Start in middle
            should_quit: false,
            message: Some(opening_message(first)),
            statistics: None,
            last_ai_column: None,
            iterations: config.ai.iterations,
            ai_failed: false,
            first_turn: config.game.first_turn,
            rng,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // The "thinking" frame is on screen before the search blocks.
            if self.ai_to_move() {
                self.play_ai_turn();
                continue;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn ai_to_move(&self) -> bool {
        !self.ai_failed
            && !self.game_state.is_terminal()
            && self.game_state.current_piece() == Piece::Ai
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.restart();
            }
            _ => {}
        }
    }

    fn restart(&mut self) {
        let first = self.first_turn.resolve(&mut self.rng);
        self.game_state = GameState::new(first);
        self.selected_column = COLS / 2;
        self.statistics = None;
        self.last_ai_column = None;
        self.ai_failed = false;
        self.message = Some(opening_message(first));
        info!(first = first.name(), "new game");
    }

    /// Drop the human's piece in the selected column
    fn drop_piece(&mut self) {
        if self.game_state.is_terminal() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }
        if self.game_state.current_piece() != Piece::Player {
            self.message = Some("Wait for the AI to move.".to_string());
            return;
        }

        match self.game_state.apply_move_mut(self.selected_column) {
            Ok(()) => self.after_move(),
            Err(MoveError::ColumnFull) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(MoveError::InvalidColumn) => {
                self.message = Some("Invalid column!".to_string());
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game is over!".to_string());
            }
        }
    }

    /// Run the search and play the AI's move.
    pub(super) fn play_ai_turn(&mut self) {
        let board = *self.game_state.board();
        let turn = self.game_state.turn_rule();

        match search_with_rng(&board, self.iterations, turn, &mut self.rng) {
            Ok(result) => {
                info!(column = result.column, nodes = result.tree_nodes, "AI move");
                self.statistics = Some(result.statistics);
                self.last_ai_column = Some(result.column);
                match self.game_state.apply_move_mut(result.column) {
                    Ok(()) => self.after_move(),
                    Err(e) => {
                        error!(error = %e, column = result.column, "AI chose an unplayable column");
                        self.ai_failed = true;
                        self.message = Some(format!("AI move failed: {e}. Press 'r' to restart."));
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "search failed");
                self.ai_failed = true;
                self.message = Some(format!("AI search failed: {e}. Press 'r' to restart."));
            }
        }
    }

    fn after_move(&mut self) {
        self.message = Some(match self.game_state.outcome() {
            Some(GameOutcome::Winner(Piece::Player)) => "You win!".to_string(),
            Some(GameOutcome::Winner(Piece::Ai)) => "The AI wins!".to_string(),
            Some(GameOutcome::Draw) => "It's a draw!".to_string(),
            None if self.game_state.current_piece() == Piece::Ai => {
                format!("AI is thinking ({} iterations)...", self.iterations)
            }
            None => match self.last_ai_column {
                Some(col) => format!("AI played column {}. Your move.", col + 1),
                None => "Your move.".to_string(),
            },
        });
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, self);
    }
}

fn opening_message(first: Piece) -> String {
    match first {
        Piece::Player => "You start. Your move.".to_string(),
        Piece::Ai => "The AI starts.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiConfig, GameConfig};
    use crate::game::Cell;

    fn app(first_turn: FirstTurn) -> App {
        App::new(&AppConfig {
            ai: AiConfig { iterations: 20 },
            game: GameConfig {
                first_turn,
                seed: Some(3),
            },
        })
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app(FirstTurn::Player);
        assert_eq!(app.selected_column, 3);

        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Left));
        }
        assert_eq!(app.selected_column, 0);

        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Right));
        }
        assert_eq!(app.selected_column, COLS - 1);
    }

    #[test]
    fn test_player_drop_hands_turn_to_ai() {
        let mut app = app(FirstTurn::Player);
        app.handle_key(KeyEvent::from(KeyCode::Enter));

        assert_eq!(app.game_state.board().get(0, 3), Cell::Player);
        assert!(app.ai_to_move());
        assert!(app.message.as_deref().unwrap().starts_with("AI is thinking"));

        // A second drop is refused until the AI has moved
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.game_state.board().piece_count(), 1);
    }

    #[test]
    fn test_ai_turn_records_statistics() {
        let mut app = app(FirstTurn::Ai);
        assert!(app.ai_to_move());

        app.play_ai_turn();

        assert_eq!(app.game_state.board().piece_count(), 1);
        let column = app.last_ai_column.unwrap();
        assert_eq!(app.game_state.board().get(0, column), Cell::Ai);
        let stats = app.statistics.as_ref().unwrap();
        assert_eq!(stats.get(column).unwrap().visit_ratio, 1.0);
        assert!(!app.ai_to_move());
    }

    #[test]
    fn test_player_first_game_uses_matching_turn_rule() {
        let mut app = app(FirstTurn::Player);
        app.handle_key(KeyEvent::from(KeyCode::Char(' ')));
        app.play_ai_turn();

        // One piece each, and the AI's piece really is an AI piece
        let board = app.game_state.board();
        assert_eq!(board.piece_count(), 2);
        let column = app.last_ai_column.unwrap();
        let row = if column == 3 { 1 } else { 0 };
        assert_eq!(board.get(row, column), Cell::Ai);
        assert_eq!(app.game_state.current_piece(), Piece::Player);
    }

    #[test]
    fn test_failed_ai_turn_hands_control_back() {
        let mut app = app(FirstTurn::Ai);
        app.iterations = 0;

        app.play_ai_turn();

        // The loop goes back to reading keys instead of retrying the search
        assert!(!app.ai_to_move());
        assert_eq!(app.game_state.board().piece_count(), 0);
        assert!(app.message.as_deref().unwrap().starts_with("AI search failed"));

        app.handle_key(KeyEvent::from(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_restart_clears_failed_ai_turn() {
        let mut app = app(FirstTurn::Ai);
        app.iterations = 0;
        app.play_ai_turn();

        app.iterations = 20;
        app.handle_key(KeyEvent::from(KeyCode::Char('r')));
        assert!(!app.ai_failed);
        assert!(app.ai_to_move());
    }

    #[test]
    fn test_restart_and_quit() {
        let mut app = app(FirstTurn::Player);
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        app.play_ai_turn();

        app.handle_key(KeyEvent::from(KeyCode::Char('r')));
        assert_eq!(app.game_state.board().piece_count(), 0);
        assert!(app.statistics.is_none());
        assert!(app.last_ai_column.is_none());

        app.handle_key(KeyEvent::from(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
