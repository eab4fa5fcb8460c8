use super::app::App;
use crate::game::{Board, Cell, GameOutcome, Piece, COLS, ROWS};
use crate::mcts::SearchStatistics;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the visit bar in the statistics panel.
const BAR_WIDTH: usize = 12;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Board and search stats
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_board(
        frame,
        app.game_state.board(),
        app.selected_column,
        app.last_ai_column,
        main[0],
    );
    render_statistics(frame, app.statistics.as_ref(), app.last_ai_column, main[1]);
    render_message(frame, &app.message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn piece_color(piece: Piece) -> Color {
    match piece {
        Piece::Player => Color::Red,
        Piece::Ai => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.game_state;
    let (status, color) = match state.outcome() {
        Some(GameOutcome::Winner(piece)) => {
            (format!("Game Over: {} wins", piece.name()), piece_color(piece))
        }
        Some(GameOutcome::Draw) => ("Game Over: draw".to_string(), Color::White),
        None => {
            let piece = state.current_piece();
            (
                format!("To move: {}  |  MCTS {} iterations", piece.name(), app.iterations),
                piece_color(piece),
            )
        }
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    board: &Board,
    selected_column: usize,
    last_ai_column: Option<usize>,
    area: Rect,
) {
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..COLS {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔═════════════════════╗"));

    // Row 0 is the bottom of the board, so draw from the top row down
    for row in (0..ROWS).rev() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let (symbol, color) = match board.get(row, col) {
                Cell::Empty => (" . ", Color::DarkGray),
                Cell::Player => (" ● ", piece_color(Piece::Player)),
                Cell::Ai => (" ● ", piece_color(Piece::Ai)),
            };
            row_spans.push(Span::styled(symbol, Style::default().fg(color)));
        }

        row_spans.push(Span::raw("║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚═════════════════════╝"));

    // Selection and last AI move markers
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else if Some(col) == last_ai_column {
            indicator_line.push(Span::styled(
                " ^ ",
                Style::default().fg(piece_color(Piece::Ai)),
            ));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Board"));
    frame.render_widget(board_widget, area);
}

/// Horizontal bar of `width` cells filled in proportion to `ratio`.
fn bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn statistics_lines(
    statistics: Option<&SearchStatistics>,
    last_ai_column: Option<usize>,
) -> Vec<Line<'static>> {
    let Some(statistics) = statistics else {
        return vec![Line::from(Span::styled(
            "No search yet",
            Style::default().fg(Color::DarkGray),
        ))];
    };

    (0..COLS)
        .map(|col| {
            let marker = if Some(col) == last_ai_column { "▶" } else { " " };
            let label = Span::styled(
                format!("{marker} {} ", col + 1),
                Style::default().fg(piece_color(Piece::Ai)),
            );
            match statistics.get(col) {
                Some(stats) => Line::from(vec![
                    label,
                    Span::styled(bar(stats.visit_ratio, BAR_WIDTH), Style::default().fg(Color::Green)),
                    Span::raw(format!(" n={:<5} w={:.2}", stats.visits, stats.win_rate)),
                ]),
                None => Line::from(vec![
                    label,
                    Span::styled(bar(0.0, BAR_WIDTH), Style::default().fg(Color::DarkGray)),
                    Span::raw(" n=0"),
                ]),
            }
        })
        .collect()
}

fn render_statistics(
    frame: &mut Frame,
    statistics: Option<&SearchStatistics>,
    last_ai_column: Option<usize>,
    area: Rect,
) {
    let panel = Paragraph::new(statistics_lines(statistics, last_ai_column)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("AI search"),
    );
    frame.render_widget(panel, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::raw("←/→: Move  |  Enter: Drop  |  R: Restart  |  Q: Quit   "),
        Span::styled("You", Style::default().fg(piece_color(Piece::Player)).add_modifier(Modifier::BOLD)),
        Span::raw(" vs "),
        Span::styled("AI", Style::default().fg(piece_color(Piece::Ai)).add_modifier(Modifier::BOLD)),
    ]);

    let controls = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Controls"),
    );

    frame.render_widget(controls, area);
}
