use crate::app::{format_clock, App, AppScreen, MIN_GAME_HEIGHT, MIN_GAME_WIDTH};
use pong_core::{Phase, RenderHelper, Side, View};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Clear, List, ListItem, Paragraph, Widget},
};

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Create layout with title and content
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        let title = Paragraph::new("🏓 Pong 🏓")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Pong")
                    .title_alignment(Alignment::Center),
            );
        title.render(chunks[0], buf);

        match self.screen {
            AppScreen::Start => self.render_start_screen(chunks[1], buf),
            AppScreen::Game => self.render_game_screen(chunks[1], buf),
        }
    }
}

impl App {
    fn render_start_screen(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        let items: Vec<ListItem> = self
            .get_start_menu_items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.menu_state.start_selected {
                    Style::default().fg(Color::Yellow).bg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(*item).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Main Menu")
                    .title_alignment(Alignment::Center),
            )
            .highlight_symbol("► ");
        list.render(chunks[0], buf);

        // Start failures (rejected config) are reported here
        let (text, color) = match &self.banner {
            Some(message) => (message.as_str(), Color::Red),
            None => ("↑/↓: Select  ENTER: Start  Q: Quit", Color::DarkGray),
        };
        Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }

    fn render_game_screen(&self, area: Rect, buf: &mut Buffer) {
        // Check if terminal is too small
        if self.ui_paused {
            let message = format!(
                "Terminal too small!\n\nMinimum required: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal to continue playing.",
                MIN_GAME_WIDTH,
                MIN_GAME_HEIGHT,
                self.terminal_size.0,
                self.terminal_size.1
            );

            let resize_widget = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .title("⚠ Resize Required ⚠")
                        .title_alignment(Alignment::Center),
                );
            resize_widget.render(area, buf);
            return;
        }

        let game_area = self.calculate_centered_game_area(area);
        let (Some(view), Some(game_area)) = (self.controller.view(), game_area) else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Score
                Constraint::Min(10),   // Field
                Constraint::Length(3), // Controls
            ])
            .split(game_area);

        self.render_scoreboard(chunks[0], buf, &view);
        self.render_game_field(chunks[1], buf, &view);
        self.render_controls(chunks[2], buf);
        self.render_overlay(chunks[1], buf);
    }

    fn render_scoreboard(&self, area: Rect, buf: &mut Buffer, view: &View) {
        let state = &view.state;
        let mut parts = vec![format!(
            "{} {}  -  {} {}",
            self.player_name(Side::Left),
            state.score_left,
            state.score_right,
            self.player_name(Side::Right),
        )];
        if let Some(remaining) = state.clock_remaining {
            let label = if state.in_overtime { "OT" } else { "Time" };
            parts.push(format!("{} {}", label, format_clock(remaining)));
        }
        parts.push(format!("First to {}", state.final_score));

        let score_widget = Paragraph::new(parts.join("    "))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(self.banner.as_deref().unwrap_or("Score"))
                    .title_alignment(Alignment::Center),
            );
        score_widget.render(area, buf);
    }

    fn render_game_field(&self, area: Rect, buf: &mut Buffer, view: &View) {
        let cols = area.width.saturating_sub(2) as usize;
        let rows = area.height.saturating_sub(2) as usize;
        if cols == 0 || rows == 0 {
            return; // Too small to render
        }

        let render_helper = RenderHelper::new(cols, rows, self.controller.config());
        let paddles = view.paddles.map(|p| render_helper.get_paddle_rect(&p));
        let (ball_col, ball_row) = render_helper.get_ball_position(view.ball.pos);
        let center_col = render_helper.center_col();

        let field_lines: Vec<Line> = (0..rows)
            .map(|row| {
                let line: String = (0..cols)
                    .map(|col| {
                        if (col, row) == (ball_col, ball_row) {
                            '●'
                        } else if paddles.iter().any(|rect| rect.contains(col, row)) {
                            '█'
                        } else if col == center_col {
                            '┊'
                        } else {
                            ' '
                        }
                    })
                    .collect();
                Line::from(line)
            })
            .collect();

        let field_widget = Paragraph::new(field_lines)
            .style(Style::default().fg(Color::White))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Field")
                    .title_alignment(Alignment::Center),
            );
        field_widget.render(area, buf);
    }

    fn render_controls(&self, area: Rect, buf: &mut Buffer) {
        let bindings = self.input.bindings();
        let mut controls = format!("P1: {}", bindings.label(Side::Left));
        if self.controller.config().is_multiplayer {
            controls.push_str(&format!("  P2: {} or ↑/↓", bindings.label(Side::Right)));
        }
        controls.push_str("  P: Pause  R: Restart  ESC: Menu  Q: Quit");

        let controls_widget = Paragraph::new(controls)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Controls")
                    .title_alignment(Alignment::Center),
            );
        controls_widget.render(area, buf);
    }

    /// Centered message box over the field while paused or after the match
    fn render_overlay(&self, area: Rect, buf: &mut Buffer) {
        let (title, body) = match (self.controller.phase(), &self.last_end) {
            (Phase::Paused, _) => ("Paused", "Press P to resume".to_string()),
            (Phase::Finished, Some(end)) => (
                "Game Over",
                format!("{}\n\nR: Play again  ESC: Menu", self.result_text(end)),
            ),
            _ => return,
        };

        let width = 36.min(area.width);
        let height = 6.min(area.height);
        let popup = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        };

        Clear.render(popup, buf);
        Paragraph::new(body)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .title(title)
                    .title_alignment(Alignment::Center),
            )
            .render(popup, buf);
    }
}
