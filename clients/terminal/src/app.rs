use crate::event::{AppEvent, Event, EventHandler};
use crate::input::{InputMode, InputState};
use crate::settings::Settings;
use pong_core::{Event as MatchEvent, MatchController, MatchEnd, Phase, Side};
use ratatui::{
    crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal,
};
use std::time::{Duration, Instant};

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Start,
    Game,
}

/// Menu states for navigation
#[derive(Debug, Default)]
pub struct MenuState {
    pub start_selected: usize,
}

const START_MENU_ITEMS: [&str; 3] = ["Play vs PongBot", "Two players", "Quit"];

/// Game board size constants
pub const MIN_GAME_WIDTH: u16 = 60;
pub const MIN_GAME_HEIGHT: u16 = 20;
const FIXED_GAME_WIDTH: u16 = 80;
const FIXED_GAME_HEIGHT: u16 = 30;

/// Turns wall-clock time spent running into whole match-clock seconds
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockAccumulator {
    elapsed: Duration,
}

impl ClockAccumulator {
    /// Add `dt` and return how many full seconds are now due
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let seconds = self.elapsed.as_secs();
        self.elapsed -= Duration::from_secs(seconds);
        seconds as u32
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// Main application
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current screen
    pub screen: AppScreen,
    /// Menu states
    pub menu_state: MenuState,
    pub settings: Settings,
    pub controller: MatchController,
    pub input: InputState,
    pub clock: ClockAccumulator,
    /// Last game tick
    pub last_tick: Instant,
    /// Event handler
    pub events: EventHandler,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Whether UI is paused due to small terminal
    pub ui_paused: bool,
    /// Result of the last finished match
    pub last_end: Option<MatchEnd>,
    /// Transient status line (overtime, rejected config)
    pub banner: Option<String>,
}

impl App {
    /// Constructs a new instance of App
    pub fn new(settings: Settings) -> color_eyre::Result<Self> {
        let bindings = settings.bindings()?;
        let events = EventHandler::new(settings.config().tick_hz)?;
        let mode = if events.keyboard_enhanced() {
            InputMode::Enhanced
        } else {
            InputMode::RepeatLatch
        };
        let input = InputState::new(bindings, mode);
        log::info!("input mode: {}", input.mode_description());

        Ok(Self {
            running: true,
            screen: AppScreen::Start,
            menu_state: MenuState::default(),
            settings,
            controller: MatchController::new(),
            input,
            clock: ClockAccumulator::default(),
            last_tick: Instant::now(),
            events,
            terminal_size: (80, 24),
            ui_paused: false,
            last_end: None,
            banner: None,
        })
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.handle_resize(size.width, size.height);

        while self.running {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub fn handle_events(&mut self) -> color_eyre::Result<()> {
        match self.events.next()? {
            Event::Tick => self.tick(),
            Event::Crossterm(event) => {
                if let CrosstermEvent::Key(key_event) = event {
                    self.handle_key_event(key_event);
                }
            }
            Event::App(app_event) => self.handle_app_event(app_event),
        }
        Ok(())
    }

    /// Handle key events and convert to app events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Global quit keys
        match key_event.code {
            KeyCode::Char('q') if key_event.kind == KeyEventKind::Press => {
                self.events.send(AppEvent::Quit);
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('C')
                if key_event.modifiers == KeyModifiers::CONTROL =>
            {
                self.events.send(AppEvent::Quit);
                return;
            }
            _ => {}
        }

        match self.screen {
            AppScreen::Start => {
                // Menu navigation - only on key press
                if key_event.kind == KeyEventKind::Press {
                    match key_event.code {
                        KeyCode::Up => self.events.send(AppEvent::MenuUp),
                        KeyCode::Down => self.events.send(AppEvent::MenuDown),
                        KeyCode::Enter => self.events.send(AppEvent::MenuSelect),
                        KeyCode::Esc => self.events.send(AppEvent::Quit),
                        _ => {}
                    }
                }
            }
            AppScreen::Game => {
                // Paddle bindings first so a rebound key cannot double as a command
                if self.input.handle_key_event(key_event) {
                    return;
                }
                if key_event.kind != KeyEventKind::Press {
                    return;
                }
                match key_event.code {
                    KeyCode::Esc => self.events.send(AppEvent::NavigateToStart),
                    KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                        self.events.send(AppEvent::TogglePause)
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => self.events.send(AppEvent::Restart),
                    _ => {}
                }
            }
        }
    }

    /// Handle application events
    fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Quit => self.quit(),
            AppEvent::NavigateToStart => self.navigate_to_start(),
            AppEvent::StartMatch(multiplayer) => self.start_match(multiplayer),
            AppEvent::MenuUp => self.menu_up(),
            AppEvent::MenuDown => self.menu_down(),
            AppEvent::MenuSelect => self.menu_select(),
            AppEvent::TogglePause => self.toggle_pause(),
            AppEvent::Restart => self.restart(),
            AppEvent::FocusLost => self.focus_lost(),
            AppEvent::TerminalResize(width, height) => self.handle_resize(width, height),
        }
    }

    /// Handle tick event for game updates
    fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;

        if self.screen != AppScreen::Game || !self.controller.is_running() {
            return;
        }

        let events = self.controller.tick(&self.input.snapshot());
        self.input.on_tick();
        self.handle_match_events(events);

        // The clock only runs while the match does
        let seconds = self.clock.advance(dt);
        for _ in 0..seconds {
            if !self.controller.is_running() {
                break;
            }
            let events = self.controller.second_elapsed();
            self.handle_match_events(events);
        }
    }

    fn handle_match_events(&mut self, events: Vec<MatchEvent>) {
        for event in events {
            match event {
                MatchEvent::Scored { scorer, score } => {
                    log::debug!("{:?} scored, {}-{}", scorer, score[0], score[1]);
                }
                MatchEvent::OvertimeStarted { extra_seconds } => {
                    self.banner = Some(format!("Overtime! +{extra_seconds}s"));
                }
                MatchEvent::Finished(end) => {
                    log::info!(
                        "match finished {}-{}: {}",
                        end.score_left,
                        end.score_right,
                        self.result_text(&end)
                    );
                    self.banner = None;
                    self.last_end = Some(end);
                }
            }
        }
    }

    // Navigation methods
    fn quit(&mut self) {
        self.running = false;
    }

    fn navigate_to_start(&mut self) {
        self.controller.pause();
        self.input.clear();
        self.screen = AppScreen::Start;
    }

    // Menu navigation
    fn menu_up(&mut self) {
        let len = START_MENU_ITEMS.len();
        self.menu_state.start_selected = (self.menu_state.start_selected + len - 1) % len;
    }

    fn menu_down(&mut self) {
        let len = START_MENU_ITEMS.len();
        self.menu_state.start_selected = (self.menu_state.start_selected + 1) % len;
    }

    fn menu_select(&mut self) {
        match self.menu_state.start_selected {
            0 => self.events.send(AppEvent::StartMatch(false)),
            1 => self.events.send(AppEvent::StartMatch(true)),
            2 => self.events.send(AppEvent::Quit),
            _ => {}
        }
    }

    // Match control
    fn start_match(&mut self, multiplayer: bool) {
        let config = self.settings.match_config(multiplayer);
        log::info!("serve seed {}", config.seed);

        // Leaving mid-match abandons it
        if matches!(self.controller.phase(), Phase::Running | Phase::Paused) {
            self.controller = MatchController::new();
        }

        match self.controller.start(config) {
            Ok(()) => {
                self.screen = AppScreen::Game;
                self.reset_match_ui();
                if self.ui_paused {
                    self.controller.pause();
                }
            }
            Err(e) => {
                log::warn!("could not start match: {e}");
                self.banner = Some(e.to_string());
            }
        }
    }

    fn restart(&mut self) {
        if self.controller.phase() == Phase::Idle {
            return;
        }
        // Unpinned seeds are redrawn on restart
        if !self.settings.has_pinned_seed() {
            let multiplayer = self.controller.config().is_multiplayer;
            self.start_match(multiplayer);
            return;
        }

        self.controller.reset();
        self.reset_match_ui();
        if self.ui_paused {
            self.controller.pause();
        }
    }

    fn toggle_pause(&mut self) {
        if self.ui_paused {
            return;
        }
        self.controller.toggle_pause();
        self.input.clear();
    }

    fn focus_lost(&mut self) {
        self.controller.pause();
        self.input.clear();
    }

    fn reset_match_ui(&mut self) {
        self.input.clear();
        self.clock.reset();
        self.last_end = None;
        self.banner = None;
        self.last_tick = Instant::now();
    }

    // Terminal size management
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);

        // Check if terminal is large enough for game
        self.ui_paused = width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT;
        if self.ui_paused {
            self.controller.pause();
        }
    }

    pub fn calculate_centered_game_area(
        &self,
        area: ratatui::layout::Rect,
    ) -> Option<ratatui::layout::Rect> {
        if self.ui_paused {
            return None; // Too small
        }

        let game_width = FIXED_GAME_WIDTH.min(area.width);
        let game_height = FIXED_GAME_HEIGHT.min(area.height);

        let x_offset = area.width.saturating_sub(game_width) / 2;
        let y_offset = area.height.saturating_sub(game_height) / 2;

        Some(ratatui::layout::Rect {
            x: area.x + x_offset,
            y: area.y + y_offset,
            width: game_width,
            height: game_height,
        })
    }

    // Helper methods for UI
    pub fn get_start_menu_items(&self) -> &'static [&'static str] {
        &START_MENU_ITEMS
    }

    pub fn player_name(&self, side: Side) -> &str {
        self.settings
            .name(side, self.controller.config().is_multiplayer)
    }

    /// "Ada wins!" or "It's a draw!"
    pub fn result_text(&self, end: &MatchEnd) -> String {
        match end.winner {
            Some(side) => format!("{} wins!", self.player_name(side)),
            None => "It's a draw!".to_string(),
        }
    }
}

/// Seconds rendered as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
