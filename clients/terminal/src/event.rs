use color_eyre::eyre::WrapErr;
use ratatui::crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event as CrosstermEvent,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use std::{
    io::stdout,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// Emitted at the simulation cadence
    Tick,
    /// Crossterm events (keyboard, focus, etc.)
    Crossterm(CrosstermEvent),
    /// Application events
    App(AppEvent),
}

/// Application events for game control
#[derive(Clone, Debug)]
pub enum AppEvent {
    /// Quit the application
    Quit,
    /// Back to the main menu
    NavigateToStart,
    /// Start a match; `true` for two players
    StartMatch(bool),
    /// Menu navigation
    MenuUp,
    MenuDown,
    MenuSelect,
    TogglePause,
    Restart,
    /// Terminal window lost focus
    FocusLost,
    /// Terminal resize event
    TerminalResize(u16, u16), // width, height
}

/// Terminal event handler with enhanced keyboard support
pub struct EventHandler {
    /// Event sender channel
    sender: mpsc::Sender<Event>,
    /// Event receiver channel
    receiver: mpsc::Receiver<Event>,
    /// Whether keyboard enhancements are supported
    keyboard_enhanced: bool,
}

impl EventHandler {
    /// Starts the event thread ticking at `tick_hz`
    pub fn new(tick_hz: u16) -> color_eyre::Result<Self> {
        let (sender, receiver) = mpsc::channel();

        // Release events are only reported with keyboard enhancements
        let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
        if keyboard_enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                )
            )?;
        }
        execute!(stdout(), EnableFocusChange)?;

        let actor = EventThread::new(sender.clone(), tick_hz);
        thread::spawn(move || {
            if let Err(e) = actor.run() {
                log::error!("event thread stopped: {e}");
            }
        });

        Ok(Self {
            sender,
            receiver,
            keyboard_enhanced,
        })
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Receives an event from the sender (blocking)
    pub fn next(&self) -> color_eyre::Result<Event> {
        Ok(self.receiver.recv()?)
    }

    /// Queue an app event
    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableFocusChange);
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
    }
}

/// A thread that handles reading crossterm events and emitting tick events
struct EventThread {
    sender: mpsc::Sender<Event>,
    tick_interval: Duration,
}

impl EventThread {
    fn new(sender: mpsc::Sender<Event>, tick_hz: u16) -> Self {
        Self {
            sender,
            tick_interval: Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1))),
        }
    }

    fn run(self) -> color_eyre::Result<()> {
        let mut last_tick = Instant::now();

        loop {
            let timeout = self.tick_interval.saturating_sub(last_tick.elapsed());
            if timeout == Duration::ZERO {
                last_tick = Instant::now();
                if !self.send(Event::Tick) {
                    return Ok(());
                }
            }

            // Poll for crossterm events
            if event::poll(timeout).wrap_err("failed to poll for crossterm events")? {
                let event = event::read().wrap_err("failed to read crossterm event")?;

                let delivered = match event {
                    CrosstermEvent::Resize(width, height) => {
                        self.send(Event::App(AppEvent::TerminalResize(width, height)))
                    }
                    CrosstermEvent::FocusLost => self.send(Event::App(AppEvent::FocusLost)),
                    _ => self.send(Event::Crossterm(event)),
                };
                if !delivered {
                    return Ok(());
                }
            }
        }
    }

    /// False once the receiving side has gone away
    fn send(&self, event: Event) -> bool {
        self.sender.send(event).is_ok()
    }
}
