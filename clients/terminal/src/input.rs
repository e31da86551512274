//! Key hold tracking that turns terminal key events into per-tick input snapshots.

use pong_core::{InputSnapshot, Side};
use ratatui::crossterm::event::{KeyEvent, KeyEventKind};

use crate::settings::Bindings;

/// Ticks a key counts as held after a press or repeat when releases are not reported
pub const REPEAT_LATCH_TICKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Terminal reports press and release
    Enhanced,
    /// Press and auto-repeat only; holds are inferred
    RepeatLatch,
}

/// Hold state of one logical signal
#[derive(Debug, Default, Clone, Copy)]
struct KeySignal {
    held: bool,
    latch: u32,
}

impl KeySignal {
    fn is_down(&self) -> bool {
        self.held || self.latch > 0
    }
}

/// Pressed state of the four paddle signals, updated from key events
#[derive(Debug)]
pub struct InputState {
    bindings: Bindings,
    mode: InputMode,
    // [p1_up, p1_down, p2_up, p2_down]
    signals: [KeySignal; 4],
}

impl InputState {
    pub fn new(bindings: Bindings, mode: InputMode) -> Self {
        Self {
            bindings,
            mode,
            signals: [KeySignal::default(); 4],
        }
    }

    pub fn mode_description(&self) -> &'static str {
        match self.mode {
            InputMode::Enhanced => "Enhanced (hold keys)",
            InputMode::RepeatLatch => "Repeat latch (hold or tap keys)",
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Apply a key event. Returns false when the key is not a paddle binding.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> bool {
        let Some((side, up)) = self.bindings.lookup(event.code) else {
            return false;
        };
        let index = signal_index(side, up);
        let opposite = signal_index(side, !up);

        match (self.mode, event.kind) {
            (InputMode::Enhanced, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.signals[index].held = true;
            }
            (InputMode::Enhanced, KeyEventKind::Release) => {
                self.signals[index].held = false;
            }
            (InputMode::RepeatLatch, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.signals[index].latch = REPEAT_LATCH_TICKS;
                // Switching direction cancels the old latch immediately
                self.signals[opposite].latch = 0;
            }
            (InputMode::RepeatLatch, KeyEventKind::Release) => {
                self.signals[index].latch = 0;
            }
        }
        true
    }

    /// Snapshot to feed the next simulation tick
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::new(
            self.signals[0].is_down(),
            self.signals[1].is_down(),
            self.signals[2].is_down(),
            self.signals[3].is_down(),
        )
    }

    /// Age repeat latches by one tick
    pub fn on_tick(&mut self) {
        for signal in &mut self.signals {
            signal.latch = signal.latch.saturating_sub(1);
        }
    }

    /// Drop every held key, e.g. when focus is lost
    pub fn clear(&mut self) {
        self.signals = [KeySignal::default(); 4];
    }
}

fn signal_index(side: Side, up: bool) -> usize {
    side.index() * 2 + usize::from(!up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use ratatui::crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn input(mode: InputMode) -> InputState {
        InputState::new(Settings::default().bindings().unwrap(), mode)
    }

    #[test]
    fn test_enhanced_hold_until_release() {
        let mut input = input(InputMode::Enhanced);
        let press = key(KeyCode::Char('w'), KeyEventKind::Press);

        assert!(input.handle_key_event(press));
        for _ in 0..100 {
            input.on_tick();
        }
        assert!(input.snapshot().p1_up);

        input.handle_key_event(key(KeyCode::Char('w'), KeyEventKind::Release));
        assert_eq!(input.snapshot(), InputSnapshot::idle());
    }

    #[test]
    fn test_both_players_at_once() {
        let mut input = input(InputMode::Enhanced);

        input.handle_key_event(key(KeyCode::Char('s'), KeyEventKind::Press));
        input.handle_key_event(key(KeyCode::Down, KeyEventKind::Press));

        assert_eq!(
            input.snapshot(),
            InputSnapshot::new(false, true, false, true)
        );
    }

    #[test]
    fn test_repeat_latch_expires() {
        let mut input = input(InputMode::RepeatLatch);

        input.handle_key_event(key(KeyCode::Char('o'), KeyEventKind::Press));
        for _ in 0..REPEAT_LATCH_TICKS - 1 {
            input.on_tick();
        }
        assert!(input.snapshot().p2_up);

        input.on_tick();
        assert!(!input.snapshot().p2_up);
    }

    #[test]
    fn test_repeat_latch_refreshed_by_repeats() {
        let mut input = input(InputMode::RepeatLatch);

        input.handle_key_event(key(KeyCode::Char('s'), KeyEventKind::Press));
        for _ in 0..3 {
            for _ in 0..REPEAT_LATCH_TICKS / 2 {
                input.on_tick();
            }
            input.handle_key_event(key(KeyCode::Char('s'), KeyEventKind::Repeat));
        }

        assert!(input.snapshot().p1_down);
    }

    #[test]
    fn test_direction_switch_cancels_latch() {
        let mut input = input(InputMode::RepeatLatch);

        input.handle_key_event(key(KeyCode::Char('w'), KeyEventKind::Press));
        input.handle_key_event(key(KeyCode::Char('s'), KeyEventKind::Press));

        let snapshot = input.snapshot();
        assert!(!snapshot.p1_up);
        assert!(snapshot.p1_down);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut input = input(InputMode::Enhanced);
        let press = key(KeyCode::Char('x'), KeyEventKind::Press);

        assert!(!input.handle_key_event(press));
        assert_eq!(input.snapshot(), InputSnapshot::idle());
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut input = input(InputMode::Enhanced);
        input.handle_key_event(key(KeyCode::Char('w'), KeyEventKind::Press));
        input.handle_key_event(key(KeyCode::Char('l'), KeyEventKind::Press));

        input.clear();

        assert_eq!(input.snapshot(), InputSnapshot::idle());
    }
}
