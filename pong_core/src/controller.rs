//! Match lifecycle: start, pause, resume, reset and the per-tick entry point.

use std::fmt;

use log::{info, warn};

use crate::config::{Config, ConfigError};
use crate::game::Game;
use crate::types::{Event, InputSnapshot, MatchEnd, Outcome, View};

/// Lifecycle phase of the controller
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Errors returned by controller commands
#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    /// The configuration was rejected at start
    InvalidConfig(ConfigError),
    /// `start` called while a match is running or paused
    InProgress,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::InvalidConfig(e) => write!(f, "Invalid configuration: {}", e),
            MatchError::InProgress => write!(f, "A match is already in progress"),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::InvalidConfig(e) => Some(e),
            MatchError::InProgress => None,
        }
    }
}

impl From<ConfigError> for MatchError {
    fn from(e: ConfigError) -> Self {
        MatchError::InvalidConfig(e)
    }
}

/// Owns the configuration and the per-match game state.
///
/// Driven by an external scheduler through [`MatchController::tick`] and, in
/// timed mode, [`MatchController::second_elapsed`].
#[derive(Debug, Clone)]
pub struct MatchController {
    phase: Phase,
    config: Config,
    game: Option<Game>,
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchController {
    pub fn new() -> Self {
        MatchController {
            phase: Phase::Idle,
            config: Config::default(),
            game: None,
        }
    }

    /// Validate `config` and begin a new match
    pub fn start(&mut self, config: Config) -> Result<(), MatchError> {
        if matches!(self.phase, Phase::Running | Phase::Paused) {
            return Err(MatchError::InProgress);
        }
        if let Err(e) = config.validate() {
            warn!("rejected match configuration: {}", e);
            return Err(e.into());
        }

        self.config = config;
        self.begin();
        Ok(())
    }

    /// Restart with the stored config. No-op before the first start.
    pub fn reset(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        self.begin();
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.set_phase(Phase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.set_phase(Phase::Running);
        }
    }

    /// Toggle between running and paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle | Phase::Finished => {}
        }
    }

    /// Advance one simulation step. Ignored unless running.
    pub fn tick(&mut self, input: &InputSnapshot) -> Vec<Event> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };

        let mut events: Vec<Event> = game.step(&self.config, input).into_iter().collect();
        self.check_finished(&mut events);
        events
    }

    /// Advance the match clock by one second. Ignored unless running in timed mode.
    pub fn second_elapsed(&mut self) -> Vec<Event> {
        if self.phase != Phase::Running || !self.config.is_timed_mode {
            return Vec::new();
        }
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };

        let mut events: Vec<Event> = game.tick_clock(&self.config).into_iter().collect();
        self.check_finished(&mut events);
        events
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current snapshot for rendering, once a match has been started
    pub fn view(&self) -> Option<View> {
        self.game.as_ref().map(|game| game.view(&self.config))
    }

    /// Final result, once finished
    pub fn outcome(&self) -> Option<Outcome> {
        self.game.as_ref().and_then(Game::outcome)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// The game's running flag mirrors the phase so views report pauses
    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        if let Some(game) = self.game.as_mut() {
            game.state.is_running = phase == Phase::Running;
        }
    }

    fn begin(&mut self) {
        self.game = Some(Game::new(&self.config));
        self.phase = Phase::Running;
        info!(
            "match started: multiplayer={} final_score={} timed={:?}",
            self.config.is_multiplayer,
            self.config.final_score,
            self.config.initial_clock()
        );
    }

    /// Move to Finished the first time the game reports the match over
    fn check_finished(&mut self, events: &mut Vec<Event>) {
        let end: Option<MatchEnd> = self
            .game
            .as_ref()
            .filter(|game| game.is_over())
            .and_then(|game| game.state.match_end());

        if let Some(end) = end {
            self.phase = Phase::Finished;
            events.push(Event::Finished(end));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use glam::Vec2;

    fn timed(seconds: u32) -> Config {
        Config {
            is_timed_mode: true,
            time_duration_seconds: seconds,
            ..Config::default()
        }
    }

    fn started(config: Config) -> MatchController {
        let mut controller = MatchController::new();
        controller.start(config).unwrap();
        controller
    }

    #[test]
    fn test_new_controller_is_idle() {
        let mut controller = MatchController::default();

        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.view().is_none());
        assert!(controller.tick(&InputSnapshot::idle()).is_empty());
        controller.reset();
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut controller = MatchController::new();
        let config = Config {
            final_score: 0,
            ..Config::default()
        };

        let err = controller.start(config).unwrap_err();

        assert_eq!(
            err,
            MatchError::InvalidConfig(ConfigError::InvalidFinalScore)
        );
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut controller = started(Config::default());

        assert_eq!(
            controller.start(Config::default()),
            Err(MatchError::InProgress)
        );

        controller.pause();
        assert_eq!(
            controller.start(Config::default()),
            Err(MatchError::InProgress)
        );
    }

    #[test]
    fn test_pause_and_resume() {
        let mut controller = started(Config::default());
        controller.tick(&InputSnapshot::idle());

        controller.pause();
        assert_eq!(controller.phase(), Phase::Paused);

        let before = controller.view().unwrap();
        assert!(!before.state.is_running);
        let up = InputSnapshot::new(true, false, false, false);
        for _ in 0..10 {
            assert!(controller.tick(&up).is_empty());
        }
        assert_eq!(controller.view().unwrap(), before);

        controller.resume();
        assert_eq!(controller.phase(), Phase::Running);
        assert!(controller.view().unwrap().state.is_running);
        controller.tick(&InputSnapshot::idle());
        assert_eq!(controller.view().unwrap().tick, before.tick + 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut controller = started(Config::default());

        controller.toggle_pause();
        assert_eq!(controller.phase(), Phase::Paused);
        controller.toggle_pause();
        assert_eq!(controller.phase(), Phase::Running);
    }

    #[test]
    fn test_paused_clock_does_not_run() {
        let mut controller = started(timed(1));
        controller.pause();

        assert!(controller.second_elapsed().is_empty());
        assert_eq!(controller.view().unwrap().state.clock_remaining, Some(1));
    }

    #[test]
    fn test_finished_emitted_exactly_once() {
        let mut controller = started(timed(1));

        let events = controller.second_elapsed();

        assert_eq!(
            events,
            vec![Event::Finished(MatchEnd {
                winner: None,
                score_left: 0,
                score_right: 0,
            })]
        );
        assert_eq!(controller.phase(), Phase::Finished);
        assert_eq!(controller.outcome(), Some(Outcome::Draw));

        assert!(controller.second_elapsed().is_empty());
        assert!(controller.tick(&InputSnapshot::idle()).is_empty());
    }

    #[test]
    fn test_finish_by_score_reports_winner() {
        let mut controller = started(Config {
            final_score: 1,
            ..Config::default()
        });

        let mut events = Vec::new();
        for _ in 0..10_000 {
            events.extend(controller.tick(&InputSnapshot::idle()));
            if controller.phase() == Phase::Finished {
                break;
            }
        }

        assert_eq!(controller.phase(), Phase::Finished);
        let finished: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, Event::Finished(_)))
            .collect();
        assert_eq!(finished.len(), 1);

        let winner = controller.outcome().and_then(Outcome::winner);
        assert!(winner.is_some());
        let Some(Event::Finished(end)) = events.last() else {
            panic!("last event should be Finished");
        };
        assert_eq!(end.winner, winner);
    }

    #[test]
    fn test_untimed_match_ignores_seconds() {
        let mut controller = started(Config::default());

        for _ in 0..500 {
            assert!(controller.second_elapsed().is_empty());
        }
        assert_eq!(controller.phase(), Phase::Running);
    }

    #[test]
    fn test_reset_restarts_with_same_config() {
        let config = Config {
            final_score: 3,
            ..Config::default()
        };
        let mut controller = started(config);
        let fresh = controller.view().unwrap();

        for _ in 0..100 {
            controller.tick(&InputSnapshot::new(false, true, false, false));
        }
        controller.pause();
        controller.reset();

        assert_eq!(controller.phase(), Phase::Running);
        assert_eq!(controller.config(), &config);
        assert_eq!(controller.view().unwrap(), fresh);
    }

    #[test]
    fn test_restart_after_finish() {
        let mut controller = started(timed(1));
        controller.second_elapsed();
        assert_eq!(controller.phase(), Phase::Finished);

        controller.start(Config::default()).unwrap();

        assert_eq!(controller.phase(), Phase::Running);
        assert_eq!(controller.outcome(), None);
        assert_eq!(controller.view().unwrap().state.score(), [0, 0]);
    }

    #[test]
    fn test_scored_event_passes_through() {
        let mut controller = started(Config::default());
        let game = controller.game.as_mut().unwrap();
        game.paddles[0].y = 420.0;
        game.ball.pos = Vec2::new(18.0, 100.0);
        game.ball.vel = Vec2::new(-4.0, 0.0);

        let events = controller.tick(&InputSnapshot::idle());

        assert_eq!(
            events,
            vec![Event::Scored {
                scorer: Side::Right,
                score: [0, 1],
            }]
        );
        assert_eq!(controller.phase(), Phase::Running);
    }
}
