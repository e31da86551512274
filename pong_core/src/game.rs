//! Main game logic and state management.

use glam::Vec2;
use log::{debug, info};
use rand::SeedableRng;

use crate::config::Config;
use crate::physics::Physics;
use crate::types::*;

/// Per-match simulation state. The config is borrowed per call and never stored.
#[derive(Debug, Clone)]
pub struct Game {
    pub tick: Tick,
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub state: MatchState,
    pub rng: GameRng,
}

impl Game {
    /// Create a new match with centered paddles and a served ball
    pub fn new(config: &Config) -> Self {
        let paddle_y = (config.field_height - config.paddle_height) / 2.0;
        let paddle = |side| {
            Paddle::new(
                side,
                config.paddle_x(side),
                paddle_y,
                config.paddle_width,
                config.paddle_height,
            )
        };

        let mut game = Game {
            tick: 0,
            paddles: [paddle(Side::Left), paddle(Side::Right)],
            ball: Ball::new(Vec2::ZERO, Vec2::ZERO, config.ball_radius),
            state: MatchState::new(config.final_score, config.initial_clock()),
            rng: GameRng::seed_from_u64(config.seed),
        };

        Physics::serve_ball(&mut game.ball, config, &mut game.rng);
        game
    }

    /// Step the game simulation forward by one tick.
    ///
    /// Returns `Event::Scored` on a goal tick. The end of the match is
    /// reported through `state.is_over`; a finished match ignores further steps.
    pub fn step(&mut self, config: &Config, input: &InputSnapshot) -> Option<Event> {
        if self.state.is_over {
            return None;
        }

        // Paddles
        Physics::update_paddle(&mut self.paddles[0], input, config);
        if config.is_multiplayer {
            Physics::update_paddle(&mut self.paddles[1], input, config);
        } else {
            Physics::update_ai_paddle(&mut self.paddles[1], &self.ball, config);
        }

        // Ball
        Physics::update_ball(&mut self.ball);
        Physics::bounce_off_walls(&mut self.ball, config.field_height);
        for paddle in &self.paddles {
            Physics::check_paddle_collision(&mut self.ball, paddle, config);
        }

        let mut event = None;
        if let Some(scorer) = Physics::check_scoring(&self.ball, config.field_width) {
            self.handle_score(scorer, config);
            event = Some(Event::Scored {
                scorer,
                score: self.state.score(),
            });
        }

        self.tick += 1;
        event
    }

    /// Advance the match clock by one second.
    ///
    /// Only meaningful in timed mode. On expiry a tie with overtime enabled
    /// extends the clock; anything else ends the match on the current score.
    pub fn tick_clock(&mut self, config: &Config) -> Option<Event> {
        if self.state.is_over {
            return None;
        }
        let remaining = self.state.clock_remaining?.saturating_sub(1);
        self.state.clock_remaining = Some(remaining);

        if remaining > 0 {
            return None;
        }

        let outcome = self.state.leader();
        if outcome == Outcome::Draw && config.overtime_enabled {
            let extra_seconds = config.overtime_duration_seconds;
            self.state.clock_remaining = Some(extra_seconds);
            self.state.in_overtime = true;
            info!(
                "clock expired at {}-{}, overtime +{}s",
                self.state.score_left, self.state.score_right, extra_seconds
            );
            return Some(Event::OvertimeStarted { extra_seconds });
        }

        self.state.finish(outcome);
        info!(
            "clock expired, match over: {:?} ({}-{})",
            outcome, self.state.score_left, self.state.score_right
        );
        None
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self, config: &Config) -> View {
        View {
            tick: self.tick,
            field_width: config.field_width,
            field_height: config.field_height,
            paddles: self.paddles,
            ball: self.ball,
            state: self.state,
        }
    }

    /// Handle a scoring event
    fn handle_score(&mut self, scorer: Side, config: &Config) {
        self.state.award_point(scorer);
        debug!(
            "tick {}: {:?} scored, {}-{}",
            self.tick, scorer, self.state.score_left, self.state.score_right
        );

        let scorer_points = self.state.score()[scorer.index()];
        if scorer_points >= config.final_score {
            self.state.finish(Outcome::Winner(scorer));
            info!(
                "{:?} reached {} points, match over ({}-{})",
                scorer, config.final_score, self.state.score_left, self.state.score_right
            );
        }

        Physics::serve_ball(&mut self.ball, config, &mut self.rng);
    }

    /// Get the winner, if the match ended with one
    pub fn winner(&self) -> Option<Side> {
        self.state.outcome.and_then(Outcome::winner)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }
}
