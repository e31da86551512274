//! Computer-controlled paddle policy.
//!
//! Pure proportional tracking: each tick the paddle moves a fixed
//! `paddle_speed * difficulty` step toward its target. It never predicts the
//! ball's path, so at difficulty 1.0 it can overshoot by up to one step and at
//! lower difficulty it lags behind fast vertical motion.

use crate::config::Config;
use crate::types::{Ball, Direction, Paddle, Side};

/// One tick's worth of AI decision
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AiMove {
    pub direction: Direction,
    /// Share of the paddle speed used this tick
    pub speed_factor: f32,
}

pub struct AiPolicy;

impl AiPolicy {
    /// Direction toward `ball_y`. `difficulty` only scales the step size.
    pub fn decide(ball_y: f32, paddle_center_y: f32, difficulty: f32) -> AiMove {
        let direction = if ball_y > paddle_center_y {
            Direction::Down
        } else if ball_y < paddle_center_y {
            Direction::Up
        } else {
            Direction::Stay
        };

        AiMove {
            direction,
            speed_factor: difficulty,
        }
    }

    /// Signed y-delta for this tick, before clamping
    pub fn paddle_delta(
        ball_y: f32,
        paddle_center_y: f32,
        difficulty: f32,
        paddle_speed: f32,
    ) -> f32 {
        let ai_move = Self::decide(ball_y, paddle_center_y, difficulty);
        ai_move.direction.sign() * paddle_speed * ai_move.speed_factor
    }

    /// The y the paddle should chase this tick
    pub fn target_y(ball: &Ball, paddle: &Paddle, config: &Config) -> f32 {
        if config.ai_returns_to_center && Self::ball_moving_away(ball, paddle.side) {
            config.field_height / 2.0
        } else {
            ball.pos.y
        }
    }

    fn ball_moving_away(ball: &Ball, side: Side) -> bool {
        match side {
            Side::Left => ball.vel.x > 0.0,
            Side::Right => ball.vel.x < 0.0,
        }
    }
}
