//! Per-phase physics operations used by the simulation step.

use glam::Vec2;
use rand::Rng;

use crate::ai::AiPolicy;
use crate::config::Config;
use crate::geometry::circle_intersects_rect;
use crate::types::*;

/// Physics calculations for game simulation
pub struct Physics;

impl Physics {
    /// Move a player paddle by one tick of input, then clamp to the field
    pub fn update_paddle(paddle: &mut Paddle, input: &InputSnapshot, config: &Config) {
        let direction = input.direction(paddle.side);
        paddle.y += direction.sign() * config.paddle_speed;
        paddle.clamp_to_field(config.field_height);
    }

    /// Move the computer paddle toward its target, then clamp to the field
    pub fn update_ai_paddle(paddle: &mut Paddle, ball: &Ball, config: &Config) {
        let target_y = AiPolicy::target_y(ball, paddle, config);
        paddle.y += AiPolicy::paddle_delta(
            target_y,
            paddle.center_y(),
            config.difficulty,
            config.paddle_speed,
        );
        paddle.clamp_to_field(config.field_height);
    }

    /// Advance the ball by its velocity
    pub fn update_ball(ball: &mut Ball) {
        ball.pos += ball.vel;
    }

    /// Reflect off the top and bottom walls. Returns true on a bounce.
    ///
    /// Only a ball still heading into the wall is reflected, so a ball that
    /// is past the wall but already returning is left alone.
    pub fn bounce_off_walls(ball: &mut Ball, field_height: f32) -> bool {
        let into_top = ball.top() < 0.0 && ball.vel.y < 0.0;
        let into_bottom = ball.bottom() > field_height && ball.vel.y > 0.0;

        if into_top || into_bottom {
            ball.vel.y = -ball.vel.y;
            true
        } else {
            false
        }
    }

    /// Check for paddle-ball collision and handle it
    pub fn check_paddle_collision(ball: &mut Ball, paddle: &Paddle, config: &Config) -> bool {
        let rect = paddle.rect();
        if !circle_intersects_rect(&ball.circle(), &rect) {
            return false;
        }

        // Spin from where the ball struck relative to the paddle center
        ball.vel.y += (ball.pos.y - paddle.center_y()) * config.bounce_smoothness;

        // Rallies speed up by a fixed amount per hit
        let speed_x = ball.vel.x.abs() + config.ball_speed * config.bounce_speed_ratio;

        // Send the ball away from the paddle and snap it clear of the face
        match paddle.side {
            Side::Left => {
                ball.vel.x = speed_x;
                ball.pos.x = rect.right() + ball.radius;
            }
            Side::Right => {
                ball.vel.x = -speed_x;
                ball.pos.x = rect.left() - ball.radius;
            }
        }

        true
    }

    /// Check if the ball crossed a goal line (scoring condition)
    pub fn check_scoring(ball: &Ball, field_width: f32) -> Option<Side> {
        if ball.left() < 0.0 {
            Some(Side::Right) // Right player scored
        } else if ball.right() > field_width {
            Some(Side::Left) // Left player scored
        } else {
            None
        }
    }

    /// Put the ball back at the center with a random diagonal direction
    pub fn serve_ball(ball: &mut Ball, config: &Config, rng: &mut GameRng) {
        ball.pos = Vec2::new(config.field_width / 2.0, config.field_height / 2.0);

        let vx = if rng.random_bool(0.5) {
            config.ball_speed
        } else {
            -config.ball_speed
        };
        let vy = if rng.random_bool(0.5) {
            config.ball_speed
        } else {
            -config.ball_speed
        };

        ball.vel = Vec2::new(vx, vy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn left_paddle(config: &Config, y: f32) -> Paddle {
        Paddle::new(
            Side::Left,
            config.paddle_x(Side::Left),
            y,
            config.paddle_width,
            config.paddle_height,
        )
    }

    fn right_paddle(config: &Config, y: f32) -> Paddle {
        Paddle::new(
            Side::Right,
            config.paddle_x(Side::Right),
            y,
            config.paddle_width,
            config.paddle_height,
        )
    }

    #[test]
    fn test_paddle_movement() {
        let config = Config::default();
        let mut paddle = left_paddle(&config, 200.0);
        let up = InputSnapshot::new(true, false, false, false);
        let down = InputSnapshot::new(false, true, false, false);

        Physics::update_paddle(&mut paddle, &up, &config);
        assert_eq!(paddle.y, 196.0);

        Physics::update_paddle(&mut paddle, &down, &config);
        assert_eq!(paddle.y, 200.0);

        Physics::update_paddle(&mut paddle, &InputSnapshot::idle(), &config);
        assert_eq!(paddle.y, 200.0);
    }

    #[test]
    fn test_both_keys_move_up_only() {
        let config = Config::default();
        let mut paddle = left_paddle(&config, 200.0);
        let both = InputSnapshot::new(true, true, false, false);

        Physics::update_paddle(&mut paddle, &both, &config);

        assert_eq!(paddle.y, 196.0);
    }

    #[test]
    fn test_paddle_bounds() {
        let config = Config::default();
        let mut paddle = left_paddle(&config, 0.0);
        let up = InputSnapshot::new(true, false, false, false);
        let down = InputSnapshot::new(false, true, false, false);

        Physics::update_paddle(&mut paddle, &up, &config);
        assert_eq!(paddle.y, 0.0);

        paddle.y = config.field_height - config.paddle_height - 1.0;
        Physics::update_paddle(&mut paddle, &down, &config);
        assert_eq!(paddle.y, config.field_height - config.paddle_height);
    }

    #[test]
    fn test_right_paddle_reads_player_two() {
        let config = Config::default();
        let mut paddle = right_paddle(&config, 200.0);

        // Player 1 up is ignored, player 2 down moves the right paddle
        let input = InputSnapshot::new(true, false, false, true);

        Physics::update_paddle(&mut paddle, &input, &config);

        assert_eq!(paddle.y, 204.0);
    }

    #[test]
    fn test_ai_paddle_tracks_ball() {
        let config = Config {
            difficulty: 1.0,
            ..Config::default()
        };
        // Center at 100
        let mut paddle = right_paddle(&config, 100.0 - config.paddle_height / 2.0);
        let ball = Ball::new(Vec2::new(400.0, 200.0), Vec2::new(4.0, 0.0), 16.0);

        Physics::update_ai_paddle(&mut paddle, &ball, &config);

        assert_eq!(paddle.center_y(), 104.0);
    }

    #[test]
    fn test_ai_paddle_is_clamped() {
        let config = Config {
            difficulty: 1.0,
            ..Config::default()
        };
        let mut paddle = right_paddle(&config, 1.0);
        let ball = Ball::new(Vec2::new(400.0, 0.0), Vec2::new(4.0, -4.0), 16.0);

        Physics::update_ai_paddle(&mut paddle, &ball, &config);

        assert_eq!(paddle.y, 0.0);
    }

    #[test]
    fn test_ball_wall_collision() {
        let mut ball = Ball::new(Vec2::new(400.0, 10.0), Vec2::new(4.0, -4.0), 16.0);

        assert!(Physics::bounce_off_walls(&mut ball, 600.0));
        assert_eq!(ball.vel, Vec2::new(4.0, 4.0));

        // Still overlapping the wall but already heading back: no second flip
        assert!(!Physics::bounce_off_walls(&mut ball, 600.0));
        assert_eq!(ball.vel.y, 4.0);

        let mut ball = Ball::new(Vec2::new(400.0, 590.0), Vec2::new(-4.0, 6.0), 16.0);
        assert!(Physics::bounce_off_walls(&mut ball, 600.0));
        assert_eq!(ball.vel, Vec2::new(-4.0, -6.0));
    }

    #[test]
    fn test_paddle_collision() {
        let config = Config::default();
        let paddle = left_paddle(&config, 210.0); // center 300

        let mut ball = Ball::new(Vec2::new(40.0, 300.0), Vec2::new(-4.0, 0.0), 16.0);
        let hit = Physics::check_paddle_collision(&mut ball, &paddle, &config);

        assert!(hit);
        assert_eq!(ball.vel.x, 4.0 + 4.0 * 0.25);
        assert_eq!(ball.vel.y, 0.0);
        assert_eq!(ball.pos.x, paddle.rect().right() + ball.radius);
    }

    #[test]
    fn test_paddle_spin_follows_strike_offset() {
        let config = Config::default();
        let paddle = right_paddle(&config, 210.0); // center 300

        let mut low = Ball::new(Vec2::new(760.0, 360.0), Vec2::new(4.0, 0.0), 16.0);
        assert!(Physics::check_paddle_collision(&mut low, &paddle, &config));
        assert!((low.vel.y - 60.0 * 0.05).abs() < 1e-5);
        assert_eq!(low.vel.x, -5.0);
        assert_eq!(low.pos.x, paddle.rect().left() - low.radius);

        let mut high = Ball::new(Vec2::new(760.0, 240.0), Vec2::new(4.0, 0.0), 16.0);
        assert!(Physics::check_paddle_collision(&mut high, &paddle, &config));
        assert!(high.vel.y < 0.0);
    }

    #[test]
    fn test_collision_snap_prevents_retrigger() {
        let config = Config::default();
        let paddle = left_paddle(&config, 210.0);

        // Fast ball embedded deep inside the paddle
        let mut ball = Ball::new(Vec2::new(20.0, 300.0), Vec2::new(-30.0, 0.0), 16.0);
        assert!(Physics::check_paddle_collision(&mut ball, &paddle, &config));

        Physics::update_ball(&mut ball);
        let hit_again = Physics::check_paddle_collision(&mut ball, &paddle, &config);
        assert!(!hit_again);
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_no_collision_far_away() {
        let config = Config::default();
        let paddle = left_paddle(&config, 210.0);
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), Vec2::new(-4.0, 4.0), 16.0);

        let hit = Physics::check_paddle_collision(&mut ball, &paddle, &config);
        assert!(!hit);
        assert_eq!(ball.vel, Vec2::new(-4.0, 4.0));
    }

    #[test]
    fn test_scoring_detection() {
        let past_left = Ball::new(Vec2::new(15.0, 300.0), Vec2::ZERO, 16.0);
        assert_eq!(Physics::check_scoring(&past_left, 800.0), Some(Side::Right));

        let past_right = Ball::new(Vec2::new(785.0, 300.0), Vec2::ZERO, 16.0);
        assert_eq!(Physics::check_scoring(&past_right, 800.0), Some(Side::Left));

        let center = Ball::new(Vec2::new(400.0, 300.0), Vec2::ZERO, 16.0);
        assert_eq!(Physics::check_scoring(&center, 800.0), None);

        let touching = Ball::new(Vec2::new(16.0, 300.0), Vec2::ZERO, 16.0);
        assert_eq!(Physics::check_scoring(&touching, 800.0), None);
    }

    #[test]
    fn test_serve_ball() {
        let config = Config::default();
        let mut ball = Ball::new(Vec2::new(3.0, 3.0), Vec2::ZERO, 16.0);
        let mut rng = GameRng::seed_from_u64(12345);

        for _ in 0..16 {
            Physics::serve_ball(&mut ball, &config, &mut rng);

            assert_eq!(ball.pos, Vec2::new(400.0, 300.0));
            assert_eq!(ball.vel.x.abs(), config.ball_speed);
            assert_eq!(ball.vel.y.abs(), config.ball_speed);
        }
    }

    #[test]
    fn test_deterministic_serve() {
        let config = Config::default();
        let mut ball1 = Ball::new(Vec2::ZERO, Vec2::ZERO, 16.0);
        let mut ball2 = Ball::new(Vec2::ZERO, Vec2::ZERO, 16.0);
        let mut rng1 = GameRng::seed_from_u64(7);
        let mut rng2 = GameRng::seed_from_u64(7);

        for _ in 0..8 {
            Physics::serve_ball(&mut ball1, &config, &mut rng1);
            Physics::serve_ball(&mut ball2, &config, &mut rng2);
            assert_eq!(ball1.vel, ball2.vel);
        }
    }
}
