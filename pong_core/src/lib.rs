//! Pong core game engine - deterministic fixed-tick paddle-and-ball match

pub mod ai;
pub mod config;
pub mod controller;
pub mod game;
pub mod geometry;
pub mod physics;
pub mod render;
pub mod types;

pub use ai::{AiMove, AiPolicy};
pub use config::{Config, ConfigError, ConfigPatch, Difficulty, DifficultyValue};
pub use controller::{MatchController, MatchError, Phase};
pub use game::Game;
pub use render::{CellRect, RenderHelper};
pub use types::*;

#[cfg(test)]
mod match_scenarios {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_ball_leaving_left_edge_scores_for_right() {
        let config = Config::default();
        let mut game = Game::new(&config);
        game.paddles[0].y = 0.0;
        game.ball.pos = Vec2::new(400.0, 300.0);
        game.ball.vel = Vec2::new(-4.0, 4.0);

        let input = InputSnapshot::idle();
        let mut scored_at = None;
        for _ in 0..200 {
            if let Some(Event::Scored { scorer, score }) = game.step(&config, &input) {
                scored_at = Some((scorer, score));
                break;
            }
        }

        assert_eq!(scored_at, Some((Side::Right, [0, 1])));
        assert_eq!(game.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(game.ball.vel.x.abs(), 4.0);
        assert_eq!(game.ball.vel.y.abs(), 4.0);
    }

    #[test]
    fn test_paddle_at_top_stays_put() {
        let mut controller = MatchController::new();
        controller.start(Config::default()).unwrap();
        assert_eq!(controller.view().unwrap().paddles[0].y, 210.0);

        for _ in 0..200 {
            controller.tick(&InputSnapshot::new(true, false, false, false));
        }

        let view = controller.view().unwrap();
        assert_eq!(view.paddles[0].y, 0.0);
    }

    #[test]
    fn test_timed_tie_ends_in_draw() {
        let config = Config {
            is_timed_mode: true,
            time_duration_seconds: 1,
            ..Config::default()
        };
        let mut game = Game::new(&config);
        game.state.score_left = 3;
        game.state.score_right = 3;

        game.tick_clock(&config);

        assert!(game.state.is_over);
        assert_eq!(game.state.outcome, Some(Outcome::Draw));
        assert_eq!(game.state.match_end().unwrap().winner, None);
    }

    #[test]
    fn test_full_match_against_ai_finishes() {
        let config = Config {
            final_score: 3,
            ..Config::default()
        };
        let mut controller = MatchController::new();
        controller.start(config).unwrap();

        let mut scored = 0;
        let mut finished = Vec::new();
        for _ in 0..200_000 {
            for event in controller.tick(&InputSnapshot::idle()) {
                match event {
                    Event::Scored { .. } => scored += 1,
                    Event::Finished(end) => finished.push(end),
                    Event::OvertimeStarted { .. } => unreachable!(),
                }
            }
            if controller.phase() == Phase::Finished {
                break;
            }
        }

        assert_eq!(finished.len(), 1);
        let end = finished[0];
        assert_eq!(end.score_left + end.score_right, scored);
        assert_eq!(end.score_left.max(end.score_right), 3);
        assert!(end.winner.is_some());
    }
}
