//! Core types for the paddle-and-ball match engine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, Rect};

/// Tick counter type
pub type Tick = u32;

/// Seeded generator used for serve directions
pub type GameRng = rand_pcg::Pcg32;

/// Player/paddle side
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Index into `[left, right]` arrays
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Vertical movement request for a paddle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Stay,
}

impl Direction {
    /// Sign of the y-delta (screen coordinates, y grows downward)
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
            Direction::Stay => 0.0,
        }
    }
}

/// Paddle state. `y` is the top edge; `x` never changes during a match.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub side: Side,
}

impl Paddle {
    pub fn new(side: Side, x: f32, y: f32, width: f32, height: f32) -> Self {
        Paddle {
            x,
            y,
            width,
            height,
            side,
        }
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Keep the paddle fully inside `[0, field_height]`
    pub fn clamp_to_field(&mut self, field_height: f32) {
        let max_y = (field_height - self.height).max(0.0);
        self.y = self.y.clamp(0.0, max_y);
    }
}

/// Ball state
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Velocity in field units per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Ball { pos, vel, radius }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.radius
    }
}

/// Point-in-time pressed state of the four logical paddle signals.
///
/// Player 1 drives the left paddle, player 2 the right one.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub p1_up: bool,
    pub p1_down: bool,
    pub p2_up: bool,
    pub p2_down: bool,
}

impl InputSnapshot {
    pub fn new(p1_up: bool, p1_down: bool, p2_up: bool, p2_down: bool) -> Self {
        InputSnapshot {
            p1_up,
            p1_down,
            p2_up,
            p2_down,
        }
    }

    /// Nothing pressed
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, side: Side, direction: Direction) -> bool {
        match (side, direction) {
            (Side::Left, Direction::Up) => self.p1_up,
            (Side::Left, Direction::Down) => self.p1_down,
            (Side::Right, Direction::Up) => self.p2_up,
            (Side::Right, Direction::Down) => self.p2_down,
            (_, Direction::Stay) => false,
        }
    }

    /// Resolved direction for one side; "up" wins when both are held
    pub fn direction(&self, side: Side) -> Direction {
        if self.is_pressed(side, Direction::Up) {
            Direction::Up
        } else if self.is_pressed(side, Direction::Down) {
            Direction::Down
        } else {
            Direction::Stay
        }
    }

    /// Set the signals for one side from a resolved direction
    pub fn set(&mut self, side: Side, direction: Direction) {
        let (up, down) = match direction {
            Direction::Up => (true, false),
            Direction::Down => (false, true),
            Direction::Stay => (false, false),
        };
        match side {
            Side::Left => {
                self.p1_up = up;
                self.p1_down = down;
            }
            Side::Right => {
                self.p2_up = up;
                self.p2_down = down;
            }
        }
    }
}

/// How a finished match was decided
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Winner(side) => Some(side),
            Outcome::Draw => None,
        }
    }
}

/// Score, clock and termination flags of one match
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub score_left: u32,
    pub score_right: u32,
    pub final_score: u32,
    /// Seconds left on the clock; `None` outside timed mode
    pub clock_remaining: Option<u32>,
    pub in_overtime: bool,
    pub is_running: bool,
    pub is_over: bool,
    pub outcome: Option<Outcome>,
}

impl MatchState {
    pub fn new(final_score: u32, clock_remaining: Option<u32>) -> Self {
        MatchState {
            score_left: 0,
            score_right: 0,
            final_score,
            clock_remaining,
            in_overtime: false,
            is_running: true,
            is_over: false,
            outcome: None,
        }
    }

    pub fn score(&self) -> [u32; 2] {
        [self.score_left, self.score_right]
    }

    pub fn total_points(&self) -> u32 {
        self.score_left + self.score_right
    }

    pub fn award_point(&mut self, scorer: Side) {
        match scorer {
            Side::Left => self.score_left += 1,
            Side::Right => self.score_right += 1,
        }
    }

    /// Higher score wins; equal scores are a draw
    pub fn leader(&self) -> Outcome {
        if self.score_left > self.score_right {
            Outcome::Winner(Side::Left)
        } else if self.score_right > self.score_left {
            Outcome::Winner(Side::Right)
        } else {
            Outcome::Draw
        }
    }

    /// Mark the match as over. Later calls keep the first outcome.
    pub fn finish(&mut self, outcome: Outcome) {
        if self.is_over {
            return;
        }
        self.is_over = true;
        self.is_running = false;
        self.outcome = Some(outcome);
    }

    /// Terminal notification payload, once the match is over
    pub fn match_end(&self) -> Option<MatchEnd> {
        self.outcome.map(|outcome| MatchEnd {
            winner: outcome.winner(),
            score_left: self.score_left,
            score_right: self.score_right,
        })
    }
}

/// Terminal event surfaced to the presentation layer
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEnd {
    /// `None` for a draw
    pub winner: Option<Side>,
    pub score_left: u32,
    pub score_right: u32,
}

/// Things that happened during a tick or clock second
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Scored {
        scorer: Side,
        score: [u32; 2], // New score after this point
    },
    OvertimeStarted {
        extra_seconds: u32,
    },
    Finished(MatchEnd),
}

/// Read-only snapshot handed to renderers
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View {
    pub tick: Tick,
    pub field_width: f32,
    pub field_height: f32,
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub state: MatchState,
}
