//! Match configuration, partial overrides and validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named AI reaction presets
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn coefficient(self) -> f32 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Normal => 0.8,
            Difficulty::Hard => 1.0,
        }
    }
}

/// Match configuration. Immutable once a match has started.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Right paddle driven by player 2 instead of the AI
    pub is_multiplayer: bool,
    /// AI reaction coefficient in (0, 1]
    pub difficulty: f32,
    /// Score that ends the match
    pub final_score: u32,
    pub is_timed_mode: bool,
    pub time_duration_seconds: u32,
    pub overtime_enabled: bool,
    /// Seconds added when the clock runs out on a tie
    pub overtime_duration_seconds: u32,

    pub field_width: f32,
    pub field_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between each paddle and its goal line
    pub paddle_margin: f32,
    pub ball_radius: f32,

    /// Paddle movement (units per tick)
    pub paddle_speed: f32,
    /// Serve speed on each axis (units per tick)
    pub ball_speed: f32,
    /// Spin added per unit of strike offset from the paddle center
    pub bounce_smoothness: f32,
    /// Horizontal speed gained per paddle hit, as a share of `ball_speed`
    pub bounce_speed_ratio: f32,
    /// AI drifts back to the center while the ball travels away from it
    pub ai_returns_to_center: bool,

    /// Serve RNG seed
    pub seed: u64,
    /// Scheduler cadence (Hz)
    pub tick_hz: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            is_multiplayer: false,
            difficulty: Difficulty::Normal.coefficient(),
            final_score: 5,
            is_timed_mode: false,
            time_duration_seconds: 120,
            overtime_enabled: false,
            overtime_duration_seconds: 30,
            field_width: 800.0,
            field_height: 600.0,
            paddle_width: 28.0,
            paddle_height: 180.0,
            paddle_margin: 8.0,
            ball_radius: 16.0,
            paddle_speed: 4.0,
            ball_speed: 4.0,
            bounce_smoothness: 0.05,
            bounce_speed_ratio: 0.25,
            ai_returns_to_center: false,
            seed: 0xC0FFEE,
            tick_hz: 60,
        }
    }
}

impl Config {
    /// Overlay the keys present in `patch`; absent keys keep their value
    pub fn apply(&mut self, patch: &ConfigPatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })*
            };
        }

        merge!(
            is_multiplayer,
            final_score,
            is_timed_mode,
            time_duration_seconds,
            overtime_enabled,
            overtime_duration_seconds,
            field_width,
            field_height,
            paddle_width,
            paddle_height,
            paddle_margin,
            ball_radius,
            paddle_speed,
            ball_speed,
            bounce_smoothness,
            bounce_speed_ratio,
            ai_returns_to_center,
            seed,
            tick_hz,
        );

        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty.coefficient();
        }
    }

    /// Copy of `self` with `patch` applied
    pub fn merged(mut self, patch: &ConfigPatch) -> Self {
        self.apply(patch);
        self
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.difficulty > 0.0 && self.difficulty <= 1.0) {
            return Err(ConfigError::InvalidDifficulty(self.difficulty));
        }
        if self.final_score == 0 {
            return Err(ConfigError::InvalidFinalScore);
        }
        if self.is_timed_mode && self.time_duration_seconds == 0 {
            return Err(ConfigError::InvalidTimeDuration);
        }
        if self.overtime_enabled && self.overtime_duration_seconds == 0 {
            return Err(ConfigError::InvalidTimeDuration);
        }
        if self.tick_hz == 0 {
            return Err(ConfigError::InvalidTickRate);
        }

        let positive = [
            ("fieldWidth", self.field_width),
            ("fieldHeight", self.field_height),
            ("paddleWidth", self.paddle_width),
            ("paddleHeight", self.paddle_height),
            ("ballRadius", self.ball_radius),
            ("paddleSpeed", self.paddle_speed),
            ("ballSpeed", self.ball_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field: name, value });
            }
        }

        let non_negative = [
            ("paddleMargin", self.paddle_margin),
            ("bounceSmoothness", self.bounce_smoothness),
            ("bounceSpeedRatio", self.bounce_speed_ratio),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field: name, value });
            }
        }

        if self.paddle_height > self.field_height {
            return Err(ConfigError::DoesNotFit("paddle taller than the field"));
        }
        if 2.0 * (self.paddle_margin + self.paddle_width) >= self.field_width {
            return Err(ConfigError::DoesNotFit("paddles overlap across the field"));
        }
        if 2.0 * self.ball_radius >= self.field_height {
            return Err(ConfigError::DoesNotFit("ball taller than the field"));
        }
        if 2.0 * self.ball_radius >= self.field_width {
            return Err(ConfigError::DoesNotFit("ball wider than the field"));
        }

        Ok(())
    }

    /// Paddle x for a side, measured from the field's left edge
    pub fn paddle_x(&self, side: crate::Side) -> f32 {
        match side {
            crate::Side::Left => self.paddle_margin,
            crate::Side::Right => self.field_width - self.paddle_margin - self.paddle_width,
        }
    }

    /// Starting clock, if the match is timed
    pub fn initial_clock(&self) -> Option<u32> {
        self.is_timed_mode.then_some(self.time_duration_seconds)
    }
}

/// Partial configuration as read from a settings file.
///
/// Unknown keys are ignored and missing keys leave the base config untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub is_multiplayer: Option<bool>,
    pub difficulty: Option<DifficultyValue>,
    pub final_score: Option<u32>,
    pub is_timed_mode: Option<bool>,
    #[serde(alias = "timeDuration")]
    pub time_duration_seconds: Option<u32>,
    pub overtime_enabled: Option<bool>,
    pub overtime_duration_seconds: Option<u32>,
    pub field_width: Option<f32>,
    pub field_height: Option<f32>,
    pub paddle_width: Option<f32>,
    pub paddle_height: Option<f32>,
    pub paddle_margin: Option<f32>,
    pub ball_radius: Option<f32>,
    pub paddle_speed: Option<f32>,
    pub ball_speed: Option<f32>,
    pub bounce_smoothness: Option<f32>,
    pub bounce_speed_ratio: Option<f32>,
    pub ai_returns_to_center: Option<bool>,
    pub seed: Option<u64>,
    pub tick_hz: Option<u16>,
}

/// Difficulty given either as a coefficient or as a preset name
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DifficultyValue {
    Coefficient(f32),
    Preset(Difficulty),
}

impl DifficultyValue {
    pub fn coefficient(self) -> f32 {
        match self {
            DifficultyValue::Coefficient(value) => value,
            DifficultyValue::Preset(preset) => preset.coefficient(),
        }
    }
}

/// Configuration rejected at match start
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Difficulty outside (0, 1]
    InvalidDifficulty(f32),
    /// Final score must be at least 1
    InvalidFinalScore,
    /// Timed mode or overtime with a zero duration
    InvalidTimeDuration,
    /// Scheduler cadence of 0 Hz
    InvalidTickRate,
    NonPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    /// Entities cannot fit inside the field
    DoesNotFit(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDifficulty(value) => {
                write!(f, "difficulty must be in (0, 1], got {}", value)
            }
            ConfigError::InvalidFinalScore => write!(f, "finalScore must be greater than 0"),
            ConfigError::InvalidTimeDuration => {
                write!(f, "time and overtime durations must be greater than 0")
            }
            ConfigError::InvalidTickRate => write!(f, "tickHz must be greater than 0"),
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{} must not be negative, got {}", field, value)
            }
            ConfigError::DoesNotFit(reason) => write!(f, "field layout invalid: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}
