//! Settings file: match configuration plus player names and key bindings.

use std::{env, fs, path::PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use pong_core::{Config, ConfigPatch, Side};
use ratatui::crossterm::event::KeyCode;
use serde::Deserialize;

/// Name shown for the computer-controlled right paddle
pub const BOT_NAME: &str = "PongBot";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Names {
    #[serde(rename = "Player1", alias = "player1")]
    pub player1: String,
    #[serde(rename = "Player2", alias = "player2")]
    pub player2: String,
}

impl Default for Names {
    fn default() -> Self {
        Self {
            player1: "Player1".to_string(),
            player2: "Player2".to_string(),
        }
    }
}

/// Key names for one player; missing entries keep the default layout
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyPair {
    pub up: Option<String>,
    pub down: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Controls {
    #[serde(rename = "Player1", alias = "player1")]
    pub player1: KeyPair,
    #[serde(rename = "Player2", alias = "player2")]
    pub player2: KeyPair,
}

/// Resolved key codes for both players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub p1_up: KeyCode,
    pub p1_down: KeyCode,
    pub p2_up: KeyCode,
    pub p2_down: KeyCode,
}

impl Bindings {
    /// Which player signal a key drives, if any. Arrows always work for player 2.
    pub fn lookup(&self, code: KeyCode) -> Option<(Side, bool)> {
        let code = normalize(code);
        if code == self.p1_up {
            Some((Side::Left, true))
        } else if code == self.p1_down {
            Some((Side::Left, false))
        } else if code == self.p2_up || code == KeyCode::Up {
            Some((Side::Right, true))
        } else if code == self.p2_down || code == KeyCode::Down {
            Some((Side::Right, false))
        } else {
            None
        }
    }

    /// Short label like "W/S" for the help bar
    pub fn label(&self, side: Side) -> String {
        let (up, down) = match side {
            Side::Left => (self.p1_up, self.p1_down),
            Side::Right => (self.p2_up, self.p2_down),
        };
        format!("{}/{}", key_label(up), key_label(down))
    }
}

/// Top-level settings document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub patch: ConfigPatch,
    pub names: Names,
    pub controls: Controls,
}

impl Settings {
    /// Load from the first CLI argument or `PONG_CONFIG`; defaults when neither is set
    pub fn load() -> color_eyre::Result<Self> {
        let path = env::args()
            .nth(1)
            .or_else(|| env::var("PONG_CONFIG").ok())
            .map(PathBuf::from);

        match path {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .wrap_err_with(|| format!("failed to read {}", path.display()))?;
                let settings = Self::from_json(&text)
                    .wrap_err_with(|| format!("invalid settings in {}", path.display()))?;
                log::info!("loaded settings from {}", path.display());
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(text: &str) -> color_eyre::Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.bindings()?;
        Ok(settings)
    }

    /// Match configuration with the file's overrides applied
    pub fn config(&self) -> Config {
        Config::default().merged(&self.patch)
    }

    /// The settings file fixes the serve seed
    pub fn has_pinned_seed(&self) -> bool {
        self.patch.seed.is_some()
    }

    /// Configuration for a new match; draws a fresh serve seed unless one is pinned
    pub fn match_config(&self, is_multiplayer: bool) -> Config {
        let mut config = self.config();
        config.is_multiplayer = is_multiplayer;
        if !self.has_pinned_seed() {
            config.seed = rand::random();
        }
        config
    }

    pub fn bindings(&self) -> color_eyre::Result<Bindings> {
        let key = |name: &Option<String>, fallback: &str| {
            parse_key(name.as_deref().unwrap_or(fallback))
        };
        let (p1, p2) = (&self.controls.player1, &self.controls.player2);

        Ok(Bindings {
            p1_up: key(&p1.up, "w")?,
            p1_down: key(&p1.down, "s")?,
            p2_up: key(&p2.up, "o")?,
            p2_down: key(&p2.down, "l")?,
        })
    }

    /// Display name for a side; the AI side is always the bot
    pub fn name(&self, side: Side, is_multiplayer: bool) -> &str {
        match side {
            Side::Left => &self.names.player1,
            Side::Right if !is_multiplayer => BOT_NAME,
            Side::Right => &self.names.player2,
        }
    }
}

fn parse_key(name: &str) -> color_eyre::Result<KeyCode> {
    let lower = name.to_lowercase();
    let code = match lower.as_str() {
        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(eyre!("unsupported key binding {:?}", name)),
            }
        }
    };
    Ok(code)
}

/// Letter keys compare case-insensitively
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        other => format!("{other:?}"),
    }
}
