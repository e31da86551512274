//! Headless harness: plays whole matches with autopilot paddles and reports the outcome.
//!
//! Every match is played twice with the same seed and the two runs must agree,
//! which makes this a quick determinism check from the command line.

use color_eyre::eyre::{bail, WrapErr};
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use pong_core::{
    AiPolicy, Config, ConfigPatch, Direction, Event, InputSnapshot, MatchController, MatchEnd,
    Phase, Side, View,
};
use serde::Serialize;
use std::{
    env, fs,
    io::stdout,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// Runtime options read from the environment
#[derive(Debug, Clone)]
struct HarnessOptions {
    config: Config,
    matches: u32,
    max_ticks: u64,
}

impl HarnessOptions {
    fn from_env() -> color_eyre::Result<Self> {
        let mut config = Config::default();
        if let Ok(path) = env::var("PONG_CONFIG") {
            let text =
                fs::read_to_string(&path).wrap_err_with(|| format!("failed to read {path}"))?;
            let patch: ConfigPatch =
                serde_json::from_str(&text).wrap_err_with(|| format!("invalid config in {path}"))?;
            config.apply(&patch);
        }
        let seed = env::var("PONG_SEED").ok().and_then(|v| v.parse().ok());
        if let Some(seed) = seed {
            config.seed = seed;
        }

        let matches = env::var("PONG_MATCHES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        // Ten minutes of play at 60 Hz
        let max_ticks = env::var("PONG_MAX_TICKS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(36_000);

        Ok(Self {
            config,
            matches,
            max_ticks,
        })
    }
}

/// Result of one simulated match
#[derive(Debug, Clone, PartialEq, Serialize)]
struct MatchReport {
    seed: u64,
    ticks: u64,
    seconds: u64,
    points: u32,
    overtimes: u32,
    /// `None` when the tick cap was hit first
    end: Option<MatchEnd>,
}

/// Paddle autopilot: tracks the ball only while it is inbound on its own half
fn autopilot(view: &View, side: Side) -> Direction {
    let ball = &view.ball;
    let half = view.field_width / 2.0;
    let inbound = match side {
        Side::Left => ball.vel.x < 0.0 && ball.pos.x < half,
        Side::Right => ball.vel.x > 0.0 && ball.pos.x > half,
    };
    if !inbound {
        return Direction::Stay;
    }

    let paddle = &view.paddles[side.index()];
    AiPolicy::decide(ball.pos.y, paddle.center_y(), 1.0).direction
}

fn run_match(config: Config, max_ticks: u64, stop: &AtomicBool) -> color_eyre::Result<MatchReport> {
    let mut controller = MatchController::new();
    controller.start(config)?;

    let mut report = MatchReport {
        seed: config.seed,
        ticks: 0,
        seconds: 0,
        points: 0,
        overtimes: 0,
        end: None,
    };
    let ticks_per_second = u64::from(config.tick_hz);

    while controller.phase() == Phase::Running && report.ticks < max_ticks {
        if stop.load(Ordering::Relaxed) {
            bail!("interrupted");
        }

        let mut events = Vec::new();
        if let Some(view) = controller.view() {
            let mut input = InputSnapshot::idle();
            input.set(Side::Left, autopilot(&view, Side::Left));
            if config.is_multiplayer {
                input.set(Side::Right, autopilot(&view, Side::Right));
            }
            events.extend(controller.tick(&input));
        }
        report.ticks += 1;

        if report.ticks.is_multiple_of(ticks_per_second) {
            report.seconds += 1;
            events.extend(controller.second_elapsed());
        }

        for event in events {
            match event {
                Event::Scored { .. } => report.points += 1,
                Event::OvertimeStarted { .. } => report.overtimes += 1,
                Event::Finished(end) => report.end = Some(end),
            }
        }
    }

    Ok(report)
}

fn print_summary(index: u32, report: &MatchReport, deterministic: bool) -> color_eyre::Result<()> {
    let (color, text) = match report.end {
        Some(MatchEnd {
            winner: Some(Side::Left),
            ..
        }) => (Color::Blue, "left wins".to_string()),
        Some(MatchEnd {
            winner: Some(Side::Right),
            ..
        }) => (Color::Green, "right wins".to_string()),
        Some(_) => (Color::Yellow, "draw".to_string()),
        None => (
            Color::DarkGrey,
            format!("unfinished after {} ticks", report.ticks),
        ),
    };
    let score = report
        .end
        .map(|end| format!("{}-{}", end.score_left, end.score_right))
        .unwrap_or_else(|| "-".to_string());

    execute!(
        stdout(),
        Print(format!("match {index} (seed {}): ", report.seed)),
        SetForegroundColor(color),
        Print(format!("{text} {score}")),
        ResetColor,
        Print(format!(" in {} ticks", report.ticks)),
    )?;
    if !deterministic {
        execute!(
            stdout(),
            SetForegroundColor(Color::Red),
            Print(" [replay diverged]"),
            ResetColor
        )?;
    }
    execute!(stdout(), Print("\n"))?;
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let log_env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(log_env).init();

    let options = HarnessOptions::from_env()?;
    options
        .config
        .validate()
        .wrap_err("invalid match configuration")?;

    // Ctrl+C stops after the current tick
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))
        .wrap_err("failed to set Ctrl-C handler")?;

    log::info!(
        "running {} match(es), base seed {}, cap {} ticks",
        options.matches,
        options.config.seed,
        options.max_ticks
    );

    let mut reports = Vec::new();
    let mut diverged = 0;
    for index in 0..options.matches {
        let config = Config {
            seed: options.config.seed.wrapping_add(u64::from(index)),
            ..options.config
        };

        let report = run_match(config, options.max_ticks, &stop)?;
        let replay = run_match(config, options.max_ticks, &stop)?;
        let deterministic = report == replay;
        if !deterministic {
            log::warn!("seed {} diverged on replay", config.seed);
            diverged += 1;
        }

        print_summary(index, &report, deterministic)?;
        reports.push(report);
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);

    if diverged > 0 {
        bail!("{diverged} match(es) diverged on replay");
    }
    Ok(())
}
