use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::{Duration, Instant};

use hand_blaster::config::{Config, APP_DIR_NAME};
use hand_blaster::error::{AppResult, CaptureError};
use hand_blaster::game::{Clock, RoundSummary, SystemClock};
use hand_blaster::messaging::{Command, Event};
use hand_blaster::persistence::JsonScoreStore;
use hand_blaster::tracking::{
    spawn_landmark_source, synthetic::RELAXED_PINCH, FrameSlot, HandPoseBuilder, LandmarkFrame,
    ScriptedSource, UnavailableSource,
};
use hand_blaster::utils::TickStats;
use hand_blaster::GameSession;

const LOG_TARGET_STARTUP: &str = "hand_blaster::startup";

/// Scripted hand frame rate
const DEMO_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Ticks between two automatic pointer clicks in pointer-only mode
const POINTER_FIRE_EVERY: u64 = 40;

#[derive(Debug, Default)]
struct Args {
    pointer_only: bool,
    seconds: Option<u64>,
}

fn parse_args() -> AppResult<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--pointer-only" => args.pointer_only = true,
            "--seconds" => {
                let value = iter.next().context("--seconds needs a value")?;
                let seconds = value
                    .parse::<u64>()
                    .with_context(|| format!("Invalid --seconds value: {}", value))?;
                args.seconds = Some(seconds);
            }
            other => bail!("Unknown argument: {} (expected --pointer-only, --seconds N)", other),
        }
    }

    Ok(args)
}

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/HandBlaster/logs/`, one file per day.
///
/// Log output:
/// - Debug builds: Console + File
/// - Release builds: File only
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "hand-blaster.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

/// A hand sweeping left to right, pulling the trigger every 20 frames and
/// briefly leaving the frame once per pass.
fn demo_frames() -> Vec<Option<LandmarkFrame>> {
    const FRAMES: usize = 120;

    (0..FRAMES)
        .map(|i| {
            if i == FRAMES / 2 {
                return None;
            }
            let t = i as f64 / FRAMES as f64;
            let x = 0.2 + 0.6 * t;
            let y = 0.5 + 0.2 * (t * std::f64::consts::TAU).sin();
            let pinch = if i % 20 == 19 { 0.04 } else { RELAXED_PINCH };
            Some(HandPoseBuilder::new().aim_at(x, y).pinch(pinch).build())
        })
        .collect()
}

fn run_round(
    session: &mut GameSession,
    slot: &FrameSlot,
    clock: &impl Clock,
    tick_interval: Duration,
    pointer_only: bool,
) -> Option<RoundSummary> {
    let commands = session.command_sender();
    let (events, _id) = session.subscribe();
    let mut stats = TickStats::new();
    let mut rng = StdRng::from_entropy();
    let mut ticks: u64 = 0;

    if commands.send(Command::Start).is_err() {
        tracing::error!("Command queue closed before the round started");
        return None;
    }

    let summary = loop {
        let tick_start = clock.now();
        session.tick_from_slot(tick_start, slot);
        ticks += 1;

        if pointer_only && ticks % POINTER_FIRE_EVERY == 0 {
            let live = session.snapshot().targets;
            let target = if live.is_empty() || rng.gen_bool(0.25) {
                None
            } else {
                Some(live[rng.gen_range(0..live.len())].id)
            };
            if let Err(e) = commands.send(Command::PointerFire { target }) {
                tracing::debug!("Dropped pointer click: {}", e);
            }
        }

        for event in events.try_iter() {
            match &event {
                Event::ShotResolved { .. } | Event::RoundEnded { .. } => {
                    tracing::info!("{}", event.description());
                }
                _ => tracing::debug!("{}", event.description()),
            }
        }

        if let Some(summary) = session.summary() {
            break Some(summary);
        }

        let elapsed = Instant::now().saturating_duration_since(tick_start);
        stats.add(elapsed);
        if let Some(rest) = tick_interval.checked_sub(elapsed) {
            thread::sleep(rest);
        }
    };

    stats.log_report();
    summary
}

fn main() -> AppResult<()> {
    initialize_tracing();
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting Hand Blaster v{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH
    );

    let args = parse_args()?;

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(seconds) = args.seconds {
        config.round_duration_secs = seconds;
        config.validate()?;
    }
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Round: {}s, cooldown {}ms, max {} targets",
        config.round_duration_secs,
        config.fire_cooldown_ms,
        config.max_live_targets
    );

    println!("===========================================");
    println!("  Hand Blaster");
    println!("===========================================\n");

    let slot = FrameSlot::new(config.frame_timeout());
    let source_thread = if args.pointer_only {
        spawn_landmark_source(
            UnavailableSource::new(CaptureError::CameraUnavailable(
                "disabled by --pointer-only".to_string(),
            )),
            slot.clone(),
        )
    } else {
        spawn_landmark_source(
            ScriptedSource::new(demo_frames(), DEMO_FRAME_INTERVAL).looping(),
            slot.clone(),
        )
    }
    .context("Failed to start landmark source")?;

    let mut session = GameSession::new(&config);
    let summary = run_round(
        &mut session,
        &slot,
        &SystemClock,
        config.tick_interval(),
        args.pointer_only,
    );

    slot.close();
    if source_thread.join().is_err() {
        tracing::warn!("Landmark source thread panicked");
    }

    let Some(summary) = summary else {
        bail!("Round did not finish");
    };

    println!("Final score: {}", summary.final_score);
    println!(
        "Accuracy:    {:.1}% ({} / {})",
        summary.accuracy, summary.hits, summary.shots
    );

    let store = JsonScoreStore::open_default()?;
    match store.record(&summary, config.history_capacity) {
        Ok((book, outcome)) => {
            if outcome.is_new_high_score {
                println!("New high score!");
            }
            println!("High score:  {}", book.high_score);
            if let Some(rank) = outcome.rank {
                println!("Rank:        #{}", rank);
            }
        }
        Err(e) => {
            tracing::error!("Failed to record score: {:#}", anyhow::Error::from(e));
            eprintln!("✗ Could not save score history");
        }
    }

    Ok(())
}
