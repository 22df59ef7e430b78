//! Rewind Player
//!
//! Headless runner for the replay engine: loads a config document and its
//! trajectory table, then drives playback with a fixed frame delta,
//! printing the heads-up time display through a console overlay. Useful
//! for inspecting a recording without a scene host attached.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use rewind_data::{load_config, load_trajectory_csv};
use rewind_engine::{OverlayFrame, OverlaySurface, ReplayEngine};

/// Rewind - Trajectory Replay Player
#[derive(Parser, Debug)]
#[command(name = "rewind-player")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the replay config JSON
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Playback speed multiplier (floored at 0.1)
    #[arg(short, long, default_value_t = 1.0)]
    speed: f64,

    /// Jump between summary events instead of advancing by elapsed time
    #[arg(short, long)]
    events: bool,

    /// Frame delta in seconds
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Maximum number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
}

/// Overlay that prints the time display and label count to the terminal.
#[derive(Debug, Default)]
struct ConsoleOverlay {
    visible: bool,
}

impl OverlaySurface for ConsoleOverlay {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn update(&mut self, frame: &OverlayFrame) {
        if !self.visible {
            return;
        }
        println!(
            "{} {}  [{} objects]",
            frame.date_text,
            frame.time_text,
            frame.labels.len()
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Player error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let rows = load_trajectory_csv(&config.data_path)?;

    let mut engine = ReplayEngine::new();
    engine.load(&config, &rows)?;
    if !engine.has_data() {
        info!("No trajectory data to replay");
        return Ok(());
    }

    engine.set_speed(args.speed);
    if args.events {
        engine.set_event_mode(true);
    }

    let mut overlay = ConsoleOverlay::default();
    overlay.set_visible(true);

    engine.toggle_playback();
    for _ in 0..args.frames {
        engine.tick(args.dt);
        overlay.update(&engine.overlay_frame());
        if !engine.is_playing() {
            break;
        }
    }

    if let Some(stage_time) = engine.current_stage_time() {
        info!("Playback halted at {}", stage_time);
    }
    Ok(())
}
