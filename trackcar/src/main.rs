use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::{event_loop::EventLoop, window::WindowBuilder};

use trackcar_game::{config::SimConfig, track, vehicle::DriveMode, Simulation};
use trackcar_renderer::{window_title, State};

const PROCEDURAL_TRACK_SIZE: u32 = 512;

/// Drive a car around a track image, by hand or on autopilot.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file overriding the default tuning constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Track image; dark pixels are road.
    #[arg(long, conflicts_with = "no_track")]
    track: Option<PathBuf>,

    /// Run without a track image.
    #[arg(long)]
    no_track: bool,

    /// Treat a missing track image as being off the track.
    #[arg(long)]
    strict: bool,
}

#[pollster::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("trackcar=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if args.strict {
        config.strict_track_checking = true;
    }

    let simulation = Simulation::new(config);
    let simulation = if args.no_track {
        log::info!("Running without a track image");
        simulation
    } else if let Some(path) = &args.track {
        let image = track::load_track_image(path)
            .with_context(|| format!("loading track from {}", path.display()))?;
        simulation.with_track(image)
    } else {
        let image = track::procedural_track(PROCEDURAL_TRACK_SIZE, &simulation.config().track);
        simulation.with_track(image)
    };

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(window_title(DriveMode::default()))
        .build(&event_loop)?;

    let mut state = State::new(&window, wgpu::Backends::all(), Clock, simulation).await?;

    state.run(event_loop)?;

    Ok(())
}

struct Clock;

impl trackcar_renderer::clock::Clock for Clock {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn seconds_elapsed(&self, start: Self::Instant, end: Self::Instant) -> f32 {
        let duration = end.duration_since(start);
        duration.as_secs_f32()
    }
}
