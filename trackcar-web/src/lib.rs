use wasm_bindgen::prelude::*;
use winit::{event_loop::EventLoop, window::WindowBuilder};

use trackcar_game::{config::SimConfig, track, vehicle::DriveMode, Simulation};
use trackcar_renderer::{window_title, State};

const PROCEDURAL_TRACK_SIZE: u32 = 256;

#[wasm_bindgen(start)]
async fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Couldn't initialize logger");

    if let Err(err) = start().await {
        log::error!("{err}");
    }
}

async fn start() -> Result<(), String> {
    let event_loop = EventLoop::new().map_err(|err| err.to_string())?;
    let window = WindowBuilder::new()
        .with_title(window_title(DriveMode::default()))
        .build(&event_loop)
        .map_err(|err| err.to_string())?;

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let canvas = web_sys::Element::from(window.canvas()?);
                doc.body()?.append_child(&canvas).ok()?;
                Some(())
            })
            .ok_or("Couldn't append canvas to document body.")?;
    }

    let config = SimConfig::default();
    let image = track::procedural_track(PROCEDURAL_TRACK_SIZE, &config.track);
    let simulation = Simulation::new(config).with_track(image);

    let clock = PerformanceClock::new().ok_or("No performance timer available")?;
    let mut state = State::new(&window, wgpu::Backends::GL, clock, simulation)
        .await
        .map_err(|err| err.to_string())?;

    let (w, h) = inner_size().ok_or("Couldn't read the window size")?;
    state.resize(winit::dpi::PhysicalSize::new(w, h));
    state.manual_size = true;

    state.run(event_loop).map_err(|err| err.to_string())
}

fn inner_size() -> Option<(u32, u32)> {
    let win = web_sys::window()?;
    let w = win.inner_width().ok()?.as_f64()? as u32;
    let h = win.inner_height().ok()?.as_f64()? as u32;
    Some((w, h))
}

/// Millisecond timestamps from `window.performance`.
struct PerformanceClock {
    performance: web_sys::Performance,
}

impl PerformanceClock {
    fn new() -> Option<Self> {
        let performance = web_sys::window()?.performance()?;
        Some(Self { performance })
    }
}

impl trackcar_renderer::clock::Clock for PerformanceClock {
    type Instant = f64;

    fn now(&self) -> f64 {
        self.performance.now()
    }

    fn seconds_elapsed(&self, start: f64, end: f64) -> f32 {
        ((end - start) / 1000.0) as f32
    }
}
