use crate::{config::SimConfig, vehicle::VehicleState};

/// A control input, queued by the input layer and applied at the start of the
/// next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `+1.0` forward, `-1.0` reverse.
    Accelerate(f32),
    StopAccelerate,
    /// `+1.0` or `-1.0`, scaled by the steering rate.
    Steer(f32),
    StopTurn,
    ToggleMode,
}

impl Command {
    pub fn apply(self, vehicle: &mut VehicleState, config: &SimConfig) {
        match self {
            Command::Accelerate(delta) => vehicle.accelerate(delta, config),
            Command::StopAccelerate => vehicle.stop_accelerate(),
            Command::Steer(direction) => vehicle.steer(direction, config),
            Command::StopTurn => vehicle.stop_turn(),
            Command::ToggleMode => {
                let mode = vehicle.toggle_mode();
                log::info!("Switched to {} mode", mode.name());
            }
        }
    }
}
