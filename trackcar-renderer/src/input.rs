use winit::{event::ElementState, keyboard::KeyCode};

use trackcar_game::control::Command;

/// Maps a key transition onto a simulation command.
///
/// Auto-repeated presses are dropped so each physical press accelerates once.
pub fn command_for_key(key: KeyCode, state: ElementState, repeat: bool) -> Option<Command> {
    if repeat {
        return None;
    }

    match (key, state) {
        (KeyCode::KeyW, ElementState::Pressed) => Some(Command::Accelerate(1.0)),
        (KeyCode::KeyS, ElementState::Pressed) => Some(Command::Accelerate(-1.0)),
        (KeyCode::KeyA, ElementState::Pressed) => Some(Command::Steer(-1.0)),
        (KeyCode::KeyD, ElementState::Pressed) => Some(Command::Steer(1.0)),
        (KeyCode::KeyW | KeyCode::KeyS, ElementState::Released) => Some(Command::StopAccelerate),
        (KeyCode::KeyA | KeyCode::KeyD, ElementState::Released) => Some(Command::StopTurn),
        (KeyCode::KeyM, ElementState::Pressed) => Some(Command::ToggleMode),
        _ => None,
    }
}

/// Whether `key` drives the car, including its auto-repeat events.
pub fn is_bound(key: KeyCode) -> bool {
    matches!(
        key,
        KeyCode::KeyW | KeyCode::KeyS | KeyCode::KeyA | KeyCode::KeyD | KeyCode::KeyM
    )
}
