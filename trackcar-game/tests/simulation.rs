//! Invariant sweeps over random command and frame-time sequences.

use approx::assert_relative_eq;
use glam::{vec2, Vec2};
use image::{Rgb, RgbImage};
use proptest::prelude::*;

use trackcar_game::{
    config::SimConfig,
    control::Command,
    track::{procedural_track, TrackMapping},
    vehicle::{DriveMode, SteeringBias, VehicleState},
    Simulation,
};

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        prop_oneof![Just(1.0f32), Just(-1.0f32)].prop_map(Command::Accelerate),
        Just(Command::StopAccelerate),
        prop_oneof![Just(1.0f32), Just(-1.0f32)].prop_map(Command::Steer),
        Just(Command::StopTurn),
        Just(Command::ToggleMode),
    ]
}

fn arb_frame() -> impl Strategy<Value = (Vec<Command>, f32)> {
    (prop::collection::vec(arb_command(), 0..4), 0.0f32..0.5)
}

proptest! {
    #[test]
    fn speed_stays_within_limits(deltas in prop::collection::vec(-3.0f32..3.0, 0..400)) {
        let config = SimConfig::default();
        let mut vehicle = VehicleState::new(Vec2::ZERO, 0.0);

        for delta in deltas {
            vehicle.accelerate(delta, &config);
            prop_assert!(vehicle.speed >= config.max_reverse_speed);
            prop_assert!(vehicle.speed <= config.max_forward_speed);
        }
    }

    #[test]
    fn position_stays_within_boundary(frames in prop::collection::vec(arb_frame(), 1..300)) {
        let mapping = TrackMapping::default();
        let mut sim = Simulation::new(SimConfig::default())
            .with_track(procedural_track(64, &mapping));

        for (commands, delta_time) in frames {
            for command in commands {
                sim.push(command);
            }
            let report = sim.update(delta_time);

            prop_assert!(sim.bounds().contains(report.position));
            prop_assert!(sim.vehicle.speed >= -10.0 && sim.vehicle.speed <= 20.0);
        }
    }

    #[test]
    fn entering_autonomous_always_resets(
        speed in -10.0f32..20.0,
        steering in -15.0f32..15.0,
        correction in prop_oneof![
            Just(SteeringBias::Left),
            Just(SteeringBias::Straight),
            Just(SteeringBias::Right),
        ],
    ) {
        let mut vehicle = VehicleState {
            speed,
            steering_angle: steering,
            autonomous_correction: correction,
            ..VehicleState::new(Vec2::ZERO, 0.0)
        };

        prop_assert_eq!(vehicle.toggle_mode(), DriveMode::Autonomous);
        prop_assert_eq!(vehicle.speed, 0.0);
        prop_assert_eq!(vehicle.steering_angle, 0.0);
        prop_assert_eq!(vehicle.autonomous_correction, SteeringBias::Straight);
    }

    #[test]
    fn steer_at_rest_changes_nothing(direction in -1.0f32..1.0, initial in -15.0f32..15.0) {
        let config = SimConfig::default();
        let mut vehicle = VehicleState {
            steering_angle: initial,
            ..VehicleState::new(Vec2::ZERO, 0.0)
        };

        vehicle.steer(direction, &config);

        prop_assert_eq!(vehicle.steering_angle, initial);
    }
}

#[test]
fn manual_tick_from_rest_heading_north() {
    let mut sim = Simulation::new(SimConfig::default());
    sim.vehicle.position = vec2(2.0, -4.0);
    sim.vehicle.heading = 0.0;
    sim.vehicle.speed = 10.0;

    let report = sim.update(1.0);

    assert_relative_eq!(report.position.x, 2.0, epsilon = 1e-6);
    assert_relative_eq!(report.position.y, 6.0, epsilon = 1e-6);
}

#[test]
fn autonomous_vehicle_is_nudged_back_after_leaving_track() {
    let mut ground = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
    // Column u = 15 covers world x in [5, 6).
    for v in 0..20 {
        ground.put_pixel(15, v, Rgb([200, 200, 200]));
    }

    let mut sim = Simulation::new(SimConfig::default()).with_track(ground);
    sim.push(Command::ToggleMode);
    sim.update(0.0);
    sim.vehicle.position = vec2(5.5, 0.0);
    sim.vehicle.heading = 0.0;

    let report = sim.update(0.01);
    assert!(!report.on_track);
    assert_eq!(sim.vehicle.autonomous_correction, SteeringBias::Right);

    sim.update(0.01);
    assert_relative_eq!(sim.vehicle.heading, 359.0);
}

#[test]
fn leaving_texture_on_the_left_biases_left() {
    let black = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
    let mut sim = Simulation::new(SimConfig::default()).with_track(black);
    sim.vehicle.position = vec2(-10.5, 0.0);
    sim.vehicle.heading = 0.0;

    let report = sim.update(0.0);

    assert!(!report.on_track);
    assert_eq!(sim.vehicle.autonomous_correction, SteeringBias::Left);
}
