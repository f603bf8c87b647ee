use glam::{vec2, Vec2};

use crate::{bounds::Bounds, config::SimConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveMode {
    #[default]
    Manual,
    Autonomous,
}

impl DriveMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Autonomous,
            Self::Autonomous => Self::Manual,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Autonomous => "Autonomous",
        }
    }
}

/// Heading nudge, in degrees per tick, applied while driving autonomously.
///
/// `Left` turns counter-clockwise (heading +1), `Right` clockwise (heading -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteeringBias {
    Right,
    #[default]
    Straight,
    Left,
}

impl SteeringBias {
    pub fn degrees(self) -> f32 {
        match self {
            Self::Right => -1.0,
            Self::Straight => 0.0,
            Self::Left => 1.0,
        }
    }

    /// Bias picked after leaving the track at horizontal position `x`.
    pub fn off_track_at(x: f32) -> Self {
        if x < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Kinematic state of the single simulated vehicle.
///
/// `heading` is in degrees; 0 faces +y and positive angles turn
/// counter-clockwise, so the forward vector is `(-sin h, cos h)`. The
/// integrators keep it in `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleState {
    pub position: Vec2,
    pub heading: f32,
    pub speed: f32,
    /// Turn rate in degrees per second. Only used in manual mode.
    pub steering_angle: f32,
    pub mode: DriveMode,
    pub autonomous_correction: SteeringBias,
}

impl VehicleState {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            ..Default::default()
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.start_position(), config.start_heading)
    }

    pub fn forward(&self) -> Vec2 {
        let heading = self.heading.to_radians();
        vec2(-heading.sin(), heading.cos())
    }

    pub fn accelerate(&mut self, delta: f32, config: &SimConfig) {
        if self.mode != DriveMode::Manual {
            return;
        }

        self.speed = (self.speed + delta * config.acceleration_rate)
            .max(config.max_reverse_speed)
            .min(config.max_forward_speed);
    }

    /// Not gated on the mode: this also halts an autonomous vehicle until the
    /// next mode switch.
    pub fn stop_accelerate(&mut self) {
        self.speed = 0.0;
    }

    pub fn steer(&mut self, direction: f32, config: &SimConfig) {
        if self.mode == DriveMode::Manual && self.speed != 0.0 {
            self.steering_angle = direction * config.steering_rate;
        }
    }

    pub fn stop_turn(&mut self) {
        self.steering_angle = 0.0;
    }

    pub fn toggle_mode(&mut self) -> DriveMode {
        self.mode = self.mode.toggled();

        if self.mode == DriveMode::Autonomous {
            self.speed = 0.0;
            self.steering_angle = 0.0;
            self.autonomous_correction = SteeringBias::Straight;
        }

        self.mode
    }

    pub fn integrate(&mut self, delta_time: f32, config: &SimConfig) {
        match self.mode {
            DriveMode::Manual => self.integrate_manual(delta_time),
            DriveMode::Autonomous => self.integrate_autonomous(delta_time, config.autonomous_speed),
        }
    }

    /// The heading changes first; the translation uses the new heading.
    pub fn integrate_manual(&mut self, delta_time: f32) {
        self.heading = (self.heading + self.steering_angle * delta_time).rem_euclid(360.0);
        self.position += self.forward() * self.speed * delta_time;
    }

    /// The correction is added once per tick and is not scaled by `delta_time`.
    pub fn integrate_autonomous(&mut self, delta_time: f32, autonomous_speed: f32) {
        self.heading = (self.heading + self.autonomous_correction.degrees()).rem_euclid(360.0);
        self.position += self.forward() * autonomous_speed * delta_time;
    }

    /// Applies in either mode; the bias only has an effect once autonomous.
    pub fn correct_off_track(&mut self) {
        self.autonomous_correction = SteeringBias::off_track_at(self.position.x);
    }

    pub fn clamp_to(&mut self, bounds: &Bounds) {
        self.position = bounds.clamp(self.position);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn manual_at_speed(speed: f32) -> VehicleState {
        VehicleState {
            speed,
            ..VehicleState::new(Vec2::ZERO, 0.0)
        }
    }

    #[test]
    fn starts_manual_and_straight() {
        let vehicle = VehicleState::from_config(&SimConfig::default());

        assert_eq!(vehicle.mode, DriveMode::Manual);
        assert_eq!(vehicle.position, vec2(-3.0, 8.0));
        assert_eq!(vehicle.heading, 90.0);
        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.autonomous_correction, SteeringBias::Straight);
    }

    #[test]
    fn accelerate_steps_by_rate_and_clamps() {
        let config = SimConfig::default();
        let mut vehicle = manual_at_speed(0.0);

        vehicle.accelerate(1.0, &config);
        assert_abs_diff_eq!(vehicle.speed, 0.2, epsilon = 1e-6);

        for _ in 0..500 {
            vehicle.accelerate(1.0, &config);
        }
        assert_eq!(vehicle.speed, 20.0);

        for _ in 0..500 {
            vehicle.accelerate(-1.0, &config);
        }
        assert_eq!(vehicle.speed, -10.0);
    }

    #[test]
    fn accelerate_is_ignored_when_autonomous() {
        let config = SimConfig::default();
        let mut vehicle = manual_at_speed(0.0);
        vehicle.toggle_mode();

        vehicle.accelerate(1.0, &config);

        assert_eq!(vehicle.speed, 0.0);
    }

    #[test]
    fn stop_accelerate_works_in_any_mode() {
        let mut vehicle = manual_at_speed(5.0);
        vehicle.mode = DriveMode::Autonomous;

        vehicle.stop_accelerate();

        assert_eq!(vehicle.speed, 0.0);
    }

    #[test]
    fn steer_needs_speed() {
        let config = SimConfig::default();
        let mut vehicle = manual_at_speed(0.0);
        vehicle.steering_angle = 7.0;

        vehicle.steer(1.0, &config);
        assert_eq!(vehicle.steering_angle, 7.0);

        vehicle.speed = -0.2;
        vehicle.steer(-1.0, &config);
        assert_eq!(vehicle.steering_angle, -15.0);

        vehicle.stop_turn();
        assert_eq!(vehicle.steering_angle, 0.0);
    }

    #[test]
    fn entering_autonomous_resets_controls() {
        let mut vehicle = manual_at_speed(12.0);
        vehicle.steering_angle = 15.0;
        vehicle.autonomous_correction = SteeringBias::Right;

        assert_eq!(vehicle.toggle_mode(), DriveMode::Autonomous);

        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.steering_angle, 0.0);
        assert_eq!(vehicle.autonomous_correction, SteeringBias::Straight);
    }

    #[test]
    fn entering_manual_keeps_correction() {
        let mut vehicle = manual_at_speed(0.0);
        vehicle.toggle_mode();
        vehicle.autonomous_correction = SteeringBias::Left;

        assert_eq!(vehicle.toggle_mode(), DriveMode::Manual);

        assert_eq!(vehicle.autonomous_correction, SteeringBias::Left);
    }

    #[test]
    fn manual_tick_heading_north() {
        let mut vehicle = VehicleState {
            position: vec2(1.0, 2.0),
            ..manual_at_speed(10.0)
        };

        vehicle.integrate_manual(1.0);

        assert_abs_diff_eq!(vehicle.position.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(vehicle.position.y, 12.0, epsilon = 1e-6);
    }

    #[test]
    fn manual_tick_translates_along_updated_heading() {
        let mut vehicle = manual_at_speed(10.0);
        vehicle.steering_angle = 90.0;

        vehicle.integrate_manual(1.0);

        // Heading 90 faces -x.
        assert_eq!(vehicle.heading, 90.0);
        assert_abs_diff_eq!(vehicle.position.x, -10.0, epsilon = 1e-5);
        assert_abs_diff_eq!(vehicle.position.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn autonomous_tick_adds_unscaled_bias() {
        let mut vehicle = manual_at_speed(0.0);
        vehicle.mode = DriveMode::Autonomous;
        vehicle.autonomous_correction = SteeringBias::Left;

        vehicle.integrate_autonomous(0.5, 10.0);

        assert_eq!(vehicle.heading, 1.0);
        let expected = vec2(-1.0_f32.to_radians().sin(), 1.0_f32.to_radians().cos()) * 5.0;
        assert_abs_diff_eq!(vehicle.position.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(vehicle.position.y, expected.y, epsilon = 1e-5);
    }

    #[test]
    fn heading_wraps_into_one_turn() {
        let mut vehicle = manual_at_speed(0.0);
        vehicle.mode = DriveMode::Autonomous;
        vehicle.autonomous_correction = SteeringBias::Right;

        vehicle.integrate_autonomous(0.0, 10.0);
        assert_eq!(vehicle.heading, 359.0);

        vehicle.heading = 359.5;
        vehicle.autonomous_correction = SteeringBias::Left;
        vehicle.integrate_autonomous(0.0, 10.0);
        assert_abs_diff_eq!(vehicle.heading, 0.5, epsilon = 1e-4);

        vehicle.mode = DriveMode::Manual;
        vehicle.steering_angle = -15.0;
        vehicle.integrate_manual(1.0);
        assert_abs_diff_eq!(vehicle.heading, 345.5, epsilon = 1e-4);
    }

    #[test]
    fn autonomous_correction_keeps_turning_after_many_ticks() {
        let mut vehicle = manual_at_speed(0.0);
        vehicle.mode = DriveMode::Autonomous;
        vehicle.autonomous_correction = SteeringBias::Left;

        for _ in 0..100_000 {
            vehicle.integrate_autonomous(0.0, 10.0);
        }

        // 100_000 mod 360 = 280.
        assert_abs_diff_eq!(vehicle.heading, 280.0, epsilon = 1e-3);
    }

    #[test]
    fn autonomous_ignores_manual_speed() {
        let config = SimConfig::default();
        let mut vehicle = manual_at_speed(3.0);
        vehicle.mode = DriveMode::Autonomous;

        vehicle.integrate(1.0, &config);

        assert_abs_diff_eq!(vehicle.position.y, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn off_track_correction_steers_by_side() {
        let mut vehicle = VehicleState::new(vec2(5.0, 0.0), 0.0);
        vehicle.correct_off_track();
        assert_eq!(vehicle.autonomous_correction, SteeringBias::Right);
        assert_eq!(vehicle.autonomous_correction.degrees(), -1.0);

        vehicle.position.x = -5.0;
        vehicle.correct_off_track();
        assert_eq!(vehicle.autonomous_correction, SteeringBias::Left);
        assert_eq!(vehicle.autonomous_correction.degrees(), 1.0);

        vehicle.position.x = 0.0;
        vehicle.correct_off_track();
        assert_eq!(vehicle.autonomous_correction, SteeringBias::Right);
    }

    #[test]
    fn clamp_to_boundary() {
        let mut vehicle = VehicleState::new(vec2(51.0, -70.0), 0.0);

        vehicle.clamp_to(&Bounds::square(50.0));

        assert_eq!(vehicle.position, vec2(50.0, -50.0));
    }
}
