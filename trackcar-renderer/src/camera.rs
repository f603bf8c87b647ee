use glam::{Mat4, Vec3};

use trackcar_game::vehicle::VehicleState;

use crate::car_renderer::CAR_HEIGHT;

/// Offset of the eye from the car: behind it along -y and raised along +z.
const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, -40.0, 20.0);

/// Chase camera that keeps a fixed offset from the car and looks at it.
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    pub aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: FOLLOW_OFFSET,
            target: Vec3::ZERO,
            up: Vec3::Z,
            aspect,
            fovy: 45.0,
            znear: 0.1,
            zfar: 200.0,
        }
    }

    pub fn update(&mut self, vehicle: &VehicleState) {
        self.target = vehicle.position.extend(CAR_HEIGHT);
        self.eye = vehicle.position.extend(0.0) + FOLLOW_OFFSET;
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.znear, self.zfar);

        proj * view
    }
}
