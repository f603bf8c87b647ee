use glam::{vec2, Vec2};

/// Axis-aligned rectangle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Square centred on the origin, spanning `[-half_extent, half_extent]` on both axes.
    pub fn square(half_extent: f32) -> Self {
        Self {
            min: vec2(-half_extent, -half_extent),
            max: vec2(half_extent, half_extent),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let contains_x = self.min.x <= point.x && point.x <= self.max.x;
        let contains_y = self.min.y <= point.y && point.y <= self.max.y;
        contains_x && contains_y
    }

    /// Clamps each axis independently.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        vec2(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }
}
