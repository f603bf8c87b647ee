//! Tunable simulation constants.
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes:
//!
//! ```toml
//! autonomous_speed = 6.0
//! strict_track_checking = true
//!
//! [track]
//! dark_threshold = 32
//! ```

use std::{fs, path::Path};

use glam::{vec2, Vec2};
use serde::Deserialize;

use crate::{error::ConfigError, track::TrackMapping};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub max_forward_speed: f32,
    pub max_reverse_speed: f32,
    /// Speed change per `accelerate` call, not per second.
    pub acceleration_rate: f32,
    /// Turn rate in degrees per second for a full steering input.
    pub steering_rate: f32,
    pub autonomous_speed: f32,
    /// Half extent of the square the vehicle is confined to.
    pub boundary: f32,
    pub start_position: [f32; 2],
    pub start_heading: f32,
    /// Treat a missing track texture as off track instead of on track.
    pub strict_track_checking: bool,
    /// Longest frame time a single tick will integrate. Uncapped when unset.
    pub max_delta_time: Option<f32>,
    pub track: TrackMapping,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_forward_speed: 20.0,
            max_reverse_speed: -10.0,
            acceleration_rate: 0.2,
            steering_rate: 15.0,
            autonomous_speed: 10.0,
            boundary: 50.0,
            start_position: [-3.0, 8.0],
            start_heading: 90.0,
            strict_track_checking: false,
            max_delta_time: None,
            track: TrackMapping::default(),
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn start_position(&self) -> Vec2 {
        vec2(self.start_position[0], self.start_position[1])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("max_forward_speed", self.max_forward_speed),
            ("max_reverse_speed", self.max_reverse_speed),
            ("acceleration_rate", self.acceleration_rate),
            ("steering_rate", self.steering_rate),
            ("autonomous_speed", self.autonomous_speed),
            ("boundary", self.boundary),
            ("start_position[0]", self.start_position[0]),
            ("start_position[1]", self.start_position[1]),
            ("start_heading", self.start_heading),
            ("max_delta_time", self.max_delta_time.unwrap_or(0.0)),
            ("track.world_offset", self.track.world_offset),
            ("track.world_extent", self.track.world_extent),
        ];
        if let Some((name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }

        if self.max_reverse_speed > 0.0 || self.max_forward_speed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "speed range [{}, {}] must contain zero",
                self.max_reverse_speed, self.max_forward_speed
            )));
        }
        if self.boundary <= 0.0 {
            return Err(ConfigError::Invalid("boundary must be positive".to_string()));
        }
        if self.max_delta_time.is_some_and(|cap| cap <= 0.0) {
            return Err(ConfigError::Invalid(
                "max_delta_time must be positive".to_string(),
            ));
        }
        if self.track.world_extent <= 0.0 {
            return Err(ConfigError::Invalid(
                "track.world_extent must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
