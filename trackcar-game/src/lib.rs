use std::collections::VecDeque;

use glam::Vec2;

use crate::{
    bounds::Bounds,
    config::SimConfig,
    control::Command,
    track::{TrackSampler, TrackTexture},
    vehicle::{DriveMode, VehicleState},
};

pub mod bounds;
pub mod config;
pub mod control;
pub mod error;
pub mod track;
pub mod vehicle;

/// What one tick produced, for the render layer and for tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub on_track: bool,
    pub mode: DriveMode,
    pub position: Vec2,
    pub heading: f32,
}

pub struct Simulation {
    pub vehicle: VehicleState,
    config: SimConfig,
    track: Option<TrackSampler>,
    bounds: Bounds,
    commands: VecDeque<Command>,
    on_track: bool,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            vehicle: VehicleState::from_config(&config),
            bounds: Bounds::square(config.boundary),
            config,
            track: None,
            commands: VecDeque::new(),
            on_track: true,
        }
    }

    /// Samples `texture` through the configured track mapping.
    pub fn with_track(mut self, texture: impl TrackTexture + 'static) -> Self {
        self.track = Some(TrackSampler::new(texture, self.config.track));
        self
    }

    /// Fixed at construction; the bounds and the track mapping are derived from it.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn track(&self) -> Option<&TrackSampler> {
        self.track.as_ref()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Without a sampler this is `true` unless strict checking is enabled.
    pub fn is_on_track(&self) -> bool {
        match &self.track {
            Some(track) => track.is_on_track(self.vehicle.position),
            None => !self.config.strict_track_checking,
        }
    }

    pub fn update(&mut self, delta_time: f32) -> TickReport {
        let delta_time = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
        let delta_time = match self.config.max_delta_time {
            Some(cap) => delta_time.min(cap),
            None => delta_time,
        };

        while let Some(command) = self.commands.pop_front() {
            command.apply(&mut self.vehicle, &self.config);
        }

        self.vehicle.integrate(delta_time, &self.config);

        let on_track = self.is_on_track();
        if !on_track {
            if self.on_track {
                log::warn!(
                    "Vehicle off the track at ({:.2}, {:.2}), correcting",
                    self.vehicle.position.x,
                    self.vehicle.position.y
                );
            } else {
                log::debug!("Vehicle still off the track");
            }
            self.vehicle.correct_off_track();
        }
        self.on_track = on_track;

        self.vehicle.clamp_to(&self.bounds);

        TickReport {
            on_track,
            mode: self.vehicle.mode,
            position: self.vehicle.position,
            heading: self.vehicle.heading,
        }
    }
}
