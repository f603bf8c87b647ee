use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading or validating a [`SimConfig`](crate::config::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while loading a track texture.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to load track image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("track image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}
