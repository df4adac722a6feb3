use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a sample frame from the sensor.
///
/// These are the only runtime failures the pipeline knows about. They are
/// caught at the sampling loop and turned into the `Error` connection state.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("sensor at {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed sample frame: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("gain {0} is not one of 0.5, 1, 2, 4, 8, 12")]
    InvalidGain(f32),

    #[error("stereo noise {0} is not one of 0.1, 0.2, 0.3, 0.4")]
    InvalidNoise(f32),
}
