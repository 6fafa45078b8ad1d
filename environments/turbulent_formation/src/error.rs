//! Error types for the formation environment.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for formation environment operations.
pub type Result<T> = std::result::Result<T, FormationError>;

/// Error types that can occur while building or stepping the environment.
#[derive(Debug, Error)]
pub enum FormationError {
    /// Invalid configuration (non-positive dt, bad formation indices, etc.)
    #[error("Invalid configuration for '{param}': {message}")]
    InvalidConfig { param: String, message: String },

    #[error("no simulation directories found in {}", folder.display())]
    NoSimulations { folder: PathBuf },

    #[error("simulation '{name}' has no .nc data files")]
    EmptySimulation { name: String },

    #[error("unknown simulation '{name}'")]
    UnknownSimulation { name: String },

    /// Directory name does not carry a `_<X>x<Y>_` resolution field
    #[error("cannot parse grid resolution from simulation name '{name}'")]
    MalformedSimulationName { name: String },

    #[error("cannot parse timestamp from frame file '{file}'")]
    MalformedTimestamp { file: String },

    #[error("frame '{file}' has no variable '{variable}'")]
    MissingVariable { file: String, variable: String },

    #[error("frame '{file}' holds {actual} values, expected {expected}")]
    ShapeMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },

    /// Variable laid out on a grid other than the simulation's `rows x cols`
    #[error("frame '{file}': '{variable}' has dimensions {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        file: String,
        variable: String,
        expected: [usize; 2],
        actual: Vec<usize>,
    },

    #[error("frame timestamps in simulation '{name}' are not increasing at index {index}")]
    NonMonotonicTimestamps { name: String, index: usize },

    /// Query time past the last stored frame
    #[error("time out of range: t = {time} exceeds t_max = {max_time}")]
    TimeOutOfRange { time: f64, max_time: f64 },

    #[error("no simulation selected; reset the environment first")]
    NoSimulationSelected,

    #[error("Action dimension mismatch: expected {expected}, got {actual}")]
    ActionDimensionMismatch { expected: usize, actual: usize },

    #[error("step called before reset")]
    NotReset,

    #[error("episode finished after {steps} steps; call reset")]
    EpisodeFinished { steps: u32 },

    #[error("precomputed turbulence needs the `netcdf` feature to read {}", folder.display())]
    NetcdfUnavailable { folder: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF read failed: {0}")]
    Netcdf(#[from] netcdf::Error),
}

impl FormationError {
    pub fn invalid_config(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            param: param.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
