//! Unified error type for Booster.

use std::path::PathBuf;

use booster_games::ServiceError;

/// Errors while building a [`BoosterConfig`](crate::config::BoosterConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read, or an explicitly
    /// requested file is missing.
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for the expected shape.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    /// An environment variable holds a value of the wrong type.
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BoosterError {
    /// A service-level error (lifecycle misuse, declare failure).
    /// Port failures arrive here as [`ServiceError::Declare`].
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A configuration error (file, YAML, environment).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Installing the log subscriber or a signal handler failed.
    #[error("runtime setup failed: {0}")]
    Setup(String),
}
