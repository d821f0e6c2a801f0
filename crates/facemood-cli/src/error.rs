//! CLI error types.

use thiserror::Error;

use facemood_sensor::SensorError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Exit code for the process.
    ///
    /// Sensor errors that abort activation (camera, models, options) get
    /// their own code so a supervisor can tell them from runtime failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::Sensor(e) if e.is_fatal() => 3,
            _ => 1,
        }
    }
}
