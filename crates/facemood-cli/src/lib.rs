//! Command-line harness for the facemood sensor.
//!
//! Runs one sensor against a replayed detection script and a synthetic
//! camera, printing host events as JSON lines.

pub mod config;
pub mod error;
pub mod session;

pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use session::run_session;
