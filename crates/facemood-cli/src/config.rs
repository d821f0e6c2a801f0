//! CLI configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use facemood_models::{Dimensions, SensorOptions};
use facemood_sensor::DEFAULT_MODEL_DIR;

use crate::error::{CliError, CliResult};

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory the engine loads its sub-models from
    pub model_dir: PathBuf,
    /// Replay script driving the engine
    pub replay_script: Option<PathBuf>,
    /// Synthetic camera frame size
    pub frame: Dimensions,
    /// Host options passed to the sensor
    pub options: SensorOptions,
    /// Stop after this long; runs until Ctrl-C otherwise
    pub run_for: Option<Duration>,
    /// Serve Prometheus metrics on this address
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            replay_script: None,
            frame: Dimensions::new(640, 480),
            options: SensorOptions::default(),
            run_for: None,
            metrics_addr: None,
        }
    }
}

impl CliConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u32>().ok());
        let flag = |key: &str| lookup(key).map(|s| parse_flag(&s)).unwrap_or(false);

        Self {
            model_dir: lookup("FACEMOOD_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            replay_script: lookup("FACEMOOD_REPLAY_SCRIPT").map(PathBuf::from),
            frame: Dimensions::new(
                number("FACEMOOD_FRAME_WIDTH").unwrap_or(defaults.frame.width),
                number("FACEMOOD_FRAME_HEIGHT").unwrap_or(defaults.frame.height),
            ),
            options: SensorOptions {
                mobile: flag("FACEMOOD_MOBILE"),
                width: number("FACEMOOD_WIDTH"),
                height: number("FACEMOOD_HEIGHT"),
                no_center: flag("FACEMOOD_NO_CENTER"),
                webcam_width: number("FACEMOOD_WEBCAM_WIDTH"),
                webcam_height: number("FACEMOOD_WEBCAM_HEIGHT"),
            },
            run_for: lookup("FACEMOOD_RUN_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs),
            metrics_addr: lookup("FACEMOOD_METRICS_ADDR").and_then(|s| s.trim().parse().ok()),
        }
    }

    /// Check the config is runnable.
    pub fn validate(&self) -> CliResult<()> {
        if self.replay_script.is_none() {
            return Err(CliError::config("FACEMOOD_REPLAY_SCRIPT is not set"));
        }
        if self.frame.is_empty() {
            return Err(CliError::config("frame dimensions must be greater than zero"));
        }
        self.options
            .validate()
            .map_err(|e| CliError::config(e.to_string()))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_vars(&[]);

        assert_eq!(config.model_dir, PathBuf::from("/models"));
        assert_eq!(config.frame, Dimensions::new(640, 480));
        assert_eq!(config.options, SensorOptions::default());
        assert!(config.run_for.is_none());
        assert!(config.metrics_addr.is_none());
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_reads_variables() {
        let config = from_vars(&[
            ("FACEMOOD_MODEL_DIR", "/srv/models"),
            ("FACEMOOD_REPLAY_SCRIPT", "session.json"),
            ("FACEMOOD_FRAME_WIDTH", "320"),
            ("FACEMOOD_FRAME_HEIGHT", "240"),
            ("FACEMOOD_MOBILE", "true"),
            ("FACEMOOD_WIDTH", "200"),
            ("FACEMOOD_HEIGHT", "150"),
            ("FACEMOOD_NO_CENTER", "1"),
            ("FACEMOOD_RUN_SECS", "5"),
            ("FACEMOOD_METRICS_ADDR", "127.0.0.1:9100"),
        ]);

        assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.replay_script, Some(PathBuf::from("session.json")));
        assert_eq!(config.frame, Dimensions::new(320, 240));
        assert!(config.options.mobile);
        assert!(config.options.no_center);
        assert_eq!(config.options.fixed_size(), Some(Dimensions::new(200, 150)));
        assert_eq!(config.run_for, Some(Duration::from_secs(5)));
        assert_eq!(config.metrics_addr.map(|a| a.port()), Some(9100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_vars(&[
            ("FACEMOOD_FRAME_WIDTH", "wide"),
            ("FACEMOOD_MOBILE", "maybe"),
            ("FACEMOOD_METRICS_ADDR", "not-an-address"),
        ]);

        assert_eq!(config.frame.width, 640);
        assert!(!config.options.mobile);
        assert!(config.metrics_addr.is_none());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let config = from_vars(&[
            ("FACEMOOD_REPLAY_SCRIPT", "session.json"),
            ("FACEMOOD_WIDTH", "0"),
        ]);
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let config = from_vars(&[
            ("FACEMOOD_REPLAY_SCRIPT", "session.json"),
            ("FACEMOOD_FRAME_HEIGHT", "0"),
        ]);
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }
}
