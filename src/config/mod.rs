//! Configuration for screengif.
//!
//! Defaults can be set in `~/.config/screengif/config.toml`; command line arguments take
//! precedence and are validated strictly, with every problem reported at once.
//!
//! ```toml
//! [capture]
//! interval = 0.2
//! duration = 4
//!
//! [output]
//! directory = "~/Videos"
//! clipboard = false
//! ```

pub mod types;

pub use types::{
    CaptureConfig, DEFAULT_DURATION, DEFAULT_INTERVAL, MAX_DURATION, MAX_INTERVAL, MIN_DURATION,
    MIN_INTERVAL, OutputConfig,
};

use crate::capture::CaptureSession;
use crate::output::{Destination, file};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings read from the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Clamps out-of-range file values to the nearest valid value, logging a warning.
    fn validate_and_clamp(&mut self) {
        if !self.capture.interval.is_finite() {
            log::warn!(
                "Invalid interval {}, falling back to {}",
                self.capture.interval,
                DEFAULT_INTERVAL
            );
            self.capture.interval = DEFAULT_INTERVAL;
        } else if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&self.capture.interval) {
            log::warn!(
                "Invalid interval {:.2}, clamping to {}-{} range",
                self.capture.interval,
                MIN_INTERVAL,
                MAX_INTERVAL
            );
            self.capture.interval = self.capture.interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        }

        if !(MIN_DURATION..=MAX_DURATION).contains(&self.capture.duration) {
            log::warn!(
                "Invalid duration {}, clamping to {}-{} range",
                self.capture.duration,
                MIN_DURATION,
                MAX_DURATION
            );
            self.capture.duration = self.capture.duration.clamp(MIN_DURATION, MAX_DURATION);
        }
    }

    /// Returns the path to the configuration file (`~/.config/screengif/config.toml`).
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("screengif");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the configuration file, or returns defaults if there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `path`, or returns defaults if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }
}

/// Raw values supplied on the command line, before validation.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interval: Option<String>,
    pub duration: Option<String>,
    pub clipboard: bool,
    pub output_dir: Option<PathBuf>,
}

/// Errors found while validating command line values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Every invalid value, in argument order.
    #[error("invalid arguments:{}", bullet_list(.0))]
    Invalid(Vec<String>),
}

fn bullet_list(problems: &[String]) -> String {
    problems.iter().map(|p| format!("\n  - {}", p)).collect()
}

/// Validated, immutable parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub session: CaptureSession,
    pub destination: Destination,
    /// Directory for disk deliveries; `None` when no desktop directory could be found.
    pub output_dir: Option<PathBuf>,
}

impl RunSettings {
    /// Merge command line values over the file configuration.
    ///
    /// # Errors
    /// Returns every invalid interval or duration value together.
    pub fn resolve(config: &Config, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        let interval = match overrides.interval.as_deref() {
            Some(raw) => parse_interval(raw).unwrap_or_else(|problem| {
                problems.push(problem);
                DEFAULT_INTERVAL
            }),
            None => config.capture.interval,
        };

        let duration = match overrides.duration.as_deref() {
            Some(raw) => parse_duration(raw).unwrap_or_else(|problem| {
                problems.push(problem);
                DEFAULT_DURATION
            }),
            None => config.capture.duration,
        };

        if !problems.is_empty() {
            return Err(ConfigError::Invalid(problems));
        }

        let destination = if overrides.clipboard || config.output.clipboard {
            Destination::Clipboard
        } else {
            Destination::Disk
        };

        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| config.output.directory.as_deref().map(file::expand_tilde))
            .or_else(file::default_output_dir);

        Ok(Self {
            session: CaptureSession::new(interval, duration),
            destination,
            output_dir,
        })
    }
}

fn parse_interval(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("interval must be a number of seconds, got '{}'", raw))?;

    if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&value) {
        return Err(format!(
            "interval must be between {} and {} seconds, got {}",
            MIN_INTERVAL, MAX_INTERVAL, raw
        ));
    }
    Ok(value)
}

fn parse_duration(raw: &str) -> Result<u32, String> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("duration must be a whole number of seconds, got '{}'", raw))?;

    if !(MIN_DURATION..=MAX_DURATION).contains(&value) {
        return Err(format!(
            "duration must be between {} and {} seconds, got {}",
            MIN_DURATION, MAX_DURATION, raw
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn overrides(interval: Option<&str>, duration: Option<&str>) -> Overrides {
        Overrides {
            interval: interval.map(str::to_string),
            duration: duration.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_give_fifty_frames_to_disk() {
        let settings = RunSettings::resolve(&Config::default(), &Overrides::default()).unwrap();
        assert_eq!(settings.session.interval(), 0.1);
        assert_eq!(settings.session.duration(), 5);
        assert_eq!(settings.session.frame_count(), 50);
        assert_eq!(settings.destination, Destination::Disk);
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let config = Config::default();
        assert!(RunSettings::resolve(&config, &overrides(Some("0.1"), None)).is_ok());
        assert!(RunSettings::resolve(&config, &overrides(Some("1.0"), None)).is_ok());

        let ConfigError::Invalid(problems) =
            RunSettings::resolve(&config, &overrides(Some("0.05"), None)).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("interval"));

        assert!(RunSettings::resolve(&config, &overrides(Some("2.0"), None)).is_err());
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        let config = Config::default();
        assert!(RunSettings::resolve(&config, &overrides(None, Some("2"))).is_ok());
        assert!(RunSettings::resolve(&config, &overrides(None, Some("10"))).is_ok());
        assert!(RunSettings::resolve(&config, &overrides(None, Some("1"))).is_err());
        assert!(RunSettings::resolve(&config, &overrides(None, Some("11"))).is_err());
    }

    #[test]
    fn all_problems_are_reported_together() {
        let err = RunSettings::resolve(&Config::default(), &overrides(Some("0.05"), Some("11")))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("invalid arguments:\n  - interval"), "{message}");
        assert!(message.contains("\n  - duration"), "{message}");

        let ConfigError::Invalid(problems) = err;
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("interval"));
        assert!(problems[1].contains("duration"));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let ConfigError::Invalid(problems) =
            RunSettings::resolve(&Config::default(), &overrides(Some("fast"), Some("2.5")))
                .unwrap_err();

        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("'fast'"));
        assert!(problems[1].contains("'2.5'"));
    }

    #[test]
    fn nan_interval_is_rejected() {
        assert!(RunSettings::resolve(&Config::default(), &overrides(Some("NaN"), None)).is_err());
    }

    #[test]
    fn command_line_overrides_file_values() {
        let config = Config {
            capture: CaptureConfig {
                interval: 0.5,
                duration: 4,
            },
            output: OutputConfig {
                directory: Some("/srv/gifs".into()),
                clipboard: false,
            },
        };
        let cli = Overrides {
            interval: Some("0.2".into()),
            clipboard: true,
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };

        let settings = RunSettings::resolve(&config, &cli).unwrap();

        assert_eq!(settings.session.interval(), 0.2);
        assert_eq!(settings.session.duration(), 4);
        assert_eq!(settings.session.frame_count(), 20);
        assert_eq!(settings.destination, Destination::Clipboard);
        assert_eq!(settings.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn file_output_directory_is_used_without_override() {
        let config = Config {
            output: OutputConfig {
                directory: Some("/srv/gifs".into()),
                clipboard: true,
            },
            ..Default::default()
        };

        let settings = RunSettings::resolve(&config, &Overrides::default()).unwrap();

        assert_eq!(settings.output_dir, Some(PathBuf::from("/srv/gifs")));
        assert_eq!(settings.destination, Destination::Clipboard);
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_clamps_out_of_range_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[capture]\ninterval = 3.0\nduration = 30\n\n[output]\nclipboard = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.capture.interval, MAX_INTERVAL);
        assert_eq!(config.capture.duration, MAX_DURATION);
        assert!(config.output.clipboard);
    }

    #[test]
    fn load_from_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[capture\ninterval = ").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
