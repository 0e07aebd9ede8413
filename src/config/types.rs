//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Seconds between frames when nothing else is configured.
pub const DEFAULT_INTERVAL: f64 = 0.1;
/// Capture length in seconds when nothing else is configured.
pub const DEFAULT_DURATION: u32 = 5;

pub const MIN_INTERVAL: f64 = 0.1;
pub const MAX_INTERVAL: f64 = 1.0;
pub const MIN_DURATION: u32 = 2;
pub const MAX_DURATION: u32 = 10;

/// Capture timing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Seconds between two frames (valid range: 0.1 - 1.0)
    #[serde(default = "default_interval")]
    pub interval: f64,

    /// Total capture time in whole seconds (valid range: 2 - 10)
    #[serde(default = "default_duration")]
    pub duration: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            duration: default_duration(),
        }
    }
}

/// Delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    /// Directory for saved animations; defaults to the desktop. Supports `~/`.
    #[serde(default)]
    pub directory: Option<String>,

    /// Deliver to the clipboard instead of disk when `--clipboard` is not given
    #[serde(default)]
    pub clipboard: bool,
}

fn default_interval() -> f64 {
    DEFAULT_INTERVAL
}

fn default_duration() -> u32 {
    DEFAULT_DURATION
}
