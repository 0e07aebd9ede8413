//! Data types for screen capture.

use image::{DynamicImage, GenericImageView};
use std::time::Duration;
use thiserror::Error;

/// Guards `floor(duration / interval)` against float error (2 / 0.1 must give 20, not 19).
const FRAME_COUNT_EPSILON: f64 = 1e-9;

/// Timing parameters of one capture run.
///
/// Built once from validated settings and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSession {
    interval: f64,
    duration: u32,
    frame_count: usize,
}

impl CaptureSession {
    /// Create a session from an interval (seconds) and a total duration (whole seconds).
    ///
    /// Callers are expected to pass validated values; the frame count is still clamped to
    /// at least one so the encoder never receives an empty sequence from a valid session.
    pub fn new(interval: f64, duration: u32) -> Self {
        let frames = (f64::from(duration) / interval + FRAME_COUNT_EPSILON).floor();
        let frame_count = if frames.is_finite() && frames >= 1.0 {
            frames as usize
        } else {
            1
        };

        Self {
            interval,
            duration,
            frame_count,
        }
    }

    /// Seconds between two captures.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Pause inserted between two captures.
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }

    /// Total capture duration in seconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Number of frames this session captures.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

/// One captured screen image.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Frames in capture order, which is also playback order.
#[derive(Debug, Default)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl From<Vec<Frame>> for FrameSequence {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

/// Errors that can occur while grabbing the screen.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Screen capture permission denied")]
    PermissionDenied,

    #[error("Screen capture unavailable: {0}")]
    Unavailable(String),

    #[error("D-Bus communication error: {0}")]
    DBusError(#[from] zbus::Error),

    #[error("Portal returned invalid response: {0}")]
    InvalidResponse(String),

    #[error("Image processing error: {0}")]
    ImageError(String),
}
