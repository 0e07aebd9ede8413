//! Screen capture for screengif.
//!
//! A [`ScreenSampler`] grabs single frames; [`FrameCapturer`] repeats that on a fixed
//! cadence to build the [`FrameSequence`] that gets encoded.

#[cfg(target_os = "linux")]
pub mod portal;
pub mod types;

mod capturer;
mod dependencies;
mod sources;

pub use capturer::FrameCapturer;
pub use dependencies::{DefaultScreenSampler, Pause, ScreenSampler, ThreadSleep};
pub use types::{CaptureError, CaptureSession, Frame, FrameSequence};
