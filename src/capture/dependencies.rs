use std::{thread, time::Duration};

use crate::capture::{
    sources,
    types::{CaptureError, Frame},
};

/// Captures one still image of the whole primary display.
pub trait ScreenSampler: Send + Sync {
    fn capture(&self) -> Result<Frame, CaptureError>;
}

/// Suspends the capture loop between two frames.
pub trait Pause: Send + Sync {
    fn pause(&self, duration: Duration);
}

/// Sampler backed by the platform screenshot sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultScreenSampler;

/// Blocks the calling thread for the full duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl ScreenSampler for DefaultScreenSampler {
    fn capture(&self) -> Result<Frame, CaptureError> {
        let png = sources::capture_screen_png()?;
        let image = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .map_err(|e| CaptureError::ImageError(format!("Failed to decode screenshot: {}", e)))?;
        Ok(Frame::new(image))
    }
}

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
