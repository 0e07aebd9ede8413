use std::sync::Arc;

use crate::capture::{
    dependencies::{Pause, ScreenSampler},
    types::{CaptureError, CaptureSession, FrameSequence},
};

/// Drives a [`ScreenSampler`] on a fixed cadence.
///
/// Captures are not corrected for drift: the wall-clock time of a run is
/// `frame_count * interval` plus whatever each capture call costs.
#[derive(Clone)]
pub struct FrameCapturer {
    sampler: Arc<dyn ScreenSampler>,
    pause: Arc<dyn Pause>,
}

impl FrameCapturer {
    pub fn new(sampler: Arc<dyn ScreenSampler>, pause: Arc<dyn Pause>) -> Self {
        Self { sampler, pause }
    }

    /// Capture `session.frame_count()` frames, sleeping `interval` between captures.
    ///
    /// The first failing capture aborts the loop and no frames are returned.
    pub fn run(&self, session: &CaptureSession) -> Result<FrameSequence, CaptureError> {
        let frame_count = session.frame_count();
        let interval = session.interval_duration();
        let mut frames = FrameSequence::with_capacity(frame_count);

        log::info!(
            "Capturing {} frames every {:.2}s",
            frame_count,
            session.interval()
        );

        for index in 0..frame_count {
            let frame = self.sampler.capture()?;
            log::debug!(
                "Captured frame {}/{} ({}x{})",
                index + 1,
                frame_count,
                frame.dimensions().0,
                frame.dimensions().1
            );
            frames.push(frame);

            if index + 1 < frame_count {
                self.pause.pause(interval);
            }
        }

        Ok(frames)
    }
}
