//! The capture → encode → deliver sequence of a single run.

mod dependencies;

pub use dependencies::PipelineDependencies;

use crate::{
    capture::{CaptureError, FrameCapturer},
    config::RunSettings,
    encode::EncodeError,
    output::{Delivered, DeliveryError, OutputSink},
};
use thiserror::Error;

/// A stage failure that aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub frame_count: usize,
    pub delay_cs: u16,
    pub delivered: Delivered,
}

impl RunOutcome {
    /// Non-fatal problem worth showing to the user, if any.
    pub fn warning(&self) -> Option<String> {
        match &self.delivered {
            Delivered::Clipboard {
                path,
                error: Some(e),
            } => Some(format!(
                "{} (the animation is still available at {})",
                e,
                path.display()
            )),
            _ => None,
        }
    }
}

/// Run every stage in order. Each stage finishes before the next one starts.
pub fn run(
    settings: RunSettings,
    dependencies: &PipelineDependencies,
) -> Result<RunOutcome, PipelineError> {
    let session = settings.session;
    log::info!(
        "Starting capture: {} frames over {}s, delivering to {:?}",
        session.frame_count(),
        session.duration(),
        settings.destination
    );

    let capturer = FrameCapturer::new(dependencies.sampler.clone(), dependencies.pause.clone());
    let frames = capturer.run(&session)?;
    log::debug!("Capture stage finished with {} frames", frames.len());

    let artifact = dependencies.encoder.encode(frames, session.interval())?;
    let frame_count = artifact.frame_count();
    let delay_cs = artifact.delay_cs();
    log::debug!("Encode stage finished: {}", artifact.path().display());

    let sink = OutputSink::new(settings.output_dir, dependencies.clipboard.clone());
    let delivered = sink.deliver(artifact, settings.destination)?;
    log::debug!("Delivery stage finished: {:?}", delivered);

    Ok(RunOutcome {
        frame_count,
        delay_cs,
        delivered,
    })
}
