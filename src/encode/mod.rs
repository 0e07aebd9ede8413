//! Animated GIF encoding for captured frames.
//!
//! Frames are shrunk to fit a bounding box, then written one after another into a
//! temporary GIF where every frame shares the same delay.

mod artifact;

pub use artifact::{AnimationArtifact, DisposalPolicy};

use crate::capture::{Frame, FrameSequence};
use gif::{DisposalMethod, Encoder, Repeat};
use image::imageops::FilterType;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Largest frame width written to the animation.
pub const MAX_FRAME_WIDTH: u32 = 1200;
/// Largest frame height written to the animation.
pub const MAX_FRAME_HEIGHT: u32 = 900;

/// Palette quantization speed handed to the GIF encoder (1 = best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Errors that can occur while encoding the animation.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("No frames to encode")]
    EmptySequence,

    #[error("Failed to write animation: {0}")]
    Io(#[from] std::io::Error),

    #[error("GIF encoding error: {0}")]
    Gif(#[from] gif::EncodingError),

    #[error("Frame of {width}x{height} is too large for a GIF")]
    FrameTooLarge { width: u32, height: u32 },
}

/// Encodes a [`FrameSequence`] into an [`AnimationArtifact`].
#[derive(Debug, Clone)]
pub struct AnimationEncoder {
    max_width: u32,
    max_height: u32,
    temp_dir: Option<PathBuf>,
}

impl Default for AnimationEncoder {
    fn default() -> Self {
        Self {
            max_width: MAX_FRAME_WIDTH,
            max_height: MAX_FRAME_HEIGHT,
            temp_dir: None,
        }
    }
}

impl AnimationEncoder {
    /// Place temporary animations in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Resize and encode `frames`, using `interval * 2` seconds as the delay of every frame.
    pub fn encode(
        &self,
        frames: FrameSequence,
        interval: f64,
    ) -> Result<AnimationArtifact, EncodeError> {
        if frames.is_empty() {
            return Err(EncodeError::EmptySequence);
        }

        let frames: Vec<Frame> = frames
            .into_frames()
            .into_iter()
            .map(|frame| self.resize_to_fit(frame))
            .collect();

        let mut builder = tempfile::Builder::new();
        builder.prefix("screengif-").suffix(".gif");
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let delay_cs = frame_delay_cs(interval);
        log::debug!(
            "Encoding {} frames into {} (delay {} cs)",
            frames.len(),
            file.path().display(),
            delay_cs
        );

        write_gif(BufWriter::new(file.as_file_mut()), &frames, delay_cs)?;

        log::info!(
            "Encoded {} frames ({} bytes)",
            frames.len(),
            file.as_file().metadata()?.len()
        );

        Ok(AnimationArtifact::new(file, frames.len(), delay_cs))
    }

    /// Shrink `frame` to fit the bounding box, keeping its aspect ratio. Smaller frames are
    /// returned untouched.
    pub fn resize_to_fit(&self, frame: Frame) -> Frame {
        let (width, height) = frame.dimensions();
        if width <= self.max_width && height <= self.max_height {
            return frame;
        }

        let resized = frame
            .image()
            .resize(self.max_width, self.max_height, FilterType::Lanczos3);
        log::trace!(
            "Resized frame {}x{} -> {}x{}",
            width,
            height,
            resized.width(),
            resized.height()
        );
        Frame::new(resized)
    }
}

/// Per-frame delay in the GIF time unit (hundredths of a second).
pub fn frame_delay_cs(interval: f64) -> u16 {
    (interval * 2.0 * 100.0).round().clamp(1.0, f64::from(u16::MAX)) as u16
}

fn write_gif<W: Write>(writer: W, frames: &[Frame], delay_cs: u16) -> Result<(), EncodeError> {
    let mut screen_width = 0u16;
    let mut screen_height = 0u16;
    for frame in frames {
        let (width, height) = gif_dimensions(frame)?;
        screen_width = screen_width.max(width);
        screen_height = screen_height.max(height);
    }

    let mut encoder = Encoder::new(writer, screen_width, screen_height, &[])?;
    encoder.set_repeat(Repeat::Infinite)?;

    for frame in frames {
        let (width, height) = gif_dimensions(frame)?;
        let mut rgba = frame.image().to_rgba8().into_raw();
        let mut gif_frame = gif::Frame::from_rgba_speed(width, height, &mut rgba, QUANTIZE_SPEED);
        gif_frame.delay = delay_cs;
        gif_frame.dispose = DisposalMethod::Keep;
        encoder.write_frame(&gif_frame)?;
    }

    let mut writer = encoder.into_inner()?;
    writer.flush()?;
    Ok(())
}

fn gif_dimensions(frame: &Frame) -> Result<(u16, u16), EncodeError> {
    let (width, height) = frame.dimensions();
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(EncodeError::FrameTooLarge { width, height }),
    }
}
