//! Delivering the finished animation.
//!
//! An animation ends up either as a timestamped file in the output directory or as a file
//! reference on the clipboard. The destination decides what happens to the temporary file.

pub mod clipboard;
pub mod file;

pub use clipboard::{ClipboardError, ClipboardPublisher, NoopClipboard, default_publisher};

use crate::encode::{AnimationArtifact, DisposalPolicy};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Where the finished animation should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Disk,
    Clipboard,
}

impl Destination {
    /// How the temporary animation is released after delivery to this destination.
    pub fn disposal_policy(self) -> DisposalPolicy {
        match self {
            // The saved copy is the only thing that outlives the run.
            Destination::Disk => DisposalPolicy::DeleteOnDispose,
            // Deleting the file would leave the clipboard pointing at nothing.
            Destination::Clipboard => DisposalPolicy::RetainIndefinitely,
        }
    }
}

/// Errors that abort delivery.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Output directory {} does not exist or is not a directory", .0.display())]
    DirectoryUnavailable(PathBuf),

    #[error("Could not determine the desktop directory")]
    NoOutputDirectory,

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to release temporary animation: {0}")]
    Dispose(#[from] std::io::Error),
}

/// Result of a successful delivery.
#[derive(Debug)]
pub enum Delivered {
    /// The animation was saved at this path; the temporary file is gone.
    Saved(PathBuf),
    /// The temporary file at `path` was kept for the clipboard.
    Clipboard {
        path: PathBuf,
        /// Failure of the clipboard integration, if any. The file is retained either way.
        error: Option<ClipboardError>,
    },
}

/// Hands an [`AnimationArtifact`] to its destination and disposes of it accordingly.
#[derive(Clone)]
pub struct OutputSink {
    output_dir: Option<PathBuf>,
    clipboard: Arc<dyn ClipboardPublisher>,
}

impl OutputSink {
    /// `output_dir` is where disk deliveries go (`None` when no desktop could be found).
    pub fn new(output_dir: Option<PathBuf>, clipboard: Arc<dyn ClipboardPublisher>) -> Self {
        Self {
            output_dir,
            clipboard,
        }
    }

    pub fn deliver(
        &self,
        artifact: AnimationArtifact,
        destination: Destination,
    ) -> Result<Delivered, DeliveryError> {
        match destination {
            Destination::Disk => self.save_to_disk(artifact).map(Delivered::Saved),
            Destination::Clipboard => self.publish_to_clipboard(artifact),
        }
    }

    /// Copy the animation into the output directory, then delete the temporary file.
    ///
    /// The temporary file is removed on failure too, since the artifact is dropped.
    pub fn save_to_disk(&self, artifact: AnimationArtifact) -> Result<PathBuf, DeliveryError> {
        let directory = self
            .output_dir
            .as_deref()
            .ok_or(DeliveryError::NoOutputDirectory)?;
        let saved = file::save_animation(artifact.path(), directory)?;
        release_after_save(artifact);

        log::info!("Animation saved successfully: {}", saved.display());
        Ok(saved)
    }

    /// Put a reference to the temporary animation on the clipboard.
    ///
    /// The file is retained even if the clipboard integration fails, so the caller can
    /// still point the user at it.
    pub fn publish_to_clipboard(
        &self,
        artifact: AnimationArtifact,
    ) -> Result<Delivered, DeliveryError> {
        let result = self.clipboard.publish_file_reference(artifact.path());
        let path = artifact
            .dispose(Destination::Clipboard.disposal_policy())?
            .ok_or_else(|| {
                DeliveryError::Dispose(std::io::Error::other("retained file has no path"))
            })?;

        let error = match result {
            Ok(()) => {
                log::info!("Copied reference to {} to the clipboard", path.display());
                None
            }
            Err(e) => {
                log::warn!("Failed to copy {} to the clipboard: {}", path.display(), e);
                Some(e)
            }
        };

        Ok(Delivered::Clipboard { path, error })
    }
}

/// Delete the temporary animation once its bytes are safely saved. The saved copy is what
/// matters, so a failed cleanup is only logged.
fn release_after_save(artifact: AnimationArtifact) {
    let path = artifact.path().to_path_buf();
    if let Err(e) = artifact.dispose(Destination::Disk.disposal_policy()) {
        log::warn!("Failed to remove temporary animation {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Frame, FrameSequence};
    use crate::encode::AnimationEncoder;
    use image::{DynamicImage, RgbaImage};
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct MockClipboard {
        should_fail: bool,
        published: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl ClipboardPublisher for MockClipboard {
        fn publish_file_reference(&self, path: &Path) -> Result<(), ClipboardError> {
            self.published.lock().unwrap().push(path.to_path_buf());
            if self.should_fail {
                Err(ClipboardError::Failed("clipboard failure".into()))
            } else {
                Ok(())
            }
        }
    }

    fn artifact(temp: &TempDir) -> AnimationArtifact {
        let frames: FrameSequence = vec![
            Frame::new(DynamicImage::ImageRgba8(RgbaImage::new(4, 4))),
            Frame::new(DynamicImage::ImageRgba8(RgbaImage::new(4, 4))),
        ]
        .into();
        AnimationEncoder::default()
            .with_temp_dir(temp.path())
            .encode(frames, 0.1)
            .unwrap()
    }

    #[test]
    fn destinations_map_to_disposal_policies() {
        assert_eq!(
            Destination::Disk.disposal_policy(),
            DisposalPolicy::DeleteOnDispose
        );
        assert_eq!(
            Destination::Clipboard.disposal_policy(),
            DisposalPolicy::RetainIndefinitely
        );
    }

    #[test]
    fn save_to_disk_writes_final_file_and_removes_temporary() {
        let temp = TempDir::new().unwrap();
        let desktop = TempDir::new().unwrap();
        let clipboard = MockClipboard::default();
        let sink = OutputSink::new(
            Some(desktop.path().to_path_buf()),
            Arc::new(clipboard.clone()),
        );
        let artifact = artifact(&temp);
        let temp_path = artifact.path().to_path_buf();

        let saved = sink.save_to_disk(artifact).unwrap();

        assert!(saved.exists());
        assert!(saved.starts_with(desktop.path()));
        assert!(!temp_path.exists());
        assert!(clipboard.published.lock().unwrap().is_empty());
    }

    #[test]
    fn cleanup_failure_after_save_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let artifact = artifact(&temp);
        std::fs::remove_file(artifact.path()).unwrap();

        release_after_save(artifact);

        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn save_to_disk_failure_still_removes_temporary() {
        let temp = TempDir::new().unwrap();
        let sink = OutputSink::new(
            Some(temp.path().join("missing")),
            Arc::new(MockClipboard::default()),
        );
        let artifact = artifact(&temp);
        let temp_path = artifact.path().to_path_buf();

        let err = sink.save_to_disk(artifact).unwrap_err();

        assert!(matches!(err, DeliveryError::DirectoryUnavailable(_)));
        assert!(!temp_path.exists());
    }

    #[test]
    fn save_to_disk_without_output_dir_fails() {
        let temp = TempDir::new().unwrap();
        let sink = OutputSink::new(None, Arc::new(MockClipboard::default()));

        let err = sink.save_to_disk(artifact(&temp)).unwrap_err();

        assert!(matches!(err, DeliveryError::NoOutputDirectory));
    }

    #[test]
    fn publish_to_clipboard_keeps_temporary_file() {
        let temp = TempDir::new().unwrap();
        let clipboard = MockClipboard::default();
        let sink = OutputSink::new(None, Arc::new(clipboard.clone()));
        let artifact = artifact(&temp);
        let temp_path = artifact.path().to_path_buf();

        let delivered = sink.publish_to_clipboard(artifact).unwrap();

        match delivered {
            Delivered::Clipboard { path, error } => {
                assert_eq!(path, temp_path);
                assert!(error.is_none());
            }
            other => panic!("expected clipboard delivery, got {other:?}"),
        }
        assert!(temp_path.exists());
        assert_eq!(*clipboard.published.lock().unwrap(), vec![temp_path]);
    }

    #[test]
    fn clipboard_failure_is_reported_but_file_is_kept() {
        let temp = TempDir::new().unwrap();
        let clipboard = MockClipboard {
            should_fail: true,
            ..Default::default()
        };
        let sink = OutputSink::new(None, Arc::new(clipboard));
        let artifact = artifact(&temp);
        let temp_path = artifact.path().to_path_buf();

        let delivered = sink.deliver(artifact, Destination::Clipboard).unwrap();

        assert!(matches!(
            delivered,
            Delivered::Clipboard {
                error: Some(ClipboardError::Failed(_)),
                ..
            }
        ));
        assert!(temp_path.exists());
    }
}
