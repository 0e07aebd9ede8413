//! The temporary file holding an encoded animation.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What happens to the backing file once the artifact has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposalPolicy {
    /// Remove the temporary file.
    DeleteOnDispose,
    /// Keep the file around so references to it (e.g. on the clipboard) stay valid.
    RetainIndefinitely,
}

/// An encoded animation stored in a uniquely named temporary file.
///
/// Dropping an artifact without calling [`AnimationArtifact::dispose`] deletes the file.
#[derive(Debug)]
pub struct AnimationArtifact {
    file: NamedTempFile,
    frame_count: usize,
    delay_cs: u16,
}

impl AnimationArtifact {
    pub(crate) fn new(file: NamedTempFile, frame_count: usize, delay_cs: u16) -> Self {
        Self {
            file,
            frame_count,
            delay_cs,
        }
    }

    /// Location of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of frames in the animation.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Delay applied to every frame, in hundredths of a second.
    pub fn delay_cs(&self) -> u16 {
        self.delay_cs
    }

    /// Release the artifact according to `policy`.
    ///
    /// Returns the path of the retained file, or `None` once it has been deleted.
    pub fn dispose(self, policy: DisposalPolicy) -> io::Result<Option<PathBuf>> {
        match policy {
            DisposalPolicy::DeleteOnDispose => {
                let path = self.file.path().to_path_buf();
                self.file.close()?;
                log::debug!("Removed temporary animation {}", path.display());
                Ok(None)
            }
            DisposalPolicy::RetainIndefinitely => {
                let (_file, path) = self.file.keep().map_err(|e| e.error)?;
                log::debug!("Retaining temporary animation {}", path.display());
                Ok(Some(path))
            }
        }
    }
}
