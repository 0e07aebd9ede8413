use std::{fs, path::Path, thread, time::Duration};

use crate::capture::types::CaptureError;

/// The portal may hand back the URI before the file is fully flushed.
const READ_ATTEMPTS: usize = 40;
const READ_RETRY_DELAY: Duration = Duration::from_millis(25);

/// Read the frame behind a portal `file://` URI and remove the portal's copy afterwards.
pub fn read_image_from_uri(uri: &str) -> Result<Vec<u8>, CaptureError> {
    let url = url::Url::parse(uri)
        .map_err(|e| CaptureError::InvalidResponse(format!("Invalid file URI '{}': {}", uri, e)))?;

    // to_file_path takes care of percent-decoding
    let path = url.to_file_path().map_err(|_| {
        CaptureError::InvalidResponse(format!("URI does not name a local file: {}", uri))
    })?;

    let data = read_when_ready(&path)?;

    match fs::remove_file(&path) {
        Ok(()) => log::trace!("Removed portal frame {}", path.display()),
        Err(e) => log::warn!("Failed to remove portal frame {}: {}", path.display(), e),
    }

    Ok(data)
}

fn read_when_ready(path: &Path) -> Result<Vec<u8>, CaptureError> {
    for attempt in 1..=READ_ATTEMPTS {
        match fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => return Ok(bytes),
            Ok(_) => log::trace!(
                "Portal frame {} still empty (attempt {}/{})",
                path.display(),
                attempt,
                READ_ATTEMPTS
            ),
            Err(e) => log::trace!(
                "Portal frame {} not readable yet (attempt {}/{}): {}",
                path.display(),
                attempt,
                READ_ATTEMPTS,
                e
            ),
        }
        thread::sleep(READ_RETRY_DELAY);
    }

    Err(CaptureError::ImageError(format!(
        "Portal frame {} not ready after {} attempts",
        path.display(),
        READ_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_frame_and_removes_portal_copy() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("portal frame.png");
        std::fs::write(&file_path, b"frame-bytes").unwrap();
        let uri = url::Url::from_file_path(&file_path).unwrap().to_string();

        let data = read_image_from_uri(&uri).expect("read succeeds");
        assert_eq!(data, b"frame-bytes");
        assert!(!file_path.exists(), "portal copy should be deleted");
    }

    #[test]
    fn rejects_non_file_uri() {
        let err = read_image_from_uri("https://example.com/frame.png").unwrap_err();
        assert!(matches!(err, CaptureError::InvalidResponse(_)));
    }
}
