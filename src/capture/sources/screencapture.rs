use std::fs;
use std::process::{Command, Stdio};

use crate::capture::types::CaptureError;

/// Capture the main display with the macOS `screencapture` tool, returning PNG bytes.
pub fn capture_full_screen_screencapture() -> Result<Vec<u8>, CaptureError> {
    let target = tempfile::Builder::new()
        .prefix("screengif-frame-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| CaptureError::ImageError(format!("Failed to create frame file: {}", e)))?;

    let output = Command::new("screencapture")
        .args(["-x", "-m", "-t", "png"])
        .arg(target.path())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| CaptureError::Unavailable(format!("Failed to run screencapture: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CaptureError::Unavailable(format!(
            "screencapture failed: {}",
            stderr.trim()
        )));
    }

    let data = fs::read(target.path())
        .map_err(|e| CaptureError::ImageError(format!("Failed to read frame file: {}", e)))?;

    // screencapture writes nothing when screen recording permission is missing
    if data.is_empty() {
        return Err(CaptureError::PermissionDenied);
    }

    Ok(data)
}
