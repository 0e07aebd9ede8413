use std::process::{Command, Stdio};

use crate::capture::types::CaptureError;

/// Capture every output with `grim` (wlroots compositors), returning PNG bytes.
pub fn capture_full_screen_grim() -> Result<Vec<u8>, CaptureError> {
    let output = Command::new("grim")
        .args(["-t", "png", "-"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| CaptureError::Unavailable(format!("Failed to run grim: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CaptureError::Unavailable(format!(
            "grim failed: {}",
            stderr.trim()
        )));
    }

    if output.stdout.is_empty() {
        return Err(CaptureError::ImageError(
            "grim returned empty screenshot".into(),
        ));
    }

    Ok(output.stdout)
}
