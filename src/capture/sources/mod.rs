use crate::capture::types::CaptureError;

#[cfg(target_os = "linux")]
mod grim;
#[cfg(target_os = "linux")]
mod portal;
#[cfg(target_os = "linux")]
pub(crate) mod reader;
#[cfg(target_os = "macos")]
mod screencapture;

/// Grab the whole primary display as PNG bytes using the best source for this platform.
#[cfg(target_os = "linux")]
pub fn capture_screen_png() -> Result<Vec<u8>, CaptureError> {
    match grim::capture_full_screen_grim() {
        Ok(data) => Ok(data),
        Err(e) => {
            log::debug!("Full screen capture via grim failed: {}. Falling back to portal.", e);
            portal::capture_via_portal_bytes()
        }
    }
}

#[cfg(target_os = "macos")]
pub fn capture_screen_png() -> Result<Vec<u8>, CaptureError> {
    screencapture::capture_full_screen_screencapture()
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn capture_screen_png() -> Result<Vec<u8>, CaptureError> {
    Err(CaptureError::Unavailable(
        "no screen capture source for this platform".into(),
    ))
}
