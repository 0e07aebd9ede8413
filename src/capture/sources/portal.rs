use crate::capture::{portal, types::CaptureError};

use super::reader::read_image_from_uri;

/// Capture using xdg-desktop-portal, blocking the calling thread until the image is read.
pub fn capture_via_portal_bytes() -> Result<Vec<u8>, CaptureError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CaptureError::Unavailable(format!("Failed to start portal runtime: {}", e)))?;

    let uri = runtime.block_on(portal::capture_via_portal())?;
    log::debug!("Portal returned URI: {}", uri);

    read_image_from_uri(&uri)
}
