//! xdg-desktop-portal fallback for grabbing the screen.

use super::types::CaptureError;
use futures::StreamExt;
use std::collections::HashMap;
use zbus::zvariant::{OwnedValue, Value};
use zbus::{Connection, proxy};

/// D-Bus proxy for the xdg-desktop-portal Screenshot interface.
#[proxy(
    interface = "org.freedesktop.portal.Screenshot",
    default_service = "org.freedesktop.portal.Desktop",
    default_path = "/org/freedesktop/portal/desktop"
)]
trait Screenshot {
    /// Request a screenshot; the result arrives later on the returned Request object.
    async fn screenshot(
        &self,
        parent_window: &str,
        options: HashMap<String, Value<'_>>,
    ) -> zbus::Result<zbus::zvariant::OwnedObjectPath>;
}

/// D-Bus proxy for org.freedesktop.portal.Request.
#[proxy(
    interface = "org.freedesktop.portal.Request",
    default_service = "org.freedesktop.portal.Desktop"
)]
trait Request {
    /// `response`: 0 = success, 1 = cancelled, 2 = other error.
    #[zbus(signal)]
    fn response(&self, response: u32, results: HashMap<String, OwnedValue>) -> zbus::Result<()>;
}

/// Ask the portal for a non-interactive full screen capture and return the file URI.
pub async fn capture_via_portal() -> Result<String, CaptureError> {
    let connection = Connection::session().await?;
    let proxy = ScreenshotProxy::new(&connection).await?;

    let request_path = proxy
        .screenshot("", full_screen_options())
        .await
        .map_err(|e| {
            let message = e.to_string();
            if message.contains("Cancelled") || message.contains("denied") {
                CaptureError::PermissionDenied
            } else {
                CaptureError::DBusError(e)
            }
        })?;

    log::debug!("Portal screenshot request created: {:?}", request_path);

    let request_proxy = RequestProxy::builder(&connection)
        .path(request_path)?
        .build()
        .await?;
    let mut responses = request_proxy.receive_response().await?;

    let signal = responses
        .next()
        .await
        .ok_or_else(|| CaptureError::InvalidResponse("No Response signal received".into()))?;
    let args = signal.args().map_err(|e| {
        CaptureError::InvalidResponse(format!("Failed to parse response args: {}", e))
    })?;

    match args.response {
        0 => {
            let uri = args
                .results
                .get("uri")
                .ok_or_else(|| CaptureError::InvalidResponse("No 'uri' in response".into()))?;
            let uri: &str = uri.downcast_ref().map_err(|e| {
                CaptureError::InvalidResponse(format!("URI is not a string: {}", e))
            })?;
            Ok(uri.to_string())
        }
        1 => Err(CaptureError::PermissionDenied),
        code => Err(CaptureError::InvalidResponse(format!(
            "Portal returned error code {}",
            code
        ))),
    }
}

fn full_screen_options() -> HashMap<String, Value<'static>> {
    let mut options = HashMap::new();
    options.insert("modal".to_string(), false.into());
    options.insert("interactive".to_string(), false.into());
    options
}
