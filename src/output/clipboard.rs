//! Publishing a file reference to the system clipboard.

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use thiserror::Error;

/// Errors from clipboard integrations. None of them abort a run.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard integration is not supported on this platform")]
    Unsupported,

    #[error("Path cannot be expressed as a file reference: {0}")]
    InvalidPath(String),

    #[error("Clipboard operation failed: {0}")]
    Failed(String),
}

/// Places a reference to a file (not the file's bytes) on the clipboard.
pub trait ClipboardPublisher: Send + Sync {
    fn publish_file_reference(&self, path: &Path) -> Result<(), ClipboardError>;
}

/// Publisher for the current platform.
pub fn default_publisher() -> Arc<dyn ClipboardPublisher> {
    #[cfg(target_os = "linux")]
    let publisher: Arc<dyn ClipboardPublisher> = Arc::new(WaylandClipboard);
    #[cfg(target_os = "macos")]
    let publisher: Arc<dyn ClipboardPublisher> = Arc::new(FinderClipboard);
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let publisher: Arc<dyn ClipboardPublisher> = Arc::new(NoopClipboard);
    publisher
}

/// Used where no clipboard integration exists; always reports [`ClipboardError::Unsupported`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClipboard;

impl ClipboardPublisher for NoopClipboard {
    fn publish_file_reference(&self, path: &Path) -> Result<(), ClipboardError> {
        log::debug!("No clipboard integration for {}", path.display());
        Err(ClipboardError::Unsupported)
    }
}

/// `text/uri-list` payload naming a single file.
pub fn uri_list(path: &Path) -> Result<String, ClipboardError> {
    let url = url::Url::from_file_path(path)
        .map_err(|_| ClipboardError::InvalidPath(path.display().to_string()))?;
    Ok(format!("{}\r\n", url))
}

/// Wayland clipboard via `wl-copy`, with wl-clipboard-rs as a fallback.
#[cfg(target_os = "linux")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WaylandClipboard;

#[cfg(target_os = "linux")]
impl ClipboardPublisher for WaylandClipboard {
    fn publish_file_reference(&self, path: &Path) -> Result<(), ClipboardError> {
        let payload = uri_list(path)?;
        log::debug!("Publishing file reference {}", payload.trim_end());

        match copy_via_command(&payload) {
            Ok(()) => Ok(()),
            Err(cmd_err) => {
                log::debug!(
                    "wl-copy command path failed ({}). Falling back to wl-clipboard-rs",
                    cmd_err
                );
                copy_via_library(&payload).map_err(|lib_err| {
                    ClipboardError::Failed(format!(
                        "wl-copy failed: {} ; wl-clipboard-rs failed: {}",
                        cmd_err, lib_err
                    ))
                })
            }
        }
    }
}

/// Options for the library fallback. The selection is served from this process, which has
/// to stay alive until one paste has been served.
#[cfg(target_os = "linux")]
fn library_options() -> wl_clipboard_rs::copy::Options {
    use wl_clipboard_rs::copy::{Options, ServeRequests};

    let mut opts = Options::new();
    opts.foreground(true);
    opts.serve_requests(ServeRequests::Only(1));
    opts
}

#[cfg(target_os = "linux")]
fn copy_via_library(payload: &str) -> Result<(), ClipboardError> {
    use wl_clipboard_rs::copy::{MimeType, Source};

    log::warn!("wl-copy unavailable; waiting for the file reference to be pasted");
    library_options()
        .copy(
            Source::Bytes(payload.as_bytes().into()),
            MimeType::Specific("text/uri-list".to_string()),
        )
        .map_err(|e| ClipboardError::Failed(format!("wl-clipboard-rs error: {}", e)))
}

#[cfg(target_os = "linux")]
fn copy_via_command(payload: &str) -> Result<(), ClipboardError> {
    use std::io::Write;

    let mut child = Command::new("wl-copy")
        .args(["--type", "text/uri-list"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            ClipboardError::Failed(format!("Failed to spawn wl-copy (is it installed?): {}", e))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(payload.as_bytes()).map_err(|e| {
            ClipboardError::Failed(format!("Failed to write to wl-copy stdin: {}", e))
        })?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| ClipboardError::Failed(format!("Failed to wait for wl-copy: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipboardError::Failed(format!(
            "wl-copy failed: {}",
            stderr.trim()
        )));
    }

    Ok(())
}

/// macOS clipboard through Finder's AppleScript `POSIX file` reference.
#[cfg(target_os = "macos")]
#[derive(Debug, Default, Clone, Copy)]
pub struct FinderClipboard;

#[cfg(target_os = "macos")]
impl ClipboardPublisher for FinderClipboard {
    fn publish_file_reference(&self, path: &Path) -> Result<(), ClipboardError> {
        let output = Command::new("osascript")
            .arg("-e")
            .arg(finder_script(path)?)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ClipboardError::Failed(format!("Failed to run osascript: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipboardError::Failed(format!(
                "osascript failed: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// AppleScript that sets the clipboard to a `POSIX file` reference.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn finder_script(path: &Path) -> Result<String, ClipboardError> {
    let path = path
        .to_str()
        .ok_or_else(|| ClipboardError::InvalidPath(path.display().to_string()))?;
    let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");
    Ok(format!(
        "tell app \"Finder\" to set the clipboard to ( POSIX file \"{}\" )",
        escaped
    ))
}
