//! Saving the finished animation to disk.

use super::DeliveryError;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Filename pattern for saved animations (chrono format specifiers).
pub const FILENAME_TEMPLATE: &str = "Screen Gif %Y-%m-%d at %H.%M.%S";

/// The user's desktop, falling back to `~/Desktop` when no XDG desktop dir is known.
pub fn default_output_dir() -> Option<PathBuf> {
    dirs::desktop_dir().or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
}

/// Build the filename for an animation saved at `moment`.
pub fn generate_filename(moment: DateTime<Local>) -> String {
    format!("{}.gif", moment.format(FILENAME_TEMPLATE))
}

/// Copy the temporary animation at `source` into `directory` under a timestamped name.
///
/// The directory has to exist already; it is not created.
pub fn save_animation(source: &Path, directory: &Path) -> Result<PathBuf, DeliveryError> {
    if !directory.is_dir() {
        return Err(DeliveryError::DirectoryUnavailable(directory.to_path_buf()));
    }

    let file_path = directory.join(generate_filename(Local::now()));
    log::info!("Saving animation to: {}", file_path.display());

    let written = File::open(source)
        .and_then(|reader| write_complete(reader, &file_path))
        .map_err(|err| DeliveryError::Write {
            path: file_path.clone(),
            source: err,
        })?;
    log::debug!("File written: {} bytes", written);

    Ok(file_path)
}

/// Write everything `reader` yields to `destination`, removing the file again if the write
/// does not complete.
fn write_complete<R: Read>(mut reader: R, destination: &Path) -> io::Result<u64> {
    let result = File::create(destination).and_then(|mut file| {
        let written = io::copy(&mut reader, &mut file)?;
        file.sync_all()?;
        Ok(written)
    });

    if result.is_err() {
        match fs::remove_file(destination) {
            Ok(()) => log::debug!("Removed partial file {}", destination.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "Failed to remove partial file {}: {}",
                destination.display(),
                e
            ),
        }
    }

    result
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn filename_follows_screen_gif_pattern() {
        let moment = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(
            generate_filename(moment),
            "Screen Gif 2024-03-07 at 09.05.02.gif"
        );
    }

    #[test]
    fn save_copies_into_directory() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source.gif");
        fs::write(&source, b"GIF89a-data").unwrap();
        let desktop = temp.path().join("Desktop");
        fs::create_dir(&desktop).unwrap();

        let saved = save_animation(&source, &desktop).unwrap();

        assert_eq!(saved.parent(), Some(desktop.as_path()));
        let name = saved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("Screen Gif "), "{name}");
        assert!(name.ends_with(".gif"), "{name}");
        assert_eq!(fs::read(&saved).unwrap(), b"GIF89a-data");
        assert!(source.exists(), "source is left for the caller to dispose");
    }

    #[test]
    fn save_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source.gif");
        fs::write(&source, b"GIF89a").unwrap();

        let err = save_animation(&source, &temp.path().join("nope")).unwrap_err();

        assert!(matches!(err, DeliveryError::DirectoryUnavailable(_)));
    }

    /// Yields a few bytes, then fails like a device running out of space.
    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("device full"));
            }
            self.served = true;
            let chunk = b"GIF89a";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn interrupted_write_leaves_no_partial_file() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("Screen Gif partial.gif");

        let err = write_complete(FailingReader { served: false }, &destination).unwrap_err();

        assert_eq!(err.to_string(), "device full");
        assert!(!destination.exists());
    }

    #[test]
    fn complete_write_reports_length() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("out.gif");

        let written = write_complete(&b"GIF89a-data"[..], &destination).unwrap();

        assert_eq!(written, 11);
        assert_eq!(fs::read(&destination).unwrap(), b"GIF89a-data");
    }

    #[test]
    fn expand_tilde_only_touches_home_prefix() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with('~'));

        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
