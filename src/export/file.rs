//! Saving exported images as downloads.

use super::types::ExportError;
use crate::config::ExportConfig;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Where downloads are written.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Directory receiving downloads.
    pub directory: PathBuf,
    /// Name of the exported file.
    pub filename: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for DownloadConfig {
    fn from(config: &ExportConfig) -> Self {
        Self {
            directory: config.download_dir(),
            filename: config.filename.clone(),
        }
    }
}

/// Candidate file name for the `n`th download of `filename`.
///
/// `annotation.png`, then `annotation (1).png`, `annotation (2).png`, ...
pub fn numbered_filename(filename: &str, n: usize) -> String {
    if n == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", filename, n),
    }
}

/// Ensure the download directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating download directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Save PNG data as a download without overwriting earlier downloads.
///
/// # Returns
/// Path of the written file
pub fn save_download(
    image_data: &[u8],
    directory: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(directory)?;

    let mut n = 0;
    loop {
        let file_path = directory.join(numbered_filename(filename, n));
        n += 1;
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        };

        log::info!(
            "Saving annotation to: {} ({} bytes)",
            file_path.display(),
            image_data.len()
        );
        file.write_all(image_data)?;
        file.flush()?;
        return Ok(file_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn numbered_filename_inserts_counter_before_extension() {
        assert_eq!(numbered_filename("annotation.png", 0), "annotation.png");
        assert_eq!(numbered_filename("annotation.png", 2), "annotation (2).png");
        assert_eq!(numbered_filename("noext", 1), "noext (1)");
        assert_eq!(numbered_filename(".png", 1), ".png (1)");
    }

    #[test]
    fn save_download_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let first = save_download(b"one", temp.path(), "annotation.png").unwrap();
        let second = save_download(b"two", temp.path(), "annotation.png").unwrap();

        assert!(first.ends_with("annotation.png"));
        assert!(second.ends_with("annotation (1).png"));
        assert_eq!(fs::read(&first).unwrap(), b"one");
        assert_eq!(fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn save_download_creates_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        let path = save_download(b"png", &nested, "annotation.png").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn default_config_uses_annotation_png() {
        assert_eq!(DownloadConfig::default().filename, "annotation.png");
    }
}
