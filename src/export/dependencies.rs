use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::export::{
    clipboard::{self, ServeMode},
    file,
    types::ExportError,
};

/// Abstraction over the host's file-save mechanism.
pub trait ImageDownloader: Send + Sync {
    fn save(&self, image_data: &[u8], directory: &Path, filename: &str)
    -> Result<PathBuf, ExportError>;
}

/// Abstraction over placing a PNG on the system clipboard.
pub trait ImageClipboard: Send + Sync {
    fn copy(&self, image_data: &[u8]) -> Result<(), ExportError>;
}

/// Bundle of host collaborators used by the export service. Each can be mocked in tests.
#[derive(Clone)]
pub struct ExportDependencies {
    pub downloader: Arc<dyn ImageDownloader>,
    pub clipboard: Arc<dyn ImageClipboard>,
}

impl Default for ExportDependencies {
    fn default() -> Self {
        Self {
            downloader: Arc::new(DefaultDownloader),
            clipboard: Arc::new(WaylandClipboard::default()),
        }
    }
}

struct DefaultDownloader;

/// System clipboard through `wl-copy` or wl-clipboard-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaylandClipboard {
    pub mode: ServeMode,
}

impl ImageDownloader for DefaultDownloader {
    fn save(
        &self,
        image_data: &[u8],
        directory: &Path,
        filename: &str,
    ) -> Result<PathBuf, ExportError> {
        file::save_download(image_data, directory, filename)
    }
}

impl ImageClipboard for WaylandClipboard {
    fn copy(&self, image_data: &[u8]) -> Result<(), ExportError> {
        clipboard::copy_to_clipboard(image_data, self.mode)
    }
}
