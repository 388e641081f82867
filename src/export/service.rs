use std::{path::PathBuf, sync::Arc};

use tokio::task;

use crate::draw::CanvasSurface;
use crate::export::{
    dependencies::ExportDependencies,
    file::DownloadConfig,
    types::{ExportError, ShareOutcome},
};

/// Turns the canvas into PNG bytes and delivers them to the host.
///
/// Cloning is cheap; clones share the same collaborators, so a clone can be
/// moved into a background task while the canvas keeps taking input.
#[derive(Clone)]
pub struct ExportService {
    dependencies: Arc<ExportDependencies>,
    config: DownloadConfig,
}

impl ExportService {
    pub fn new(config: DownloadConfig) -> Self {
        Self::with_dependencies(config, ExportDependencies::default())
    }

    /// Create a service with custom collaborators (useful for testing).
    pub fn with_dependencies(config: DownloadConfig, dependencies: ExportDependencies) -> Self {
        Self {
            dependencies: Arc::new(dependencies),
            config,
        }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// PNG encoding of the full canvas, blank or not.
    pub fn export_png(&self, surface: &CanvasSurface) -> Result<Vec<u8>, ExportError> {
        let bytes = surface.to_png()?;
        log::debug!(
            "Encoded {}x{} canvas as PNG ({} bytes)",
            surface.width(),
            surface.height(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Hands `image_data` to the file-save collaborator under `filename`.
    pub async fn download(
        &self,
        image_data: Vec<u8>,
        filename: &str,
    ) -> Result<PathBuf, ExportError> {
        let downloader = Arc::clone(&self.dependencies.downloader);
        let directory = self.config.directory.clone();
        let filename = filename.to_string();
        task::spawn_blocking(move || downloader.save(&image_data, &directory, &filename))
            .await
            .map_err(|e| ExportError::Task(format!("Save task failed: {}", e)))?
    }

    /// Downloads under the configured file name.
    pub async fn save(&self, image_data: Vec<u8>) -> Result<PathBuf, ExportError> {
        let filename = self.config.filename.clone();
        self.download(image_data, &filename).await
    }

    /// Puts `image_data` on the clipboard, downloading it instead when the
    /// clipboard refuses.
    ///
    /// A clipboard failure is reported as [`ShareOutcome::Fallback`], never as
    /// an error. Only a failing fallback download is an error.
    pub async fn share_to_clipboard(
        &self,
        image_data: Vec<u8>,
    ) -> Result<ShareOutcome, ExportError> {
        let clipboard = Arc::clone(&self.dependencies.clipboard);
        let clip_data = image_data.clone();
        let copied = task::spawn_blocking(move || clipboard.copy(&clip_data))
            .await
            .map_err(|e| ExportError::ClipboardError(format!("Clipboard task failed: {}", e)));

        match copied {
            Ok(Ok(())) => {
                log::info!("Copied annotation to clipboard");
                Ok(ShareOutcome::Copied)
            }
            Ok(Err(e)) | Err(e) => {
                log::warn!("Clipboard unavailable ({}); downloading instead", e);
                let path = self.save(image_data).await?;
                Ok(ShareOutcome::Fallback { path })
            }
        }
    }
}
