//! Export actions that report back to the user.
//!
//! Encoding happens immediately so the returned futures own a snapshot of the
//! canvas; the annotator keeps accepting input while a save or share runs.

use super::Annotator;
use crate::export::{ExportError, ShareOutcome};
use crate::notification::Notice;
use futures::future::{self, BoxFuture, FutureExt};
use std::path::PathBuf;
use std::sync::Arc;

impl Annotator {
    /// PNG bytes of the current canvas.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        self.export.export_png(&self.surface)
    }

    /// Downloads the canvas under the configured file name.
    pub fn save(&self) -> BoxFuture<'static, Result<PathBuf, ExportError>> {
        let observer = Arc::clone(&self.observer);
        let png = match self.export_png() {
            Ok(png) => png,
            Err(e) => {
                observer.notify(&Notice::ExportFailed {
                    reason: e.to_string(),
                });
                return future::ready(Err(e)).boxed();
            }
        };
        let service = self.export.clone();

        async move {
            let result = service.save(png).await;
            match &result {
                Ok(path) => observer.notify(&Notice::Saved { path: path.clone() }),
                Err(e) => observer.notify(&Notice::ExportFailed {
                    reason: e.to_string(),
                }),
            }
            result
        }
        .boxed()
    }

    /// Copies the canvas to the clipboard, downloading it when the clipboard refuses.
    pub fn share_to_clipboard(&self) -> BoxFuture<'static, Result<ShareOutcome, ExportError>> {
        let observer = Arc::clone(&self.observer);
        let png = match self.export_png() {
            Ok(png) => png,
            Err(e) => {
                observer.notify(&Notice::ExportFailed {
                    reason: e.to_string(),
                });
                return future::ready(Err(e)).boxed();
            }
        };
        let service = self.export.clone();

        async move {
            let result = service.share_to_clipboard(png).await;
            match &result {
                Ok(ShareOutcome::Copied) => observer.notify(&Notice::Copied),
                Ok(ShareOutcome::Fallback { path }) => {
                    observer.notify(&Notice::ClipboardFallback { path: path.clone() })
                }
                Err(e) => observer.notify(&Notice::ExportFailed {
                    reason: e.to_string(),
                }),
            }
            result
        }
        .boxed()
    }
}
