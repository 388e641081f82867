//! User-facing notices and the observer interface the host implements.
//!
//! The annotator never touches host UI directly. It reports tool changes,
//! selection changes and notices through [`UiObserver`], and the host decides
//! how to show them (button highlight, thumbnail styling, alert, toast).

use crate::input::ToolMode;
use crate::store::ImageId;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use zbus::{Connection, proxy};

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The annotation was downloaded to `path`.
    Saved { path: PathBuf },
    /// The annotation is on the clipboard.
    Copied,
    /// The clipboard refused the image; it was downloaded to `path` instead.
    ClipboardFallback { path: PathBuf },
    /// An action needing a selected image was attempted without one.
    NoActiveImage,
    /// Export failed outright.
    ExportFailed { reason: String },
}

impl Notice {
    pub fn summary(&self) -> &'static str {
        match self {
            Notice::Saved { .. } => "Annotation saved",
            Notice::Copied => "Copied to clipboard",
            Notice::ClipboardFallback { .. } => "Clipboard unavailable",
            Notice::NoActiveImage => "No image selected",
            Notice::ExportFailed { .. } => "Export failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Saved { path } => format!("Annotation saved as image: {}", path.display()),
            Notice::Copied => {
                "Annotation image copied to clipboard! Paste in chat/email/documents.".to_string()
            }
            Notice::ClipboardFallback { path } => format!(
                "Clipboard sharing not supported; image downloaded to {}",
                path.display()
            ),
            Notice::NoActiveImage => "Select an image first.".to_string(),
            Notice::ExportFailed { reason } => format!("Could not export annotation: {}", reason),
        }
    }
}

/// Callbacks from the annotator to the host UI. All methods default to no-ops.
pub trait UiObserver: Send + Sync {
    /// The selected tool changed; the host highlights its control.
    fn tool_changed(&self, _tool: ToolMode) {}

    /// The active image changed (or was cleared).
    fn active_image_changed(&self, _id: Option<ImageId>) {}

    /// A notice should be shown to the user.
    fn notify(&self, _notice: &Notice) {}
}

/// Observer that only writes to the log.
#[derive(Debug, Default)]
pub struct LogObserver;

impl UiObserver for LogObserver {
    fn tool_changed(&self, tool: ToolMode) {
        log::info!("Tool: {}", tool);
    }

    fn active_image_changed(&self, id: Option<ImageId>) {
        match id {
            Some(id) => log::info!("Active image: {}", id),
            None => log::info!("No active image"),
        }
    }

    fn notify(&self, notice: &Notice) {
        log::info!("{}: {}", notice.summary(), notice.message());
    }
}

/// D-Bus interface for freedesktop Notifications.
#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    /// Send a notification.
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, zbus::zvariant::Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Send a desktop notification.
pub async fn send_notification(summary: &str, body: &str, icon: Option<&str>) -> Result<(), String> {
    let connection = Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session bus: {}", e))?;

    let proxy = NotificationsProxy::new(&connection)
        .await
        .map_err(|e| format!("Failed to create notifications proxy: {}", e))?;

    let icon = icon.unwrap_or("image-x-generic");
    let hints = HashMap::new();

    proxy
        .notify(
            "imagemark",
            0,
            icon,
            summary,
            body,
            vec![],
            hints,
            3000, // 3 second timeout
        )
        .await
        .map_err(|e| format!("Failed to send notification: {}", e))?;

    Ok(())
}

/// Observer that posts notices as desktop notifications and logs the rest.
pub struct DesktopNotifier {
    runtime_handle: tokio::runtime::Handle,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl DesktopNotifier {
    pub fn new(runtime_handle: tokio::runtime::Handle) -> Self {
        Self {
            runtime_handle,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Waits until every notification sent so far has been delivered or failed.
    pub async fn flush(&self) {
        let pending = match self.in_flight.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for handle in pending {
            if let Err(e) = handle.await {
                log::warn!("Notification task failed: {}", e);
            }
        }
    }
}

impl UiObserver for DesktopNotifier {
    fn tool_changed(&self, tool: ToolMode) {
        LogObserver.tool_changed(tool);
    }

    fn active_image_changed(&self, id: Option<ImageId>) {
        LogObserver.active_image_changed(id);
    }

    fn notify(&self, notice: &Notice) {
        LogObserver.notify(notice);
        let summary = notice.summary().to_string();
        let body = notice.message();
        let icon = match notice {
            Notice::NoActiveImage | Notice::ExportFailed { .. } => "dialog-warning",
            _ => "image-x-generic",
        };
        let handle = self.runtime_handle.spawn(async move {
            if let Err(e) = send_notification(&summary, &body, Some(icon)).await {
                log::warn!("Failed to send notification: {}", e);
            }
        });
        match self.in_flight.lock() {
            Ok(mut pending) => pending.push(handle),
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flush_without_notices_returns_immediately() {
        let notifier = DesktopNotifier::new(tokio::runtime::Handle::current());
        notifier.tool_changed(ToolMode::Eraser);
        notifier.flush().await;
        assert!(notifier.in_flight.lock().unwrap().is_empty());
    }

    #[test]
    fn messages_match_notice_kind() {
        assert_eq!(Notice::NoActiveImage.message(), "Select an image first.");
        assert!(Notice::Copied.message().contains("copied to clipboard"));
        let fallback = Notice::ClipboardFallback {
            path: PathBuf::from("/tmp/annotation.png"),
        };
        assert!(fallback.message().contains("not supported"));
        assert!(fallback.message().contains("annotation.png"));
    }
}
