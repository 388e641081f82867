//! Wayland clipboard delivery of PNG bytes.
//!
//! The `wl-copy` binary is preferred: it forks a server that keeps offering the
//! image after this process exits. The wl-clipboard-rs fallback serves from
//! inside this process, so it either blocks until the image is pasted
//! ([`ServeMode::Foreground`]) or keeps offering it only while the process lives
//! ([`ServeMode::Background`]).

use super::types::ExportError;
use std::ffi::OsString;
use std::io::Write;
use std::process::{Command, Stdio};
use wl_clipboard_rs::copy::{MimeType, Options, ServeRequests, Source};

const PNG_MIME: &str = "image/png";

/// How the in-process fallback serves the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServeMode {
    /// Serve from a background thread; the offer ends when the process exits.
    #[default]
    Background,
    /// Block until one paste has been served. For short-lived processes.
    Foreground,
}

/// Places `image_data` on the Wayland clipboard as `image/png`.
pub fn copy_to_clipboard(image_data: &[u8], mode: ServeMode) -> Result<(), ExportError> {
    copy_on_display(std::env::var_os("WAYLAND_DISPLAY"), image_data, mode)
}

fn copy_on_display(
    display: Option<OsString>,
    image_data: &[u8],
    mode: ServeMode,
) -> Result<(), ExportError> {
    let Some(display) = display.filter(|d| !d.is_empty()) else {
        return Err(ExportError::ClipboardError(
            "WAYLAND_DISPLAY is not set; no clipboard to write to".to_string(),
        ));
    };
    log::debug!(
        "Copying {} bytes to the clipboard on {}",
        image_data.len(),
        display.to_string_lossy()
    );

    let command_err = match run_wl_copy(image_data) {
        Ok(()) => {
            log::info!("Copied annotation with wl-copy");
            return Ok(());
        }
        Err(e) => e,
    };
    log::debug!("wl-copy unusable ({}); serving in-process", command_err);

    serve_in_process(image_data, mode).map_err(|lib_err| {
        ExportError::ClipboardError(format!("{}; {}", command_err, lib_err))
    })?;
    log::info!("Copied annotation with wl-clipboard-rs ({:?})", mode);
    Ok(())
}

/// Pipes the bytes into `wl-copy`.
///
/// Only stdin is piped. wl-copy's forked server inherits the other streams, so
/// reading them would block until the clipboard changes hands.
fn run_wl_copy(image_data: &[u8]) -> Result<(), String> {
    let mut child = Command::new("wl-copy")
        .args(["--type", PNG_MIME])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("cannot run wl-copy: {}", e))?;

    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(image_data),
        None => Ok(()),
    };
    // stdin is closed here so wl-copy sees EOF.
    let status = child
        .wait()
        .map_err(|e| format!("wl-copy did not finish: {}", e))?;
    written.map_err(|e| format!("cannot write to wl-copy: {}", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("wl-copy exited with {}", status))
    }
}

fn serve_in_process(image_data: &[u8], mode: ServeMode) -> Result<(), String> {
    let mut opts = Options::new();
    opts.serve_requests(ServeRequests::Only(1));
    opts.foreground(mode == ServeMode::Foreground);
    if mode == ServeMode::Foreground {
        log::info!("Waiting for the image to be pasted");
    }
    opts.copy(
        Source::Bytes(image_data.into()),
        MimeType::Specific(PNG_MIME.to_string()),
    )
    .map_err(|e| format!("wl-clipboard-rs: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_display_fails_without_spawning() {
        let err = copy_on_display(None, b"png", ServeMode::Background).unwrap_err();
        assert!(matches!(err, ExportError::ClipboardError(ref msg) if msg.contains("WAYLAND_DISPLAY")));
    }

    #[test]
    fn empty_display_counts_as_missing() {
        let err = copy_on_display(Some(OsString::new()), b"png", ServeMode::Foreground)
            .unwrap_err();
        assert!(matches!(err, ExportError::ClipboardError(_)));
    }
}
