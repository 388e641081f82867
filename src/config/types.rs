//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Canvas geometry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Canvas width in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Canvas height in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_height")]
    pub height: u32,

    /// Free border kept on each side of a placed image (valid range: 0.0 - 200.0)
    #[serde(default = "default_margin")]
    pub margin: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            margin: default_margin(),
        }
    }
}

/// Drawing tool appearance.
///
/// Joins and caps of pen and highlighter lines are always round.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Pen color - a named color or an RGB array like `[29, 185, 84]`
    #[serde(default = "default_pen_color")]
    pub pen_color: ColorSpec,

    /// Pen line width in pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_pen_width")]
    pub pen_width: f64,

    /// Highlighter base color; opacity is set separately
    #[serde(default = "default_highlighter_color")]
    pub highlighter_color: ColorSpec,

    /// Highlighter opacity (valid range: 0.05 - 1.0)
    #[serde(default = "default_highlighter_opacity")]
    pub highlighter_opacity: f64,

    /// Highlighter line width in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_highlighter_width")]
    pub highlighter_width: f64,

    /// Side of the square cleared by the eraser in pixels (valid range: 2.0 - 100.0)
    #[serde(default = "default_eraser_size")]
    pub eraser_size: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            pen_color: default_pen_color(),
            pen_width: default_pen_width(),
            highlighter_color: default_highlighter_color(),
            highlighter_opacity: default_highlighter_opacity(),
            highlighter_width: default_highlighter_width(),
            eraser_size: default_eraser_size(),
        }
    }
}

/// Where exported images end up.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory that receives downloads; `~` is expanded
    #[serde(default = "default_download_directory")]
    pub download_directory: String,

    /// File name used for downloads and the clipboard fallback
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            download_directory: default_download_directory(),
            filename: default_filename(),
        }
    }
}

impl ExportConfig {
    pub fn download_dir(&self) -> PathBuf {
        crate::util::expand_tilde(&self.download_directory)
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_margin() -> f64 {
    20.0
}

fn default_pen_color() -> ColorSpec {
    ColorSpec::Rgb([29, 185, 84])
}

fn default_pen_width() -> f64 {
    3.0
}

fn default_highlighter_color() -> ColorSpec {
    ColorSpec::Name("yellow".to_string())
}

fn default_highlighter_opacity() -> f64 {
    0.5
}

fn default_highlighter_width() -> f64 {
    15.0
}

fn default_eraser_size() -> f64 {
    20.0
}

fn default_download_directory() -> String {
    dirs::download_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "~/Downloads".to_string())
}

pub(crate) fn default_filename() -> String {
    "annotation.png".to_string()
}
