//! Configuration file support for imagemark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/imagemark/config.toml`. Settings include the canvas size,
//! tool appearance and where exported images are written.
//!
//! If no config file exists, defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{CanvasConfig, DrawingConfig, ExportConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 800
/// height = 600
/// margin = 20.0
///
/// [drawing]
/// pen_color = [29, 185, 84]
/// pen_width = 3.0
/// highlighter_color = "yellow"
/// highlighter_opacity = 0.5
/// highlighter_width = 15.0
/// eraser_size = 20.0
///
/// [export]
/// download_directory = "~/Downloads"
/// filename = "annotation.png"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Canvas size and image margin
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Pen, highlighter and eraser appearance
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Download location and file name
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width`, `canvas.height`: 16 - 8192
    /// - `canvas.margin`: 0.0 - 200.0
    /// - `drawing.pen_width`: 1.0 - 20.0
    /// - `drawing.highlighter_width`: 1.0 - 50.0
    /// - `drawing.highlighter_opacity`: 0.05 - 1.0
    /// - `drawing.eraser_size`: 2.0 - 100.0
    pub fn validate_and_clamp(&mut self) {
        if !(16..=8192).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 16-8192 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(16, 8192);
        }

        if !(16..=8192).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 16-8192 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(16, 8192);
        }

        clamp_f64(&mut self.canvas.margin, 0.0, 200.0, "canvas margin");
        clamp_f64(&mut self.drawing.pen_width, 1.0, 20.0, "pen_width");
        clamp_f64(
            &mut self.drawing.highlighter_width,
            1.0,
            50.0,
            "highlighter_width",
        );
        clamp_f64(
            &mut self.drawing.highlighter_opacity,
            0.05,
            1.0,
            "highlighter_opacity",
        );
        clamp_f64(&mut self.drawing.eraser_size, 2.0, 100.0, "eraser_size");

        let filename = self.export.filename.trim();
        let valid_filename = !filename.is_empty()
            && !filename.contains(['/', '\\'])
            && filename.to_lowercase().ends_with(".png");
        if !valid_filename {
            log::warn!(
                "Invalid export filename '{}', falling back to '{}'",
                self.export.filename,
                types::default_filename()
            );
            self.export.filename = types::default_filename();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/imagemark/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("imagemark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Serializes the config to TOML and writes it to `config_path`, creating
    /// the parent directory if needed.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes `config.example.toml` to the user's config directory and returns its path.
    ///
    /// # Errors
    /// Returns an error if a config file already exists or cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn clamp_f64(value: &mut f64, min: f64, max: f64, name: &str) {
    if !(min..=max).contains(value) {
        log::warn!(
            "Invalid {} {:.2}, clamping to {:.2}-{:.2} range",
            name,
            value,
            min,
            max
        );
        *value = if value.is_nan() {
            min
        } else {
            value.clamp(min, max)
        };
    }
}
