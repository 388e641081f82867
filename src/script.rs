//! Scripted sessions.
//!
//! A script is a TOML file listing the host events to replay against an
//! [`Annotator`], in order:
//!
//! ```toml
//! [[step]]
//! action = "upload"
//! files = ["photo.jpg"]
//!
//! [[step]]
//! action = "stroke"
//! points = [[10.0, 10.0], [120.0, 40.0]]
//!
//! [[step]]
//! action = "share"
//! ```
//!
//! Image indices refer to upload order. Relative file paths are resolved
//! against the directory holding the script.

use crate::annotator::Annotator;
use crate::input::{PointerEvent, ToolMode};
use crate::store::{ImageFile, ImageId};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One host event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Replace all uploads with `files` and wait for them to load.
    Upload { files: Vec<PathBuf> },
    Select { index: usize },
    Remove { index: usize },
    Tool { mode: ToolMode },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    /// Down at the first point, move through the rest, then up.
    Stroke { points: Vec<[f64; 2]> },
    Clear,
    Reload,
    Save,
    Share,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid script {}", path.display()))
    }
}

/// Replays `script` against `annotator`. Paths are resolved against `base_dir`.
pub async fn run(annotator: &mut Annotator, script: &Script, base_dir: &Path) -> Result<()> {
    for (n, step) in script.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", n + 1, step);
        apply(annotator, step, base_dir)
            .await
            .with_context(|| format!("Step {} failed", n + 1))?;
    }
    Ok(())
}

async fn apply(annotator: &mut Annotator, step: &Step, base_dir: &Path) -> Result<()> {
    match step {
        Step::Upload { files } => {
            let files = files.iter().map(|f| ImageFile::from_path(base_dir.join(f)));
            annotator.replace_all(files);
            annotator.settle_reads().await?;
        }
        Step::Select { index } => {
            let id = image_at(annotator, *index)?;
            annotator.select(id);
        }
        Step::Remove { index } => {
            let id = image_at(annotator, *index)?;
            annotator.remove(id)?;
        }
        Step::Tool { mode } => annotator.select_tool(*mode),
        Step::Down { x, y } => {
            annotator.handle_pointer(PointerEvent::Down { x: *x, y: *y })?;
        }
        Step::Move { x, y } => {
            annotator.handle_pointer(PointerEvent::Move { x: *x, y: *y })?;
        }
        Step::Up => {
            annotator.handle_pointer(PointerEvent::Up)?;
        }
        Step::Leave => {
            annotator.handle_pointer(PointerEvent::Leave)?;
        }
        Step::Stroke { points } => {
            let Some(([x, y], rest)) = points.split_first() else {
                bail!("stroke needs at least one point");
            };
            annotator.pointer_down(*x, *y);
            for [x, y] in rest {
                annotator.pointer_move(*x, *y)?;
            }
            annotator.pointer_up();
        }
        Step::Clear => annotator.clear_canvas()?,
        Step::Reload => {
            annotator.reload_active()?;
        }
        Step::Save => {
            annotator.save().await?;
        }
        Step::Share => {
            annotator.share_to_clipboard().await?;
        }
    }
    Ok(())
}

fn image_at(annotator: &Annotator, index: usize) -> Result<ImageId> {
    match annotator.store().records().get(index) {
        Some(record) => Ok(record.id()),
        None => bail!(
            "no image at index {} ({} loaded)",
            index,
            annotator.store().len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn parses_every_action() {
        let script = Script::parse(
            r#"
            [[step]]
            action = "upload"
            files = ["a.png", "b.png"]

            [[step]]
            action = "tool"
            mode = "highlighter"

            [[step]]
            action = "stroke"
            points = [[1.0, 2.0], [3.0, 4.0]]

            [[step]]
            action = "select"
            index = 1

            [[step]]
            action = "leave"

            [[step]]
            action = "share"
            "#,
        )
        .unwrap();

        assert_eq!(
            script.steps,
            vec![
                Step::Upload {
                    files: vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
                },
                Step::Tool {
                    mode: ToolMode::Highlighter
                },
                Step::Stroke {
                    points: vec![[1.0, 2.0], [3.0, 4.0]]
                },
                Step::Select { index: 1 },
                Step::Leave,
                Step::Share,
            ]
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(Script::parse("[[step]]\naction = \"rotate\"\n").is_err());
    }

    #[test]
    fn empty_script_has_no_steps() {
        assert!(Script::parse("").unwrap().steps.is_empty());
    }

    #[tokio::test]
    async fn replays_upload_and_stroke() {
        let temp = TempDir::new().unwrap();
        RgbaImage::from_pixel(50, 50, Rgba([255, 255, 255, 255]))
            .save(temp.path().join("white.png"))
            .unwrap();

        let mut config = Config::default();
        config.canvas.width = 50;
        config.canvas.height = 50;
        config.canvas.margin = 0.0;
        let mut annotator = Annotator::new(&config).unwrap();

        let script = Script::parse(
            r#"
            [[step]]
            action = "upload"
            files = ["white.png"]

            [[step]]
            action = "tool"
            mode = "eraser"

            [[step]]
            action = "stroke"
            points = [[25.0, 25.0], [25.0, 25.0]]
            "#,
        )
        .unwrap();
        run(&mut annotator, &script, temp.path()).await.unwrap();

        assert_eq!(annotator.store().len(), 1);
        assert_eq!(annotator.tool(), ToolMode::Eraser);
        assert_eq!(annotator.surface().pixel(25, 25), Some([0, 0, 0, 0]));
        assert_eq!(annotator.surface().pixel(2, 2), Some([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn out_of_range_index_fails() {
        let mut annotator = Annotator::new(&Config::default()).unwrap();
        let script = Script {
            steps: vec![Step::Select { index: 0 }],
        };
        let err = run(&mut annotator, &script, Path::new(".")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("no image at index 0"));
    }
}
