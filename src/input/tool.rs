//! Drawing tool selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drawing tool selection.
///
/// The active tool decides what a pointer drag does to the canvas pixels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Thin opaque accent line (default)
    #[default]
    Pen,
    /// Wide translucent yellow line
    Highlighter,
    /// Clears a square around each pointer sample
    Eraser,
}

impl ToolMode {
    pub const ALL: [ToolMode; 3] = [ToolMode::Pen, ToolMode::Highlighter, ToolMode::Eraser];

    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Pen => "pen",
            ToolMode::Highlighter => "highlighter",
            ToolMode::Eraser => "eraser",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Three-state tool selector. Starts on [`ToolMode::Pen`] and only changes on
/// an explicit [`select`](Self::select).
#[derive(Debug, Default)]
pub struct ToolSelector {
    current: ToolMode,
}

impl ToolSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ToolMode {
        self.current
    }

    /// Switches to `mode`. Returns `true` when the mode actually changed.
    pub fn select(&mut self, mode: ToolMode) -> bool {
        let changed = self.current != mode;
        self.current = mode;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_pen() {
        assert_eq!(ToolSelector::new().current(), ToolMode::Pen);
    }

    #[test]
    fn select_reports_changes() {
        let mut selector = ToolSelector::new();
        assert!(selector.select(ToolMode::Eraser));
        assert_eq!(selector.current(), ToolMode::Eraser);
        assert!(!selector.select(ToolMode::Eraser));
        assert!(selector.select(ToolMode::Highlighter));
        assert_eq!(selector.current(), ToolMode::Highlighter);
    }

    #[test]
    fn deserializes_lowercase_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            tool: ToolMode,
        }
        for mode in ToolMode::ALL {
            let parsed: Wrapper = toml::from_str(&format!("tool = \"{mode}\"")).unwrap();
            assert_eq!(parsed.tool, mode);
        }
    }
}
