//! Pointer input and the tool state machine.
//!
//! This module translates host pointer events into pixel changes. It holds the
//! three-state tool selector and the stroke engine that renders each pointer
//! sample according to the selected tool.

pub mod events;
pub mod stroke;
pub mod tool;

pub use events::PointerEvent;
pub use stroke::{StrokeEngine, StrokeSession, ToolStyles};
pub use tool::{ToolMode, ToolSelector};
