//! Tool selection and pointer routing.

use super::Annotator;
use crate::draw::{Point, SurfaceError};
use crate::input::{PointerEvent, ToolMode};

impl Annotator {
    /// Switches the active tool.
    ///
    /// A stroke in progress keeps going; the next move sample uses the new tool.
    pub fn select_tool(&mut self, mode: ToolMode) {
        if self.tools.select(mode) {
            log::debug!("Tool changed to {}", mode);
        }
        self.observer.tool_changed(mode);
    }

    /// Routes a host pointer event. Returns whether any pixels changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool, SurfaceError> {
        match event {
            PointerEvent::Down { x, y } => {
                self.pointer_down(x, y);
                Ok(false)
            }
            PointerEvent::Move { x, y } => self.pointer_move(x, y),
            PointerEvent::Up => {
                self.pointer_up();
                Ok(false)
            }
            PointerEvent::Leave => {
                self.pointer_leave();
                Ok(false)
            }
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.strokes.on_pointer_down(Point::new(x, y));
    }

    /// Paints one sample with the current tool if a stroke is in progress.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<bool, SurfaceError> {
        let tool = self.tools.current();
        self.strokes
            .on_pointer_move(tool, Point::new(x, y), &mut self.surface)
    }

    pub fn pointer_up(&mut self) {
        self.strokes.on_pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.strokes.on_pointer_leave();
    }
}
