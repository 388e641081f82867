//! Pointer events delivered by the host.

/// A pointer event against the canvas, in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    /// Pointer left the canvas bounds
    Leave,
}
