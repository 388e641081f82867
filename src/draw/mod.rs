//! Raster canvas primitives (Cairo-based).
//!
//! This module defines the drawing types used by the annotation canvas:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`CanvasSurface`]: the mutable pixel buffer and its clear/draw primitives
//! - [`fit_within`]: scale-to-fit placement for uploaded images

pub mod color;
pub mod fit;
pub mod surface;

pub use color::Color;
pub use fit::{Placement, fit_within};
pub use surface::{CanvasSurface, LineStyle, Point, SurfaceError};

#[allow(unused_imports)]
pub use color::{ACCENT, BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
