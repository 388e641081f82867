//! Scale-to-fit placement of an image inside the canvas.

/// Where and how large an image is drawn on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge in canvas pixels
    pub x: f64,
    /// Top edge in canvas pixels
    pub y: f64,
    /// Drawn width in canvas pixels
    pub width: f64,
    /// Drawn height in canvas pixels
    pub height: f64,
}

impl Placement {
    /// Horizontal scale factor applied to the natural image width.
    pub fn scale_x(&self, natural_width: u32) -> f64 {
        self.width / natural_width as f64
    }

    /// Vertical scale factor applied to the natural image height.
    pub fn scale_y(&self, natural_height: u32) -> f64 {
        self.height / natural_height as f64
    }
}

/// Computes the placement of an image of natural size `width` x `height` on a
/// canvas of `canvas_width` x `canvas_height`, keeping `margin` pixels free on
/// each side.
///
/// The image is scaled down uniformly until it fits the inner box and is never
/// scaled up. The result is centered on the full canvas, not the inner box.
///
/// Returns `None` for images with a zero dimension.
pub fn fit_within(
    width: u32,
    height: u32,
    canvas_width: u32,
    canvas_height: u32,
    margin: f64,
) -> Option<Placement> {
    if width == 0 || height == 0 {
        return None;
    }

    let canvas_w = canvas_width as f64;
    let canvas_h = canvas_height as f64;
    // A canvas narrower than both margins still gets a 1px target.
    let max_w = (canvas_w - 2.0 * margin).max(1.0);
    let max_h = (canvas_h - 2.0 * margin).max(1.0);

    let mut w = width as f64;
    let mut h = height as f64;
    if w > max_w {
        h *= max_w / w;
        w = max_w;
    }
    if h > max_h {
        w *= max_h / h;
        h = max_h;
    }

    Some(Placement {
        x: (canvas_w - w) / 2.0,
        y: (canvas_h - h) / 2.0,
        width: w,
        height: h,
    })
}
