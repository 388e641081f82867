//! Raster canvas backed by a cairo image surface.
//!
//! The surface is the only copy of what the user sees: image placement and
//! strokes write straight into its pixels and nothing is retained beside it.
//! A cairo [`Context`](cairo::Context) is created per operation and dropped
//! before returning so that the pixel data stays exclusively borrowable.

use super::color::Color;
use super::fit::{self, Placement};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::io::Write;
use thiserror::Error;

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Color and width of a stroked segment. Joins and caps are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
}

/// Errors raised by canvas operations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface pixel data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding failed: {0}")]
    Png(String),
}

/// Fixed-size ARGB32 pixel buffer plus the primitives that mutate it.
pub struct CanvasSurface {
    surface: cairo::ImageSurface,
    width: u32,
    height: u32,
    margin: f64,
}

impl std::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("margin", &self.margin)
            .finish()
    }
}

impl CanvasSurface {
    /// Creates a transparent canvas.
    ///
    /// `margin` is the free border kept around images placed by
    /// [`paint_image`](Self::paint_image).
    pub fn new(width: u32, height: u32, margin: f64) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        let surface =
            cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;
        Ok(Self {
            surface,
            width,
            height,
            margin,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn context(&self) -> Result<cairo::Context, SurfaceError> {
        Ok(cairo::Context::new(&self.surface)?)
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint()?;
        Ok(())
    }

    /// Replaces the whole buffer with `pixels`, scaled to fit and centered.
    ///
    /// Returns the placement used, or `None` when the image has no area (the
    /// canvas is still cleared in that case).
    pub fn paint_image(&mut self, pixels: &RgbaImage) -> Result<Option<Placement>, SurfaceError> {
        self.clear()?;

        let Some(placement) = fit::fit_within(
            pixels.width(),
            pixels.height(),
            self.width,
            self.height,
            self.margin,
        ) else {
            log::warn!("Image has no drawable area; canvas left empty");
            return Ok(None);
        };

        // Cairo cannot hold sources past 32767px, so shrink to the drawn size first.
        let target_w = (placement.width.round() as u32).max(1);
        let target_h = (placement.height.round() as u32).max(1);
        let resized;
        let source_pixels = if (target_w, target_h) == pixels.dimensions() {
            pixels
        } else {
            resized = imageops::resize(pixels, target_w, target_h, FilterType::Triangle);
            &resized
        };

        let source = image_surface_from_rgba(source_pixels)?;
        let ctx = self.context()?;
        ctx.translate(placement.x, placement.y);
        ctx.scale(
            placement.scale_x(source_pixels.width()),
            placement.scale_y(source_pixels.height()),
        );
        ctx.set_source_surface(&source, 0.0, 0.0)?;
        ctx.paint()?;

        log::debug!(
            "Painted {}x{} image at ({:.1}, {:.1}) size {:.1}x{:.1}",
            pixels.width(),
            pixels.height(),
            placement.x,
            placement.y,
            placement.width,
            placement.height
        );
        Ok(Some(placement))
    }

    /// Draws a round-capped, round-joined segment on top of the current pixels.
    pub fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        style: LineStyle,
    ) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        style.color.apply(&ctx);
        ctx.set_line_width(style.width);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        ctx.stroke()?;
        Ok(())
    }

    /// Clears an axis-aligned rectangle to transparent.
    pub fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.rectangle(x, y, w, h);
        ctx.fill()?;
        Ok(())
    }

    /// Encodes the full buffer as PNG into `writer`.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), SurfaceError> {
        self.surface.flush();
        self.surface
            .write_to_png(writer)
            .map_err(|e| SurfaceError::Png(e.to_string()))
    }

    /// Encodes the full buffer as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut buffer = Vec::new();
        self.write_png(&mut buffer)?;
        Ok(buffer)
    }

    /// Returns the straight-alpha RGBA value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.surface.stride() as usize;
        let offset = y as usize * stride + x as usize * 4;
        let mut out = None;
        self.surface
            .with_data(|data| {
                out = read_pixel(data, offset);
            })
            .ok()?;
        out
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        let mut blank = false;
        let ok = self
            .surface
            .with_data(|data| blank = data.iter().all(|byte| *byte == 0))
            .is_ok();
        ok && blank
    }

    /// Copies the buffer out as a straight-alpha RGBA image.
    pub fn to_rgba_image(&self) -> Result<RgbaImage, SurfaceError> {
        let stride = self.surface.stride() as usize;
        let mut image = RgbaImage::new(self.width, self.height);
        self.surface.with_data(|data| {
            for (x, y, px) in image.enumerate_pixels_mut() {
                let offset = y as usize * stride + x as usize * 4;
                if let Some(rgba) = read_pixel(data, offset) {
                    px.0 = rgba;
                }
            }
        })?;
        Ok(image)
    }
}

/// Builds a cairo surface holding `pixels` in premultiplied ARGB32.
fn image_surface_from_rgba(pixels: &RgbaImage) -> Result<cairo::ImageSurface, SurfaceError> {
    let mut surface = cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        pixels.width() as i32,
        pixels.height() as i32,
    )?;
    let stride = surface.stride() as usize;
    {
        let mut data = surface.data()?;
        for (x, y, px) in pixels.enumerate_pixels() {
            let offset = y as usize * stride + x as usize * 4;
            data[offset..offset + 4].copy_from_slice(&pack_argb(px.0).to_ne_bytes());
        }
    }
    Ok(surface)
}

fn read_pixel(data: &[u8], offset: usize) -> Option<[u8; 4]> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(unpack_argb(u32::from_ne_bytes(bytes)))
}

fn pack_argb([r, g, b, a]: [u8; 4]) -> u32 {
    let premul = |c: u8| (c as u32 * a as u32 + 127) / 255;
    (a as u32) << 24 | premul(r) << 16 | premul(g) << 8 | premul(b)
}

fn unpack_argb(argb: u32) -> [u8; 4] {
    let a = (argb >> 24) & 0xff;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let unpremul = |c: u32| ((c * 255 + a / 2) / a).min(255) as u8;
    [
        unpremul((argb >> 16) & 0xff),
        unpremul((argb >> 8) & 0xff),
        unpremul(argb & 0xff),
        a as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{ACCENT, RED};
    use image::Rgba;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    #[test]
    fn argb_packing_round_trips_opaque_and_transparent() {
        assert_eq!(unpack_argb(pack_argb([29, 185, 84, 255])), [29, 185, 84, 255]);
        assert_eq!(unpack_argb(pack_argb([10, 20, 30, 0])), [0, 0, 0, 0]);
    }

    #[test]
    fn new_surface_is_blank() {
        let surface = CanvasSurface::new(64, 48, 20.0).unwrap();
        assert!(surface.is_blank());
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(64, 0), None);
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(
            CanvasSurface::new(0, 10, 20.0),
            Err(SurfaceError::InvalidSize { .. })
        ));
    }

    #[test]
    fn paint_image_centers_small_image() {
        let mut surface = CanvasSurface::new(200, 100, 20.0).unwrap();
        let placement = surface
            .paint_image(&solid(40, 20, [255, 0, 0, 255]))
            .unwrap()
            .unwrap();
        assert_eq!(placement.x, 80.0);
        assert_eq!(placement.y, 40.0);
        assert_eq!(surface.pixel(100, 50), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(79, 50).map(|p| p[3]), Some(0));
    }

    #[test]
    fn paint_image_replaces_previous_content() {
        let mut surface = CanvasSurface::new(200, 100, 20.0).unwrap();
        surface
            .stroke_segment(
                Point::new(0.0, 5.0),
                Point::new(200.0, 5.0),
                LineStyle {
                    color: RED,
                    width: 4.0,
                },
            )
            .unwrap();
        assert_ne!(surface.pixel(50, 5).map(|p| p[3]), Some(0));

        surface.paint_image(&solid(10, 10, [0, 0, 255, 255])).unwrap();
        assert_eq!(surface.pixel(50, 5), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(100, 50), Some([0, 0, 255, 255]));
    }

    #[test]
    fn paint_image_accepts_images_wider_than_cairo_limit() {
        let mut surface = CanvasSurface::new(200, 100, 0.0).unwrap();
        let placement = surface
            .paint_image(&solid(40_000, 1, [255, 0, 0, 255]))
            .unwrap()
            .unwrap();
        assert_eq!(placement.width, 200.0);
        assert!(placement.height < 1.0);
    }

    #[test]
    fn paint_image_downscales_large_images_to_fit() {
        let mut surface = CanvasSurface::new(100, 100, 0.0).unwrap();
        surface
            .paint_image(&solid(400, 100, [0, 255, 0, 255]))
            .unwrap();
        // 100x25 band centered vertically.
        assert_eq!(surface.pixel(50, 50), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(50, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn stroke_segment_is_additive() {
        let mut surface = CanvasSurface::new(100, 100, 20.0).unwrap();
        let style = LineStyle {
            color: ACCENT,
            width: 3.0,
        };
        surface
            .stroke_segment(Point::new(10.0, 10.0), Point::new(90.0, 10.0), style)
            .unwrap();
        surface
            .stroke_segment(Point::new(10.0, 50.0), Point::new(90.0, 50.0), style)
            .unwrap();
        assert_eq!(surface.pixel(50, 10), Some([29, 185, 84, 255]));
        assert_eq!(surface.pixel(50, 50), Some([29, 185, 84, 255]));
        assert_eq!(surface.pixel(50, 30), Some([0, 0, 0, 0]));
    }

    #[test]
    fn clear_rect_only_touches_its_rectangle() {
        let mut surface = CanvasSurface::new(60, 60, 0.0).unwrap();
        surface.paint_image(&solid(60, 60, [255, 255, 255, 255])).unwrap();
        surface.clear_rect(10.0, 10.0, 20.0, 20.0).unwrap();
        assert_eq!(surface.pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(29, 29), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(30, 30), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(9, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn clear_twice_equals_clear_once() {
        let mut surface = CanvasSurface::new(32, 32, 0.0).unwrap();
        surface.paint_image(&solid(32, 32, [1, 2, 3, 255])).unwrap();
        surface.clear().unwrap();
        let once = surface.to_rgba_image().unwrap();
        surface.clear().unwrap();
        let twice = surface.to_rgba_image().unwrap();
        assert!(surface.is_blank());
        assert_eq!(once, twice);
    }

    #[test]
    fn png_encoding_matches_buffer() {
        let mut surface = CanvasSurface::new(16, 8, 0.0).unwrap();
        surface.paint_image(&solid(16, 8, [255, 0, 0, 255])).unwrap();
        surface.clear_rect(0.0, 0.0, 4.0, 4.0).unwrap();

        let png = surface.to_png().unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert_eq!(decoded, surface.to_rgba_image().unwrap());
    }
}
