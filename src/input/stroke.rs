//! Immediate-mode stroke rendering.
//!
//! Each pointer move paints straight into the [`CanvasSurface`]. Nothing about
//! the stroke is kept once it is drawn, apart from the last sampled point.

use super::tool::ToolMode;
use crate::config::DrawingConfig;
use crate::draw::{ACCENT, CanvasSurface, LineStyle, Point, SurfaceError, YELLOW};

/// Per-tool rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolStyles {
    pub pen: LineStyle,
    pub highlighter: LineStyle,
    /// Side length of the square cleared by the eraser
    pub eraser_size: f64,
}

impl Default for ToolStyles {
    fn default() -> Self {
        Self {
            pen: LineStyle {
                color: ACCENT,
                width: 3.0,
            },
            highlighter: LineStyle {
                color: YELLOW.with_alpha(0.5),
                width: 15.0,
            },
            eraser_size: 20.0,
        }
    }
}

impl ToolStyles {
    pub fn from_config(config: &DrawingConfig) -> Self {
        Self {
            pen: LineStyle {
                color: config.pen_color.to_color(),
                width: config.pen_width,
            },
            highlighter: LineStyle {
                color: config
                    .highlighter_color
                    .to_color()
                    .with_alpha(config.highlighter_opacity),
                width: config.highlighter_width,
            },
            eraser_size: config.eraser_size,
        }
    }
}

/// State of the drag currently in progress, if any.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StrokeSession {
    active: bool,
    last_point: Option<Point>,
}

impl StrokeSession {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }
}

/// Turns pointer samples into pixels according to the current tool.
#[derive(Debug, Default)]
pub struct StrokeEngine {
    session: StrokeSession,
    styles: ToolStyles,
}

impl StrokeEngine {
    pub fn new(styles: ToolStyles) -> Self {
        Self {
            session: StrokeSession::default(),
            styles,
        }
    }

    pub fn session(&self) -> StrokeSession {
        self.session
    }

    /// Starts a stroke at `point`. Allowed on a blank canvas.
    pub fn on_pointer_down(&mut self, point: Point) {
        self.session = StrokeSession {
            active: true,
            last_point: Some(point),
        };
    }

    /// Paints one sample with `tool`.
    ///
    /// Returns `Ok(false)` when no stroke is in progress and nothing was drawn.
    pub fn on_pointer_move(
        &mut self,
        tool: ToolMode,
        point: Point,
        surface: &mut CanvasSurface,
    ) -> Result<bool, SurfaceError> {
        if !self.session.active {
            return Ok(false);
        }

        let style = match tool {
            ToolMode::Pen => self.styles.pen,
            ToolMode::Highlighter => self.styles.highlighter,
            ToolMode::Eraser => {
                // Point-sampled: fast drags leave gaps between squares.
                let size = self.styles.eraser_size;
                let half = size / 2.0;
                surface.clear_rect(point.x - half, point.y - half, size, size)?;
                return Ok(true);
            }
        };

        let from = self.session.last_point.unwrap_or(point);
        surface.stroke_segment(from, point, style)?;
        self.session.last_point = Some(point);
        Ok(true)
    }

    pub fn on_pointer_up(&mut self) {
        self.end();
    }

    pub fn on_pointer_leave(&mut self) {
        self.end();
    }

    fn end(&mut self) {
        self.session.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn canvas() -> CanvasSurface {
        CanvasSurface::new(100, 100, 0.0).unwrap()
    }

    fn alpha(surface: &CanvasSurface, x: u32, y: u32) -> u8 {
        surface.pixel(x, y).unwrap()[3]
    }

    #[test]
    fn move_without_down_draws_nothing() {
        let mut surface = canvas();
        let mut engine = StrokeEngine::default();
        let drew = engine
            .on_pointer_move(ToolMode::Pen, Point::new(50.0, 50.0), &mut surface)
            .unwrap();
        assert!(!drew);
        assert!(surface.is_blank());
    }

    #[test]
    fn pen_draws_three_pixel_accent_line() {
        let mut surface = canvas();
        let mut engine = StrokeEngine::default();
        engine.on_pointer_down(Point::new(10.0, 10.0));
        engine
            .on_pointer_move(ToolMode::Pen, Point::new(20.0, 10.0), &mut surface)
            .unwrap();

        assert_eq!(surface.pixel(15, 10), Some([29, 185, 84, 255]));
        assert_eq!(surface.pixel(15, 9), Some([29, 185, 84, 255]));
        // Width 3 spans y 8.5..11.5; rows 7 and 12 stay empty.
        assert_eq!(alpha(&surface, 15, 7), 0);
        assert_eq!(alpha(&surface, 15, 12), 0);
        assert_eq!(engine.session().last_point(), Some(Point::new(20.0, 10.0)));
    }

    #[test]
    fn consecutive_moves_connect_segments() {
        let mut surface = canvas();
        let mut engine = StrokeEngine::default();
        engine.on_pointer_down(Point::new(10.0, 50.0));
        for x in [30.0, 50.0, 70.0] {
            engine
                .on_pointer_move(ToolMode::Pen, Point::new(x, 50.0), &mut surface)
                .unwrap();
        }
        for x in [15, 35, 55, 65] {
            assert_eq!(alpha(&surface, x, 50), 255, "gap at x={x}");
        }
    }

    #[test]
    fn highlighter_is_wide_and_translucent() {
        let mut surface = canvas();
        let mut engine = StrokeEngine::default();
        engine.on_pointer_down(Point::new(10.0, 50.0));
        engine
            .on_pointer_move(ToolMode::Highlighter, Point::new(90.0, 50.0), &mut surface)
            .unwrap();

        let [r, g, b, a] = surface.pixel(50, 50).unwrap();
        assert!((126..=130).contains(&a), "alpha {a}");
        assert!(r >= 250 && g >= 250 && b <= 5, "color {r},{g},{b}");
        // Width 15 spans y 42.5..57.5.
        assert!(alpha(&surface, 50, 44) > 0);
        assert_eq!(alpha(&surface, 50, 40), 0);
    }

    #[test]
    fn highlighter_blends_over_image() {
        let mut surface = canvas();
        surface
            .paint_image(&RgbaImage::from_pixel(100, 100, Rgba([0, 0, 255, 255])))
            .unwrap();
        let mut engine = StrokeEngine::default();
        engine.on_pointer_down(Point::new(10.0, 50.0));
        engine
            .on_pointer_move(ToolMode::Highlighter, Point::new(90.0, 50.0), &mut surface)
            .unwrap();

        // Half yellow over opaque blue lands near mid grey and stays opaque.
        let [r, g, b, a] = surface.pixel(50, 50).unwrap();
        assert_eq!(a, 255);
        for channel in [r, g, b] {
            assert!((125..=130).contains(&channel), "blend {r},{g},{b}");
        }
        // Outside the 15px band the image is untouched.
        assert_eq!(surface.pixel(50, 20), Some([0, 0, 255, 255]));
    }

    #[test]
    fn eraser_clears_square_and_keeps_last_point() {
        let mut surface = canvas();
        surface
            .paint_image(&RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255])))
            .unwrap();
        let mut engine = StrokeEngine::default();
        engine.on_pointer_down(Point::new(5.0, 5.0));
        engine
            .on_pointer_move(ToolMode::Eraser, Point::new(50.0, 50.0), &mut surface)
            .unwrap();

        for (x, y) in [(40, 40), (59, 59), (40, 59), (59, 40), (50, 50)] {
            assert_eq!(alpha(&surface, x, y), 0, "({x}, {y}) not cleared");
        }
        for (x, y) in [(39, 50), (60, 50), (50, 39), (50, 60)] {
            assert_eq!(alpha(&surface, x, y), 255, "({x}, {y}) cleared");
        }
        // No line towards the pointer-down position.
        assert_eq!(alpha(&surface, 20, 20), 255);
        assert_eq!(engine.session().last_point(), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn up_and_leave_end_the_session() {
        let mut surface = canvas();
        let mut engine = StrokeEngine::default();

        engine.on_pointer_down(Point::new(10.0, 10.0));
        engine.on_pointer_up();
        assert!(!engine.session().is_active());
        assert!(
            !engine
                .on_pointer_move(ToolMode::Pen, Point::new(90.0, 90.0), &mut surface)
                .unwrap()
        );

        engine.on_pointer_down(Point::new(10.0, 10.0));
        engine.on_pointer_leave();
        assert!(!engine.session().is_active());
        assert!(surface.is_blank());
    }

    #[test]
    fn styles_follow_config() {
        let mut config = DrawingConfig::default();
        config.pen_width = 6.0;
        config.highlighter_opacity = 0.25;
        config.eraser_size = 10.0;
        let styles = ToolStyles::from_config(&config);
        assert_eq!(styles.pen.width, 6.0);
        assert_eq!(styles.pen.color, ACCENT);
        assert_eq!(styles.highlighter.color.a, 0.25);
        assert_eq!(styles.eraser_size, 10.0);
        assert_eq!(ToolStyles::from_config(&DrawingConfig::default()), ToolStyles::default());
    }
}
