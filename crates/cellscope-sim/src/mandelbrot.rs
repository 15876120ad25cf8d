//! Escape-time Mandelbrot field with pan/zoom viewport controls.

use crate::render::Frame;
use cellscope_core::{Direction, MandelbrotConfig, Rgb};

/// Fraction of the zoom applied per pan step
const PAN_STEP: f32 = 0.05;
/// Zoom factor per zoom-in step
const ZOOM_STEP: f32 = 0.9;
/// Change of the iteration budget per adjustment
const ITER_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width of the visible square of the complex plane
    pub zoom: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub max_iter: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from(&MandelbrotConfig::default())
    }
}

impl From<&MandelbrotConfig> for Viewport {
    fn from(config: &MandelbrotConfig) -> Self {
        Self {
            zoom: config.zoom,
            offset_x: config.offset.0,
            offset_y: config.offset.1,
            max_iter: config.max_iter.max(1),
        }
    }
}

impl Viewport {
    /// Move the view by a fixed fraction of the current zoom
    pub fn pan(&mut self, direction: Direction) {
        let (dx, dy) = direction.to_delta();
        let step = PAN_STEP * self.zoom;
        // Offsets are subtracted from the plane coordinate, so a move east lowers offset_x
        self.offset_x -= dx as f32 * step;
        self.offset_y += dy as f32 * step;
    }

    pub fn zoom_in(&mut self) {
        self.zoom *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom /= ZOOM_STEP;
    }

    pub fn more_iterations(&mut self) {
        self.max_iter = self.max_iter.saturating_add(ITER_STEP);
    }

    pub fn fewer_iterations(&mut self) {
        self.max_iter = self.max_iter.saturating_sub(ITER_STEP).max(1);
    }

    /// Point of the complex plane under texture coordinate `(tx, ty)` in [0, 1]^2
    pub fn to_plane(&self, tx: f32, ty: f32) -> (f32, f32) {
        (
            (tx - 0.5) * self.zoom - self.offset_x,
            (ty - 0.5) * self.zoom - self.offset_y,
        )
    }

    /// Iterations before escape divided by the budget; 1.0 for points that never escape
    pub fn escape_fraction(&self, tx: f32, ty: f32) -> f32 {
        let (cx, cy) = self.to_plane(tx, ty);
        let (mut zx, mut zy) = (0.0f32, 0.0f32);

        let mut iter = 0;
        while iter < self.max_iter {
            let x = zx * zx - zy * zy + cx;
            let y = 2.0 * zx * zy + cy;
            if x * x + y * y > 4.0 {
                break;
            }
            zx = x;
            zy = y;
            iter += 1;
        }

        iter as f32 / self.max_iter as f32
    }

    pub fn color(fraction: f32) -> Rgb {
        Rgb::new(fraction, fraction * 0.5, fraction * 0.25)
    }

    /// Sample every pixel centre; row 0 is the top of the image
    pub fn render(&self, frame: &mut Frame) {
        let (height, width) = (frame.height(), frame.width());
        for row in 0..height {
            let ty = 1.0 - (row as f32 + 0.5) / height as f32;
            for col in 0..width {
                let tx = (col as f32 + 0.5) / width as f32;
                frame.set_pixel(row, col, Self::color(self.escape_fraction(tx, ty)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_never_escapes() {
        let viewport = Viewport::default();
        assert_eq!(viewport.escape_fraction(0.5, 0.5), 1.0);
    }

    #[test]
    fn test_far_point_escapes_immediately() {
        let viewport = Viewport {
            zoom: 4.0,
            ..Default::default()
        };
        // c = (1.5, 1.5)
        assert_eq!(viewport.to_plane(0.875, 0.875), (1.5, 1.5));
        assert_eq!(viewport.escape_fraction(0.875, 0.875), 0.0);
    }

    #[test]
    fn test_pan_follows_direction() {
        let mut viewport = Viewport::default();
        viewport.pan(Direction::North);
        assert!((viewport.offset_y + 0.1).abs() < 1e-6);
        viewport.pan(Direction::West);
        assert!((viewport.offset_x - 0.1).abs() < 1e-6);
        viewport.pan(Direction::SouthEast);
        assert!(viewport.offset_x.abs() < 1e-6);
        assert!(viewport.offset_y.abs() < 1e-6);
    }

    #[test]
    fn test_zoom_roundtrip() {
        let mut viewport = Viewport::default();
        viewport.zoom_in();
        assert!((viewport.zoom - 1.8).abs() < 1e-6);
        viewport.zoom_out();
        assert!((viewport.zoom - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_iteration_budget_floor() {
        let mut viewport = Viewport {
            max_iter: 15,
            ..Default::default()
        };
        viewport.fewer_iterations();
        assert_eq!(viewport.max_iter, 5);
        viewport.fewer_iterations();
        assert_eq!(viewport.max_iter, 1);
        viewport.more_iterations();
        assert_eq!(viewport.max_iter, 11);
    }

    #[test]
    fn test_render_gradient() {
        let viewport = Viewport::default();
        let mut frame = Frame::new(9, 9).unwrap();
        viewport.render(&mut frame);

        // Centre pixel sits on the origin, inside the set
        assert_eq!(frame.pixel(4, 4), Rgb::new(1.0, 0.5, 0.25));
        // Corner at c ~ (-0.89, 0.89) escapes early
        assert!(frame.pixel(0, 0).r < 0.2);
        assert!(frame.rgb().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
