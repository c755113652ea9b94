//! Canvas geometry primitives shared by layout engines and consumers.
//!
//! # Responsibility
//! - Represent points, canvas bounds and the presentation viewport.
//! - Keep bounds clamping in one place so every engine clamps the same way.
//!
//! # Invariants
//! - `CanvasSize::clamp` never returns a point outside `[0, width] x [0, height]`
//!   for a drawable canvas, even when the margin exceeds half a dimension.
//! - Coordinates use a y-down screen convention; angle `-PI/2` points up.

use serde::{Deserialize, Serialize};

/// 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point reached by moving `distance` along `angle` (radians).
    pub fn offset_polar(self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }

    /// Angle of `self` as seen from `origin`, in `(-PI, PI]`.
    pub fn angle_from(self, origin: Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x)
    }
}

/// Target canvas dimensions for one layout request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether an engine may run on this canvas.
    ///
    /// Zero, negative and non-finite dimensions are rejected so engines never
    /// divide by a degenerate size.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Clamps `point` into `[margin, dim - margin]` on both axes.
    ///
    /// When a dimension is smaller than `2 * margin`, the margin on that axis
    /// shrinks to half the dimension, pinning the point to the axis midpoint.
    pub fn clamp(&self, point: Point, margin: f64) -> Point {
        Point {
            x: clamp_axis(point.x, self.width, margin),
            y: clamp_axis(point.y, self.height, margin),
        }
    }

    /// Whether `point` lies inside `[margin, dim - margin]` on both axes,
    /// using the same margin shrinking rule as [`CanvasSize::clamp`].
    pub fn contains(&self, point: Point, margin: f64) -> bool {
        let mx = effective_margin(self.width, margin);
        let my = effective_margin(self.height, margin);
        point.x >= mx && point.x <= self.width - mx && point.y >= my && point.y <= self.height - my
    }
}

fn effective_margin(dimension: f64, margin: f64) -> f64 {
    margin.max(0.0).min(dimension / 2.0)
}

fn clamp_axis(value: f64, dimension: f64, margin: f64) -> f64 {
    let m = effective_margin(dimension, margin);
    if value.is_nan() {
        return dimension / 2.0;
    }
    value.min(dimension - m).max(m)
}

/// Pan/zoom state applied by the presentation layer on top of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::default(),
        }
    }
}

impl Viewport {
    pub fn new(scale: f64, offset: Point) -> Self {
        Self { scale, offset }
    }

    /// Maps a pointer location on screen back into layout coordinates.
    ///
    /// A non-positive or non-finite scale is treated as `1.0`.
    pub fn to_canvas(&self, screen: Point) -> Point {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        Point {
            x: (screen.x - self.offset.x) / scale,
            y: (screen.y - self.offset.y) / scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasSize, Point, Viewport};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn offset_polar_up_is_negative_y() {
        let moved = Point::new(100.0, 100.0).offset_polar(-FRAC_PI_2, 10.0);
        assert!((moved.x - 100.0).abs() < 1e-9);
        assert!((moved.y - 90.0).abs() < 1e-9);
    }

    #[test]
    fn drawable_rejects_degenerate_sizes() {
        assert!(CanvasSize::new(10.0, 10.0).is_drawable());
        assert!(!CanvasSize::new(0.0, 10.0).is_drawable());
        assert!(!CanvasSize::new(10.0, -1.0).is_drawable());
        assert!(!CanvasSize::new(f64::NAN, 10.0).is_drawable());
        assert!(!CanvasSize::new(f64::INFINITY, 10.0).is_drawable());
    }

    #[test]
    fn clamp_respects_margin() {
        let canvas = CanvasSize::new(200.0, 100.0);
        let clamped = canvas.clamp(Point::new(-50.0, 500.0), 20.0);
        assert_eq!(clamped, Point::new(20.0, 80.0));
        assert!(canvas.contains(clamped, 20.0));
    }

    #[test]
    fn clamp_shrinks_margin_on_tiny_canvas() {
        let canvas = CanvasSize::new(10.0, 30.0);
        let clamped = canvas.clamp(Point::new(100.0, -100.0), 20.0);
        assert_eq!(clamped, Point::new(5.0, 15.0));
        assert!(clamped.x <= canvas.width && clamped.y <= canvas.height);
    }

    #[test]
    fn viewport_inverts_pan_and_zoom() {
        let viewport = Viewport::new(2.0, Point::new(10.0, 20.0));
        assert_eq!(viewport.to_canvas(Point::new(30.0, 60.0)), Point::new(10.0, 20.0));

        let broken = Viewport::new(0.0, Point::default());
        assert_eq!(broken.to_canvas(Point::new(7.0, 8.0)), Point::new(7.0, 8.0));
    }
}
