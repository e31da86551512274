//! Collision primitives for the ball and the paddles.

use glam::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Circle given by center and radius
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Circle { center, radius }
    }

    /// Radius-expanded bounding box of the circle
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Overlap test between a circle and a rectangle.
///
/// Compares the circle's bounding box against the rectangle on both axes
/// (edges inclusive), so corners count as hits slightly outside the true
/// circle. Paddles are much taller than the ball, which keeps this close to
/// the exact test where it matters.
pub fn circle_intersects_rect(circle: &Circle, rect: &Rect) -> bool {
    let b = circle.bounds();

    b.bottom() >= rect.top()
        && b.top() <= rect.bottom()
        && b.left() <= rect.right()
        && b.right() >= rect.left()
}
