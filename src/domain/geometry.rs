//! Geometric types for the drawing surface and pointer input

use serde::{Deserialize, Serialize};

/// A point in surface pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate the point by the given offset
    pub fn translate(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Angle of the vector from `self` to `other`, in radians
    pub fn angle_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// A straight segment between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance_to(self.end)
    }
}

/// Committed drawing surface dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fit an image to `max_width`, scaling both dimensions by the same
    /// factor. Smaller images are scaled up, larger ones down.
    pub fn fit_to_width(image_width: u32, image_height: u32, max_width: u32) -> Self {
        if image_width == 0 || max_width == 0 {
            return Self::new(image_width.max(1), image_height.max(1));
        }
        let height = u64::from(image_height) * u64::from(max_width) / u64::from(image_width);
        Self::new(max_width, u32::try_from(height).unwrap_or(u32::MAX).max(1))
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Scale factor from source image pixels to surface pixels
    pub fn scale_from(&self, image_width: u32) -> f32 {
        if image_width == 0 {
            1.0
        } else {
            self.width as f32 / image_width as f32
        }
    }
}

/// On-screen rectangle the surface is displayed in, in client pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A display rectangle showing the surface 1:1 at the origin
    pub fn identity(size: SurfaceSize) -> Self {
        Self::new(0.0, 0.0, size.width as f32, size.height as f32)
    }

    /// Map a client coordinate into surface pixel space
    pub fn to_surface(&self, client: Point, size: SurfaceSize) -> Point {
        let scale_x = if self.width > 0.0 {
            size.width as f32 / self.width
        } else {
            1.0
        };
        let scale_y = if self.height > 0.0 {
            size.height as f32 / self.height
        } else {
            1.0
        };
        Point::new(
            (client.x - self.left) * scale_x,
            (client.y - self.top) * scale_y,
        )
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}
