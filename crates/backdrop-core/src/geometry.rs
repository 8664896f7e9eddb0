//! Logical-pixel geometry.

/// Width of one terminal cell in logical pixels.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Height of one terminal cell in logical pixels.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// A position in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at `distance` along `angle` (radians) from this one.
    pub fn offset_polar(self, angle: f32, distance: f32) -> Point {
        Point::new(self.x + angle.cos() * distance, self.y + angle.sin() * distance)
    }
}

/// Dimensions of the area a background is mounted on, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport covering a terminal area of `cols` x `rows` cells.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as f32 * CELL_WIDTH_PX, rows as f32 * CELL_HEIGHT_PX)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Half-open containment: `[0, width) x [0, height)`.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_from_cells() {
        let vp = Viewport::from_cells(100, 40);
        assert_eq!(vp, Viewport::new(800.0, 640.0));
        assert!(Viewport::from_cells(0, 10).is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(vp.contains(Point::new(0.0, 0.0)));
        assert!(vp.contains(Point::new(799.9, 599.9)));
        assert!(!vp.contains(Point::new(800.0, 10.0)));
        assert!(!vp.contains(Point::new(10.0, -0.1)));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    }
}
