//! The drawing surface every background paints into.
//!
//! Draw commands take logical pixel coordinates. They are rasterized onto a
//! coarse grid of [`DOT_PX`] sized dots, two dots per terminal cell, which the
//! [`Widget`] impl turns into half-block characters.

use backdrop_core::{Paint, Point, Rgb, Viewport};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Logical pixels covered by one raster dot along each axis.
pub const DOT_PX: f32 = 8.0;

const HALF_BLOCK: &str = "▀";

/// A raster-sized pixel buffer written directly by pixel-level effects.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    cols: usize,
    rows: usize,
    data: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            data: vec![Rgb::BLACK; cols * rows],
        }
    }

    /// A buffer matching the raster a [`Surface`] for `viewport` would get.
    pub fn for_viewport(viewport: Viewport) -> Self {
        let (cols, rows) = raster_dims(viewport);
        Self::new(cols, rows)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn set(&mut self, col: usize, row: usize, rgb: Rgb) {
        if col < self.cols && row < self.rows {
            self.data[row * self.cols + col] = rgb;
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Rgb> {
        (col < self.cols && row < self.rows).then(|| self.data[row * self.cols + col])
    }
}

/// Raster surface sized to a viewport.
#[derive(Debug, Clone)]
pub struct Surface {
    viewport: Viewport,
    cols: usize,
    rows: usize,
    pixels: Vec<Rgb>,
}

impl Surface {
    /// Create a cleared surface covering `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        let (cols, rows) = raster_dims(viewport);
        Self {
            viewport,
            cols,
            rows,
            pixels: vec![Rgb::BLACK; cols * rows],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Raster dimensions in dots.
    pub fn raster_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// A pixel buffer matching this surface's raster.
    pub fn blank_pixels(&self) -> PixelBuffer {
        PixelBuffer::new(self.cols, self.rows)
    }

    pub fn pixel(&self, col: usize, row: usize) -> Option<Rgb> {
        (col < self.cols && row < self.rows).then(|| self.pixels[row * self.cols + col])
    }

    /// Color of the dot containing logical point `p`.
    pub fn sample(&self, p: Point) -> Option<Rgb> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        self.pixel((p.x / DOT_PX) as usize, (p.y / DOT_PX) as usize)
    }

    fn blend_at(&mut self, col: i64, row: i64, paint: Paint) {
        if col < 0 || row < 0 || paint.alpha <= 0.0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return;
        }
        let idx = row * self.cols + col;
        self.pixels[idx] = self.pixels[idx].blend(paint.rgb, paint.alpha);
    }

    /// Raster bounding box of a logical circle, clamped to the surface.
    fn dot_bounds(&self, center: Point, reach: f32) -> (i64, i64, i64, i64) {
        let c0 = ((center.x - reach) / DOT_PX).floor().max(0.0) as i64;
        let r0 = ((center.y - reach) / DOT_PX).floor().max(0.0) as i64;
        let c1 = ((center.x + reach) / DOT_PX).floor().min(self.cols as f32 - 1.0) as i64;
        let r1 = ((center.y + reach) / DOT_PX).floor().min(self.rows as f32 - 1.0) as i64;
        (c0, r0, c1, r1)
    }

    fn dot_center(col: i64, row: i64) -> Point {
        Point::new((col as f32 + 0.5) * DOT_PX, (row as f32 + 0.5) * DOT_PX)
    }

    /// Overwrite every dot with `color`.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Blend `paint` over the whole surface.
    pub fn fill(&mut self, paint: Paint) {
        if paint.alpha >= 1.0 {
            self.clear(paint.rgb);
            return;
        }
        for px in &mut self.pixels {
            *px = px.blend(paint.rgb, paint.alpha);
        }
    }

    /// Opaque top-to-bottom gradient over the whole surface.
    pub fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let rows = self.rows.max(1);
        for row in 0..self.rows {
            let t = row as f32 / (rows - 1).max(1) as f32;
            let color = top.blend(bottom, t);
            self.pixels[row * self.cols..(row + 1) * self.cols].fill(color);
        }
    }

    /// Blend `paint` over an axis-aligned logical rectangle.
    pub fn fill_rect(&mut self, origin: Point, width: f32, height: f32, paint: Paint) {
        let c0 = (origin.x / DOT_PX).floor() as i64;
        let r0 = (origin.y / DOT_PX).floor() as i64;
        let c1 = ((origin.x + width) / DOT_PX).ceil() as i64;
        let r1 = ((origin.y + height) / DOT_PX).ceil() as i64;
        for row in r0..r1.max(r0 + 1) {
            for col in c0..c1.max(c0 + 1) {
                self.blend_at(col, row, paint);
            }
        }
    }

    /// Fill a disc. Discs smaller than a dot still leave a faint mark.
    pub fn fill_circle(&mut self, center: Point, radius: f32, paint: Paint) {
        if radius <= 0.0 {
            return;
        }
        if radius < DOT_PX / 2.0 {
            let coverage = (std::f32::consts::PI * radius * radius / (DOT_PX * DOT_PX)).max(0.35);
            self.blend_at(
                (center.x / DOT_PX).floor() as i64,
                (center.y / DOT_PX).floor() as i64,
                paint.fade(coverage.min(1.0)),
            );
            return;
        }
        let reach = radius + DOT_PX / 2.0;
        let (c0, r0, c1, r1) = self.dot_bounds(center, reach);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let d = Self::dot_center(col, row).distance_to(center);
                let coverage = ((reach - d) / DOT_PX).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_at(col, row, paint.fade(coverage));
                }
            }
        }
    }

    /// Fill a disc with a radial gradient. `stops` are `(offset, paint)` with
    /// offsets ascending in `0.0..=1.0`.
    pub fn fill_radial_gradient(&mut self, center: Point, radius: f32, stops: &[(f32, Paint)]) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        let (c0, r0, c1, r1) = self.dot_bounds(center, radius);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let d = Self::dot_center(col, row).distance_to(center);
                if d > radius {
                    continue;
                }
                let paint = gradient_at(stops, d / radius);
                self.blend_at(col, row, paint);
            }
        }
        if radius < DOT_PX / 2.0 {
            self.fill_circle(center, radius, stops[0].1);
        }
    }

    /// Stroke a circle outline.
    pub fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, paint: Paint) {
        if radius <= 0.0 {
            return;
        }
        let band = (width / 2.0).max(DOT_PX / 2.0);
        let (c0, r0, c1, r1) = self.dot_bounds(center, radius + band);
        let paint = paint.fade(stroke_weight(width));
        for row in r0..=r1 {
            for col in c0..=c1 {
                let d = Self::dot_center(col, row).distance_to(center);
                if (d - radius).abs() <= band {
                    self.blend_at(col, row, paint);
                }
            }
        }
    }

    /// Stroke a straight segment. Each dot along the segment is blended once.
    pub fn stroke_line(&mut self, from: Point, to: Point, width: f32, paint: Paint) {
        let paint = paint.fade(stroke_weight(width));
        let (ax, ay) = (from.x / DOT_PX, from.y / DOT_PX);
        let (bx, by) = (to.x / DOT_PX, to.y / DOT_PX);
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil().max(1.0) as i64;
        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let col = (ax + (bx - ax) * t).floor() as i64;
            let row = (ay + (by - ay) * t).floor() as i64;
            if last == Some((col, row)) {
                continue;
            }
            last = Some((col, row));
            if width > DOT_PX {
                self.fill_circle(Self::dot_center(col, row), width / 2.0, paint);
            } else {
                self.blend_at(col, row, paint);
            }
        }
    }

    /// Stroke an open polyline.
    pub fn stroke_path(&mut self, points: &[Point], width: f32, paint: Paint) {
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], width, paint);
        }
    }

    /// Stroke a closed polygon outline.
    pub fn stroke_polygon(&mut self, points: &[Point], width: f32, paint: Paint) {
        self.stroke_path(points, width, paint);
        if let (Some(first), Some(last)) = (points.first(), points.last())
            && points.len() > 2
        {
            self.stroke_line(*last, *first, width, paint);
        }
    }

    /// Fill a polygon using the even-odd rule on dot centers.
    pub fn fill_polygon(&mut self, points: &[Point], paint: Paint) {
        if points.len() < 3 {
            return;
        }
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let center = Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
        let reach = (max_x - min_x).max(max_y - min_y) / 2.0;
        let (c0, r0, c1, r1) = self.dot_bounds(center, reach);
        for row in r0..=r1 {
            for col in c0..=c1 {
                if contains_point(points, Self::dot_center(col, row)) {
                    self.blend_at(col, row, paint);
                }
            }
        }
    }

    /// Copy a full pixel buffer onto the surface.
    ///
    /// The buffer must have been allocated for this surface's raster; a buffer
    /// left over from an earlier size is a bug in the caller.
    pub fn put_pixels(&mut self, buffer: &PixelBuffer) {
        debug_assert_eq!(
            buffer.size(),
            self.raster_size(),
            "pixel buffer does not match surface raster"
        );
        if buffer.size() != self.raster_size() {
            return;
        }
        self.pixels.copy_from_slice(&buffer.data);
    }
}

/// Dots needed to cover `viewport`.
fn raster_dims(viewport: Viewport) -> (usize, usize) {
    let cols = (viewport.width.max(0.0) / DOT_PX).ceil() as usize;
    let rows = (viewport.height.max(0.0) / DOT_PX).ceil() as usize;
    (cols, rows)
}

/// Opacity multiplier for a stroke of logical `width` on the coarse raster.
fn stroke_weight(width: f32) -> f32 {
    (0.5 + width / DOT_PX).min(1.0)
}

fn gradient_at(stops: &[(f32, Paint)], t: f32) -> Paint {
    let first = stops[0];
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (o0, p0) = pair[0];
        let (o1, p1) = pair[1];
        if t <= o1 {
            let span = (o1 - o0).max(f32::EPSILON);
            let k = (t - o0) / span;
            return Paint {
                rgb: p0.rgb.blend(p1.rgb, k),
                alpha: p0.alpha + (p1.alpha - p0.alpha) * k,
            };
        }
    }
    stops[stops.len() - 1].1
}

fn contains_point(polygon: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Widget for &Surface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in 0..area.height {
            for x in 0..area.width {
                let col = x as usize;
                let (Some(top), Some(bottom)) = (
                    self.pixel(col, y as usize * 2),
                    self.pixel(col, y as usize * 2 + 1),
                ) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(top.into())
                        .set_bg(bottom.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: f32, h: f32) -> Surface {
        Surface::new(Viewport::new(w, h))
    }

    #[test]
    fn test_raster_covers_viewport() {
        assert_eq!(surface(800.0, 600.0).raster_size(), (100, 75));
        assert_eq!(surface(801.0, 600.0).raster_size(), (101, 75));
        assert_eq!(surface(0.0, 0.0).raster_size(), (0, 0));
    }

    #[test]
    fn test_fill_circle_paints_center_not_far_corner() {
        let mut s = surface(160.0, 160.0);
        s.fill_circle(Point::new(80.0, 80.0), 20.0, Paint::rgb(255, 0, 0));
        assert_eq!(s.sample(Point::new(80.0, 80.0)), Some(Rgb::new(255, 0, 0)));
        assert_eq!(s.sample(Point::new(2.0, 2.0)), Some(Rgb::BLACK));
    }

    #[test]
    fn test_tiny_circle_still_marks_its_dot() {
        let mut s = surface(80.0, 80.0);
        s.fill_circle(Point::new(12.0, 12.0), 1.0, Paint::rgb(200, 200, 200));
        assert_ne!(s.sample(Point::new(12.0, 12.0)), Some(Rgb::BLACK));
    }

    #[test]
    fn test_line_reaches_both_ends() {
        let mut s = surface(160.0, 80.0);
        s.stroke_line(
            Point::new(4.0, 4.0),
            Point::new(150.0, 70.0),
            8.0,
            Paint::rgb(0, 255, 0),
        );
        assert_eq!(s.sample(Point::new(4.0, 4.0)), Some(Rgb::new(0, 255, 0)));
        assert_eq!(s.sample(Point::new(150.0, 70.0)), Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn test_zero_alpha_is_invisible() {
        let mut s = surface(80.0, 80.0);
        s.clear(Rgb::new(10, 10, 10));
        s.stroke_line(
            Point::new(0.0, 0.0),
            Point::new(79.0, 79.0),
            1.0,
            Paint::rgba(255, 255, 255, 0.0),
        );
        assert!((0..10).all(|i| s.pixel(i, i) == Some(Rgb::new(10, 10, 10))));
    }

    #[test]
    fn test_fill_polygon_square() {
        let mut s = surface(80.0, 80.0);
        let square = [
            Point::new(16.0, 16.0),
            Point::new(64.0, 16.0),
            Point::new(64.0, 64.0),
            Point::new(16.0, 64.0),
        ];
        s.fill_polygon(&square, Paint::rgb(0, 0, 255));
        assert_eq!(s.sample(Point::new(40.0, 40.0)), Some(Rgb::new(0, 0, 255)));
        assert_eq!(s.sample(Point::new(4.0, 40.0)), Some(Rgb::BLACK));
    }

    #[test]
    fn test_vertical_gradient_endpoints() {
        let mut s = surface(16.0, 80.0);
        s.fill_vertical_gradient(Rgb::new(0, 0, 0), Rgb::new(100, 100, 100));
        assert_eq!(s.pixel(0, 0), Some(Rgb::new(0, 0, 0)));
        assert_eq!(s.pixel(1, 9), Some(Rgb::new(100, 100, 100)));
    }

    #[test]
    fn test_put_pixels_copies_matching_buffer() {
        let mut s = surface(32.0, 32.0);
        let mut buf = s.blank_pixels();
        buf.set(3, 3, Rgb::new(1, 2, 3));
        s.put_pixels(&buf);
        assert_eq!(s.pixel(3, 3), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn test_widget_renders_half_blocks() {
        let mut s = surface(16.0, 32.0);
        s.clear(Rgb::new(9, 9, 9));
        s.fill_rect(Point::new(0.0, 0.0), 8.0, 8.0, Paint::rgb(255, 0, 0));
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        (&s).render(area, &mut buf);
        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), HALF_BLOCK);
        assert_eq!(cell.fg, ratatui::style::Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, ratatui::style::Color::Rgb(9, 9, 9));
    }
}
