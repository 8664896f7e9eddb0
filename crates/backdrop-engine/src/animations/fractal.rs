//! Rotating hexagon fractal centred on the viewport.
//!
//! The pointer is tracked in normalized coordinates so it keeps its relative
//! spot across resizes.

use std::f32::consts::PI;

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::rngs::StdRng;

use crate::background::{Background, FrameContext};
use crate::input::CoordinateSpace;
use crate::interaction::falloff;
use crate::store::ElementStore;
use crate::surface::Surface;

/// Deepest recursion level drawn.
pub const MAX_DEPTH: u32 = 4;
const POINTER_RADIUS: f32 = 200.0;
const POINTER_SCALE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    center: Point,
    size: f32,
    depth: u32,
}

fn subdivide(center: Point, size: f32, depth: u32, out: &mut Vec<Cell>) {
    if depth > MAX_DEPTH {
        return;
    }
    out.push(Cell {
        center,
        size,
        depth,
    });
    for i in 0..6 {
        let child = center.offset_polar(PI / 3.0 * i as f32, size * 0.6);
        subdivide(child, size * 0.5, depth + 1, out);
    }
}

#[derive(Debug, Default)]
pub struct Fractal {
    cells: ElementStore<Cell>,
}

impl Fractal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Background for Fractal {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Fractal
    }

    fn coordinate_space(&self) -> CoordinateSpace {
        CoordinateSpace::Normalized
    }

    fn seed(&mut self, viewport: Viewport, _rng: &mut StdRng) {
        let mut cells = Vec::new();
        if !viewport.is_empty() {
            let size = viewport.width.min(viewport.height) * 0.2;
            subdivide(viewport.center(), size, 0, &mut cells);
        }
        self.cells.replace(cells);
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 20));
    }

    fn render(&self, surface: &mut Surface, ctx: &FrameContext<'_>) {
        for cell in &self.cells {
            let alpha = 1.0 - cell.depth as f32 / MAX_DEPTH as f32;
            if alpha <= 0.0 {
                continue;
            }
            let scale = 1.0
                + ctx
                    .pointer
                    .map_or(0.0, |p| falloff(cell.center.distance_to(p), POINTER_RADIUS))
                    * POINTER_SCALE;
            let hue = (ctx.phase * 50.0 + cell.depth as f32 * 30.0) % 360.0;
            let rotation = ctx.phase + cell.depth as f32;
            let outline: [Point; 6] = std::array::from_fn(|i| {
                cell.center
                    .offset_polar(rotation + PI / 3.0 * i as f32, cell.size * scale)
            });
            surface.stroke_polygon(&outline, 2.0, Paint::hsla(hue, 0.7, 0.6, alpha));
        }
    }

    fn population(&self) -> usize {
        self.cells.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.cells.iter().map(|c| c.center).collect()
    }
}
