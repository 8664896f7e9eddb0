//! Static grids that swell and brighten near the pointer.

use std::f32::consts::PI;

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::rngs::StdRng;

use super::{cell_noise, cells};
use crate::background::{Background, FrameContext};
use crate::interaction::falloff;
use crate::store::ElementStore;
use crate::surface::Surface;

const POINTER_RADIUS: f32 = 150.0;

/// Pointer proximity factor for a grid element, `0.0` without a pointer.
fn proximity(pointer: Option<Point>, at: Point) -> f32 {
    pointer.map_or(0.0, |p| falloff(at.distance_to(p), POINTER_RADIUS))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Dot {
    at: Point,
    size: f32,
    hue: f32,
}

const DOT_SPACING: f32 = 40.0;

/// Rainbow dot lattice.
#[derive(Debug, Default)]
pub struct Dots {
    dots: ElementStore<Dot>,
}

impl Dots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Background for Dots {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Dots
    }

    fn seed(&mut self, viewport: Viewport, _rng: &mut StdRng) {
        let cols = cells(viewport.width, DOT_SPACING);
        let rows = cells(viewport.height, DOT_SPACING);
        self.dots.replace((0..rows).flat_map(|row| {
            (0..cols).map(move |col| Dot {
                at: Point::new(col as f32 * DOT_SPACING, row as f32 * DOT_SPACING),
                size: cell_noise(col, row, 1) * 3.0 + 2.0,
                hue: (row + col) as f32 * 5.0,
            })
        }));
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 20));
    }

    fn render(&self, surface: &mut Surface, ctx: &FrameContext<'_>) {
        for dot in &self.dots {
            let factor = proximity(ctx.pointer, dot.at);
            let size = dot.size + factor * 5.0;
            let lightness = 0.5 + factor * 0.5;
            surface.fill_circle(dot.at, size, Paint::hsla(dot.hue, 0.7, lightness, 1.0));
        }
    }

    fn population(&self) -> usize {
        self.dots.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.dots.iter().map(|d| d.at).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hexagon {
    at: Point,
    hue: f32,
}

const HEX_SIZE: f32 = 40.0;

fn hexagon_outline(center: Point, size: f32) -> [Point; 6] {
    std::array::from_fn(|i| center.offset_polar(PI / 3.0 * i as f32, size))
}

/// Flat-topped hexagon tiling, one row offset per line.
#[derive(Debug, Default)]
pub struct Hexagons {
    hexagons: ElementStore<Hexagon>,
}

impl Hexagons {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Background for Hexagons {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Hexagon
    }

    /// Tile one column and one row past the viewport so the right and
    /// bottom edges have no gaps. Those centres lie outside the viewport.
    fn seed(&mut self, viewport: Viewport, _rng: &mut StdRng) {
        let row_height = HEX_SIZE * 3f32.sqrt();
        let col_width = HEX_SIZE * 1.5;
        if viewport.is_empty() {
            self.hexagons.clear();
            return;
        }
        let cols = cells(viewport.width, col_width) + 1;
        let rows = cells(viewport.height, row_height) + 1;
        self.hexagons.replace((0..rows).flat_map(|row| {
            (0..cols).map(move |col| Hexagon {
                at: Point::new(
                    col as f32 * col_width + (row % 2) as f32 * HEX_SIZE * 0.75,
                    row as f32 * row_height,
                ),
                hue: (row + col) as f32 * 5.0,
            })
        }));
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 26));
    }

    fn render(&self, surface: &mut Surface, ctx: &FrameContext<'_>) {
        for hex in &self.hexagons {
            let factor = proximity(ctx.pointer, hex.at);
            let scale = 1.0 + factor * 0.3;
            let lightness = if factor > 0.0 { 0.5 + factor * 0.5 } else { 0.3 };
            let outline = hexagon_outline(hex.at, HEX_SIZE * scale);
            surface.fill_polygon(&outline, Paint::hsla(hex.hue, 0.7, lightness, 1.0));
            surface.stroke_polygon(
                &outline,
                1.0,
                Paint::hsla(hex.hue, 0.7, lightness + 0.1, 1.0),
            );
        }
    }

    fn population(&self) -> usize {
        self.hexagons.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.hexagons.iter().map(|h| h.at).collect()
    }
}
